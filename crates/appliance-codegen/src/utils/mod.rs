pub mod spec;

pub use spec::{SpecFormat, SpecLoader, load_document};
