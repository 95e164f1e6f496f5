//! Target syntax trees built by the converters and rendered by `codegen`.

mod client;
mod documentation;
mod resource;
mod tokens;

pub use client::{ClientField, ClientModule, ClientStruct, ClientType, InputStruct, KeyMethod, OutputDef, UriParam};
pub use documentation::Documentation;
pub use resource::{AttributeDef, AttributeKind, ElementType, Literal, ResourceSchema, Validator, ValidatorFamily};
pub use tokens::{FieldNameToken, TypeNameToken};
