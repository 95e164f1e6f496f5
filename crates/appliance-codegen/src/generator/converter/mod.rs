//! Lowering of the schema IR into the per-target AST.

mod client;
pub mod constraints;
mod resource;

#[cfg(test)]
mod tests;

pub use client::ClientConverter;
pub use resource::ResourceConverter;
