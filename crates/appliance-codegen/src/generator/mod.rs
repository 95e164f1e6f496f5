pub mod ast;
pub mod classify;
pub mod codegen;
pub mod converter;
pub mod error;
pub mod imports;
pub mod ir;
pub mod metrics;
pub mod orchestrator;

#[cfg(test)]
mod tests;
