#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
//! Schema IR and dual code generation for appliance configuration objects.
//!
//! A generation run merges override documents into a base document, builds the
//! [`SchemaRegistry`](generator::ir::SchemaRegistry), groups functions into
//! namespaces and renders two source strings per namespace: typed client structs
//! and resource-schema attribute blocks.

pub mod generator;
pub mod naming;
pub mod utils;
