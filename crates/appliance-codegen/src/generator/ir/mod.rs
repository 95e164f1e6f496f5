//! Schema intermediate representation shared by both generation targets.

mod cursor;
mod document;
mod hashing;
mod merge;
mod node;
mod operation;
mod path;
mod registry;

#[cfg(test)]
mod tests;

pub use cursor::NodeCursor;
pub use document::SpecDocument;
pub use hashing::{EncryptionKey, HashProfile, KEY_SEPARATOR, KeyKind, SiblingValueKey, derive_key};
pub use node::{
  ArraySpec, BoolSpec, DefaultValue, FloatSpec, IntSpec, Node, NodeKind, NodeSpec, NumberSpec, ObjectSpec,
  ParameterLocation, StringSpec, ValuesPatch,
};
pub use operation::{Function, Namespace, OperationKind, REQUEST_BODY_NAME};
pub use path::FieldPath;
pub use registry::{CollectedNode, ReferenceMode, SchemaRegistry};
