use super::{constraints::describe, resource::schema_root};
use crate::generator::{
  ast::{
    ClientField, ClientModule, ClientStruct, ClientType, Documentation, FieldNameToken, InputStruct, KeyMethod,
    OutputDef, TypeNameToken, UriParam,
  },
  classify::ClientRepr,
  error::{SchemaError, SchemaResult},
  imports::TypeIndex,
  ir::{
    FieldPath, Function, KeyKind, Namespace, Node, NodeCursor, NodeSpec, ParameterLocation, SchemaRegistry, derive_key,
  },
};

/// Builds client structs for namespaces and shared entries.
///
/// Referenced objects stay opaque: they are emitted once under their shared
/// class name and recorded as dependencies of the module using them.
pub struct ClientConverter<'a> {
  registry: &'a SchemaRegistry,
  index: &'a TypeIndex,
  module: ClientModule,
  /// Non-object references currently inlined, for cycle detection.
  inlined: Vec<String>,
}

impl<'a> ClientConverter<'a> {
  #[must_use]
  pub fn new(registry: &'a SchemaRegistry, index: &'a TypeIndex) -> Self {
    Self {
      registry,
      index,
      module: ClientModule::default(),
      inlined: Vec::new(),
    }
  }

  #[must_use]
  pub fn finish(self) -> ClientModule {
    self.module
  }

  /// The managed schema struct, then input and output types per function.
  pub fn convert_namespace(&mut self, namespace: &Namespace) -> SchemaResult<()> {
    self.convert_entry(&namespace.schema)?;
    let prefix = TypeNameToken::from_raw(&namespace.name);
    for (_, function) in namespace.functions() {
      self.convert_function(&prefix, function)?;
    }
    Ok(())
  }

  /// Struct for the object entry `id` of the registry.
  pub fn convert_entry(&mut self, id: &str) -> SchemaResult<()> {
    let root = schema_root(self.registry, id)?;
    if root.as_object().is_none() {
      return Err(SchemaError::RootNotObject {
        path: FieldPath::new(id),
        found: root.kind(),
      });
    }

    let cursor = NodeCursor::root(root);
    let mut def = self.convert_object(&cursor, self.index.class_of(id), &FieldPath::root())?;
    def.docs = Documentation::from_optional(root.description.as_deref());
    self.module.structs.push(def);
    Ok(())
  }

  fn convert_function(&mut self, prefix: &TypeNameToken, function: &Function) -> SchemaResult<()> {
    let prefix = prefix.nested(&function.name);
    let input = function.itemize_input()?;
    let path = FieldPath::new(&function.name);
    let method = function.http_method();

    let mut def = self.convert_object(
      &NodeCursor::root(&input),
      TypeNameToken::new(format!("{prefix}Input")),
      &path,
    )?;
    def.docs = Documentation::from_lines([format!("Input of `{method} {}`.", function.uri)]);

    let uri_params = function
      .placeholders()
      .filter_map(|placeholder| {
        def
          .fields
          .iter()
          .find(|field| field.wire_name == placeholder)
          .map(|field| UriParam {
            placeholder: placeholder.to_string(),
            field: field.name.clone(),
            optional: field.optional,
          })
      })
      .collect();

    self.module.inputs.push(
      InputStruct::builder()
        .def(def)
        .method(method)
        .uri_template(function.uri.clone())
        .uri_params(uri_params)
        .build(),
    );

    if let Some(output) = &function.output {
      let output_def = self.convert_output(&prefix, &path, output)?;
      self.module.outputs.push(output_def);
    }
    Ok(())
  }

  fn convert_output(&mut self, prefix: &TypeNameToken, path: &FieldPath, output: &Node) -> SchemaResult<OutputDef> {
    let canonical = self.registry.resolve_at(path, output)?;
    let name = TypeNameToken::new(format!("{prefix}Output"));
    let cursor = NodeCursor::resolved_root(output, canonical);
    let docs = Documentation::from_optional(output.description.as_deref().or(canonical.description.as_deref()));

    if canonical.as_object().is_some() && !output.is_reference() {
      let mut def = self.convert_object(&cursor, name, path)?;
      def.docs = docs;
      return Ok(OutputDef::Struct(def));
    }

    let target = self.field_type(&cursor, &name, path)?;
    Ok(OutputDef::Alias { name, docs, target })
  }

  fn convert_object(&mut self, cursor: &NodeCursor<'_>, name: TypeNameToken, path: &FieldPath) -> SchemaResult<ClientStruct> {
    let Some(object) = cursor.canonical().as_object() else {
      return Err(SchemaError::RootNotObject {
        path: path.clone(),
        found: cursor.canonical().kind(),
      });
    };

    let mut fields = Vec::with_capacity(object.len());
    let mut key_methods = Vec::new();
    for child in object.sorted_children() {
      let child_path = path.join(&child.name);
      let canonical = self.registry.resolve_at(&child_path, child)?;
      let child_cursor = cursor.resolved_child(child, canonical);

      let field_name = FieldNameToken::from_raw(&child.name);
      if canonical.is_encrypted() {
        key_methods.extend(encryption_keys(self.registry, &field_name, &child_cursor)?);
      } else if let Some(array) = canonical.as_array() {
        let element = self.registry.resolve_at(&child_path, &array.element)?;
        if element.is_encrypted() {
          key_methods.extend(encryption_keys(
            self.registry,
            &field_name,
            &child_cursor.resolved_child(&array.element, element),
          )?);
        }
      }

      let rust_type = self.field_type(&child_cursor, &name, &child_path)?;
      fields.push(
        ClientField::builder()
          .name(field_name)
          .wire_name(child.name.clone())
          .docs(field_docs(child, canonical))
          .rust_type(rust_type)
          .optional(ClientRepr::for_node(child, canonical).is_optional())
          .maybe_location(child.location)
          .build(),
      );
    }

    Ok(ClientStruct::builder().name(name).fields(fields).key_methods(key_methods).build())
  }

  fn field_type(&mut self, cursor: &NodeCursor<'_>, owner: &TypeNameToken, path: &FieldPath) -> SchemaResult<ClientType> {
    let node = cursor.node();
    let canonical = cursor.canonical();

    if let Some(id) = node.reference_id() {
      if canonical.as_object().is_some() {
        self.module.dependencies.insert(id.to_string());
        return Ok(ClientType::Named(self.index.class_of(id)));
      }
      if self.inlined.iter().any(|seen| seen.as_str() == id) {
        return Err(SchemaError::ReferenceCycle {
          path: path.clone(),
          reference: id.to_string(),
        });
      }
      self.inlined.push(id.to_string());
      let inlined = self.inline_type(cursor, owner, path);
      self.inlined.pop();
      return inlined;
    }

    self.inline_type(cursor, owner, path)
  }

  fn inline_type(&mut self, cursor: &NodeCursor<'_>, owner: &TypeNameToken, path: &FieldPath) -> SchemaResult<ClientType> {
    let canonical = cursor.canonical();
    Ok(match &canonical.spec {
      NodeSpec::Bool(spec) if spec.opaque => ClientType::Json,
      NodeSpec::Bool(_) => ClientType::Bool,
      NodeSpec::Int(_) => ClientType::Int,
      NodeSpec::Float(_) => ClientType::Float,
      NodeSpec::String(_) => ClientType::String,
      NodeSpec::Object(_) => {
        let name = match cursor.internal_name() {
          "" => owner.nested("item"),
          child => owner.nested(child),
        };
        let mut def = self.convert_object(cursor, name.clone(), path)?;
        def.docs = Documentation::from_optional(canonical.description.as_deref());
        self.module.structs.push(def);
        ClientType::Named(name)
      }
      NodeSpec::Array(array) => {
        let element = self.registry.resolve_at(path, &array.element)?;
        let element_cursor = cursor.resolved_child(&array.element, element);
        ClientType::list(self.field_type(&element_cursor, owner, path)?)
      }
    })
  }
}

fn encryption_keys(
  registry: &SchemaRegistry,
  field: &FieldNameToken,
  cursor: &NodeCursor<'_>,
) -> SchemaResult<Vec<KeyMethod>> {
  KeyKind::ALL
    .into_iter()
    .map(|kind| Ok(KeyMethod::new(field, kind, derive_key(registry, cursor, kind)?)))
    .collect()
}

fn field_docs(node: &Node, canonical: &Node) -> Documentation {
  let mut docs = Documentation::from_optional(node.description.as_deref().or(canonical.description.as_deref()));

  let mut notes = Vec::new();
  match node.location {
    Some(ParameterLocation::Path) => notes.push("Path parameter.".to_string()),
    Some(ParameterLocation::Query) => notes.push("Query parameter.".to_string()),
    Some(ParameterLocation::Body) | None => {}
  }
  if node.read_only {
    notes.push("Read-only.".to_string());
  }
  if node.required {
    notes.push("Required.".to_string());
  }
  notes.extend(describe(canonical));
  docs.push_paragraph(notes);
  docs
}
