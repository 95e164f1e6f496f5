use super::constraints::{list_validators, scalar_validators};
use crate::{
  generator::{
    ast::{AttributeDef, AttributeKind, Documentation, ElementType, FieldNameToken, ResourceSchema, Validator},
    classify::{FieldUsage, UsageIndex, classify},
    error::{SchemaError, SchemaResult},
    ir::{FieldPath, Namespace, Node, NodeCursor, NodeSpec, ObjectSpec, ReferenceMode, SchemaRegistry},
  },
  naming::identifiers::to_snake_display_name,
};

/// Builds the resource-schema attribute list of a namespace.
///
/// References are expanded inline: every attribute carries the structure of its
/// canonical node and the flags of its declaration.
pub struct ResourceConverter<'a> {
  registry: &'a SchemaRegistry,
  usage: &'a UsageIndex,
}

impl<'a> ResourceConverter<'a> {
  #[must_use]
  pub fn new(registry: &'a SchemaRegistry, usage: &'a UsageIndex) -> Self {
    Self { registry, usage }
  }

  pub fn convert(&self, namespace: &Namespace) -> SchemaResult<ResourceSchema> {
    let root = schema_root(self.registry, &namespace.schema)?;
    let object = root.as_object().ok_or_else(|| SchemaError::RootNotObject {
      path: FieldPath::new(&namespace.schema),
      found: root.kind(),
    })?;
    self.registry.collect(root, ReferenceMode::Expanded)?;

    let cursor = NodeCursor::root(root);
    let attributes = self.convert_children(&cursor, object, &FieldPath::root(), None)?;
    let docs = Documentation::from_optional(root.description.as_deref());

    Ok(
      ResourceSchema::builder()
        .function(FieldNameToken::from_raw(&format!(
          "{}_attributes",
          to_snake_display_name(&namespace.name)
        )))
        .slug(namespace.slug.clone().unwrap_or_default())
        .docs(docs)
        .attributes(attributes)
        .build(),
    )
  }

  fn convert_children(
    &self,
    parent: &NodeCursor<'_>,
    object: &ObjectSpec,
    path: &FieldPath,
    inherited: Option<FieldUsage>,
  ) -> SchemaResult<Vec<AttributeDef>> {
    let mut attributes = Vec::with_capacity(object.len());
    for child in object.sorted_children() {
      let child_path = path.join(&child.name);
      let canonical = self.registry.resolve_at(&child_path, child)?;
      let cursor = parent.resolved_child(child, canonical);
      let usage = inherited.unwrap_or_else(|| self.usage.usage(&child.name));

      let mut attribute = self.convert_field(&cursor, &child_path, usage)?;
      if let Some(group) = object.group_of(&child.name) {
        attribute.validators.push(Validator::ExactlyOneOf(
          group.iter().map(|member| to_snake_display_name(member)).collect(),
        ));
      }
      attributes.push(attribute);
    }
    Ok(attributes)
  }

  fn convert_field(&self, cursor: &NodeCursor<'_>, path: &FieldPath, usage: FieldUsage) -> SchemaResult<AttributeDef> {
    let node = cursor.node();
    let canonical = cursor.canonical();
    let exposure = classify(node, canonical, usage, path)?;

    let mut validators = Vec::new();
    let mut element_validators = Vec::new();
    let mut unordered = false;
    let kind = match &canonical.spec {
      NodeSpec::Bool(spec) if spec.opaque => AttributeKind::String,
      NodeSpec::Bool(_) => AttributeKind::Bool,
      NodeSpec::Int(_) => {
        validators = scalar_validators(canonical);
        AttributeKind::Int64
      }
      NodeSpec::Float(_) => {
        validators = scalar_validators(canonical);
        AttributeKind::Float64
      }
      NodeSpec::String(_) => {
        validators = scalar_validators(canonical);
        AttributeKind::String
      }
      NodeSpec::Object(object) => AttributeKind::SingleNested(self.convert_children(cursor, object, path, Some(usage))?),
      NodeSpec::Array(array) => {
        validators = list_validators(array);
        unordered = array.unordered;
        let element = self.registry.resolve_at(path, &array.element)?;
        match element.as_object() {
          Some(object) => {
            let element_cursor = cursor.resolved_child(&array.element, element);
            AttributeKind::ListNested(self.convert_children(&element_cursor, object, path, Some(usage))?)
          }
          None => {
            element_validators = scalar_validators(element);
            AttributeKind::List(self.element_type(path, element)?)
          }
        }
      }
    };

    let description = node.description.as_deref().or(canonical.description.as_deref());
    Ok(
      AttributeDef::builder()
        .name(node.snake_name())
        .kind(kind)
        .exposure(exposure)
        .docs(Documentation::from_optional(description))
        .sensitive(canonical.as_string().is_some_and(|spec| spec.sensitive || spec.is_encrypted()))
        .requires_replace(node.replace_on_change)
        .unordered(unordered)
        .validators(validators)
        .element_validators(element_validators)
        .build(),
    )
  }

  fn element_type(&self, path: &FieldPath, canonical: &Node) -> SchemaResult<ElementType> {
    Ok(match &canonical.spec {
      NodeSpec::Bool(spec) if spec.opaque => ElementType::Json,
      NodeSpec::Bool(_) => ElementType::Bool,
      NodeSpec::Int(_) => ElementType::Int64,
      NodeSpec::Float(_) => ElementType::Float64,
      NodeSpec::String(_) => ElementType::String,
      NodeSpec::Object(_) => ElementType::Json,
      NodeSpec::Array(array) => {
        let element = self.registry.resolve_at(path, &array.element)?;
        ElementType::List(Box::new(self.element_type(path, element)?))
      }
    })
  }
}

/// Registry entry a namespace manages.
pub(crate) fn schema_root<'r>(registry: &'r SchemaRegistry, id: &str) -> SchemaResult<&'r Node> {
  registry.get(id).ok_or_else(|| SchemaError::UnknownReference {
    path: FieldPath::root(),
    reference: id.to_string(),
  })
}
