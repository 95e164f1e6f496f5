//! Additive merge of override documents into a base tree.
//!
//! An override only ever adds or replaces: empty strings, `None` and `false`
//! leave the base untouched, so merging an all-empty override is the identity.

use super::{
  node::{ArraySpec, BoolSpec, Node, NodeSpec, NumberSpec, ObjectSpec, StringSpec},
  path::FieldPath,
};
use crate::generator::error::{SchemaError, SchemaResult};

impl Node {
  /// Merges `overlay` into `self`, treating `self` as the root of the walk.
  pub fn merge(&mut self, overlay: Node) -> SchemaResult<()> {
    let path = if self.name.is_empty() {
      FieldPath::root()
    } else {
      FieldPath::new(&self.name)
    };
    self.merge_at(&path, overlay)
  }

  pub(crate) fn merge_at(&mut self, path: &FieldPath, overlay: Node) -> SchemaResult<()> {
    if self.kind() != overlay.kind() {
      return Err(SchemaError::VariantMismatch {
        path: path.clone(),
        base: self.kind(),
        overlay: overlay.kind(),
      });
    }

    let Node {
      name,
      reference,
      module,
      location,
      description,
      required,
      read_only,
      replace_on_change,
      spec,
    } = overlay;

    replace_string(&mut self.name, name);
    replace_option(&mut self.reference, reference.filter(|id| !id.is_empty()));
    replace_option(&mut self.module, module.filter(|module| !module.is_empty()));
    replace_option(&mut self.location, location);
    replace_option(&mut self.description, description.filter(|text| !text.is_empty()));
    self.required |= required;
    self.read_only |= read_only;
    self.replace_on_change |= replace_on_change;

    match (&mut self.spec, spec) {
      (NodeSpec::Bool(base), NodeSpec::Bool(overlay)) => merge_bool(base, overlay),
      (NodeSpec::Int(base), NodeSpec::Int(overlay)) => merge_number(base, overlay),
      (NodeSpec::Float(base), NodeSpec::Float(overlay)) => merge_number(base, overlay),
      (NodeSpec::String(base), NodeSpec::String(overlay)) => merge_string(base, overlay),
      (NodeSpec::Array(base), NodeSpec::Array(overlay)) => merge_array(path, base, overlay)?,
      (NodeSpec::Object(base), NodeSpec::Object(overlay)) => merge_object(path, base, overlay)?,
      (base, overlay) => {
        return Err(SchemaError::VariantMismatch {
          path: path.clone(),
          base: base.kind(),
          overlay: overlay.kind(),
        });
      }
    }
    Ok(())
  }
}

fn replace_string(base: &mut String, overlay: String) {
  if !overlay.is_empty() {
    *base = overlay;
  }
}

fn replace_option<T>(base: &mut Option<T>, overlay: Option<T>) {
  if overlay.is_some() {
    *base = overlay;
  }
}

fn replace_values<T>(base: &mut Vec<T>, overlay: Vec<T>) {
  if !overlay.is_empty() {
    *base = overlay;
  }
}

fn merge_bool(base: &mut BoolSpec, overlay: BoolSpec) {
  replace_option(&mut base.default, overlay.default);
  base.opaque |= overlay.opaque;
}

fn merge_number<T>(base: &mut NumberSpec<T>, overlay: NumberSpec<T>) {
  replace_option(&mut base.default, overlay.default);
  replace_option(&mut base.min, overlay.min);
  replace_option(&mut base.max, overlay.max);
  replace_values(&mut base.values, overlay.values);
}

fn merge_string(base: &mut StringSpec, overlay: StringSpec) {
  replace_option(&mut base.default, overlay.default);
  base.sensitive |= overlay.sensitive;
  replace_option(&mut base.min_length, overlay.min_length);
  replace_option(&mut base.max_length, overlay.max_length);
  replace_option(&mut base.regex, overlay.regex.filter(|regex| !regex.is_empty()));

  if !overlay.values.is_empty() {
    base.values = overlay.values;
  } else if let Some(patch) = overlay.values_patch {
    base.values.retain(|value| !patch.remove.contains(value));
    for value in patch.add {
      if !base.values.contains(&value) {
        base.values.push(value);
      }
    }
  }

  if !overlay.hashing.is_plaintext() {
    base.hashing = overlay.hashing;
  }
}

fn merge_array(path: &FieldPath, base: &mut ArraySpec, overlay: ArraySpec) -> SchemaResult<()> {
  replace_option(&mut base.min_items, overlay.min_items);
  replace_option(&mut base.max_items, overlay.max_items);
  base.unordered |= overlay.unordered;
  base.element.merge_at(path, *overlay.element)
}

fn merge_object(path: &FieldPath, base: &mut ObjectSpec, mut overlay: ObjectSpec) -> SchemaResult<()> {
  replace_option(&mut base.class_name, overlay.class_name.take().filter(|name| !name.is_empty()));

  for (name, child) in overlay.take_params() {
    let child_path = path.join(&name);
    match base.get_mut(&name) {
      Some(existing) => existing.merge_at(&child_path, child)?,
      None => base.insert_at(path, child)?,
    }
  }

  for group in overlay.take_groups() {
    base.add_group(path, group)?;
  }
  Ok(())
}
