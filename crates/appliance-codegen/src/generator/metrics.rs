use strum::Display;

use super::ast::{ClientModule, ResourceSchema};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub namespaces_generated: usize,
  pub structs_generated: usize,
  pub attributes_generated: usize,
  pub encrypted_fields: usize,
  pub functions_converted: usize,
  pub shared_types_generated: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_client(&mut self, module: &ClientModule) {
    self.structs_generated += module.struct_count();
    self.encrypted_fields += module.key_method_count() / 2;
    self.functions_converted += module.inputs.len();
  }

  pub fn record_resource(&mut self, schema: &ResourceSchema) {
    self.attributes_generated += schema.attribute_count();
  }

  pub fn record_namespace(&mut self, client: &ClientModule, resource: &ResourceSchema) {
    self.namespaces_generated += 1;
    self.record_client(client);
    self.record_resource(resource);
  }

  pub fn record_shared(&mut self, module: &ClientModule) {
    self.shared_types_generated += module.structs.len();
    self.record_client(module);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    self.cycles_detected += cycles.len();
    self.cycle_details.extend(cycles);
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  #[must_use]
  pub fn skipped_count(&self) -> usize {
    self.warnings.iter().filter(|warning| warning.is_skipped_item()).count()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Failed to generate namespace '{namespace}': {error}")]
  NamespaceFailed { namespace: String, error: String },
  #[strum(to_string = "Failed to generate shared type '{schema}': {error}")]
  SharedTypeFailed { schema: String, error: String },
  #[strum(to_string = "Namespace '{namespace}' not found")]
  UnknownNamespace { namespace: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::NamespaceFailed { .. } | Self::SharedTypeFailed { .. })
  }
}
