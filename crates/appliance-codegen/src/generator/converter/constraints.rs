//! Value constraints shared by both targets: validators for the resource
//! target and documentation text for the client target.

use std::fmt::Display;

use itertools::Itertools;

use crate::generator::{
  ast::{Literal, Validator, ValidatorFamily},
  ir::{ArraySpec, Node, NodeSpec, NumberSpec, StringSpec},
};

/// Validators applying to the value of `canonical` itself.
#[must_use]
pub fn scalar_validators(canonical: &Node) -> Vec<Validator> {
  match &canonical.spec {
    NodeSpec::Int(spec) => number_validators(spec, ValidatorFamily::Int64, Literal::Int),
    NodeSpec::Float(spec) => number_validators(spec, ValidatorFamily::Float64, Literal::Float),
    NodeSpec::String(spec) => string_validators(spec),
    NodeSpec::Bool(_) | NodeSpec::Array(_) | NodeSpec::Object(_) => Vec::new(),
  }
}

/// Size validators of a list.
#[must_use]
pub fn list_validators(spec: &ArraySpec) -> Vec<Validator> {
  Validator::range(
    ValidatorFamily::List,
    spec.min_items.map(Literal::Size),
    spec.max_items.map(Literal::Size),
  )
  .into_iter()
  .collect()
}

fn number_validators<T: Copy>(
  spec: &NumberSpec<T>,
  family: ValidatorFamily,
  literal: impl Fn(T) -> Literal,
) -> Vec<Validator> {
  let mut validators: Vec<Validator> = Validator::range(family, spec.min.map(&literal), spec.max.map(&literal))
    .into_iter()
    .collect();
  if !spec.values.is_empty() {
    validators.push(Validator::OneOf {
      family,
      values: spec.values.iter().copied().map(&literal).collect(),
    });
  }
  validators
}

fn string_validators(spec: &StringSpec) -> Vec<Validator> {
  let mut validators: Vec<Validator> = Validator::range(
    ValidatorFamily::String,
    spec.min_length.map(Literal::Size),
    spec.max_length.map(Literal::Size),
  )
  .into_iter()
  .collect();

  let regex = spec.regex.as_deref().filter(|regex| !regex.is_empty());
  match (spec.values.is_empty(), regex) {
    (false, Some(regex)) => validators.push(Validator::RegexMatches(merged_pattern(&spec.values, regex))),
    (false, None) => validators.push(Validator::OneOf {
      family: ValidatorFamily::String,
      values: spec.values.iter().cloned().map(Literal::Str).collect(),
    }),
    (true, Some(regex)) => validators.push(Validator::RegexMatches(regex.to_string())),
    (true, None) => {}
  }
  validators
}

/// Single alternation accepting either an enumerated value or a match of `regex`.
#[must_use]
pub fn merged_pattern(values: &[String], regex: &str) -> String {
  let alternatives = values.iter().map(|value| regex::escape(value)).join("|");
  format!("^(?:{alternatives})$|{regex}")
}

/// Human-readable constraint lines for doc comments.
#[must_use]
pub fn describe(canonical: &Node) -> Vec<String> {
  let mut lines = Vec::new();
  match &canonical.spec {
    NodeSpec::Int(spec) => describe_number(spec, &mut lines),
    NodeSpec::Float(spec) => describe_number(spec, &mut lines),
    NodeSpec::String(spec) => {
      if let Some(line) = describe_bounds("Length", spec.min_length, spec.max_length) {
        lines.push(line);
      }
      if !spec.values.is_empty() {
        lines.push(format!("Allowed values: {}.", code_list(&spec.values)));
      }
      if let Some(regex) = spec.regex.as_deref().filter(|regex| !regex.is_empty()) {
        lines.push(format!("Pattern: `{regex}`."));
      }
      if spec.sensitive {
        lines.push("Sensitive.".to_string());
      }
    }
    NodeSpec::Array(spec) => {
      if let Some(line) = describe_bounds("Items", spec.min_items, spec.max_items) {
        lines.push(line);
      }
      if spec.unordered {
        lines.push("Unordered.".to_string());
      }
    }
    NodeSpec::Bool(_) | NodeSpec::Object(_) => {}
  }
  if let Some(default) = canonical.default_value() {
    lines.push(format!("Default: `{default}`."));
  }
  lines
}

fn describe_number<T: Display + Copy>(spec: &NumberSpec<T>, lines: &mut Vec<String>) {
  if let Some(line) = describe_bounds("Range", spec.min, spec.max) {
    lines.push(line);
  }
  if !spec.values.is_empty() {
    lines.push(format!("Allowed values: {}.", code_list(&spec.values)));
  }
}

fn describe_bounds<T: Display>(label: &str, min: Option<T>, max: Option<T>) -> Option<String> {
  match (min, max) {
    (Some(min), Some(max)) => Some(format!("{label}: `{min}..={max}`.")),
    (Some(min), None) => Some(format!("{label}: at least `{min}`.")),
    (None, Some(max)) => Some(format!("{label}: at most `{max}`.")),
    (None, None) => None,
  }
}

fn code_list<T: Display>(values: &[T]) -> String {
  values.iter().map(|value| format!("`{value}`")).join(", ")
}
