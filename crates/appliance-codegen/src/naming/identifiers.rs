use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen",
  ]
  .into_iter()
  .collect()
});

static RESERVED_PASCAL_CASE: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  ["Clone", "Copy", "Default", "Display", "Option", "Result", "Self", "String", "Vec"]
    .into_iter()
    .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid regex"));
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Transliterates to ASCII, replaces anything outside `[A-Za-z0-9_]` with an
/// underscore, collapses runs of underscores and trims them from both ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Splits an internal name into lowercase words on separators and on
/// lower-to-upper case boundaries, so `vlanId`, `vlan-id` and `VLAN_ID` agree.
fn words(name: &str) -> Vec<String> {
  let sanitized = sanitize(name);
  let mut words = Vec::new();
  for part in sanitized.split('_').filter(|part| !part.is_empty()) {
    let mut current = String::new();
    let mut prev_lower_or_digit = false;
    for ch in part.chars() {
      if ch.is_ascii_uppercase() && prev_lower_or_digit && !current.is_empty() {
        words.push(std::mem::take(&mut current));
      }
      prev_lower_or_digit = ch.is_ascii_lowercase() || ch.is_ascii_digit();
      current.push(ch.to_ascii_lowercase());
    }
    if !current.is_empty() {
      words.push(current);
    }
  }
  words
}

/// `snake_case` display name of an internal name, without keyword escaping.
#[must_use]
pub fn to_snake_display_name(name: &str) -> String {
  words(name).join("_")
}

/// `PascalCase` display name of an internal name.
#[must_use]
pub fn to_pascal_display_name(name: &str) -> String {
  words(name).iter().map(|word| word.to_pascal_case()).collect()
}

/// Converts a string into a valid Rust field name (`snake_case`).
///
/// Keywords get a raw identifier prefix, `self` becomes `self_`, a leading digit
/// is prefixed with `_` and an empty result becomes `_`.
#[must_use]
pub fn to_rust_field_name(name: &str) -> String {
  let mut ident = to_snake_display_name(name);

  if ident.is_empty() {
    return "_".to_string();
  }
  if matches!(ident.as_str(), "self" | "crate" | "super") {
    ident.push('_');
    return ident;
  }
  if FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

/// Converts a string into a valid Rust type name (`PascalCase`).
///
/// Names clashing with prelude types get a `Schema` suffix, a leading digit is
/// prefixed with `T` and an empty result becomes `Unnamed`.
#[must_use]
pub fn to_rust_type_name(name: &str) -> String {
  let mut ident = to_pascal_display_name(name);

  if ident.is_empty() {
    return "Unnamed".to_string();
  }
  if RESERVED_PASCAL_CASE.contains(ident.as_str()) {
    ident.push_str("Schema");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  ident
}

/// Converts a string into a module name or file stem (`snake_case`, never raw).
///
/// Keywords get an `_` suffix, a leading digit is prefixed with `_` and an empty
/// result becomes `unnamed`.
#[must_use]
pub fn to_rust_module_name(name: &str) -> String {
  let mut ident = to_snake_display_name(name);

  if ident.is_empty() {
    return "unnamed".to_string();
  }
  if ident == "self" || FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    ident.push('_');
    return ident;
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

/// Keeps a declared type name when it is already a usable identifier, otherwise
/// converts it like [`to_rust_type_name`].
#[must_use]
pub fn to_declared_type_name(name: &str) -> String {
  if !name.starts_with("r#") && !RESERVED_PASCAL_CASE.contains(name) && syn::parse_str::<syn::Ident>(name).is_ok() {
    name.to_string()
  } else {
    to_rust_type_name(name)
  }
}
