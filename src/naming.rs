//! Identifier helpers for generated Kotlin code.
//!
//! - `"Infinity"` → `"PLUS_INFINITY"` (enum constant, see [`enum_name`])
//! - `"setChildNodes"` → `"SetChildNodes"` (class prefix, see [`capitalize`])
//! - `"object"` → `` @get:...JsonProperty("object") val _object `` (see [`property_declaration`])

/// Literals that would otherwise collapse into an empty or ambiguous
/// constant name.
const ENUM_OVERRIDES: &[(&str, &str)] = &[
    ("Infinity", "PLUS_INFINITY"),
    ("-Infinity", "MINUS_INFINITY"),
    ("-0", "ZERO"),
];

/// Property names that are reserved words in Kotlin and must be renamed.
const RESERVED_PROPERTY_NAMES: &[&str] = &["this", "object"];

/// Convert a schema enum literal to an upper-snake-case constant name.
///
/// - `"moderate"` → `"MODERATE"`
/// - `"foo-bar 1"` → `"FOO_BAR_1"`
/// - `"-Infinity"` → `"MINUS_INFINITY"`
///
/// Maximal runs of ASCII alphanumerics are uppercased and joined with `_`;
/// everything else is a separator and is dropped.
pub fn enum_name(literal: &str) -> String {
    if let Some((_, name)) = ENUM_OVERRIDES.iter().find(|(lit, _)| *lit == literal) {
        return (*name).to_string();
    }

    literal
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|run| !run.is_empty())
        .map(|run| run.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Uppercase the first character, leaving the rest untouched.
///
/// `"animationCanceled"` → `"AnimationCanceled"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Render the `val` declaration for a data-class property.
///
/// Kotlin keywords are renamed with a leading underscore and keep their wire
/// name through a Jackson annotation.
pub fn property_declaration(name: &str) -> String {
    if RESERVED_PROPERTY_NAMES.contains(&name) {
        format!("@get:com.fasterxml.jackson.annotation.JsonProperty(\"{name}\") val _{name}")
    } else {
        format!("val {name}")
    }
}
