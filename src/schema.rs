//! DevTools protocol schema types, loading, and downloading.
//!
//! The schema is the `protocol.json` document published with Chromium
//! (`browser_protocol.json` and `js_protocol.json` merged). It is parsed once
//! per run into a [`Protocol`] and never mutated afterwards.
//!
//! Type tags are kept as raw strings so that an unrecognized tag reaches the
//! resolver and is reported with its owning domain and field, instead of
//! failing the whole parse. [`PrimitiveType`] is the closed set the resolver
//! matches on.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// The full protocol document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Protocol {
    /// Protocol version (e.g., `1.3`).
    #[serde(default)]
    pub version: Version,

    /// All domains in declaration order.
    #[serde(default)]
    pub domains: Vec<Domain>,
}

impl Protocol {
    /// Look up a domain by its exact name.
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Total number of events declared across all domains.
    pub fn event_count(&self) -> usize {
        self.domains.iter().map(|d| d.events.len()).sum()
    }
}

/// Protocol version. Both parts are strings in the published document.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Version {
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub minor: String,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A named group of types, commands and events (e.g., `Page`, `Network`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Domain {
    /// Domain name, unique within the protocol.
    #[serde(rename = "domain")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub experimental: bool,

    #[serde(default)]
    pub deprecated: bool,

    #[serde(default)]
    pub types: Vec<TypeDef>,

    #[serde(default)]
    pub commands: Vec<Command>,

    #[serde(default)]
    pub events: Vec<Event>,

    /// Names of other domains this domain references.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Domain {
    /// Lowercased name used for package segments (`DOMStorage` → `domstorage`).
    pub fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// A data type declared by a domain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeDef {
    /// Type identifier, unique within its domain.
    pub id: String,

    /// Raw primitive type tag (`"string"`, `"object"`, `"array"`, ...).
    #[serde(rename = "type", default)]
    pub type_tag: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Allowed literal values when the type is a string enum.
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<String>>,

    /// Object properties, when the type is a structured object.
    #[serde(default)]
    pub properties: Option<Vec<Parameter>>,

    /// Element descriptor, present only for array types.
    #[serde(default)]
    pub items: Option<RefItem>,

    #[serde(rename = "minItems", default)]
    pub min_items: Option<u32>,

    #[serde(rename = "maxItems", default)]
    pub max_items: Option<u32>,

    #[serde(default)]
    pub experimental: bool,

    #[serde(default)]
    pub deprecated: bool,
}

impl TypeDef {
    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn is_enum(&self) -> bool {
        self.enum_values.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// A remote operation declared by a domain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Command {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub returns: Vec<Parameter>,

    /// Name of the domain this command was moved to, if any.
    #[serde(default)]
    pub redirect: Option<String>,

    #[serde(default)]
    pub experimental: bool,

    #[serde(default)]
    pub deprecated: bool,
}

impl Command {
    pub fn has_input_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub fn has_return_value(&self) -> bool {
        !self.returns.is_empty()
    }
}

/// An unsolicited message declared by a domain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Payload fields. Empty for parameterless events.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub experimental: bool,

    #[serde(default)]
    pub deprecated: bool,
}

impl Event {
    pub fn has_payload(&self) -> bool {
        !self.parameters.is_empty()
    }
}

/// A command parameter, command return value, event field, or object
/// property.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type", default)]
    pub type_tag: Option<String>,

    /// Same-domain (`"NodeId"`) or cross-domain (`"DOM.NodeId"`) reference.
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,

    #[serde(default)]
    pub items: Option<RefItem>,

    #[serde(default)]
    pub optional: bool,

    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<String>>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub experimental: bool,

    #[serde(default)]
    pub deprecated: bool,
}

/// Element descriptor of an array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefItem {
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,

    #[serde(rename = "type", default)]
    pub type_tag: Option<String>,

    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<String>>,

    /// Element descriptor for arrays of arrays.
    #[serde(default)]
    pub items: Option<Box<RefItem>>,

    #[serde(default)]
    pub description: String,
}

/// The closed set of primitive type tags understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Boolean,
    Integer,
    Number,
    Any,
    Object,
    Array,
}

impl FromStr for PrimitiveType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "string" => Ok(Self::String),
            "boolean" => Ok(Self::Boolean),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "any" => Ok(Self::Any),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            _ => Err(()),
        }
    }
}

/// Uniform view over everything that describes a value's type.
///
/// Implemented by [`Parameter`], [`RefItem`] and [`TypeDef`] so the resolver
/// has a single dispatch path for all of them.
pub trait TypeDescriptor {
    /// Name used in diagnostics (field name, type id, or `"items"`).
    fn label(&self) -> &str;

    fn reference(&self) -> Option<&str>;

    fn type_tag(&self) -> Option<&str>;

    fn items(&self) -> Option<&RefItem>;
}

impl TypeDescriptor for Parameter {
    fn label(&self) -> &str {
        &self.name
    }

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    fn items(&self) -> Option<&RefItem> {
        self.items.as_ref()
    }
}

impl TypeDescriptor for RefItem {
    fn label(&self) -> &str {
        "items"
    }

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    fn items(&self) -> Option<&RefItem> {
        self.items.as_deref()
    }
}

impl TypeDescriptor for TypeDef {
    fn label(&self) -> &str {
        &self.id
    }

    // Type declarations are always primitives; only their items may refer
    // to other types.
    fn reference(&self) -> Option<&str> {
        None
    }

    fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    fn items(&self) -> Option<&RefItem> {
        self.items.as_ref()
    }
}

/// Load a protocol document from disk.
pub fn load_protocol(path: &Path) -> Result<Protocol> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::SchemaRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_protocol(&content)
}

/// Parse a protocol document from a JSON string.
pub fn parse_protocol(json: &str) -> Result<Protocol> {
    let protocol: Protocol = serde_json::from_str(json)?;
    Ok(protocol)
}

/// Download a protocol document and save it to disk.
///
/// The response body is validated as a [`Protocol`] before anything is
/// written.
#[cfg(feature = "download")]
pub async fn download_protocol(url: &str, output_path: &Path) -> Result<Protocol> {
    tracing::info!(%url, "downloading protocol");

    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Download(format!(
            "GET {url} returned {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Download(format!("reading response body: {e}")))?;

    let protocol = parse_protocol(&body)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(output_path, &body).map_err(|e| Error::Write {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        version = %protocol.version,
        domains = protocol.domains.len(),
        path = %output_path.display(),
        "saved protocol"
    );
    Ok(protocol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_protocol_json() -> &'static str {
        r#"{
            "version": {"major": "1", "minor": "3"},
            "domains": [
                {
                    "domain": "Memory",
                    "experimental": true,
                    "types": [
                        {
                            "id": "PressureLevel",
                            "type": "string",
                            "description": "Memory pressure level.",
                            "enum": ["moderate", "critical"]
                        }
                    ],
                    "commands": [
                        {
                            "name": "simulatePressureNotification",
                            "parameters": [
                                {"name": "level", "$ref": "PressureLevel"}
                            ]
                        },
                        {
                            "name": "getDOMCounters",
                            "returns": [
                                {"name": "documents", "type": "integer"},
                                {"name": "nodes", "type": "integer"}
                            ]
                        }
                    ]
                },
                {
                    "domain": "DOM",
                    "dependencies": ["Runtime"],
                    "types": [
                        {"id": "NodeId", "type": "integer"},
                        {
                            "id": "Quad",
                            "type": "array",
                            "items": {"type": "number"},
                            "minItems": 8,
                            "maxItems": 8
                        }
                    ],
                    "events": [
                        {"name": "documentUpdated"},
                        {
                            "name": "setChildNodes",
                            "parameters": [
                                {"name": "parentId", "$ref": "NodeId"},
                                {"name": "nodes", "type": "array", "items": {"$ref": "Node"}}
                            ]
                        }
                    ]
                }
            ]
        }"#
    }

    #[test]
    fn parse_minimal_protocol() {
        let protocol = parse_protocol(minimal_protocol_json()).unwrap();
        assert_eq!(protocol.version.to_string(), "1.3");
        assert_eq!(protocol.domains.len(), 2);
        assert_eq!(protocol.event_count(), 2);
    }

    #[test]
    fn parse_domain_contents() {
        let protocol = parse_protocol(minimal_protocol_json()).unwrap();
        let memory = protocol.domain("Memory").unwrap();

        assert!(memory.experimental);
        assert!(!memory.deprecated);
        assert_eq!(memory.lower_name(), "memory");
        assert!(memory.types[0].is_enum());
        assert!(!memory.types[0].has_properties());

        let simulate = &memory.commands[0];
        assert!(simulate.has_input_parameters());
        assert!(!simulate.has_return_value());
        assert_eq!(simulate.parameters[0].reference.as_deref(), Some("PressureLevel"));

        let dom = protocol.domain("DOM").unwrap();
        assert_eq!(dom.dependencies, vec!["Runtime".to_string()]);
        assert_eq!(dom.types[1].min_items, Some(8));
        assert!(!dom.events[0].has_payload());
        assert!(dom.events[1].has_payload());
    }

    #[test]
    fn unknown_type_tag_is_kept_raw() {
        let json = r#"{"domains": [{"domain": "X", "types": [{"id": "T", "type": "blob"}]}]}"#;
        let protocol = parse_protocol(json).unwrap();
        assert_eq!(protocol.domains[0].types[0].type_tag.as_deref(), Some("blob"));
        assert!("blob".parse::<PrimitiveType>().is_err());
    }

    #[test]
    fn primitive_type_tags() {
        assert_eq!("string".parse::<PrimitiveType>(), Ok(PrimitiveType::String));
        assert_eq!("boolean".parse::<PrimitiveType>(), Ok(PrimitiveType::Boolean));
        assert_eq!("integer".parse::<PrimitiveType>(), Ok(PrimitiveType::Integer));
        assert_eq!("number".parse::<PrimitiveType>(), Ok(PrimitiveType::Number));
        assert_eq!("any".parse::<PrimitiveType>(), Ok(PrimitiveType::Any));
        assert_eq!("object".parse::<PrimitiveType>(), Ok(PrimitiveType::Object));
        assert_eq!("array".parse::<PrimitiveType>(), Ok(PrimitiveType::Array));
    }

    #[test]
    fn malformed_document_is_a_json_error() {
        let err = parse_protocol(r#"{"domains": [{"types": []}]}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_protocol(Path::new("/nonexistent/protocol.json")).unwrap_err();
        assert!(matches!(err, Error::SchemaRead { .. }));
        assert!(err.to_string().contains("/nonexistent/protocol.json"));
    }
}
