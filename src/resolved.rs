//! Pre-resolved views handed to the emitter.
//!
//! Everything here is plain strings and flags. The emitter substitutes these
//! values verbatim and never resolves a type itself.

use crate::error::Result;
use crate::naming::{enum_name, property_declaration};
use crate::resolver::TypeResolver;
use crate::schema::{Command, Domain, Event, Parameter, TypeDef};

/// A domain with all of its names and types resolved.
#[derive(Debug, Clone)]
pub struct ResolvedDomain {
    pub name: String,
    /// Package of the domain (`pl.wendigo.chrome.domain.page`).
    pub namespace: String,
    /// Path segment under the base package (`domain/page`).
    pub relative_dir: String,
    /// Simple name of the wrapper class (`PageDomain`).
    pub class_name: String,
    pub description: String,
    pub experimental: bool,
    pub deprecated: bool,
    pub types: Vec<ResolvedType>,
    pub commands: Vec<ResolvedCommand>,
    pub events: Vec<ResolvedEvent>,
}

#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub id: String,
    pub description: String,
    pub experimental: bool,
    pub deprecated: bool,
    pub kind: ResolvedTypeKind,
}

#[derive(Debug, Clone)]
pub enum ResolvedTypeKind {
    /// `enum class` with one constant per literal.
    Enum { constants: Vec<EnumConstant> },
    /// `data class` with the given properties.
    Data { properties: Vec<ResolvedProperty> },
    /// `typealias` to a resolved type.
    Alias { target: String },
}

/// One enum literal and its constant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub literal: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    pub name: String,
    /// Full `val` declaration, keyword-escaped.
    pub declaration: String,
    pub type_name: String,
    pub optional: bool,
    pub description: String,
    pub experimental: bool,
    pub deprecated: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    pub name: String,
    /// Wire method name (`Page.navigate`).
    pub method: String,
    pub description: String,
    pub has_input_parameters: bool,
    pub has_return_value: bool,
    /// Simple name of the input class, set when the command has parameters.
    pub request_class: Option<String>,
    /// Simple name of the result class when the command returns values,
    /// otherwise the fully qualified generic response frame.
    pub response_class: String,
    pub parameters: Vec<ResolvedProperty>,
    pub returns: Vec<ResolvedProperty>,
    pub redirect: Option<String>,
    pub experimental: bool,
    pub deprecated: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedEvent {
    pub name: String,
    /// Wire event key (`Page.loadEventFired`).
    pub method: String,
    pub description: String,
    /// Simple name of the payload class, set when the event has parameters.
    pub class_name: Option<String>,
    pub parameters: Vec<ResolvedProperty>,
    pub experimental: bool,
    pub deprecated: bool,
}

impl ResolvedEvent {
    pub fn has_payload(&self) -> bool {
        self.class_name.is_some()
    }
}

/// Resolve every type, command and event of `domain`.
///
/// `resolver` may be scoped to any domain; it is re-scoped to `domain` here.
pub fn resolve_domain<'a>(
    domain: &'a Domain,
    resolver: &TypeResolver<'a>,
) -> Result<ResolvedDomain> {
    let resolver = resolver.for_domain(&domain.name);
    let ctx = resolver.context();
    let convention = resolver.convention();

    let types = domain
        .types
        .iter()
        .map(|t| resolve_type_def(t, &resolver))
        .collect::<Result<Vec<_>>>()?;

    let commands = domain
        .commands
        .iter()
        .map(|c| resolve_command(&domain.name, c, &resolver))
        .collect::<Result<Vec<_>>>()?;

    let events = domain
        .events
        .iter()
        .map(|e| resolve_event(&domain.name, e, &resolver))
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedDomain {
        name: domain.name.clone(),
        namespace: convention.domain_namespace(ctx.base_namespace, &domain.name),
        relative_dir: format!("domain/{}", domain.lower_name()),
        class_name: convention.domain_class(&domain.name),
        description: domain.description.clone(),
        experimental: domain.experimental,
        deprecated: domain.deprecated,
        types,
        commands,
        events,
    })
}

fn resolve_type_def(ty: &TypeDef, resolver: &TypeResolver<'_>) -> Result<ResolvedType> {
    let kind = if ty.is_enum() {
        ResolvedTypeKind::Enum {
            constants: ty
                .enum_values
                .iter()
                .flatten()
                .map(|literal| EnumConstant {
                    literal: literal.clone(),
                    name: enum_name(literal),
                })
                .collect(),
        }
    } else if ty.has_properties() {
        let properties = ty.properties.as_deref().unwrap_or_default();
        ResolvedTypeKind::Data {
            properties: resolve_properties(properties, resolver)?,
        }
    } else {
        ResolvedTypeKind::Alias {
            target: resolver.resolve_type(ty)?,
        }
    };

    Ok(ResolvedType {
        id: ty.id.clone(),
        description: ty.description.clone(),
        experimental: ty.experimental,
        deprecated: ty.deprecated,
        kind,
    })
}

fn resolve_command(
    domain: &str,
    command: &Command,
    resolver: &TypeResolver<'_>,
) -> Result<ResolvedCommand> {
    let convention = resolver.convention();
    let base = resolver.context().base_namespace;

    let request_class = command
        .has_input_parameters()
        .then(|| convention.request_class(&command.name));
    let response_class = if command.has_return_value() {
        convention.response_class(&command.name)
    } else {
        convention.qualify_root(base, "ResponseFrame")
    };

    Ok(ResolvedCommand {
        name: command.name.clone(),
        method: format!("{domain}.{}", command.name),
        description: command.description.clone(),
        has_input_parameters: command.has_input_parameters(),
        has_return_value: command.has_return_value(),
        request_class,
        response_class,
        parameters: resolve_properties(&command.parameters, resolver)?,
        returns: resolve_properties(&command.returns, resolver)?,
        redirect: command.redirect.clone(),
        experimental: command.experimental,
        deprecated: command.deprecated,
    })
}

fn resolve_event(
    domain: &str,
    event: &Event,
    resolver: &TypeResolver<'_>,
) -> Result<ResolvedEvent> {
    Ok(ResolvedEvent {
        name: event.name.clone(),
        method: format!("{domain}.{}", event.name),
        description: event.description.clone(),
        class_name: event
            .has_payload()
            .then(|| resolver.convention().event_class(&event.name)),
        parameters: resolve_properties(&event.parameters, resolver)?,
        experimental: event.experimental,
        deprecated: event.deprecated,
    })
}

fn resolve_properties(
    params: &[Parameter],
    resolver: &TypeResolver<'_>,
) -> Result<Vec<ResolvedProperty>> {
    params
        .iter()
        .map(|p| {
            Ok(ResolvedProperty {
                name: p.name.clone(),
                declaration: property_declaration(&p.name),
                type_name: resolver.resolve_type(p)?,
                optional: p.optional,
                description: p.description.clone(),
                experimental: p.experimental,
                deprecated: p.deprecated,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::KotlinList;
    use crate::error::Error;
    use crate::resolver::GenerationContext;
    use crate::schema::{RefItem, parse_protocol};

    const NS: &str = "pl.wendigo.chrome";

    fn page_domain() -> Domain {
        let json = r#"{"domains": [{
            "domain": "Page",
            "description": "Actions and events related to the inspected page.",
            "types": [
                {"id": "FrameId", "type": "string"},
                {"id": "TransitionType", "type": "string", "enum": ["link", "auto_bookmark", "-Infinity"]},
                {
                    "id": "Frame",
                    "type": "object",
                    "properties": [
                        {"name": "id", "$ref": "FrameId"},
                        {"name": "loaderId", "$ref": "Network.LoaderId"},
                        {"name": "name", "type": "string", "optional": true}
                    ]
                },
                {"id": "Headers", "type": "object"}
            ],
            "commands": [
                {"name": "enable"},
                {
                    "name": "navigate",
                    "parameters": [{"name": "url", "type": "string"}],
                    "returns": [{"name": "frameId", "$ref": "FrameId"}]
                },
                {"name": "clearDeviceMetricsOverride", "redirect": "Emulation"}
            ],
            "events": [
                {"name": "interstitialHidden"},
                {"name": "loadEventFired", "parameters": [{"name": "timestamp", "$ref": "Network.MonotonicTime"}]}
            ]
        }]}"#;
        parse_protocol(json).unwrap().domains.remove(0)
    }

    fn resolve(domain: &Domain) -> Result<ResolvedDomain> {
        let resolver = TypeResolver::new(GenerationContext::new(NS), &KotlinList);
        resolve_domain(domain, &resolver)
    }

    #[test]
    fn domain_names() {
        let d = resolve(&page_domain()).unwrap();
        assert_eq!(d.name, "Page");
        assert_eq!(d.namespace, "pl.wendigo.chrome.domain.page");
        assert_eq!(d.relative_dir, "domain/page");
        assert_eq!(d.class_name, "PageDomain");
    }

    #[test]
    fn type_kinds() {
        let d = resolve(&page_domain()).unwrap();

        assert!(matches!(&d.types[0].kind, ResolvedTypeKind::Alias { target } if target == "String"));

        let ResolvedTypeKind::Enum { constants } = &d.types[1].kind else {
            panic!("expected enum");
        };
        let names: Vec<&str> = constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["LINK", "AUTO_BOOKMARK", "MINUS_INFINITY"]);
        assert_eq!(constants[2].literal, "-Infinity");

        let ResolvedTypeKind::Data { properties } = &d.types[2].kind else {
            panic!("expected data class");
        };
        assert_eq!(properties[0].type_name, "FrameId");
        assert_eq!(properties[1].type_name, "pl.wendigo.chrome.domain.network.LoaderId");
        assert!(properties[2].optional);

        // Objects without properties are opaque.
        assert!(matches!(&d.types[3].kind, ResolvedTypeKind::Alias { target } if target == "String"));
    }

    #[test]
    fn command_flags_and_classes() {
        let d = resolve(&page_domain()).unwrap();

        let enable = &d.commands[0];
        assert!(!enable.has_input_parameters);
        assert!(!enable.has_return_value);
        assert_eq!(enable.request_class, None);
        assert_eq!(enable.response_class, "pl.wendigo.chrome.ResponseFrame");

        let navigate = &d.commands[1];
        assert_eq!(navigate.method, "Page.navigate");
        assert!(navigate.has_input_parameters);
        assert!(navigate.has_return_value);
        assert_eq!(navigate.request_class.as_deref(), Some("NavigateRequest"));
        assert_eq!(navigate.response_class, "NavigateResponse");
        assert_eq!(navigate.returns[0].type_name, "FrameId");

        assert_eq!(d.commands[2].redirect.as_deref(), Some("Emulation"));
    }

    #[test]
    fn event_classes() {
        let d = resolve(&page_domain()).unwrap();
        assert!(!d.events[0].has_payload());
        assert_eq!(d.events[1].class_name.as_deref(), Some("LoadEventFiredEvent"));
        assert_eq!(d.events[1].method, "Page.loadEventFired");
        assert_eq!(
            d.events[1].parameters[0].type_name,
            "pl.wendigo.chrome.domain.network.MonotonicTime"
        );
    }

    #[test]
    fn keyword_properties_are_escaped() {
        let mut domain = page_domain();
        domain.events[1].parameters.push(Parameter {
            name: "object".to_string(),
            type_tag: Some("object".to_string()),
            ..Parameter::default()
        });
        let d = resolve(&domain).unwrap();
        assert!(d.events[1].parameters[1].declaration.ends_with("val _object"));
    }

    #[test]
    fn unknown_descriptor_names_owning_domain() {
        let mut domain = page_domain();
        domain.commands[1].returns.push(Parameter {
            name: "entries".to_string(),
            type_tag: Some("array".to_string()),
            items: Some(RefItem::default()),
            ..Parameter::default()
        });
        let err = resolve(&domain).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownDescriptor { ref domain, ref field, .. } if domain == "Page" && field == "entries"
        ));
    }
}
