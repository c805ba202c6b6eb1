//! Naming conventions for the generated client.
//!
//! The generator has two output flavors that share the schema model and the
//! resolver and only differ in a handful of names. A [`NamingConvention`]
//! captures those differences; [`ConventionKind`] selects one from
//! configuration.

use std::fmt;

use crate::naming::capitalize;

/// Class-name formation and qualification rules for one output flavor.
pub trait NamingConvention {
    /// Generic container used for arrays (`List` or `Array`).
    fn container(&self) -> &'static str;

    /// Simple name of the shared parameterless event class.
    fn marker_event_class(&self) -> &'static str;

    /// Simple name of the top-level aggregator class.
    fn aggregator_class(&self) -> &'static str;

    /// Simple name of the connection type every domain wrapper takes.
    fn connection_class(&self) -> &'static str;

    /// Wrap an element type in the container: `List<Int>`.
    fn container_of(&self, element: &str) -> String {
        format!("{}<{element}>", self.container())
    }

    /// Package of a domain: `{base}.domain.{lowercase(domain)}`.
    fn domain_namespace(&self, base_namespace: &str, domain: &str) -> String {
        format!("{base_namespace}.domain.{}", domain.to_lowercase())
    }

    /// Fully qualified name of a type declared in `domain`.
    fn qualify(&self, base_namespace: &str, domain: &str, simple_name: &str) -> String {
        format!("{}.{simple_name}", self.domain_namespace(base_namespace, domain))
    }

    /// Fully qualified name of a class that lives in the base package.
    fn qualify_root(&self, base_namespace: &str, simple_name: &str) -> String {
        format!("{base_namespace}.{simple_name}")
    }

    /// Simple class name of an event payload: `setChildNodes` → `SetChildNodesEvent`.
    fn event_class(&self, event_name: &str) -> String {
        format!("{}Event", capitalize(event_name))
    }

    /// Simple class name of a command's input: `navigate` → `NavigateRequest`.
    fn request_class(&self, command_name: &str) -> String {
        format!("{}Request", capitalize(command_name))
    }

    /// Simple class name of a command's result: `navigate` → `NavigateResponse`.
    fn response_class(&self, command_name: &str) -> String {
        format!("{}Response", capitalize(command_name))
    }

    /// Simple class name of a domain wrapper: `Page` → `PageDomain`.
    fn domain_class(&self, domain: &str) -> String {
        format!("{domain}Domain")
    }
}

/// `List`-based flavor with the `ProtocolEvent` marker and the
/// `ChromeProtocol` aggregator.
#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinList;

impl NamingConvention for KotlinList {
    fn container(&self) -> &'static str {
        "List"
    }

    fn marker_event_class(&self) -> &'static str {
        "ProtocolEvent"
    }

    fn aggregator_class(&self) -> &'static str {
        "ChromeProtocol"
    }

    fn connection_class(&self) -> &'static str {
        "DebuggerProtocol"
    }
}

/// `Array`-based flavor with the `ChromeProtocolEvent` marker and the
/// `RemoteChrome` aggregator.
#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinArray;

impl NamingConvention for KotlinArray {
    fn container(&self) -> &'static str {
        "Array"
    }

    fn marker_event_class(&self) -> &'static str {
        "ChromeProtocolEvent"
    }

    fn aggregator_class(&self) -> &'static str {
        "RemoteChrome"
    }

    fn connection_class(&self) -> &'static str {
        "RemoteDebuggerConnection"
    }
}

/// Configuration-level selector for a [`NamingConvention`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ConventionKind {
    #[default]
    List,
    Array,
}

impl ConventionKind {
    pub fn convention(self) -> &'static dyn NamingConvention {
        match self {
            ConventionKind::List => &KotlinList,
            ConventionKind::Array => &KotlinArray,
        }
    }
}

impl fmt::Display for ConventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConventionKind::List => f.write_str("list"),
            ConventionKind::Array => f.write_str("array"),
        }
    }
}
