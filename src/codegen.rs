//! Kotlin code generation from a DevTools protocol schema.
//!
//! Generates, under `{output_dir}/{base package as directories}/`:
//! - `domain/{lower}/Types.kt` with the domain's data types
//! - `domain/{lower}/{Domain}Domain.kt` with the command/event wrapper and
//!   its request, response and event classes
//! - `{Aggregator}.kt` registering every event mapping and exposing one
//!   accessor per domain
//!
//! All domains are resolved before anything is written, so an unknown
//! descriptor aborts the run without touching the output directory. The
//! output is deterministic: identical input produces byte-identical files.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::convention::{ConventionKind, NamingConvention};
use crate::error::{Error, Result};
use crate::events::{EventMapping, build_event_map};
use crate::resolved::{
    ResolvedCommand, ResolvedDomain, ResolvedEvent, ResolvedProperty, ResolvedType,
    ResolvedTypeKind, resolve_domain,
};
use crate::resolver::{GenerationContext, TypeResolver};
use crate::schema::{Protocol, Version, load_protocol};

const JSON_PROPERTY: &str = "com.fasterxml.jackson.annotation.JsonProperty";
const SINGLE: &str = "io.reactivex.rxjava3.core.Single";
const FLOWABLE: &str = "io.reactivex.rxjava3.core.Flowable";

/// Inputs of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Path of the protocol JSON document.
    pub protocol_file: PathBuf,
    /// Base package of the generated library (`pl.wendigo.chrome`).
    pub base_package: String,
    /// Root of the Kotlin source tree (`src/main/kotlin`).
    pub output_dir: PathBuf,
    pub convention: ConventionKind,
}

/// Statistics collected during generation for reporting.
#[derive(Debug, Default)]
pub struct GenerationStats {
    pub domains_generated: usize,
    pub types_generated: usize,
    pub enums_generated: usize,
    pub commands_generated: usize,
    pub events_generated: usize,
    pub files_written: usize,
}

/// Load the protocol named by `config` and generate the client from it.
pub fn generate_from_config(config: &GeneratorConfig) -> Result<GenerationStats> {
    tracing::info!(path = %config.protocol_file.display(), "loading protocol");
    let protocol = load_protocol(&config.protocol_file)?;
    tracing::info!(
        version = %protocol.version,
        domains = protocol.domains.len(),
        "loaded protocol"
    );

    generate(
        &protocol,
        &config.base_package,
        config.convention.convention(),
        &config.output_dir,
    )
}

/// Generate the Kotlin client for `protocol` into `output_dir`.
pub fn generate(
    protocol: &Protocol,
    base_package: &str,
    convention: &dyn NamingConvention,
    output_dir: &Path,
) -> Result<GenerationStats> {
    let ctx = GenerationContext::new(base_package);
    let resolver = TypeResolver::new(ctx, convention);
    let mut stats = GenerationStats::default();

    let domains = protocol
        .domains
        .iter()
        .map(|d| resolve_domain(d, &resolver))
        .collect::<Result<Vec<_>>>()?;
    let mappings = build_event_map(protocol, ctx, convention);

    let package_dir = package_path(output_dir, base_package);

    tracing::info!(class = convention.aggregator_class(), "generating protocol class");
    let aggregator = render_aggregator(&protocol.version, &domains, &mappings, ctx, convention)?;
    write_file(
        &package_dir.join(format!("{}.kt", convention.aggregator_class())),
        &aggregator,
    )?;
    stats.files_written += 1;

    for domain in &domains {
        tracing::info!(
            domain = %domain.name,
            package = %domain.namespace,
            "generating classes for domain"
        );
        let domain_dir = package_dir.join(&domain.relative_dir);

        let wrapper = render_domain_file(domain, ctx, convention)?;
        write_file(&domain_dir.join(format!("{}.kt", domain.class_name)), &wrapper)?;

        let types = render_types_file(domain, ctx)?;
        write_file(&domain_dir.join("Types.kt"), &types)?;

        stats.files_written += 2;
        stats.domains_generated += 1;
        stats.types_generated += domain.types.len();
        stats.enums_generated += domain
            .types
            .iter()
            .filter(|t| matches!(t.kind, ResolvedTypeKind::Enum { .. }))
            .count();
        stats.commands_generated += domain.commands.len();
        stats.events_generated += domain.events.len();
    }

    Ok(stats)
}

// ── Aggregator ─────────────────────────────────────────────────────────

/// Render the top-level class that registers event mappings and exposes
/// every domain.
pub fn render_aggregator(
    version: &Version,
    domains: &[ResolvedDomain],
    mappings: &[EventMapping],
    ctx: GenerationContext<'_>,
    convention: &dyn NamingConvention,
) -> Result<String> {
    let mut out = String::new();
    let class = convention.aggregator_class();
    let connection = convention.qualify_root(ctx.base_namespace, convention.connection_class());

    writeln!(out, "package {}", ctx.base_namespace)?;
    writeln!(out)?;
    writeln!(out, "/**")?;
    writeln!(
        out,
        " * {class} represents session established via remote debugger protocol (version {version})."
    )?;
    writeln!(out, " */")?;
    writeln!(
        out,
        "open class {class} internal constructor(private val connection : {connection}) {{"
    )?;
    writeln!(out)?;
    writeln!(out, "    init {{")?;
    if mappings.is_empty() {
        writeln!(out, "        connection.registerEventMappings(mapOf())")?;
    } else {
        writeln!(out, "        connection.registerEventMappings(mapOf(")?;
        let last = mappings.len() - 1;
        for (i, m) in mappings.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            writeln!(
                out,
                "            \"{}\" to {}::class.java{sep}",
                m.event_key, m.class_name
            )?;
        }
        writeln!(out, "        ))")?;
    }
    writeln!(out, "    }}")?;

    for domain in domains {
        let qualified = format!("{}.{}", domain.namespace, domain.class_name);
        writeln!(out)?;
        write_kdoc(&mut out, "    ", &[&format!("Returns {} domain object.", domain.name)])?;
        writeln!(out, "    val {} : {qualified} by lazy {{", domain.name)?;
        writeln!(out, "        {qualified}(connection)")?;
        writeln!(out, "    }}")?;
    }

    writeln!(out, "}}")?;
    Ok(out)
}

// ── Domain wrapper ─────────────────────────────────────────────────────

/// Render `{Domain}Domain.kt`: the wrapper class followed by request,
/// response and event data classes.
pub fn render_domain_file(
    domain: &ResolvedDomain,
    ctx: GenerationContext<'_>,
    convention: &dyn NamingConvention,
) -> Result<String> {
    let mut out = String::new();
    let ns = ctx.base_namespace;
    let connection = convention.qualify_root(ns, convention.connection_class());
    let marker = convention.qualify_root(ns, convention.marker_event_class());

    writeln!(out, "package {}", domain.namespace)?;
    writeln!(out)?;
    write_kdoc(&mut out, "", &[&domain_description(domain)])?;
    writeln!(
        out,
        "{}class {} internal constructor(private val connection : {connection}) {{",
        annotations(ns, domain.experimental, domain.deprecated),
        domain.class_name
    )?;

    for command in &domain.commands {
        writeln!(out)?;
        write_command_method(&mut out, command, ns)?;
    }

    for event in &domain.events {
        writeln!(out)?;
        write_event_method(&mut out, event, ns, &marker)?;
    }

    writeln!(out)?;
    write_kdoc(
        &mut out,
        "    ",
        &[&format!("Returns flowable capturing all {} domains events.", domain.name)],
    )?;
    writeln!(out, "    fun events() : {FLOWABLE}<{marker}> {{")?;
    writeln!(out, "        return connection.allEvents().filter {{")?;
    writeln!(out, "            it.protocolDomain() == \"{}\"", domain.name)?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    for command in &domain.commands {
        if let Some(request) = &command.request_class {
            writeln!(out)?;
            write_kdoc(
                &mut out,
                "",
                &[
                    &format!(
                        "Represents request frame that can be used with {} method call.",
                        command.method
                    ),
                    "",
                    &command.description,
                ],
            )?;
            write_data_class(&mut out, request, &command.parameters, ns, None)?;
        }
        if command.has_return_value {
            writeln!(out)?;
            write_kdoc(
                &mut out,
                "",
                &[
                    &format!("Represents response frame for {} method call.", command.method),
                    "",
                    &command.description,
                ],
            )?;
            write_data_class(&mut out, &command.response_class, &command.returns, ns, None)?;
        }
    }

    for event in &domain.events {
        let Some(class) = &event.class_name else {
            continue;
        };
        let supertype = format!(
            "{marker}(domain = \"{}\", name = \"{}\")",
            domain.name, event.name
        );
        writeln!(out)?;
        write_kdoc(
            &mut out,
            "",
            &[
                &format!("Represents event frames for {}.", event.method),
                "",
                &event.description,
            ],
        )?;
        write_data_class(&mut out, class, &event.parameters, ns, Some(&supertype))?;
    }

    Ok(out)
}

fn domain_description(domain: &ResolvedDomain) -> String {
    if domain.description.is_empty() {
        format!("{} represents remote debugger protocol domain.", domain.class_name)
    } else {
        domain.description.clone()
    }
}

fn write_command_method(out: &mut String, command: &ResolvedCommand, ns: &str) -> Result<()> {
    let mut doc: Vec<String> = vec![command.description.clone()];
    if let Some(redirect) = &command.redirect {
        doc.push(String::new());
        doc.push(format!("Redirects to {redirect} domain."));
    }
    let doc: Vec<&str> = doc.iter().map(String::as_str).collect();
    write_kdoc(out, "    ", &doc)?;

    let (signature, input) = match &command.request_class {
        Some(request) => (format!("input : {request}"), "input"),
        None => (String::new(), "null"),
    };
    writeln!(
        out,
        "    {}fun {}({signature}) : {SINGLE}<{}> {{",
        annotations(ns, command.experimental, command.deprecated),
        command.name,
        command.response_class
    )?;
    writeln!(
        out,
        "        return connection.request(\"{}\", {input}, {}::class.java)",
        command.method, command.response_class
    )?;
    writeln!(out, "    }}")?;
    Ok(())
}

fn write_event_method(
    out: &mut String,
    event: &ResolvedEvent,
    ns: &str,
    marker: &str,
) -> Result<()> {
    let class = event.class_name.as_deref().unwrap_or(marker);

    write_kdoc(out, "    ", &[&event.description])?;
    writeln!(
        out,
        "    {}fun {}() : {FLOWABLE}<{class}> {{",
        annotations(ns, event.experimental, event.deprecated),
        event.name
    )?;
    writeln!(
        out,
        "        return connection.events(\"{}\", {class}::class.java)",
        event.method
    )?;
    writeln!(out, "    }}")?;
    Ok(())
}

// ── Types ──────────────────────────────────────────────────────────────

/// Render `Types.kt` for one domain.
pub fn render_types_file(domain: &ResolvedDomain, ctx: GenerationContext<'_>) -> Result<String> {
    let mut out = String::new();
    let ns = ctx.base_namespace;

    writeln!(out, "package {}", domain.namespace)?;

    for ty in &domain.types {
        writeln!(out)?;
        write_type(&mut out, ty, ns)?;
    }

    Ok(out)
}

fn write_type(out: &mut String, ty: &ResolvedType, ns: &str) -> Result<()> {
    write_kdoc(out, "", &[&ty.description])?;
    let annotations = annotations(ns, ty.experimental, ty.deprecated);

    match &ty.kind {
        ResolvedTypeKind::Alias { target } => {
            writeln!(out, "{annotations}typealias {} = {target}", ty.id)?;
        }
        ResolvedTypeKind::Enum { constants } => {
            writeln!(out, "{annotations}enum class {} {{", ty.id)?;
            let last = constants.len().saturating_sub(1);
            for (i, constant) in constants.iter().enumerate() {
                let sep = if i == last { ";" } else { "," };
                writeln!(
                    out,
                    "    @{JSON_PROPERTY}(\"{}\") {}{sep}",
                    constant.literal, constant.name
                )?;
            }
            writeln!(out, "}}")?;
        }
        ResolvedTypeKind::Data { properties } => {
            out.push_str(&annotations);
            write_data_class(out, &ty.id, properties, ns, None)?;
        }
    }

    Ok(())
}

// ── Shared helpers ─────────────────────────────────────────────────────

/// Write a `data class` with one constructor property per entry.
///
/// Optional properties are nullable and default to `null`.
fn write_data_class(
    out: &mut String,
    name: &str,
    properties: &[ResolvedProperty],
    ns: &str,
    supertype: Option<&str>,
) -> Result<()> {
    writeln!(out, "data class {name}(")?;

    let last = properties.len().saturating_sub(1);
    for (i, p) in properties.iter().enumerate() {
        write_kdoc(out, "    ", &[&p.description])?;
        let (nullable, default) = if p.optional { ("?", " = null") } else { ("", "") };
        let sep = if i == last { "" } else { "," };
        writeln!(
            out,
            "    {}{} : {}{nullable}{default}{sep}",
            annotations(ns, p.experimental, p.deprecated),
            p.declaration,
            p.type_name
        )?;
        if i != last {
            writeln!(out)?;
        }
    }

    match supertype {
        Some(supertype) => writeln!(out, ") : {supertype}")?,
        None => writeln!(out, ")")?,
    }
    Ok(())
}

/// Annotation prefix for experimental and deprecated declarations,
/// including the trailing space.
fn annotations(ns: &str, experimental: bool, deprecated: bool) -> String {
    let mut out = String::new();
    if experimental {
        out.push_str(&format!("@{ns}.Experimental "));
    }
    if deprecated {
        out.push_str("@Deprecated(message = \"Deprecated in protocol\") ");
    }
    out
}

/// Write a KDoc block. Paragraphs may contain newlines; empty leading and
/// trailing paragraphs are dropped, and nothing is written when all are empty.
fn write_kdoc(out: &mut String, indent: &str, paragraphs: &[&str]) -> Result<()> {
    let is_text = |p: &&str| !p.trim().is_empty();
    let (Some(start), Some(end)) = (
        paragraphs.iter().position(is_text),
        paragraphs.iter().rposition(is_text),
    ) else {
        return Ok(());
    };

    writeln!(out, "{indent}/**")?;
    for paragraph in &paragraphs[start..=end] {
        if paragraph.is_empty() {
            writeln!(out, "{indent} *")?;
            continue;
        }
        for line in paragraph.lines() {
            // Kotlin block comments nest, so neither delimiter may survive.
            let line = line.replace("*/", "*&#47;").replace("/*", "/&#42;");
            let line = line.trim_end();
            if line.is_empty() {
                writeln!(out, "{indent} *")?;
            } else {
                writeln!(out, "{indent} * {line}")?;
            }
        }
    }
    writeln!(out, "{indent} */")?;
    Ok(())
}

/// Map a dotted package onto directories under `root`.
///
/// `("src/main/kotlin", "pl.wendigo.chrome")` → `src/main/kotlin/pl/wendigo/chrome`.
pub fn package_path(root: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Write content to a file, creating parent directories as needed.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tracing::debug!(dir = %parent.display(), "creating directory");
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
