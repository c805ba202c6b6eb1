//! Generate a typed Kotlin client from the DevTools protocol JSON schema.
//!
//! `devtools-kotlin-gen` reads the protocol description (`protocol.json`) and
//! emits one package per domain with its data types, command wrappers and
//! event classes, plus an aggregator class exposing every domain.
//!
//! # Features
//!
//! - Resolves primitives, arrays (including nested arrays) and `$ref`
//!   references to Kotlin type names
//! - Cross-domain references become fully qualified names
//! - Enum literals become valid constant names (`-Infinity` → `MINUS_INFINITY`)
//! - Sorted event mapping table for the aggregator
//! - Two naming conventions (`List`-based and `Array`-based output)
//! - Deterministic output: byte-identical across runs
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use devtools_kotlin_gen::convention::KotlinList;
//!
//! let protocol = devtools_kotlin_gen::schema::load_protocol(Path::new("protocol.json"))?;
//! let stats = devtools_kotlin_gen::codegen::generate(
//!     &protocol,
//!     "pl.wendigo.chrome",
//!     &KotlinList,
//!     Path::new("src/main/kotlin"),
//! )?;
//! eprintln!("Generated {} domains, {} events", stats.domains_generated, stats.events_generated);
//! # Ok::<(), devtools_kotlin_gen::error::Error>(())
//! ```

pub mod codegen;
pub mod convention;
pub mod error;
pub mod events;
pub mod naming;
pub mod resolved;
pub mod resolver;
pub mod schema;
pub mod type_map;
