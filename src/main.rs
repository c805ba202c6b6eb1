use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use devtools_kotlin_gen::codegen::{GeneratorConfig, generate_from_config};
use devtools_kotlin_gen::convention::ConventionKind;

/// Generate a typed Kotlin client from the DevTools protocol JSON schema.
///
/// Reads protocol.json and writes one package per protocol domain with its
/// types, commands and events, plus an aggregator class wiring them together.
#[derive(Parser)]
#[command(name = "devtools-kotlin-gen", version, about)]
struct Cli {
    /// Only log warnings and errors.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the protocol JSON and save it locally.
    #[cfg(feature = "download")]
    DownloadProtocol {
        /// URL of the protocol JSON document.
        #[arg(
            long,
            default_value = "https://raw.githubusercontent.com/ChromeDevTools/devtools-protocol/master/json/browser_protocol.json",
            env = "PROTOCOL_URL"
        )]
        url: String,

        /// Where to save the downloaded document.
        #[arg(long, default_value = "protocol.json")]
        output: PathBuf,
    },

    /// Generate Kotlin sources from a protocol JSON file.
    Generate {
        /// Protocol JSON document to read.
        #[arg(long, default_value = "protocol.json", env = "PROTOCOL_FILE")]
        protocol_file: PathBuf,

        /// Base package of the generated client.
        #[arg(long, default_value = "pl.wendigo.chrome", env = "BASE_PACKAGE")]
        base_package: String,

        /// Root of the Kotlin source tree.
        #[arg(long, default_value = "src/main/kotlin", env = "KOTLIN_BASE")]
        output_dir: PathBuf,

        /// Naming convention of the generated code.
        #[arg(long, value_enum, default_value_t = ConventionKind::List, env = "CONVENTION")]
        convention: ConventionKind,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> devtools_kotlin_gen::error::Result<()> {
    match cli.command {
        #[cfg(feature = "download")]
        Commands::DownloadProtocol { url, output } => {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| devtools_kotlin_gen::error::Error::Download(e.to_string()))?;
            rt.block_on(devtools_kotlin_gen::schema::download_protocol(&url, &output))?;
        }

        Commands::Generate {
            protocol_file,
            base_package,
            output_dir,
            convention,
        } => {
            let config = GeneratorConfig {
                protocol_file,
                base_package,
                output_dir,
                convention,
            };
            tracing::info!(
                convention = %config.convention,
                output = %config.output_dir.display(),
                "generating Kotlin client"
            );

            let stats = generate_from_config(&config)?;

            tracing::info!(
                domains = stats.domains_generated,
                types = stats.types_generated,
                enums = stats.enums_generated,
                commands = stats.commands_generated,
                events = stats.events_generated,
                files = stats.files_written,
                "done"
            );
        }
    }

    Ok(())
}
