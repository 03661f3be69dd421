//! ackgen - resource code generator.
//!
//! Reads an AWS API descriptor and a generator configuration, derives the
//! resources the API manages, and writes their type definitions and the
//! request/response translation functions into an output directory.
//!
//! # Usage
//!
//! ```text
//! ackgen --descriptor api-2.json --config generator.yaml --output generated
//! ackgen -d api-2.json -c generator.yaml -o generated --target apis
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::fs;
use std::path::{Path, PathBuf};

use ackgen_core::{Generator, GeneratorConfig, Target};
use ackgen_model::ShapeGraph;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "ackgen", version, about)]
struct Args {
    /// API descriptor JSON document.
    #[arg(short, long)]
    descriptor: PathBuf,

    /// Generator configuration (`.yaml`, `.yml`, `.toml` or `.json`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the generated files are written under.
    #[arg(short, long, default_value = "generated")]
    output: PathBuf,

    /// Targets to render; repeat or comma-separate. Defaults to all.
    #[arg(short, long, value_delimiter = ',')]
    target: Vec<Target>,

    /// Log level filter.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `--log-level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let descriptor = fs::read_to_string(&args.descriptor)
        .with_context(|| format!("failed to read descriptor: {}", args.descriptor.display()))?;
    let graph = ShapeGraph::from_json(&descriptor)
        .with_context(|| format!("failed to parse descriptor: {}", args.descriptor.display()))?;

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_path(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let targets = if args.target.is_empty() {
        Target::ALL.to_vec()
    } else {
        args.target.clone()
    };
    info!(
        descriptor = %args.descriptor.display(),
        output = %args.output.display(),
        ?targets,
        "generating"
    );

    // Everything is rendered before the first write so a failure leaves the
    // output directory untouched.
    let generator = Generator::new(graph, config);
    let files = generator.generate(&targets).context("code generation failed")?;

    for (rel_path, content) in &files {
        let full_path = args.output.join(rel_path);
        ensure_parent_dir(&full_path)?;
        fs::write(&full_path, content)
            .with_context(|| format!("failed to write {}", full_path.display()))?;
        debug!(path = %full_path.display(), "wrote file");
    }

    info!(files = files.len(), "code generation complete");
    Ok(())
}

/// Ensure the parent directory of a path exists.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
