//! End-to-end generation tests for ackgen.
//!
//! Each directory under `fixtures/` holds an API descriptor (`api.json`) and
//! a generator configuration (`generator.yaml`) modelled on a real service.
//! The tests load both from disk, run the whole generator and check the
//! derived resources and the emitted code.
//!
//! ```text
//! cargo test -p ackgen-integration
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use ackgen_core::{Generator, GeneratorConfig};
use ackgen_model::ShapeGraph;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Directory holding the named fixture.
#[must_use]
pub fn fixture_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

/// Parse the named fixture's descriptor.
#[must_use]
pub fn load_graph(name: &str) -> ShapeGraph {
    init_tracing();
    let path = fixture_dir(name).join("api.json");
    let json = fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    ShapeGraph::from_json(&json).unwrap_or_else(|e| panic!("parse {}: {e}", path.display()))
}

/// Load the named fixture's configuration.
#[must_use]
pub fn load_config(name: &str) -> GeneratorConfig {
    let path = fixture_dir(name).join("generator.yaml");
    GeneratorConfig::from_path(&path).unwrap_or_else(|e| panic!("load {}: {e}", path.display()))
}

/// A generator over the named fixture.
#[must_use]
pub fn load_generator(name: &str) -> Generator {
    Generator::new(load_graph(name), load_config(name))
}

#[cfg(test)]
mod test_bucket;
#[cfg(test)]
mod test_determinism;
#[cfg(test)]
mod test_queue;
#[cfg(test)]
mod test_repository;
#[cfg(test)]
mod test_topic;
