//! Resource derivation and translation-code synthesis for ackgen.
//!
//! Given a [`ShapeGraph`](ackgen_model::ShapeGraph) and a [`GeneratorConfig`],
//! this crate:
//!
//! - groups operations into resources ([`Crd`]) with Spec and Status fields;
//! - derives nested type definitions ([`TypeDef`]) and string enums
//!   ([`EnumDef`]) with conflict-free names;
//! - synthesizes the statements that copy a resource into a request and a
//!   response back into a resource ([`Synthesizer`]);
//! - resolves HTTP statuses to service error codes.
//!
//! [`Generator`] ties these together for one run and renders the results as
//! path-keyed source files.
//!
//! ```no_run
//! use ackgen_core::{GeneratorConfig, Generator};
//! use ackgen_model::ShapeGraph;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ShapeGraph::from_json(&std::fs::read_to_string("api-2.json")?)?;
//! let config = GeneratorConfig::from_path("generator.yaml".as_ref())?;
//! let files = Generator::new(graph, config).generate_all()?;
//! for (path, content) in &files {
//!     println!("{path}: {} bytes", content.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod code;
pub mod config;
pub mod crd;
pub mod deriver;
pub mod error;
pub mod exceptions;
pub mod generator;
pub mod names;
pub mod op;
pub mod render;
pub mod rename;
pub mod types;

pub use code::Synthesizer;
pub use config::{ConfigFormat, GeneratorConfig};
pub use crd::{Crd, Field, FieldSide};
pub use error::{ConfigError, GenerateError, GenerateResult};
pub use exceptions::{UNKNOWN_EXCEPTION_CODE, exception_code};
pub use generator::Generator;
pub use names::Names;
pub use op::OpType;
pub use render::{Artifacts, Target};
pub use rename::RenameTable;
pub use types::{EnumDef, TypeDef};
