//! Conflict-free type naming.
//!
//! Generated type names are the cleaned Camel form of the shape name. Two
//! things can collide with that: a resource's own types (`Queue`,
//! `QueueSpec`, `QueueStatus`) and another shape cleaning to the same name.
//! The table is built in two passes: reserve every resource name, then walk
//! candidate shapes in declaration order and give each one the first free
//! name, appending [`CONFLICT_SUFFIX`] until it is unique. The first shape to
//! claim a name keeps it, so the assignment only depends on the graph.

use std::collections::{BTreeMap, BTreeSet};

use ackgen_model::{ShapeGraph, ShapeKind};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::names::Names;

/// Suffix appended to a type name that collides with a name already taken.
pub const CONFLICT_SUFFIX: &str = "SDK";

/// Shape name to generated type name.
///
/// The suffix is joined without a separator (`RepositorySDK`, never
/// `Repository_SDK`) so renamed types stay UpperCamelCase and pass the
/// `non_camel_case_types` lint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable {
    names: BTreeMap<String, String>,
}

impl RenameTable {
    /// Build the table for `resource_names` (original spellings).
    #[must_use]
    pub fn build(graph: &ShapeGraph, config: &GeneratorConfig, resource_names: &[String]) -> Self {
        let mut taken: BTreeSet<String> = BTreeSet::new();
        for resource in resource_names {
            let camel = Names::new(resource).camel;
            taken.insert(format!("{camel}Spec"));
            taken.insert(format!("{camel}Status"));
            taken.insert(camel);
        }

        let mut names = BTreeMap::new();
        for shape in graph.shapes() {
            let candidate = matches!(shape.kind, ShapeKind::Structure(_) | ShapeKind::Enum(_))
                && !shape.exception
                && !graph.is_payload(&shape.name)
                && !config.is_ignored_shape(&shape.name);
            if !candidate {
                continue;
            }
            let mut name = Names::new(&shape.name).camel;
            while taken.contains(&name) {
                name.push_str(CONFLICT_SUFFIX);
            }
            if name != Names::new(&shape.name).camel {
                debug!(shape = %shape.name, renamed = %name, "resolved type name conflict");
            }
            taken.insert(name.clone());
            names.insert(shape.name.clone(), name);
        }
        Self { names }
    }

    /// Generated type name for a shape.
    #[must_use]
    pub fn type_name(&self, shape_name: &str) -> String {
        self.names
            .get(shape_name)
            .cloned()
            .unwrap_or_else(|| Names::new(shape_name).camel)
    }

    /// Whether the shape's type name carries the conflict suffix.
    #[must_use]
    pub fn is_renamed(&self, shape_name: &str) -> bool {
        self.names
            .get(shape_name)
            .is_some_and(|n| *n != Names::new(shape_name).camel)
    }
}
