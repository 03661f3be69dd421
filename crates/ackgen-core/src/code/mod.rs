//! Translation-code synthesis.
//!
//! For one resource and one operation kind, [`Synthesizer`] emits Rust
//! statements that copy a resource value into a wire request
//! ([`Synthesizer::set_input`]) or a wire response into a resource value
//! ([`Synthesizer::set_output`]). The walk pairs the operation's shape tree
//! with the resource's fields; nested values are converted recursively and
//! every optional member is guarded so absent values stay absent.
//!
//! Emitted code assumes the conventions below:
//!
//! - every request, response and generated type member is an `Option`;
//! - the resource value keeps its fields under the configured Spec and
//!   Status members, and Status carries `ack_resource_metadata`;
//! - timestamps on the wire are `Copy` and wrapped as `metav1::Time`.

mod attributes;
mod check;
mod path;
mod set_input;
mod set_output;
mod walk;

use ackgen_model::{Operation, Shape, ShapeGraph, ShapeRef, StructureShape};

pub use path::VarPath;

use crate::config::GeneratorConfig;
use crate::crd::{Crd, FieldSide};
use crate::deriver::resolve_structure;
use crate::error::{GenerateError, GenerateResult};
use crate::names::Names;
use crate::op::OpType;
use crate::rename::RenameTable;

/// Which way values flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Resource value to wire request.
    ToWire,
    /// Wire response to resource value.
    ToResource,
}

/// Emits translation code for one resource.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    graph: &'a ShapeGraph,
    config: &'a GeneratorConfig,
    renames: &'a RenameTable,
    crd: &'a Crd,
}

impl<'a> Synthesizer<'a> {
    /// Create a synthesizer for `crd`.
    #[must_use]
    pub fn new(
        graph: &'a ShapeGraph,
        config: &'a GeneratorConfig,
        renames: &'a RenameTable,
        crd: &'a Crd,
    ) -> Self {
        Self {
            graph,
            config,
            renames,
            crd,
        }
    }

    fn operation(&self, op_type: OpType) -> GenerateResult<&'a Operation> {
        self.crd
            .ops
            .get(op_type)
            .ok_or_else(|| GenerateError::MissingOperation {
                resource: self.crd.names.original.clone(),
                op_type: op_type.to_string(),
            })
    }

    fn structure(&self, shape_ref: &ShapeRef, context: &str) -> GenerateResult<(&'a Shape, &'a StructureShape)> {
        resolve_structure(self.graph, shape_ref, context)
    }

    fn resource(&self) -> &'a str {
        &self.crd.names.original
    }

    fn is_ignored(&self, shape: &str, member: &str, member_ref: &ShapeRef) -> bool {
        self.config.is_ignored_member(shape, member, &member_ref.shape)
    }

    fn prefix(&self, side: FieldSide) -> &'a str {
        match side {
            FieldSide::Spec => &self.config.prefix_config.spec_field,
            FieldSide::Status => &self.config.prefix_config.status_field,
        }
    }

    /// `Option<&AwsResourceName>` expression reading the metadata ARN.
    fn arn_accessor(&self, resource_var: &str) -> String {
        format!(
            "{resource_var}.{}.ack_resource_metadata.as_ref().and_then(|m| m.arn.as_ref())",
            self.config.prefix_config.status_field
        )
    }

    /// Place expression of the metadata slot, created on first write.
    fn metadata_slot(&self, resource_var: &str) -> String {
        format!(
            "{resource_var}.{}.ack_resource_metadata.get_or_insert_with({}::ResourceMetadata::default)",
            self.config.prefix_config.status_field, self.config.emit.metadata_module
        )
    }

    /// Statement writing the primary ARN from a `&String` binding.
    fn assign_arn(&self, resource_var: &str, binding: &str) -> String {
        format!(
            "{}.arn = Some({}::AwsResourceName::from({binding}.clone()));",
            self.metadata_slot(resource_var),
            self.config.emit.metadata_module
        )
    }

    /// Fully qualified type of a structure on the given side. Wire types keep
    /// the shape name.
    fn type_path(&self, shape_name: &str, direction: Direction) -> String {
        match direction {
            Direction::ToWire => format!("{}::{shape_name}", self.config.emit.sdk_module),
            Direction::ToResource => {
                format!("{}::{}", self.config.emit.apis_module, self.renames.type_name(shape_name))
            }
        }
    }
}

fn pad(level: usize) -> String {
    "    ".repeat(level)
}

fn member_ident(member: &str) -> String {
    Names::new(member).field_ident()
}
