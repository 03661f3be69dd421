//! API shape descriptor model for ackgen.
//!
//! This crate parses an AWS API descriptor document into a [`ShapeGraph`]:
//! a read-only graph of named shapes (structures, lists, maps, scalars,
//! timestamps, enums) and operations. Everything downstream treats the graph
//! as immutable input.

mod descriptor;
mod error;
mod graph;

pub use descriptor::{
    ApiDescriptor, ErrorDef, ListDef, MapDef, Metadata, OperationDef, PlainDef, ShapeDef,
    ShapeRefDef, StringDef, StructureDef,
};
pub use error::{ModelError, ModelResult};
pub use graph::{
    ErrorInfo, Operation, ScalarKind, ServiceInfo, Shape, ShapeGraph, ShapeKind, ShapeRef,
    StructureShape,
};
