//! In-memory shape graph.
//!
//! [`ShapeGraph`] is the read-only view every derivation step works against.
//! Shape kinds are a closed set ([`ShapeKind`]) so consumers dispatch with an
//! exhaustive `match` instead of comparing type strings.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::{ApiDescriptor, ErrorDef, ShapeDef, ShapeRefDef, StructureDef};
use crate::error::{ModelError, ModelResult};

/// Scalar shape flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// UTF-8 string.
    String,
    /// Boolean.
    Boolean,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Binary data.
    Blob,
    /// A string carrying an opaque JSON document.
    JsonValue,
}

/// The kind of a shape and its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// Structure with ordered members.
    Structure(StructureShape),
    /// Homogeneous list.
    List {
        /// Element reference.
        member: ShapeRef,
    },
    /// String-keyed map.
    Map {
        /// Key reference (always string-typed).
        key: ShapeRef,
        /// Value reference.
        value: ShapeRef,
    },
    /// Scalar value.
    Scalar(ScalarKind),
    /// Point in time.
    Timestamp,
    /// String constrained to an ordered set of legal values.
    Enum(Vec<String>),
}

/// Members of a structure shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureShape {
    /// Member name to reference, in declaration order.
    pub members: IndexMap<String, ShapeRef>,
}

/// A reference to a shape plus call-site metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRef {
    /// Name of the referenced shape.
    pub shape: String,
    /// Whether the enclosing structure declares this member required.
    pub required: bool,
    /// Wire-level name override.
    pub location_name: Option<String>,
    /// Request binding location (e.g., "uri").
    pub location: Option<String>,
}

impl ShapeRef {
    /// Create a bare reference to the named shape.
    #[must_use]
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            required: false,
            location_name: None,
            location: None,
        }
    }

    fn from_def(def: ShapeRefDef, required: bool) -> Self {
        Self {
            shape: def.shape,
            required,
            location_name: def.location_name,
            location: def.location,
        }
    }
}

/// Fault metadata carried by an exception shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Structured fault code, if declared.
    pub code: Option<String>,
    /// HTTP status, if declared.
    pub http_status_code: Option<u16>,
}

impl From<ErrorDef> for ErrorInfo {
    fn from(def: ErrorDef) -> Self {
        Self {
            code: def.code,
            http_status_code: def.http_status_code,
        }
    }
}

/// A named shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// Shape name; identity within the graph.
    pub name: String,
    /// Kind and payload.
    pub kind: ShapeKind,
    /// Whether this is a declared exception shape.
    pub exception: bool,
    /// Fault metadata for exception shapes.
    pub error: Option<ErrorInfo>,
}

impl Shape {
    /// Returns the structure body if this is a structure shape.
    #[must_use]
    pub fn as_structure(&self) -> Option<&StructureShape> {
        match &self.kind {
            ShapeKind::Structure(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is a structure shape.
    #[must_use]
    pub fn is_structure(&self) -> bool {
        matches!(self.kind, ShapeKind::Structure(_))
    }

    /// Whether this is a list or map shape.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, ShapeKind::List { .. } | ShapeKind::Map { .. })
    }
}

/// A named API operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation name (e.g., "CreateQueue").
    pub name: String,
    /// Input shape reference.
    pub input: Option<ShapeRef>,
    /// Output shape reference.
    pub output: Option<ShapeRef>,
    /// Declared error shapes, in declaration order.
    pub errors: Vec<ShapeRef>,
}

/// Service identity taken from the descriptor metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Service identifier (e.g., "SQS").
    pub service_id: Option<String>,
    /// Endpoint prefix (e.g., "sqs").
    pub endpoint_prefix: Option<String>,
    /// API version.
    pub api_version: Option<String>,
}

/// Immutable graph of shapes and operations.
#[derive(Debug, Clone, Default)]
pub struct ShapeGraph {
    service: ServiceInfo,
    shapes: IndexMap<String, Shape>,
    operations: IndexMap<String, Operation>,
    payloads: BTreeSet<String>,
}

impl ShapeGraph {
    /// Parse a JSON descriptor and build the graph.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let descriptor: ApiDescriptor = serde_json::from_str(json)?;
        Self::from_descriptor(descriptor)
    }

    /// Build the graph from an already parsed descriptor.
    pub fn from_descriptor(descriptor: ApiDescriptor) -> ModelResult<Self> {
        let ApiDescriptor {
            metadata,
            operations,
            shapes,
        } = descriptor;

        let mut graph = Self {
            service: ServiceInfo {
                service_id: metadata.service_id,
                endpoint_prefix: metadata.endpoint_prefix,
                api_version: metadata.api_version,
            },
            ..Self::default()
        };

        for (name, def) in shapes {
            let shape = convert_shape(&name, def)?;
            graph.shapes.insert(name, shape);
        }
        graph.check_map_keys()?;

        for (name, def) in operations {
            let input = def.input.map(|r| ShapeRef::from_def(r, false));
            let output = def.output.map(|r| ShapeRef::from_def(r, false));
            for r in input.iter().chain(output.iter()) {
                graph.payloads.insert(r.shape.clone());
            }
            let errors = def
                .errors
                .into_iter()
                .map(|r| ShapeRef::from_def(r, false))
                .collect();
            graph.operations.insert(
                name.clone(),
                Operation {
                    name,
                    input,
                    output,
                    errors,
                },
            );
        }

        debug!(
            shapes = graph.shapes.len(),
            operations = graph.operations.len(),
            "built shape graph"
        );
        Ok(graph)
    }

    /// Service identity.
    #[must_use]
    pub fn service(&self) -> &ServiceInfo {
        &self.service
    }

    /// Look up a shape by name.
    #[must_use]
    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    /// Resolve a reference to its shape. `None` means the reference dangles.
    #[must_use]
    pub fn resolve(&self, shape_ref: &ShapeRef) -> Option<&Shape> {
        self.shapes.get(&shape_ref.shape)
    }

    /// Look up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// All shapes in declaration order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    /// All operations in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    /// Whether the shape is used as an operation input or output.
    #[must_use]
    pub fn is_payload(&self, shape_name: &str) -> bool {
        self.payloads.contains(shape_name)
    }

    fn check_map_keys(&self) -> ModelResult<()> {
        for shape in self.shapes.values() {
            let ShapeKind::Map { key, .. } = &shape.kind else {
                continue;
            };
            // Dangling keys are reported by the consumer that walks them.
            let Some(key_shape) = self.resolve(key) else {
                continue;
            };
            let is_string = matches!(
                key_shape.kind,
                ShapeKind::Scalar(ScalarKind::String) | ShapeKind::Enum(_)
            );
            if !is_string {
                return Err(ModelError::NonStringMapKey {
                    shape: shape.name.clone(),
                    key: key.shape.clone(),
                });
            }
        }
        Ok(())
    }
}

fn convert_shape(name: &str, def: ShapeDef) -> ModelResult<Shape> {
    let mut exception = false;
    let mut error = None;
    let kind = match def {
        ShapeDef::Structure(s) => {
            exception = s.exception || s.error.is_some();
            error = s.error.clone().map(ErrorInfo::from);
            ShapeKind::Structure(convert_structure(name, s)?)
        }
        ShapeDef::List(l) => ShapeKind::List {
            member: ShapeRef::from_def(l.member, false),
        },
        ShapeDef::Map(m) => ShapeKind::Map {
            key: ShapeRef::from_def(m.key, false),
            value: ShapeRef::from_def(m.value, false),
        },
        ShapeDef::String(s) => match s.enum_values {
            Some(values) => ShapeKind::Enum(values),
            None if s.jsonvalue => ShapeKind::Scalar(ScalarKind::JsonValue),
            None => ShapeKind::Scalar(ScalarKind::String),
        },
        ShapeDef::Boolean(_) => ShapeKind::Scalar(ScalarKind::Boolean),
        ShapeDef::Integer(_) => ShapeKind::Scalar(ScalarKind::Integer),
        ShapeDef::Long(_) => ShapeKind::Scalar(ScalarKind::Long),
        ShapeDef::Float(_) => ShapeKind::Scalar(ScalarKind::Float),
        ShapeDef::Double(_) => ShapeKind::Scalar(ScalarKind::Double),
        ShapeDef::Blob(_) => ShapeKind::Scalar(ScalarKind::Blob),
        ShapeDef::Timestamp(_) => ShapeKind::Timestamp,
    };
    Ok(Shape {
        name: name.to_owned(),
        kind,
        exception,
        error,
    })
}

fn convert_structure(name: &str, def: StructureDef) -> ModelResult<StructureShape> {
    let required: BTreeSet<String> = def.required.into_iter().collect();
    if let Some(missing) = required.iter().find(|m| !def.members.contains_key(*m)) {
        return Err(ModelError::UnknownRequiredMember {
            shape: name.to_owned(),
            member: missing.clone(),
        });
    }
    let members = def
        .members
        .into_iter()
        .map(|(member, r)| {
            let is_required = required.contains(&member);
            (member, ShapeRef::from_def(r, is_required))
        })
        .collect();
    Ok(StructureShape { members })
}
