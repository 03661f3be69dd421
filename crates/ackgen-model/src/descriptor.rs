//! API descriptor document types for deserialization.
//!
//! The descriptor is the JSON document shipped with AWS SDKs (`api-2.json`)
//! describing every operation and shape of a service. Only the parts needed
//! to derive resources are modelled here; unknown keys are ignored.

use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level API descriptor document.
#[derive(Debug, Deserialize)]
pub struct ApiDescriptor {
    /// Service-level metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// All operations, keyed by operation name, in document order.
    #[serde(default)]
    pub operations: IndexMap<String, OperationDef>,
    /// All shapes, keyed by shape name, in document order.
    #[serde(default)]
    pub shapes: IndexMap<String, ShapeDef>,
}

/// Service metadata block.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Service identifier (e.g., "SQS").
    #[serde(default)]
    pub service_id: Option<String>,
    /// Wire protocol (e.g., "query", "json", "rest-xml").
    #[serde(default)]
    pub protocol: Option<String>,
    /// Endpoint prefix used when building URLs (e.g., "sqs").
    #[serde(default)]
    pub endpoint_prefix: Option<String>,
    /// API version string (e.g., "2012-11-05").
    #[serde(default)]
    pub api_version: Option<String>,
}

/// A single operation definition.
#[derive(Debug, Deserialize)]
pub struct OperationDef {
    /// Input shape reference, absent for operations without input.
    #[serde(default)]
    pub input: Option<ShapeRefDef>,
    /// Output shape reference, absent for operations without output.
    #[serde(default)]
    pub output: Option<ShapeRefDef>,
    /// Declared error shapes.
    #[serde(default)]
    pub errors: Vec<ShapeRefDef>,
}

/// A reference to a shape from an operation or a container member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRefDef {
    /// Name of the referenced shape.
    pub shape: String,
    /// Wire-level name override for this reference.
    #[serde(default)]
    pub location_name: Option<String>,
    /// Where on the request the member is bound (e.g., "uri", "header").
    #[serde(default)]
    pub location: Option<String>,
}

/// Error metadata attached to an exception shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDef {
    /// Structured fault code returned on the wire.
    #[serde(default)]
    pub code: Option<String>,
    /// HTTP status code the fault is returned with.
    #[serde(default)]
    pub http_status_code: Option<u16>,
    /// Whether the fault is the caller's responsibility.
    #[serde(default)]
    pub sender_fault: bool,
}

/// A single shape definition, tagged by its `type` key.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeDef {
    /// A structure shape with named members.
    #[serde(rename = "structure")]
    Structure(StructureDef),
    /// A list shape.
    #[serde(rename = "list")]
    List(ListDef),
    /// A map shape.
    #[serde(rename = "map")]
    Map(MapDef),
    /// A string shape, possibly constrained to an enum or holding JSON.
    #[serde(rename = "string")]
    String(StringDef),
    /// A boolean shape.
    #[serde(rename = "boolean")]
    Boolean(PlainDef),
    /// A 32-bit integer shape.
    #[serde(rename = "integer")]
    Integer(PlainDef),
    /// A 64-bit integer shape.
    #[serde(rename = "long")]
    Long(PlainDef),
    /// A single-precision float shape.
    #[serde(rename = "float")]
    Float(PlainDef),
    /// A double-precision float shape.
    #[serde(rename = "double")]
    Double(PlainDef),
    /// A blob (binary data) shape.
    #[serde(rename = "blob")]
    Blob(PlainDef),
    /// A timestamp shape.
    #[serde(rename = "timestamp")]
    Timestamp(PlainDef),
}

/// A structure shape body.
#[derive(Debug, Default, Deserialize)]
pub struct StructureDef {
    /// Members in declaration order.
    #[serde(default)]
    pub members: IndexMap<String, ShapeRefDef>,
    /// Names of required members.
    #[serde(default)]
    pub required: Vec<String>,
    /// Whether this structure is an exception shape.
    #[serde(default)]
    pub exception: bool,
    /// Fault metadata for exception shapes.
    #[serde(default)]
    pub error: Option<ErrorDef>,
}

/// A list shape body.
#[derive(Debug, Deserialize)]
pub struct ListDef {
    /// Element reference.
    pub member: ShapeRefDef,
}

/// A map shape body.
#[derive(Debug, Deserialize)]
pub struct MapDef {
    /// Key reference. Keys are always string-typed.
    pub key: ShapeRefDef,
    /// Value reference.
    pub value: ShapeRefDef,
}

/// A string shape body.
#[derive(Debug, Default, Deserialize)]
pub struct StringDef {
    /// Legal values when the string is an enum.
    #[serde(default, rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    /// Whether the string carries an opaque JSON document.
    #[serde(default)]
    pub jsonvalue: bool,
}

/// A shape body with no interesting properties.
#[derive(Debug, Default, Deserialize)]
pub struct PlainDef {}
