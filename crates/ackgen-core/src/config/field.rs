//! Per-field configuration.

use serde::{Deserialize, Serialize};

/// How an attribute-map value is encoded on the wire.
///
/// Attribute maps carry every value as a string; the format tells the
/// synthesized code how to parse it into the field's type and back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeFormat {
    /// Plain string, copied as-is.
    #[default]
    String,
    /// Decimal integer rendered as a string.
    Integer,
    /// `"true"` / `"false"`.
    Boolean,
    /// Whole number of seconds rendered as a string.
    DurationSeconds,
}

impl AttributeFormat {
    /// Rust type of a field holding a value in this format.
    #[must_use]
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "i64",
            Self::Boolean => "bool",
            Self::DurationSeconds => "std::time::Duration",
        }
    }
}

/// Where an extra field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFieldConfig {
    /// Operation whose input shape holds the source member.
    pub operation: String,
    /// Dotted member path inside that shape (e.g. `"Policy"`).
    pub path: String,
}

/// Instructions for one resource field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// The field is populated by the service; it goes to Status.
    pub is_read_only: bool,
    /// The field is a key of the resource's attribute map.
    pub is_attribute: bool,
    /// Wire encoding of the attribute value.
    pub format: AttributeFormat,
    /// The field carries the owning account ID and is routed to metadata.
    pub contains_owner_account_id: bool,
    /// The field is the resource's primary ARN.
    pub is_arn_primary_key: bool,
    /// The field must be set before the resource can be created.
    pub is_required: bool,
    /// Copy the field definition from another operation's input shape.
    pub from: Option<SourceFieldConfig>,
    /// Explicit Rust type for a field with no backing shape.
    #[serde(rename = "type")]
    pub type_override: Option<String>,
}
