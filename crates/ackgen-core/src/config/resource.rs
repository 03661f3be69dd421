//! Per-resource configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::FieldConfig;

/// Instructions for one resource, keyed by its original name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Unpack the `Attributes` map into individual fields.
    pub unpack_attributes: bool,
    /// Fine-grained attribute map unpacking rules.
    pub unpack_attributes_map: Option<UnpackAttributesMapConfig>,
    /// HTTP status to error code overrides.
    pub exceptions: Option<ExceptionsConfig>,
    /// Member renames per operation.
    pub renames: Option<RenamesConfig>,
    /// ReadMany tuning.
    pub list_operation: Option<ListOperationConfig>,
    /// Update tuning.
    pub update_operation: Option<UpdateOperationConfig>,
    /// Force or suppress unwrapping of a single-member output wrapper.
    pub unwrap_output: Option<bool>,
    /// Field overrides keyed by field name.
    pub fields: BTreeMap<String, FieldConfig>,
}

impl ResourceConfig {
    /// Whether the resource's `Attributes` map is unpacked into fields.
    #[must_use]
    pub fn unpacks_attributes(&self) -> bool {
        self.unpack_attributes
            || self.unpack_attributes_map.is_some()
            || self.fields.values().any(|f| f.is_attribute)
    }

    /// Whether SetAttributes takes one name/value pair per call.
    #[must_use]
    pub fn set_attributes_single_attribute(&self) -> bool {
        self.unpack_attributes_map
            .as_ref()
            .is_some_and(|u| u.set_attributes_single_attribute)
    }

    /// Renamed field name for `member` of `operation`'s input, if configured.
    #[must_use]
    pub fn input_rename(&self, operation: &str, member: &str) -> Option<&str> {
        self.renames
            .as_ref()
            .and_then(|r| r.operations.get(operation))
            .and_then(|o| o.input_fields.get(member))
            .map(String::as_str)
    }

    /// Renamed field name for `member` of `operation`'s output, if configured.
    #[must_use]
    pub fn output_rename(&self, operation: &str, member: &str) -> Option<&str> {
        self.renames
            .as_ref()
            .and_then(|r| r.operations.get(operation))
            .and_then(|o| o.output_fields.get(member))
            .map(String::as_str)
    }

    /// Configured match fields for ReadMany element selection.
    #[must_use]
    pub fn list_match_fields(&self) -> &[String] {
        self.list_operation
            .as_ref()
            .map(|l| l.match_fields.as_slice())
            .unwrap_or_default()
    }
}

/// Attribute map unpacking rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnpackAttributesMapConfig {
    /// SetAttributes accepts a single `AttributeName`/`AttributeValue` pair.
    pub set_attributes_single_attribute: bool,
    /// Constant members of the GetAttributes input.
    pub get_attributes_input: Option<GetAttributesInputConfig>,
}

/// Constant members of the GetAttributes input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAttributesInputConfig {
    /// Member name to the values it is always set to.
    pub overrides: BTreeMap<String, MemberConstructorConfig>,
}

/// Literal values for a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberConstructorConfig {
    /// Values, in order.
    pub values: Vec<String>,
}

/// Exception handling rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExceptionsConfig {
    /// HTTP status to the error code that means it.
    pub errors: BTreeMap<u16, ErrorConfig>,
    /// Error codes that can never be fixed by retrying.
    pub terminal_codes: Vec<String>,
}

/// Error code mapping for one HTTP status.
///
/// Accepts either a bare code string or a table with a message prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorConfig {
    /// Just the code.
    Code(String),
    /// Code plus an optional message prefix that must also match.
    Detailed {
        /// Error code.
        code: String,
        /// Required prefix of the error message.
        #[serde(default)]
        message_prefix: Option<String>,
    },
}

impl ErrorConfig {
    /// The configured error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Code(code) | Self::Detailed { code, .. } => code,
        }
    }

    /// The configured message prefix, if any.
    #[must_use]
    pub fn message_prefix(&self) -> Option<&str> {
        match self {
            Self::Code(_) => None,
            Self::Detailed { message_prefix, .. } => message_prefix.as_deref(),
        }
    }
}

/// Member renames grouped by operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamesConfig {
    /// Operation name to its renames.
    pub operations: BTreeMap<String, OperationRenamesConfig>,
}

/// Renames for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationRenamesConfig {
    /// Input member name to field name.
    pub input_fields: BTreeMap<String, String>,
    /// Output member name to field name.
    pub output_fields: BTreeMap<String, String>,
}

/// ReadMany tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOperationConfig {
    /// Element members compared against Spec to pick the matching element.
    pub match_fields: Vec<String>,
}

/// Update tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateOperationConfig {
    /// Hand-written method that replaces the synthesized update.
    pub custom_method_name: Option<String>,
}
