//! Generator configuration.
//!
//! A generator configuration tells the deriver which operations, resources
//! and shapes to ignore, how to rename members, and which per-resource rules
//! (attribute unpacking, exception codes, ReadMany matching) apply. The
//! document is usually YAML (`generator.yaml`); TOML and JSON are accepted
//! too and picked by file extension.

mod field;
mod resource;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use typed_builder::TypedBuilder;

pub use field::{AttributeFormat, FieldConfig, SourceFieldConfig};
pub use resource::{
    ErrorConfig, ExceptionsConfig, GetAttributesInputConfig, ListOperationConfig,
    MemberConstructorConfig, OperationRenamesConfig, RenamesConfig, ResourceConfig,
    UnpackAttributesMapConfig, UpdateOperationConfig,
};

use crate::error::ConfigError;
use crate::op::OpType;

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Per-resource rules keyed by original resource name.
    pub resources: BTreeMap<String, ResourceConfig>,
    /// Things the deriver must not look at.
    pub ignore: IgnoreSpec,
    /// Operation name to member renames, applied to input and output.
    pub renames: BTreeMap<String, BTreeMap<String, String>>,
    /// Per-operation overrides keyed by operation name.
    pub operations: BTreeMap<String, OperationConfig>,
    /// Names of the Spec and Status members on the resource value.
    pub prefix_config: PrefixConfig,
    /// Route owner-account attributes into the common metadata slot.
    pub include_ack_metadata: bool,
    /// Statement emitted when a ReadMany scan finds no matching element.
    pub set_many_output_notfound_err_return: Option<String>,
    /// Module paths referenced by synthesized code.
    pub emit: EmitConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            resources: BTreeMap::new(),
            ignore: IgnoreSpec::default(),
            renames: BTreeMap::new(),
            operations: BTreeMap::new(),
            prefix_config: PrefixConfig::default(),
            include_ack_metadata: true,
            set_many_output_notfound_err_return: None,
            emit: EmitConfig::default(),
        }
    }
}

/// Ignore lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreSpec {
    /// Operation names.
    pub operations: Vec<String>,
    /// Resource names.
    #[serde(alias = "resources")]
    pub resource_names: Vec<String>,
    /// Shape names; members targeting them are dropped too.
    #[serde(alias = "shapes")]
    pub shape_names: Vec<String>,
    /// `Shape.Member` paths.
    pub field_paths: Vec<String>,
}

/// Per-operation overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationConfig {
    /// Force the operation kind instead of inferring it from the name.
    pub operation_type: Option<OpType>,
    /// Force the resource the operation belongs to.
    pub resource_name: Option<String>,
    /// Input members always set to a literal value.
    pub override_values: BTreeMap<String, String>,
    /// Hand-written method that replaces the synthesized call.
    pub custom_implementation: Option<String>,
    /// Hand-written method invoked after the synthesized output code.
    pub set_output_custom_method_name: Option<String>,
}

/// Member names of the resource value that hold Spec and Status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixConfig {
    /// Spec member (default `spec`).
    pub spec_field: String,
    /// Status member (default `status`).
    pub status_field: String,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            spec_field: "spec".to_owned(),
            status_field: "status".to_owned(),
        }
    }
}

/// Module paths that synthesized code refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct EmitConfig {
    /// Module holding the service SDK request and response types.
    #[builder(default = String::from("svcsdk"))]
    pub sdk_module: String,

    /// Module holding the generated resource types.
    #[builder(default = String::from("svcapitypes"))]
    pub apis_module: String,

    /// Module holding the common resource metadata types.
    #[builder(default = String::from("ackv1alpha1"))]
    pub metadata_module: String,

    /// Module holding the runtime error values.
    #[builder(default = String::from("ackerr"))]
    pub errors_module: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Supported configuration document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML.
    Yaml,
    /// TOML.
    Toml,
    /// JSON.
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?format, "loading generator config");
        Self::from_str_with_format(&text, format)
    }

    /// Parse and validate a configuration document.
    pub fn from_str_with_format(text: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: Self = match format {
            // An empty YAML document is a valid, empty configuration.
            ConfigFormat::Yaml if text.trim().is_empty() => Self::default(),
            ConfigFormat::Yaml => serde_yaml::from_str(text)?,
            ConfigFormat::Toml => toml::from_str(text)?,
            ConfigFormat::Json => serde_json::from_str(text)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check rules the document structure cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in &self.ignore.field_paths {
            if split_field_path(path).is_none() {
                return Err(ConfigError::Invalid {
                    reason: format!("ignored field path '{path}' is not of the form Shape.Member"),
                });
            }
        }
        for (name, resource) in &self.resources {
            if let Some(exceptions) = &resource.exceptions {
                if let Some(status) = exceptions.errors.keys().find(|s| !(100..=599).contains(*s)) {
                    return Err(ConfigError::Invalid {
                        reason: format!("resource {name}: {status} is not an HTTP status code"),
                    });
                }
            }
            for (field, cfg) in &resource.fields {
                if cfg.is_attribute && cfg.from.is_some() {
                    return Err(ConfigError::Invalid {
                        reason: format!(
                            "resource {name}: field {field} cannot be both an attribute and sourced from an operation"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Rules for the named resource, if any.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.get(name)
    }

    /// Overrides for the named operation, if any.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationConfig> {
        self.operations.get(name)
    }

    /// Whether the operation is ignored.
    #[must_use]
    pub fn is_ignored_operation(&self, name: &str) -> bool {
        self.ignore.operations.iter().any(|o| o == name)
    }

    /// Whether the resource is ignored. An empty name is always ignored.
    #[must_use]
    pub fn is_ignored_resource(&self, name: &str) -> bool {
        name.is_empty() || self.ignore.resource_names.iter().any(|r| r == name)
    }

    /// Whether the shape is ignored.
    #[must_use]
    pub fn is_ignored_shape(&self, name: &str) -> bool {
        self.ignore.shape_names.iter().any(|s| s == name)
    }

    /// Whether `member` of structure `shape` is ignored.
    #[must_use]
    pub fn is_ignored_member(&self, shape: &str, member: &str, target: &str) -> bool {
        self.is_ignored_shape(target)
            || self
                .ignore
                .field_paths
                .iter()
                .filter_map(|p| split_field_path(p))
                .any(|(s, m)| s == shape && m == member)
    }

    /// Field name for an input member after renames.
    #[must_use]
    pub fn input_field_name<'a>(&'a self, resource: &str, operation: &str, member: &'a str) -> &'a str {
        self.resource(resource)
            .and_then(|r| r.input_rename(operation, member))
            .or_else(|| self.global_rename(operation, member))
            .unwrap_or(member)
    }

    /// Field name for an output member after renames.
    #[must_use]
    pub fn output_field_name<'a>(&'a self, resource: &str, operation: &str, member: &'a str) -> &'a str {
        self.resource(resource)
            .and_then(|r| r.output_rename(operation, member))
            .or_else(|| self.global_rename(operation, member))
            .unwrap_or(member)
    }

    fn global_rename(&self, operation: &str, member: &str) -> Option<&str> {
        self.renames
            .get(operation)
            .and_then(|m| m.get(member))
            .map(String::as_str)
    }

    /// Statement emitted when ReadMany finds no matching element.
    #[must_use]
    pub fn not_found_return(&self) -> String {
        self.set_many_output_notfound_err_return
            .clone()
            .unwrap_or_else(|| format!("return Err({}::Error::NotFound);", self.emit.errors_module))
    }
}

fn split_field_path(path: &str) -> Option<(&str, &str)> {
    let (shape, member) = path.split_once('.')?;
    if shape.is_empty() || member.is_empty() || member.contains('.') {
        return None;
    }
    Some((shape, member))
}
