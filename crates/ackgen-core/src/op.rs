//! Operation verb classification.
//!
//! Operations are matched to resources by naming convention: the leading
//! verb of the operation name gives its [`OpType`], the remainder names the
//! resource. Plural remainders turn point operations into batch or list
//! operations (`DescribeQueues` lists `Queue`s).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OpType {
    /// Verb not recognized.
    Unknown,
    /// Creates a single resource.
    Create,
    /// Creates several resources in one call.
    CreateBatch,
    /// Reads a single resource.
    Get,
    /// Reads many resources.
    List,
    /// Updates a resource.
    Update,
    /// Deletes a resource.
    Delete,
    /// Creates or fully replaces a resource.
    Replace,
    /// Reads a resource's attribute map.
    GetAttributes,
    /// Writes a resource's attribute map.
    SetAttributes,
}

impl OpType {
    /// Canonical string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Create => "Create",
            Self::CreateBatch => "CreateBatch",
            Self::Get => "Get",
            Self::List => "List",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Replace => "Replace",
            Self::GetAttributes => "GetAttributes",
            Self::SetAttributes => "SetAttributes",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let op = match normalized.as_str() {
            "create" => Self::Create,
            "createbatch" => Self::CreateBatch,
            "get" | "readone" => Self::Get,
            "list" | "readmany" => Self::List,
            "update" => Self::Update,
            "delete" => Self::Delete,
            "replace" => Self::Replace,
            "getattributes" => Self::GetAttributes,
            "setattributes" => Self::SetAttributes,
            _ => return Err(format!("unknown operation type: {s}")),
        };
        Ok(op)
    }
}

impl TryFrom<String> for OpType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OpType> for String {
    fn from(op: OpType) -> Self {
        op.as_str().to_owned()
    }
}

/// Classify an operation name into its verb and the resource it targets.
#[must_use]
pub fn classify(op_name: &str) -> (OpType, String) {
    if let Some(rest) = op_name.strip_prefix("CreateOrUpdate") {
        return (OpType::Replace, rest.to_owned());
    }
    if let Some(rest) = op_name
        .strip_prefix("BatchCreate")
        .or_else(|| op_name.strip_prefix("CreateBatch"))
    {
        return (OpType::CreateBatch, singularize(rest));
    }
    if let Some(rest) = op_name.strip_prefix("Create") {
        if is_plural(rest) {
            return (OpType::CreateBatch, singularize(rest));
        }
        return (OpType::Create, rest.to_owned());
    }
    if let Some(rest) = op_name
        .strip_prefix("Modify")
        .or_else(|| op_name.strip_prefix("Update"))
    {
        return (OpType::Update, rest.to_owned());
    }
    if let Some(rest) = op_name.strip_prefix("Delete") {
        return (OpType::Delete, rest.to_owned());
    }
    if let Some(rest) = op_name.strip_prefix("Describe") {
        return point_or_list(rest);
    }
    if let Some(rest) = op_name.strip_prefix("Get") {
        if let Some(res) = rest.strip_suffix("Attributes").filter(|r| !r.is_empty()) {
            return (OpType::GetAttributes, res.to_owned());
        }
        return point_or_list(rest);
    }
    if let Some(rest) = op_name.strip_prefix("List") {
        return (OpType::List, singularize(rest));
    }
    if let Some(res) = op_name
        .strip_prefix("Set")
        .and_then(|rest| rest.strip_suffix("Attributes"))
        .filter(|r| !r.is_empty())
    {
        return (OpType::SetAttributes, res.to_owned());
    }
    (OpType::Unknown, op_name.to_owned())
}

fn point_or_list(rest: &str) -> (OpType, String) {
    if is_plural(rest) {
        (OpType::List, singularize(rest))
    } else {
        (OpType::Get, rest.to_owned())
    }
}

const IRREGULAR: &[(&str, &str)] = &[
    ("Aliases", "Alias"),
    ("Statuses", "Status"),
    ("Indices", "Index"),
    ("Indexes", "Index"),
    ("People", "Person"),
];

const UNCOUNTABLE: &[&str] = &["Data", "Metadata", "Information", "Equipment", "Series"];

/// Whether the trailing word of a CamelCase name is plural.
#[must_use]
pub fn is_plural(name: &str) -> bool {
    let word = last_word(name);
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return false;
    }
    if IRREGULAR.iter().any(|(plural, _)| *plural == word) {
        return true;
    }
    word.len() > 1
        && word.ends_with('s')
        && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is"))
}

/// Singular form of a CamelCase name, inflecting only its trailing word.
#[must_use]
pub fn singularize(name: &str) -> String {
    if !is_plural(name) {
        return name.to_owned();
    }
    let word = last_word(name);
    let stem = &name[..name.len() - word.len()];
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return format!("{stem}{singular}");
    }
    let singular = if let Some(base) = word.strip_suffix("ies").filter(|b| !b.is_empty()) {
        format!("{base}y")
    } else if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        word[..word.len() - 2].to_owned()
    } else {
        word[..word.len() - 1].to_owned()
    };
    format!("{stem}{singular}")
}

/// Trailing capitalized word of a CamelCase name (`"DBInstances"` -> `"Instances"`).
fn last_word(name: &str) -> &str {
    let start = name
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_ascii_uppercase())
        .map_or(0, |(i, _)| i);
    &name[start..]
}
