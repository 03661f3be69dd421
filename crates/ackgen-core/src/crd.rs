//! Derived resource model.
//!
//! A [`Crd`] is one logical API resource: the operations that manage it, the
//! Spec fields a user sets and the Status fields the service reports. The
//! per-resource special cases (attribute map unpacking, primary ARN routing,
//! output wrapper unwrapping) live in [`ResourcePolicy`], which both the
//! deriver and the code synthesizer consult.

use std::collections::BTreeMap;

use ackgen_model::{Operation, ShapeGraph, ShapeRef};

use crate::config::{AttributeFormat, GeneratorConfig, ResourceConfig};
use crate::names::Names;
use crate::op::OpType;

/// Member name of the string-to-string map that masquerades as fields.
pub const ATTRIBUTES_MEMBER: &str = "Attributes";

/// A field unpacked from the resource's attribute map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    /// Key in the attribute map.
    pub key: String,
    /// Wire encoding of the value.
    pub format: AttributeFormat,
}

/// One Spec or Status field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Case variants of the field name.
    pub names: Names,
    /// Rust type of the field value, without the `Option` wrapper.
    pub rust_type: String,
    /// Backing shape, absent for attribute and config-typed fields.
    pub shape_ref: Option<ShapeRef>,
    /// Whether the source member is declared required.
    pub required: bool,
    /// Set when the field is unpacked from the attribute map.
    pub attribute: Option<AttributeBinding>,
}

/// The operations that manage a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ops {
    /// Create operation.
    pub create: Option<Operation>,
    /// Point read.
    pub read_one: Option<Operation>,
    /// List read.
    pub read_many: Option<Operation>,
    /// Update.
    pub update: Option<Operation>,
    /// Delete.
    pub delete: Option<Operation>,
    /// Attribute map read.
    pub get_attributes: Option<Operation>,
    /// Attribute map write.
    pub set_attributes: Option<Operation>,
}

impl Ops {
    /// The operation for `op_type`, if the resource has one.
    #[must_use]
    pub fn get(&self, op_type: OpType) -> Option<&Operation> {
        self.slot(op_type).and_then(Option::as_ref)
    }

    pub(crate) fn slot_mut(&mut self, op_type: OpType) -> Option<&mut Option<Operation>> {
        let slot = match op_type {
            OpType::Create => &mut self.create,
            OpType::Get => &mut self.read_one,
            OpType::List => &mut self.read_many,
            OpType::Update => &mut self.update,
            OpType::Delete => &mut self.delete,
            OpType::GetAttributes => &mut self.get_attributes,
            OpType::SetAttributes => &mut self.set_attributes,
            OpType::Unknown | OpType::CreateBatch | OpType::Replace => return None,
        };
        Some(slot)
    }

    fn slot(&self, op_type: OpType) -> Option<&Option<Operation>> {
        let slot = match op_type {
            OpType::Create => &self.create,
            OpType::Get => &self.read_one,
            OpType::List => &self.read_many,
            OpType::Update => &self.update,
            OpType::Delete => &self.delete,
            OpType::GetAttributes => &self.get_attributes,
            OpType::SetAttributes => &self.set_attributes,
            OpType::Unknown | OpType::CreateBatch | OpType::Replace => return None,
        };
        Some(slot)
    }
}

/// One configured key of the attribute map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeKey {
    /// Map key, which is also the field name.
    pub key: String,
    /// Wire encoding.
    pub format: AttributeFormat,
    /// Reported by the service; lives in Status.
    pub read_only: bool,
    /// Carries the owning account ID.
    pub owner_account_id: bool,
    /// Carries the resource's primary ARN.
    pub primary_arn: bool,
}

/// How the attribute map is unpacked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributesPolicy {
    /// Keys sorted by name.
    pub keys: Vec<AttributeKey>,
    /// SetAttributes takes one name/value pair per call.
    pub set_single_attribute: bool,
    /// Constant GetAttributes input members.
    pub get_input_overrides: BTreeMap<String, Vec<String>>,
}

/// Per-resource transformation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePolicy {
    /// Attribute map unpacking, when enabled.
    pub attributes: Option<AttributesPolicy>,
    /// Lower-cased member names treated as the primary ARN.
    pub arn_members: Vec<String>,
    /// Force (`Some(true)`), suppress (`Some(false)`) or detect output unwrapping.
    pub unwrap_output: Option<bool>,
    /// Route owner-account attributes to the common metadata slot.
    pub include_metadata: bool,
}

impl ResourcePolicy {
    /// Build the policy for a resource from its configuration.
    #[must_use]
    pub fn new(resource_name: &str, config: &GeneratorConfig) -> Self {
        let rc = config.resource(resource_name);
        let mut arn_members = vec!["arn".to_owned(), format!("{}arn", resource_name.to_lowercase())];
        if let Some(rc) = rc {
            arn_members.extend(
                rc.fields
                    .iter()
                    .filter(|(_, f)| f.is_arn_primary_key)
                    .map(|(name, _)| name.to_lowercase()),
            );
        }

        let mut policy = Self {
            attributes: None,
            arn_members,
            unwrap_output: rc.and_then(|r| r.unwrap_output),
            include_metadata: config.include_ack_metadata,
        };
        if let Some(rc) = rc.filter(|r| r.unpacks_attributes()) {
            policy.attributes = Some(policy.attributes_policy(rc));
        }
        policy
    }

    fn attributes_policy(&self, rc: &ResourceConfig) -> AttributesPolicy {
        // BTreeMap iteration keeps keys sorted.
        let keys = rc
            .fields
            .iter()
            .filter(|(_, f)| f.is_attribute)
            .map(|(name, f)| AttributeKey {
                key: name.clone(),
                format: f.format,
                read_only: f.is_read_only,
                owner_account_id: f.contains_owner_account_id,
                primary_arn: self.is_primary_arn(name),
            })
            .collect();
        let unpack = rc.unpack_attributes_map.as_ref();
        AttributesPolicy {
            keys,
            set_single_attribute: rc.set_attributes_single_attribute(),
            get_input_overrides: unpack
                .and_then(|u| u.get_attributes_input.as_ref())
                .map(|g| {
                    g.overrides
                        .iter()
                        .map(|(member, c)| (member.clone(), c.values.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Whether `name` identifies the resource's primary ARN.
    #[must_use]
    pub fn is_primary_arn(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.arn_members.iter().any(|a| *a == lower)
    }

    /// Whether `member` is the attribute map this policy unpacks.
    #[must_use]
    pub fn is_unpacked_map(&self, member: &str) -> bool {
        self.attributes.is_some() && member == ATTRIBUTES_MEMBER
    }

    /// The single member to unwrap from an output structure, if the wrapper
    /// rule applies to it.
    #[must_use]
    pub fn wrapper_member<'a>(
        &self,
        graph: &ShapeGraph,
        members: &'a indexmap::IndexMap<String, ShapeRef>,
    ) -> Option<(&'a String, &'a ShapeRef)> {
        if self.unwrap_output == Some(false) || members.len() != 1 {
            return None;
        }
        let (name, member_ref) = members.first()?;
        let is_structure = graph.resolve(member_ref).is_some_and(|s| s.is_structure());
        (is_structure || self.unwrap_output == Some(true)).then_some((name, member_ref))
    }
}

/// Which side of the resource a field lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSide {
    /// Desired state.
    Spec,
    /// Observed state.
    Status,
}

/// One derived resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crd {
    /// Case variants of the resource name.
    pub names: Names,
    /// Managing operations.
    pub ops: Ops,
    /// Desired-state fields keyed by field name.
    pub spec_fields: BTreeMap<String, Field>,
    /// Observed-state fields keyed by field name.
    pub status_fields: BTreeMap<String, Field>,
    /// Create-output member routed to the metadata ARN slot, if any.
    pub primary_arn_member: Option<String>,
    /// Special-case rules.
    pub policy: ResourcePolicy,
    /// Resource configuration (default when none is configured).
    pub config: ResourceConfig,
}

impl Crd {
    /// Look a field up in Spec first, then Status.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(FieldSide, &Field)> {
        self.spec_fields
            .get(name)
            .map(|f| (FieldSide::Spec, f))
            .or_else(|| self.status_fields.get(name).map(|f| (FieldSide::Status, f)))
    }

    /// The Spec field naming the resource: `Name` or `<Resource>Name`.
    #[must_use]
    pub fn name_field(&self) -> Option<&Field> {
        let qualified = format!("{}Name", self.names.original);
        self.spec_fields
            .get("Name")
            .or_else(|| self.spec_fields.get(&qualified))
    }

    /// Whether the resource unpacks its attribute map.
    #[must_use]
    pub fn unpacks_attributes(&self) -> bool {
        self.policy.attributes.is_some()
    }
}
