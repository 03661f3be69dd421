//! Required-field presence checks.

use super::Synthesizer;
use crate::error::{GenerateError, GenerateResult};
use crate::op::OpType;

/// Members a single-attribute SetAttributes call fills per attribute.
const SINGLE_ATTRIBUTE_MEMBERS: [&str; 2] = ["AttributeName", "AttributeValue"];

impl Synthesizer<'_> {
    /// Boolean expression over the resource `source` that is true when any
    /// field the `op_type` request requires is unset.
    ///
    /// Members filled by the attribute map, by configured literals or by the
    /// single-attribute protocol are not checked. Evaluates to `false` when
    /// nothing is required.
    pub fn required_fields_missing(&self, op_type: OpType, source: &str) -> GenerateResult<String> {
        let op = self.operation(op_type)?;
        let Some(input_ref) = &op.input else {
            return Ok("false".to_owned());
        };
        let (input, body) = self.structure(input_ref, &format!("{} input", op.name))?;
        let attributes = self.crd.policy.attributes.as_ref();
        let single_attribute = attributes.is_some_and(|a| a.set_single_attribute);
        let overrides = self.config.operation(&op.name).map(|c| &c.override_values);

        let mut checks = Vec::new();
        for (member, member_ref) in &body.members {
            if !member_ref.required || self.is_ignored(&input.name, member, member_ref) {
                continue;
            }
            let constant = overrides.is_some_and(|o| o.contains_key(member))
                || (op_type == OpType::GetAttributes
                    && attributes.is_some_and(|a| a.get_input_overrides.contains_key(member)));
            if constant
                || self.crd.policy.is_unpacked_map(member)
                || (single_attribute && SINGLE_ATTRIBUTE_MEMBERS.contains(&member.as_str()))
            {
                continue;
            }

            let field_name = self.config.input_field_name(self.resource(), &op.name, member);
            match self.crd.field(field_name) {
                Some((side, field)) => {
                    checks.push(format!("{source}.{}.{}.is_none()", self.prefix(side), field.names.field_ident()));
                }
                None if self.crd.policy.is_primary_arn(field_name) => {
                    checks.push(format!("{}.is_none()", self.arn_accessor(source)));
                }
                None => {
                    return Err(GenerateError::UnmappedRequiredMember {
                        shape: input.name.clone(),
                        member: member.clone(),
                    });
                }
            }
        }
        if checks.is_empty() {
            return Ok("false".to_owned());
        }
        Ok(checks.join(" || "))
    }
}
