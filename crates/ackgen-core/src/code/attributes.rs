//! Attribute map unpacking.
//!
//! A resource that unpacks its attribute map has one field per configured
//! key. Reading walks the keys and parses each present value with the key's
//! format; writing formats each set Spec field back into a string map.

use super::path::VarPath;
use super::walk::Walk;
use super::{Synthesizer, member_ident};
use crate::config::AttributeFormat;
use crate::crd::{AttributeKey, FieldSide};
use crate::error::GenerateResult;
use crate::types::MAP_IMPORT_PATH;

impl Synthesizer<'_> {
    /// Build the attribute map from Spec fields and assign it to `target_field`.
    pub(super) fn attributes_input(
        &self,
        walk: &mut Walk<'_, '_>,
        source: &str,
        target_field: &str,
        path: &VarPath,
        indent: usize,
    ) -> GenerateResult<()> {
        let Some(policy) = &self.crd.policy.attributes else {
            return Ok(());
        };
        let val = path.val();
        let spec = self.prefix(FieldSide::Spec);
        walk.line(indent, format_args!("let mut {val} = {MAP_IMPORT_PATH}::new();"))?;
        for (index, key) in policy.keys.iter().enumerate() {
            if key.read_only || key.primary_arn {
                continue;
            }
            let binding = path.member(index);
            let formatted = match key.format {
                AttributeFormat::String => format!("{binding}.clone()"),
                AttributeFormat::Integer | AttributeFormat::Boolean => format!("{binding}.to_string()"),
                AttributeFormat::DurationSeconds => format!("{binding}.as_secs().to_string()"),
            };
            walk.line(
                indent,
                format_args!("if let Some({binding}) = &{source}.{spec}.{} {{", member_ident(&key.key)),
            )?;
            walk.line(indent + 1, format_args!("{val}.insert({:?}.to_owned(), {formatted});", key.key))?;
            walk.line(indent, "}")?;
        }
        walk.line(indent, format_args!("if !{val}.is_empty() {{"))?;
        walk.line(indent + 1, format_args!("{target_field} = Some({val});"))?;
        walk.line(indent, "}")
    }

    /// Parse each configured key out of the attribute map at `source_field`.
    ///
    /// Spec keys are written only when `spec_update` is set; the primary ARN
    /// and owner account go to the metadata slot.
    pub(super) fn attributes_output(
        &self,
        walk: &mut Walk<'_, '_>,
        source_field: &str,
        target: &str,
        path: &VarPath,
        spec_update: bool,
        indent: usize,
    ) -> GenerateResult<()> {
        let Some(policy) = &self.crd.policy.attributes else {
            return Ok(());
        };
        walk.line(indent, format_args!("if let Some({path}) = &{source_field} {{"))?;
        for (index, key) in policy.keys.iter().enumerate() {
            let binding = path.member(index);
            let statements = self.attribute_statements(key, &binding, target, spec_update);
            if statements.is_empty() {
                continue;
            }
            walk.line(indent + 1, format_args!("if let Some({binding}) = {path}.get({:?}) {{", key.key))?;
            for (depth, statement) in statements {
                walk.line(indent + 2 + depth, statement)?;
            }
            walk.line(indent + 1, "}")?;
        }
        walk.line(indent, "}")
    }

    /// Statements, with relative depth, consuming one `&String` attribute value.
    fn attribute_statements(
        &self,
        key: &AttributeKey,
        binding: &VarPath,
        target: &str,
        spec_update: bool,
    ) -> Vec<(usize, String)> {
        let metadata_module = &self.config.emit.metadata_module;
        if key.primary_arn {
            return vec![(0, self.assign_arn(target, &binding.to_string()))];
        }

        let mut statements = Vec::new();
        if key.owner_account_id && self.crd.policy.include_metadata {
            statements.push((
                0,
                format!(
                    "{}.owner_account_id = Some({metadata_module}::AwsAccountId::from({binding}.clone()));",
                    self.metadata_slot(target)
                ),
            ));
        }
        let side = if key.read_only { FieldSide::Status } else { FieldSide::Spec };
        if side == FieldSide::Spec && !spec_update {
            return statements;
        }

        let field = format!("{target}.{}.{}", self.prefix(side), member_ident(&key.key));
        let parsed = binding.val();
        let parse = |ty: &str, value: String| {
            [
                (0, format!("if let Ok({parsed}) = {binding}.parse::<{ty}>() {{")),
                (1, format!("{field} = Some({value});")),
                (0, "}".to_owned()),
            ]
        };
        match key.format {
            AttributeFormat::String => statements.push((0, format!("{field} = Some({binding}.clone());"))),
            AttributeFormat::Integer => statements.extend(parse("i64", parsed.clone())),
            AttributeFormat::Boolean => statements.extend(parse("bool", parsed.clone())),
            AttributeFormat::DurationSeconds => {
                statements.extend(parse("u64", format!("std::time::Duration::from_secs({parsed})")));
            }
        }
        statements
    }
}
