//! Response to resource.

use ackgen_model::{Operation, ShapeKind, ShapeRef, StructureShape};
use tracing::{debug, warn};

use super::path::VarPath;
use super::walk::Walk;
use super::{Direction, Synthesizer, member_ident};
use crate::crd::FieldSide;
use crate::error::{GenerateError, GenerateResult};
use crate::op::OpType;

/// Binding for the inner structure of an unwrapped output.
const WRAPPER_VAR: &str = "wrapper";

impl<'a> Synthesizer<'a> {
    /// Code copying the response `source` of the resource's `op_type`
    /// operation into the resource `target`.
    ///
    /// Point reads (ReadOne, GetAttributes, ReadMany) also refresh Spec;
    /// other operations only write Status. A List operation scans its result
    /// for the element matching the resource.
    pub fn set_output(&self, op_type: OpType, source: &str, target: &str, indent: usize) -> GenerateResult<String> {
        let op = self.operation(op_type)?;
        if op_type == OpType::List {
            return self.read_many_output(op, source, target, indent);
        }
        let Some(output_ref) = &op.output else {
            return Ok(String::new());
        };
        let context = format!("{} output", op.name);
        let (outer, outer_body) = self.structure(output_ref, &context)?;
        let spec_update = matches!(op_type, OpType::Get | OpType::GetAttributes);
        let wrapper = self.crd.policy.wrapper_member(self.graph, &outer_body.members);
        let (output, body) = match wrapper {
            Some((_, inner_ref)) => self.structure(inner_ref, &context)?,
            None => (outer, outer_body),
        };

        let mut walk = Walk::new(self, Direction::ToResource);
        walk.enter(&outer.name)?;
        let (source, inner_indent) = match wrapper {
            Some((member, _)) => {
                walk.line(
                    indent,
                    format_args!("if let Some({WRAPPER_VAR}) = &{source}.{} {{", member_ident(member)),
                )?;
                walk.enter(&output.name)?;
                (WRAPPER_VAR, indent + 1)
            }
            None => (source, indent),
        };

        let members = OutputMembers {
            op,
            shape: &output.name,
            body,
            source,
            target,
            spec_update,
        };
        self.output_members(&mut walk, &members, &VarPath::root(), inner_indent)?;
        if wrapper.is_some() {
            walk.line(indent, "}")?;
        }
        Ok(walk.finish())
    }

    fn output_members(
        &self,
        walk: &mut Walk<'_, '_>,
        members: &OutputMembers<'_>,
        root: &VarPath,
        indent: usize,
    ) -> GenerateResult<()> {
        let OutputMembers {
            op,
            shape,
            body,
            source,
            target,
            spec_update,
        } = *members;
        for (index, (member, member_ref)) in body.members.iter().enumerate() {
            if self.is_ignored(shape, member, member_ref) {
                continue;
            }
            let path = root.member(index);
            let source_field = format!("{source}.{}", member_ident(member));
            if self.crd.policy.is_unpacked_map(member) {
                self.attributes_output(walk, &source_field, target, &path, spec_update, indent)?;
                continue;
            }

            let field_name = self.config.output_field_name(self.resource(), &op.name, member);
            match self.crd.field(field_name) {
                Some((_, field)) if field.attribute.is_some() => {}
                Some((FieldSide::Spec, _)) if !spec_update => {}
                Some((side, field)) => {
                    let target_field = format!("{target}.{}.{}", self.prefix(side), field.names.field_ident());
                    walk.assign_present(member_ref, &source_field, &target_field, &path, false, indent)?;
                }
                None if self.crd.policy.is_primary_arn(field_name) => {
                    walk.line(indent, format_args!("if let Some({path}) = &{source_field} {{"))?;
                    walk.line(indent + 1, self.assign_arn(target, &path.to_string()))?;
                    walk.line(indent, "}")?;
                }
                None => debug!(
                    resource = %self.resource(),
                    op = %op.name,
                    member = %member,
                    "output member has no resource field"
                ),
            }
        }
        Ok(())
    }

    /// Scan the listed elements for the one matching the resource's known
    /// identifying fields and adopt it, or run the not-found statement.
    fn read_many_output(&self, op: &Operation, source: &str, target: &str, indent: usize) -> GenerateResult<String> {
        let Some(output_ref) = &op.output else {
            return self.unscannable(op, "no output");
        };
        let context = format!("{} output", op.name);
        let (output, body) = self.structure(output_ref, &context)?;
        let Some((list_member, elem_ref)) = self.first_list_member(body) else {
            return self.unscannable(op, "no list member");
        };
        let elem_shape = self
            .graph
            .resolve(elem_ref)
            .ok_or_else(|| GenerateError::nil_ref(&elem_ref.shape, format!("{context} element")))?;
        let Some(elem_body) = elem_shape.as_structure() else {
            return self.unscannable(op, "list elements are not structures");
        };

        let elem = VarPath::root().elem();
        let mut walk = Walk::new(self, Direction::ToResource);
        walk.enter(&output.name)?;
        walk.enter(&elem_shape.name)?;
        walk.line(indent, "let mut found = false;")?;
        walk.line(
            indent,
            format_args!("for {elem} in {source}.{}.iter().flatten() {{", member_ident(list_member)),
        )?;
        self.match_checks(&mut walk, op, elem_body, &elem, target, indent + 1)?;
        let elem_source = elem.to_string();
        let members = OutputMembers {
            op,
            shape: &elem_shape.name,
            body: elem_body,
            source: &elem_source,
            target,
            spec_update: true,
        };
        self.output_members(&mut walk, &members, &elem, indent + 1)?;
        walk.line(indent + 1, "found = true;")?;
        walk.line(indent + 1, "break;")?;
        walk.line(indent, "}")?;
        walk.line(indent, "if !found {")?;
        walk.line(indent + 1, self.config.not_found_return())?;
        walk.line(indent, "}")?;
        Ok(walk.finish())
    }

    /// Without a point read the scan is the only not-found signal, so an
    /// output that cannot be scanned fails the run.
    fn unscannable(&self, op: &Operation, reason: &'static str) -> GenerateResult<String> {
        if self.crd.ops.read_one.is_none() && self.crd.ops.get_attributes.is_none() {
            return Err(GenerateError::UnscannableList {
                resource: self.resource().to_owned(),
                op: op.name.clone(),
                reason,
            });
        }
        warn!(op = %op.name, reason, "list operation output skipped");
        Ok(String::new())
    }

    fn first_list_member(&self, body: &'a StructureShape) -> Option<(&'a String, &'a ShapeRef)> {
        body.members.iter().find_map(|(name, member_ref)| {
            match self.graph.resolve(member_ref).map(|s| &s.kind) {
                Some(ShapeKind::List { member }) => Some((name, member)),
                _ => None,
            }
        })
    }

    /// Skip the element when an identifying field is known and differs.
    fn match_checks(
        &self,
        walk: &mut Walk<'_, '_>,
        op: &Operation,
        elem_body: &StructureShape,
        elem: &VarPath,
        target: &str,
        indent: usize,
    ) -> GenerateResult<()> {
        let configured = self.crd.config.list_match_fields();
        let match_fields: Vec<&str> = if configured.is_empty() {
            self.crd
                .name_field()
                .map(|f| f.names.original.as_str())
                .into_iter()
                .collect()
        } else {
            configured.iter().map(String::as_str).collect()
        };

        for name in match_fields {
            let found = elem_body
                .members
                .keys()
                .enumerate()
                .find(|(_, member)| self.config.output_field_name(self.resource(), &op.name, member) == name);
            let (Some((index, member)), Some((side, field))) = (found, self.crd.field(name)) else {
                debug!(resource = %self.resource(), field = %name, "match field not present in list element");
                continue;
            };
            let binding = elem.member(index);
            let known = format!("{target}.{}.{}", self.prefix(side), field.names.field_ident());
            walk.line(indent, format_args!("if let Some({binding}) = &{elem}.{} {{", member_ident(member)))?;
            walk.line(
                indent + 1,
                format_args!("if {known}.as_ref().is_some_and(|known| known != {binding}) {{"),
            )?;
            walk.line(indent + 2, "continue;")?;
            walk.line(indent + 1, "}")?;
            walk.line(indent, "}")?;
        }
        Ok(())
    }
}

/// One structure level of response members to copy.
#[derive(Debug, Clone, Copy)]
struct OutputMembers<'o> {
    op: &'o Operation,
    shape: &'o str,
    body: &'o StructureShape,
    source: &'o str,
    target: &'o str,
    spec_update: bool,
}
