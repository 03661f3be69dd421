//! Resource to request.

use ackgen_model::{ScalarKind, ShapeKind, ShapeRef};
use tracing::debug;

use super::path::VarPath;
use super::walk::Walk;
use super::{Direction, Synthesizer, member_ident};
use crate::error::{GenerateError, GenerateResult};
use crate::op::OpType;

impl Synthesizer<'_> {
    /// Code filling the request `target` from the resource `source` for the
    /// resource's `op_type` operation.
    ///
    /// Members are visited in declaration order. Each one is, in turn, a
    /// configured literal, the unpacked attribute map, a Spec or Status
    /// field, or the metadata ARN; members matching none are left unset.
    pub fn set_input(&self, op_type: OpType, source: &str, target: &str, indent: usize) -> GenerateResult<String> {
        let op = self.operation(op_type)?;
        let attributes = self.crd.policy.attributes.as_ref();
        if op_type == OpType::SetAttributes && attributes.is_some_and(|a| a.set_single_attribute) {
            debug!(resource = %self.resource(), op = %op.name, "single-attribute writes are not synthesized");
            return Ok(String::new());
        }
        let Some(input_ref) = &op.input else {
            return Ok(String::new());
        };
        let (input, body) = self.structure(input_ref, &format!("{} input", op.name))?;
        let overrides = self.config.operation(&op.name).map(|c| &c.override_values);

        let mut walk = Walk::new(self, Direction::ToWire);
        walk.enter(&input.name)?;
        for (index, (member, member_ref)) in body.members.iter().enumerate() {
            if self.is_ignored(&input.name, member, member_ref) {
                continue;
            }
            let path = VarPath::root().member(index);
            let target_field = format!("{target}.{}", member_ident(member));

            if let Some(value) = overrides.and_then(|o| o.get(member)) {
                let literal = self.literal(member_ref, std::slice::from_ref(value))?;
                walk.line(indent, format_args!("{target_field} = Some({literal});"))?;
                continue;
            }
            if op_type == OpType::GetAttributes {
                if let Some(values) = attributes.and_then(|a| a.get_input_overrides.get(member)) {
                    let literal = self.literal(member_ref, values)?;
                    walk.line(indent, format_args!("{target_field} = Some({literal});"))?;
                    continue;
                }
            }
            if self.crd.policy.is_unpacked_map(member) {
                self.attributes_input(&mut walk, source, &target_field, &path, indent)?;
                continue;
            }

            let field_name = self.config.input_field_name(self.resource(), &op.name, member);
            match self.crd.field(field_name) {
                Some((_, field)) if field.attribute.is_some() => {}
                Some((side, field)) => {
                    let source_field = format!("{source}.{}.{}", self.prefix(side), field.names.field_ident());
                    walk.assign_present(member_ref, &source_field, &target_field, &path, false, indent)?;
                }
                None if self.crd.policy.is_primary_arn(field_name) => {
                    walk.line(indent, format_args!("if let Some({path}) = {} {{", self.arn_accessor(source)))?;
                    walk.line(indent + 1, format_args!("{target_field} = Some({path}.to_string());"))?;
                    walk.line(indent, "}")?;
                }
                None => debug!(
                    resource = %self.resource(),
                    op = %op.name,
                    member = %member,
                    "input member has no resource field"
                ),
            }
        }
        walk.leave();
        Ok(walk.finish())
    }

    /// Literal expression for configured constant values.
    fn literal(&self, shape_ref: &ShapeRef, values: &[String]) -> GenerateResult<String> {
        let shape = self
            .graph
            .resolve(shape_ref)
            .ok_or_else(|| GenerateError::nil_ref(&shape_ref.shape, "override value"))?;
        let joined = values.join(",");
        let literal = match &shape.kind {
            ShapeKind::List { member } => {
                let items = values
                    .iter()
                    .map(|v| self.literal(member, std::slice::from_ref(v)))
                    .collect::<GenerateResult<Vec<_>>>()?;
                format!("vec![{}]", items.join(", "))
            }
            ShapeKind::Scalar(ScalarKind::String) | ShapeKind::Enum(_) => format!("{joined:?}.to_owned()"),
            ShapeKind::Scalar(
                ScalarKind::Boolean | ScalarKind::Integer | ScalarKind::Long | ScalarKind::Float | ScalarKind::Double,
            ) => joined,
            _ => {
                return Err(GenerateError::UnexpectedShape {
                    shape: shape.name.clone(),
                    expected: "scalar or list of scalars",
                });
            }
        };
        Ok(literal)
    }
}
