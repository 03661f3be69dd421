//! Recursive value conversion.

use std::fmt::{Display, Write};

use ackgen_model::{ScalarKind, Shape, ShapeKind, ShapeRef, StructureShape};

use super::path::VarPath;
use super::{Direction, Synthesizer, member_ident, pad};
use crate::error::{GenerateError, GenerateResult};
use crate::types::{MAP_IMPORT_PATH, TIME_TYPE};

/// Output buffer plus the structures on the active conversion path.
#[derive(Debug)]
pub(super) struct Walk<'s, 'a> {
    synth: &'s Synthesizer<'a>,
    direction: Direction,
    active: Vec<String>,
    out: String,
}

impl<'s, 'a> Walk<'s, 'a> {
    pub(super) fn new(synth: &'s Synthesizer<'a>, direction: Direction) -> Self {
        Self {
            synth,
            direction,
            active: Vec::new(),
            out: String::new(),
        }
    }

    pub(super) fn finish(self) -> String {
        self.out
    }

    pub(super) fn line(&mut self, indent: usize, text: impl Display) -> GenerateResult<()> {
        writeln!(self.out, "{}{text}", pad(indent))?;
        Ok(())
    }

    /// Mark `shape` as being converted, failing if it already is.
    pub(super) fn enter(&mut self, shape: &str) -> GenerateResult<()> {
        if self.active.iter().any(|s| s == shape) {
            let mut chain = self.active.clone();
            chain.push(shape.to_owned());
            return Err(GenerateError::ShapeCycle {
                shape: shape.to_owned(),
                path: chain.join(" -> "),
            });
        }
        self.active.push(shape.to_owned());
        Ok(())
    }

    pub(super) fn leave(&mut self) {
        self.active.pop();
    }

    /// Emit `if let Some(P) = &source { target = Some(converted); }`.
    ///
    /// `flatten` selects the flattened container form for maps of
    /// structures, which generated nested types use.
    pub(super) fn assign_present(
        &mut self,
        shape_ref: &ShapeRef,
        source: &str,
        target: &str,
        path: &VarPath,
        flatten: bool,
        indent: usize,
    ) -> GenerateResult<()> {
        let binding = path.to_string();
        self.line(indent, format_args!("if let Some({binding}) = &{source} {{"))?;
        let expr = self.value(shape_ref, &binding, path, flatten, indent + 1)?;
        self.line(indent + 1, format_args!("{target} = Some({expr});"))?;
        self.line(indent, "}")
    }

    /// Emit whatever statements converting the reference `src` needs and
    /// return the expression of the owned, converted value.
    fn value(
        &mut self,
        shape_ref: &ShapeRef,
        src: &str,
        path: &VarPath,
        flatten: bool,
        indent: usize,
    ) -> GenerateResult<String> {
        let shape = self
            .synth
            .graph
            .resolve(shape_ref)
            .ok_or_else(|| GenerateError::nil_ref(&shape_ref.shape, format!("conversion of {src}")))?;
        match &shape.kind {
            ShapeKind::Scalar(kind) => Ok(copy_scalar(*kind, src)),
            ShapeKind::Enum(_) => Ok(format!("{src}.clone()")),
            ShapeKind::Timestamp => Ok(match self.direction {
                Direction::ToResource => format!("{TIME_TYPE}(*{src})"),
                Direction::ToWire => format!("{src}.0"),
            }),
            ShapeKind::Structure(body) => self.structure(shape, body, src, path, indent),
            ShapeKind::List { member } => self.list(member, src, path, indent),
            ShapeKind::Map { value, .. } => self.map(value, src, path, flatten, indent),
        }
    }

    fn structure(
        &mut self,
        shape: &Shape,
        body: &StructureShape,
        src: &str,
        path: &VarPath,
        indent: usize,
    ) -> GenerateResult<String> {
        self.enter(&shape.name)?;
        let val = path.val();
        let ty = self.synth.type_path(&shape.name, self.direction);
        self.line(indent, format_args!("let mut {val} = {ty}::default();"))?;
        for (index, (member, member_ref)) in body.members.iter().enumerate() {
            if self.synth.is_ignored(&shape.name, member, member_ref) {
                continue;
            }
            let ident = member_ident(member);
            self.assign_present(
                member_ref,
                &format!("{src}.{ident}"),
                &format!("{val}.{ident}"),
                &path.member(index),
                true,
                indent,
            )?;
        }
        self.leave();
        Ok(val)
    }

    fn list(&mut self, member: &ShapeRef, src: &str, path: &VarPath, indent: usize) -> GenerateResult<String> {
        let val = path.val();
        let iter = path.iter_var();
        self.line(indent, format_args!("let mut {val} = Vec::with_capacity({src}.len());"))?;
        self.line(indent, format_args!("for {iter} in {src} {{"))?;
        let expr = self.value(member, &iter, &path.elem(), false, indent + 1)?;
        self.line(indent + 1, format_args!("{val}.push({expr});"))?;
        self.line(indent, "}")?;
        Ok(val)
    }

    fn map(
        &mut self,
        value: &ShapeRef,
        src: &str,
        path: &VarPath,
        flatten: bool,
        indent: usize,
    ) -> GenerateResult<String> {
        let val = path.val();
        let key = path.key_var();
        let iter = path.iter_var();
        let flattened = flatten && self.synth.graph.resolve(value).is_some_and(Shape::is_structure);

        match (flattened, self.direction) {
            (false, _) => {
                self.line(indent, format_args!("let mut {val} = {MAP_IMPORT_PATH}::new();"))?;
                self.line(indent, format_args!("for ({key}, {iter}) in {src} {{"))?;
                let expr = self.value(value, &iter, &path.elem(), false, indent + 1)?;
                self.line(indent + 1, format_args!("{val}.insert({key}.clone(), {expr});"))?;
                self.line(indent, "}")?;
            }
            (true, Direction::ToResource) => {
                self.line(indent, format_args!("let mut {val} = Vec::with_capacity({src}.len());"))?;
                self.line(indent, format_args!("for ({key}, {iter}) in {src} {{"))?;
                let expr = self.value(value, &iter, &path.elem(), false, indent + 1)?;
                self.line(
                    indent + 1,
                    format_args!("{val}.push({MAP_IMPORT_PATH}::from([({key}.clone(), {expr})]));"),
                )?;
                self.line(indent, "}")?;
            }
            (true, Direction::ToWire) => {
                let entry = path.map_var();
                self.line(indent, format_args!("let mut {val} = {MAP_IMPORT_PATH}::new();"))?;
                self.line(indent, format_args!("for {entry} in {src} {{"))?;
                self.line(indent + 1, format_args!("for ({key}, {iter}) in {entry} {{"))?;
                let expr = self.value(value, &iter, &path.elem(), false, indent + 2)?;
                self.line(indent + 2, format_args!("{val}.insert({key}.clone(), {expr});"))?;
                self.line(indent + 1, "}")?;
                self.line(indent, "}")?;
            }
        }
        Ok(val)
    }
}

fn copy_scalar(kind: ScalarKind, src: &str) -> String {
    match kind {
        ScalarKind::Boolean | ScalarKind::Integer | ScalarKind::Long | ScalarKind::Float | ScalarKind::Double => {
            format!("*{src}")
        }
        ScalarKind::String | ScalarKind::Blob | ScalarKind::JsonValue => format!("{src}.clone()"),
    }
}
