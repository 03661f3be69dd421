//! Type resolution, TypeDefs and EnumDefs.
//!
//! [`TypeMapper`] turns shape references into Rust type expressions for
//! generated resource types. [`type_defs`] builds one [`TypeDef`] per
//! structure reachable from any resource field; [`enum_defs`] builds one
//! [`EnumDef`] per string enum. Both use the [`RenameTable`] for names and
//! return their results sorted by name.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use ackgen_model::{ScalarKind, Shape, ShapeGraph, ShapeKind, ShapeRef};
use regex::Regex;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::crd::Crd;
use crate::error::{GenerateError, GenerateResult};
use crate::names::Names;
use crate::rename::RenameTable;

/// Import path of the timestamp wrapper module.
pub const TIME_IMPORT_PATH: &str = "k8s_openapi::apimachinery::pkg::apis::meta::v1";
/// Alias the timestamp wrapper module is imported under.
pub const TIME_IMPORT_ALIAS: &str = "metav1";
/// Resource-side timestamp type.
pub const TIME_TYPE: &str = "metav1::Time";
/// Import path of the opaque JSON value type.
pub const JSON_IMPORT_PATH: &str = "serde_json::Value";
/// Alias the JSON value type is imported under.
pub const JSON_IMPORT_ALIAS: &str = "JsonValue";
/// Import path of the map type.
pub const MAP_IMPORT_PATH: &str = "std::collections::HashMap";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]").expect("valid enum value pattern"));

/// Import path to optional alias.
pub type Imports = BTreeMap<String, Option<String>>;

/// Where a type expression is used; map-of-structure members of a TypeDef
/// use the flattened container form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeContext {
    /// A Spec or Status field.
    Field,
    /// A member of a TypeDef.
    TypeDefMember,
}

/// Resolves shape references to Rust type expressions.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    graph: &'a ShapeGraph,
    renames: &'a RenameTable,
}

impl<'a> TypeMapper<'a> {
    /// Create a mapper over a graph and its rename table.
    #[must_use]
    pub fn new(graph: &'a ShapeGraph, renames: &'a RenameTable) -> Self {
        Self { graph, renames }
    }

    /// Rust type for `shape_ref`, recording any foreign imports it needs.
    pub fn rust_type(
        &self,
        shape_ref: &ShapeRef,
        context: TypeContext,
        imports: &mut Imports,
    ) -> GenerateResult<String> {
        let shape = self
            .graph
            .resolve(shape_ref)
            .ok_or_else(|| GenerateError::nil_ref(&shape_ref.shape, "type resolution"))?;
        self.shape_type(shape, context, imports)
    }

    fn shape_type(&self, shape: &Shape, context: TypeContext, imports: &mut Imports) -> GenerateResult<String> {
        let ty = match &shape.kind {
            ShapeKind::Structure(_) => self.renames.type_name(&shape.name),
            ShapeKind::List { member } => {
                let elem = self.rust_type(member, TypeContext::Field, imports)?;
                format!("Vec<{elem}>")
            }
            ShapeKind::Map { value, .. } => {
                let value_shape = self
                    .graph
                    .resolve(value)
                    .ok_or_else(|| GenerateError::nil_ref(&value.shape, format!("map {}", shape.name)))?;
                let value_ty = self.shape_type(value_shape, TypeContext::Field, imports)?;
                imports.insert(MAP_IMPORT_PATH.to_owned(), None);
                if context == TypeContext::TypeDefMember && value_shape.is_structure() {
                    format!("Vec<HashMap<String, {value_ty}>>")
                } else {
                    format!("HashMap<String, {value_ty}>")
                }
            }
            ShapeKind::Scalar(kind) => {
                if *kind == ScalarKind::JsonValue {
                    imports.insert(JSON_IMPORT_PATH.to_owned(), Some(JSON_IMPORT_ALIAS.to_owned()));
                }
                scalar_type(*kind).to_owned()
            }
            ShapeKind::Timestamp => {
                imports.insert(TIME_IMPORT_PATH.to_owned(), Some(TIME_IMPORT_ALIAS.to_owned()));
                TIME_TYPE.to_owned()
            }
            ShapeKind::Enum(_) => "String".to_owned(),
        };
        Ok(ty)
    }
}

/// Rust type of a scalar shape.
#[must_use]
pub fn scalar_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => "String",
        ScalarKind::Boolean => "bool",
        ScalarKind::Integer => "i32",
        ScalarKind::Long => "i64",
        ScalarKind::Float => "f32",
        ScalarKind::Double => "f64",
        ScalarKind::Blob => "Vec<u8>",
        ScalarKind::JsonValue => JSON_IMPORT_ALIAS,
    }
}

/// One member of a [`TypeDef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Case variants of the member name.
    pub names: Names,
    /// Rust type without the `Option` wrapper.
    pub rust_type: String,
    /// Target shape name.
    pub shape: String,
    /// Whether the member's structure type must be boxed to break recursion.
    pub boxed: bool,
}

/// A reusable nested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Case variants; `camel` is the conflict-free type name.
    pub names: Names,
    /// Source structure shape.
    pub shape_name: String,
    /// Members in declaration order.
    pub attrs: Vec<Attr>,
    /// Foreign imports the members need.
    pub imports: Imports,
}

/// Build TypeDefs for every structure reachable from any resource field.
pub fn type_defs(
    graph: &ShapeGraph,
    config: &GeneratorConfig,
    renames: &RenameTable,
    crds: &[Crd],
) -> GenerateResult<Vec<TypeDef>> {
    let reachable = reachable_structures(graph, config, crds)?;
    let mapper = TypeMapper::new(graph, renames);

    let mut defs = Vec::new();
    for shape_name in &reachable {
        let Some(shape) = graph.shape(shape_name) else {
            continue;
        };
        let Some(body) = shape.as_structure() else {
            continue;
        };
        let mut imports = Imports::new();
        let mut attrs = Vec::with_capacity(body.members.len());
        for (member, member_ref) in &body.members {
            if config.is_ignored_member(&shape.name, member, &member_ref.shape) {
                continue;
            }
            let rust_type = mapper.rust_type(member_ref, TypeContext::TypeDefMember, &mut imports)?;
            let boxed = graph
                .resolve(member_ref)
                .is_some_and(|s| s.is_structure() && reaches(graph, &s.name, &shape.name));
            attrs.push(Attr {
                names: Names::new(member),
                rust_type,
                shape: member_ref.shape.clone(),
                boxed,
            });
        }
        let mut names = Names::new(&shape.name);
        names.camel = renames.type_name(&shape.name);
        defs.push(TypeDef {
            names,
            shape_name: shape.name.clone(),
            attrs,
            imports,
        });
    }
    defs.sort_by(|a, b| a.names.camel.cmp(&b.names.camel));
    debug!(count = defs.len(), "derived type definitions");
    Ok(defs)
}

/// Structure shapes reachable from resource fields, excluding payloads,
/// exceptions and ignored shapes.
fn reachable_structures(
    graph: &ShapeGraph,
    config: &GeneratorConfig,
    crds: &[Crd],
) -> GenerateResult<BTreeSet<String>> {
    let mut visited = BTreeSet::new();
    let mut found = BTreeSet::new();
    let mut stack: Vec<ShapeRef> = crds
        .iter()
        .flat_map(|c| c.spec_fields.values().chain(c.status_fields.values()))
        .filter_map(|f| f.shape_ref.clone())
        .collect();

    while let Some(shape_ref) = stack.pop() {
        if !visited.insert(shape_ref.shape.clone()) {
            continue;
        }
        let shape = graph
            .resolve(&shape_ref)
            .ok_or_else(|| GenerateError::nil_ref(&shape_ref.shape, "type definition walk"))?;
        if config.is_ignored_shape(&shape.name) {
            continue;
        }
        match &shape.kind {
            ShapeKind::Structure(body) => {
                if !shape.exception && !graph.is_payload(&shape.name) {
                    found.insert(shape.name.clone());
                }
                stack.extend(
                    body.members
                        .iter()
                        .filter(|(m, r)| !config.is_ignored_member(&shape.name, m, &r.shape))
                        .map(|(_, r)| r.clone()),
                );
            }
            ShapeKind::List { member } => stack.push(member.clone()),
            ShapeKind::Map { value, .. } => stack.push(value.clone()),
            ShapeKind::Scalar(_) | ShapeKind::Timestamp | ShapeKind::Enum(_) => {}
        }
    }
    Ok(found)
}

/// Whether structure `from` can reach structure `to` through members.
fn reaches(graph: &ShapeGraph, from: &str, to: &str) -> bool {
    let mut visited = BTreeSet::new();
    let mut stack = vec![from.to_owned()];
    while let Some(name) = stack.pop() {
        if name == to {
            return true;
        }
        if !visited.insert(name.clone()) {
            continue;
        }
        let Some(shape) = graph.shape(&name) else {
            continue;
        };
        match &shape.kind {
            ShapeKind::Structure(body) => stack.extend(body.members.values().map(|r| r.shape.clone())),
            ShapeKind::List { member } => stack.push(member.shape.clone()),
            ShapeKind::Map { value, .. } => stack.push(value.shape.clone()),
            ShapeKind::Scalar(_) | ShapeKind::Timestamp | ShapeKind::Enum(_) => {}
        }
    }
    false
}

/// One legal value of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value as sent on the wire.
    pub original: String,
    /// Value with every non-alphanumeric character replaced by `_`.
    pub clean: String,
    /// Variant identifier, unique within the enum.
    pub variant: String,
}

/// A named set of legal string values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// Case variants; `camel` is the conflict-free type name.
    pub names: Names,
    /// Source enum shape.
    pub shape_name: String,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
}

/// Build an EnumDef for every non-ignored string enum shape.
#[must_use]
pub fn enum_defs(graph: &ShapeGraph, config: &GeneratorConfig, renames: &RenameTable) -> Vec<EnumDef> {
    let mut defs: Vec<EnumDef> = graph
        .shapes()
        .filter(|s| !config.is_ignored_shape(&s.name))
        .filter_map(|shape| {
            let ShapeKind::Enum(values) = &shape.kind else {
                return None;
            };
            let mut names = Names::new(&shape.name);
            names.camel = renames.type_name(&shape.name);
            Some(EnumDef {
                names,
                shape_name: shape.name.clone(),
                values: enum_values(values),
            })
        })
        .collect();
    defs.sort_by(|a, b| a.names.camel.cmp(&b.names.camel));
    defs
}

fn enum_values(values: &[String]) -> Vec<EnumValue> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|original| {
            let clean = NON_ALPHANUMERIC.replace_all(original, "_").into_owned();
            let mut variant = Names::new(&clean).camel;
            if variant.is_empty() || variant.starts_with(|c: char| c.is_ascii_digit()) {
                variant.insert(0, 'V');
            }
            let base = variant.clone();
            let mut n = 1;
            while !seen.insert(variant.clone()) {
                n += 1;
                variant = format!("{base}{n}");
            }
            EnumValue {
                original: original.clone(),
                clean,
                variant,
            }
        })
        .collect()
}
