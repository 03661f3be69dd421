//! Artifact rendering.
//!
//! Turns derived resources, type definitions and synthesized code into Rust
//! source files keyed by their path relative to the output root. Nothing here
//! touches the filesystem.

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::str::FromStr;

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::crd::{Crd, Field};
use crate::error::{GenerateError, GenerateResult};
use crate::exceptions::{exception_code, exception_message_prefix, terminal_codes};
use crate::generator::Generator;
use crate::op::OpType;
use crate::types::{EnumDef, Imports, TypeContext, TypeDef, TypeMapper};

/// Header comment placed at the top of every generated file.
const FILE_HEADER: &str = "//! Auto-generated by ackgen from the service API model. DO NOT EDIT.";

/// Generated file path to file content.
pub type Artifacts = BTreeMap<String, String>;

/// HTTP status whose error code means "resource does not exist".
const NOT_FOUND_STATUS: u16 = 404;

/// A group of generated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Resource, nested and enum type definitions under `apis/`.
    Apis,
    /// Request/response translation functions under `resource/`.
    Sdk,
}

impl Target {
    /// Every target, in rendering order.
    pub const ALL: [Self; 2] = [Self::Apis, Self::Sdk];

    /// Target name as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apis => "apis",
            Self::Sdk => "sdk",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apis" => Ok(Self::Apis),
            "sdk" => Ok(Self::Sdk),
            _ => Err(GenerateError::UnknownTarget { target: s.to_owned() }),
        }
    }
}

/// Render the `apis/` files.
pub(crate) fn apis(generator: &Generator) -> GenerateResult<Artifacts> {
    let crds = generator.crds()?;
    let type_defs = generator.type_defs()?;
    let enum_defs = generator.enum_defs();
    let mapper = TypeMapper::new(generator.graph(), generator.renames());

    let mut files = Artifacts::new();
    files.insert("apis/mod.rs".to_owned(), apis_mod(crds)?);
    for crd in crds {
        let content = resource_types(generator.config(), &mapper, crd, !type_defs.is_empty())?;
        files.insert(format!("apis/{}.rs", crd.names.snake), content);
    }
    files.insert("apis/types.rs".to_owned(), nested_types(type_defs)?);
    files.insert("apis/enums.rs".to_owned(), enums(enum_defs)?);
    debug!(files = files.len(), "rendered apis target");
    Ok(files)
}

/// Render the `resource/` files.
pub(crate) fn sdk(generator: &Generator) -> GenerateResult<Artifacts> {
    let crds = generator.crds()?;
    let mut files = Artifacts::new();

    let mut root = String::new();
    writeln!(root, "{FILE_HEADER}")?;
    writeln!(root)?;
    for crd in crds {
        writeln!(root, "pub mod {};", crd.names.snake)?;
    }
    files.insert("resource/mod.rs".to_owned(), root);

    for crd in crds {
        let dir = format!("resource/{}", crd.names.snake);
        files.insert(format!("{dir}/mod.rs"), resource_mod(generator, crd)?);
        files.insert(format!("{dir}/sdk.rs"), resource_sdk(generator, crd)?);
    }
    debug!(files = files.len(), "rendered sdk target");
    Ok(files)
}

fn apis_mod(crds: &[Crd]) -> GenerateResult<String> {
    let mut out = String::new();
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "pub mod enums;")?;
    writeln!(out, "pub mod types;")?;
    for crd in crds {
        writeln!(out, "mod {};", crd.names.snake)?;
    }
    writeln!(out)?;
    for crd in crds {
        writeln!(out, "pub use {}::*;", crd.names.snake)?;
    }
    Ok(out)
}

/// Spec, Status and resource structs for one resource.
fn resource_types(
    config: &GeneratorConfig,
    mapper: &TypeMapper<'_>,
    crd: &Crd,
    has_type_defs: bool,
) -> GenerateResult<String> {
    let mut imports = Imports::new();
    for field in crd.spec_fields.values().chain(crd.status_fields.values()) {
        if let Some(shape_ref) = &field.shape_ref {
            mapper.rust_type(shape_ref, TypeContext::Field, &mut imports)?;
        }
    }

    let name = &crd.names.camel;
    let mut out = String::new();
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;
    write_imports(&mut out, &imports)?;
    writeln!(out, "use serde::{{Deserialize, Serialize}};")?;
    writeln!(out)?;
    write_crate_uses(&mut out, &[&config.emit.metadata_module])?;
    if has_type_defs {
        writeln!(out, "#[allow(unused_imports)]")?;
        writeln!(out, "use super::types::*;")?;
    }
    writeln!(out)?;

    writeln!(out, "/// Desired state of a {name}.")?;
    write_struct_open(&mut out, &format!("{name}Spec"))?;
    for field in crd.spec_fields.values() {
        write_field(&mut out, field)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "/// Observed state of a {name}.")?;
    write_struct_open(&mut out, &format!("{name}Status"))?;
    writeln!(out, "    /// Identity of the remote resource.")?;
    writeln!(
        out,
        "    #[serde(rename = \"ackResourceMetadata\", default, skip_serializing_if = \"Option::is_none\")]"
    )?;
    writeln!(
        out,
        "    pub ack_resource_metadata: Option<{}::ResourceMetadata>,",
        config.emit.metadata_module
    )?;
    for field in crd.status_fields.values() {
        write_field(&mut out, field)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    let prefix = &config.prefix_config;
    writeln!(out, "/// {name} resource.")?;
    write_struct_open(&mut out, name)?;
    writeln!(out, "    /// Desired state.")?;
    writeln!(out, "    pub {}: {name}Spec,", prefix.spec_field)?;
    writeln!(out, "    /// Observed state.")?;
    writeln!(out, "    #[serde(default)]")?;
    writeln!(out, "    pub {}: {name}Status,", prefix.status_field)?;
    writeln!(out, "}}")?;
    Ok(out)
}

fn nested_types(type_defs: &[TypeDef]) -> GenerateResult<String> {
    let mut imports = Imports::new();
    for def in type_defs {
        imports.extend(def.imports.iter().map(|(path, alias)| (path.clone(), alias.clone())));
    }

    let mut out = String::new();
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;
    write_imports(&mut out, &imports)?;
    writeln!(out, "use serde::{{Deserialize, Serialize}};")?;
    writeln!(out)?;

    for def in type_defs {
        write_struct_open(&mut out, &def.names.camel)?;
        for attr in &def.attrs {
            let ty = if attr.boxed {
                format!("Box<{}>", attr.rust_type)
            } else {
                attr.rust_type.clone()
            };
            write_member(&mut out, &attr.names.camel_lower, &attr.names.field_ident(), &ty)?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;
    }
    Ok(out)
}

fn enums(enum_defs: &[EnumDef]) -> GenerateResult<String> {
    let mut out = String::new();
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "use serde::{{Deserialize, Serialize}};")?;
    writeln!(out)?;

    for def in enum_defs {
        let name = &def.names.camel;
        writeln!(out, "/// Legal values of {}.", def.shape_name)?;
        writeln!(
            out,
            "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]"
        )?;
        writeln!(out, "pub enum {name} {{")?;
        for (i, value) in def.values.iter().enumerate() {
            if i == 0 {
                writeln!(out, "    #[default]")?;
            }
            writeln!(out, "    #[serde(rename = {:?})]", value.original)?;
            writeln!(out, "    {},", value.variant)?;
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "impl {name} {{")?;
        writeln!(out, "    /// Wire value of this variant.")?;
        writeln!(out, "    #[must_use]")?;
        writeln!(out, "    pub fn as_str(self) -> &'static str {{")?;
        writeln!(out, "        match self {{")?;
        for value in &def.values {
            writeln!(out, "            Self::{} => {:?},", value.variant, value.original)?;
        }
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(out, "impl std::fmt::Display for {name} {{")?;
        writeln!(
            out,
            "    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {{"
        )?;
        writeln!(out, "        f.write_str(self.as_str())")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
    }
    Ok(out)
}

fn resource_mod(generator: &Generator, crd: &Crd) -> GenerateResult<String> {
    let graph = generator.graph();
    let mut out = String::new();
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "pub mod sdk;")?;
    writeln!(out)?;
    writeln!(out, "/// Error code the service returns when the {} does not exist.", crd.names.original)?;
    writeln!(
        out,
        "pub const NOT_FOUND_CODE: &str = {:?};",
        exception_code(graph, crd, NOT_FOUND_STATUS)
    )?;
    if let Some(prefix) = exception_message_prefix(crd, NOT_FOUND_STATUS) {
        writeln!(out)?;
        writeln!(out, "/// Message prefix a not-found error must also carry.")?;
        writeln!(out, "pub const NOT_FOUND_MESSAGE_PREFIX: &str = {prefix:?};")?;
    }
    writeln!(out)?;
    writeln!(out, "/// Error codes that retrying can never fix.")?;
    let codes: Vec<String> = terminal_codes(crd).iter().map(|c| format!("{c:?}")).collect();
    writeln!(out, "pub const TERMINAL_CODES: &[&str] = &[{}];", codes.join(", "))?;
    writeln!(out)?;
    writeln!(out, "/// Whether `code` is a terminal error code.")?;
    writeln!(out, "#[must_use]")?;
    writeln!(out, "pub fn is_terminal_code(code: &str) -> bool {{")?;
    writeln!(out, "    TERMINAL_CODES.contains(&code)")?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// Operation kinds with synthesized translation functions, with the
/// function name stem for each.
const SYNTHESIZED_OPS: [(OpType, &str); 7] = [
    (OpType::Create, "create"),
    (OpType::Get, "read_one"),
    (OpType::List, "read_many"),
    (OpType::Update, "update"),
    (OpType::Delete, "delete"),
    (OpType::GetAttributes, "get_attributes"),
    (OpType::SetAttributes, "set_attributes"),
];

/// Operation kinds whose requests get a required-field presence check.
const CHECKED_OPS: [OpType; 3] = [OpType::Get, OpType::GetAttributes, OpType::SetAttributes];

fn resource_sdk(generator: &Generator, crd: &Crd) -> GenerateResult<String> {
    let config = generator.config();
    let emit = &config.emit;
    let synth = generator.synthesizer(crd);
    let resource_type = format!("{}::{}", emit.apis_module, crd.names.camel);

    let mut out = String::new();
    writeln!(out, "{FILE_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "#![allow(unused_mut, unused_variables)]")?;
    writeln!(out)?;
    write_crate_uses(
        &mut out,
        &[&emit.errors_module, &emit.metadata_module, &emit.apis_module, &emit.sdk_module],
    )?;

    for (op_type, stem) in SYNTHESIZED_OPS {
        let Some(op) = crd.ops.get(op_type) else {
            continue;
        };
        writeln!(out)?;
        if let Some(method) = custom_method(config, crd, op_type, &op.name) {
            writeln!(out, "// {}: implemented by hand in `{method}`.", op.name)?;
            continue;
        }

        if let Some(input) = &op.input {
            let request_type = format!("{}::{}", emit.sdk_module, input.shape);
            writeln!(out, "/// Build the {} request from the resource.", op.name)?;
            writeln!(out, "#[must_use]")?;
            writeln!(out, "pub fn new_{stem}_request(ko: &{resource_type}) -> {request_type} {{")?;
            writeln!(out, "    let mut res = {request_type}::default();")?;
            out.push_str(&synth.set_input(op_type, "ko", "res", 1)?);
            writeln!(out, "    res")?;
            writeln!(out, "}}")?;
        }

        if let Some(output) = &op.output {
            let response_type = format!("{}::{}", emit.sdk_module, output.shape);
            writeln!(out)?;
            writeln!(out, "/// Copy the {} response into the resource.", op.name)?;
            writeln!(
                out,
                "pub fn set_{stem}_output(resp: &{response_type}, ko: &mut {resource_type}) -> Result<(), {}::Error> {{",
                emit.errors_module
            )?;
            out.push_str(&synth.set_output(op_type, "resp", "ko", 1)?);
            let hook = config
                .operation(&op.name)
                .and_then(|c| c.set_output_custom_method_name.as_deref());
            if let Some(hook) = hook {
                writeln!(out, "    {hook}(resp, ko)?;")?;
            }
            writeln!(out, "    Ok(())")?;
            writeln!(out, "}}")?;
        }

        if CHECKED_OPS.contains(&op_type) {
            writeln!(out)?;
            writeln!(out, "/// Whether a field the {} request requires is unset.", op.name)?;
            writeln!(out, "#[must_use]")?;
            writeln!(out, "pub fn requires_missing_{stem}_fields(ko: &{resource_type}) -> bool {{")?;
            writeln!(out, "    {}", synth.required_fields_missing(op_type, "ko")?)?;
            writeln!(out, "}}")?;
        }
    }
    Ok(out)
}

/// Hand-written replacement for an operation's synthesized code, if any.
fn custom_method<'c>(config: &'c GeneratorConfig, crd: &'c Crd, op_type: OpType, op_name: &str) -> Option<&'c str> {
    config
        .operation(op_name)
        .and_then(|c| c.custom_implementation.as_deref())
        .or_else(|| {
            (op_type == OpType::Update)
                .then(|| crd.config.update_operation.as_ref())
                .flatten()
                .and_then(|u| u.custom_method_name.as_deref())
        })
}

fn write_imports(out: &mut String, imports: &Imports) -> GenerateResult<()> {
    if imports.is_empty() {
        return Ok(());
    }
    for (path, alias) in imports {
        match alias {
            Some(alias) => writeln!(out, "use {path} as {alias};")?,
            None => writeln!(out, "use {path};")?,
        }
    }
    writeln!(out)?;
    Ok(())
}

/// `use crate::{...};` for module names that are plain identifiers.
fn write_crate_uses(out: &mut String, modules: &[&String]) -> GenerateResult<()> {
    let mut names: Vec<&str> = modules
        .iter()
        .map(|m| m.as_str())
        .filter(|m| !m.contains("::"))
        .collect();
    names.sort_unstable();
    names.dedup();
    match names.as_slice() {
        [] => {}
        [single] => writeln!(out, "use crate::{single};")?,
        many => writeln!(out, "use crate::{{{}}};", many.join(", "))?,
    }
    Ok(())
}

fn write_struct_open(out: &mut String, name: &str) -> GenerateResult<()> {
    writeln!(out, "#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]")?;
    writeln!(out, "pub struct {name} {{")?;
    Ok(())
}

fn write_field(out: &mut String, field: &Field) -> GenerateResult<()> {
    write_member(out, &field.names.camel_lower, &field.names.field_ident(), &field.rust_type)
}

fn write_member(out: &mut String, serialized: &str, ident: &str, rust_type: &str) -> GenerateResult<()> {
    writeln!(
        out,
        "    #[serde(rename = {serialized:?}, default, skip_serializing_if = \"Option::is_none\")]"
    )?;
    writeln!(out, "    pub {ident}: Option<{rust_type}>,")?;
    Ok(())
}
