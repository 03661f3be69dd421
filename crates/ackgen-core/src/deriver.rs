//! Resource (CRD) derivation.
//!
//! Every non-ignored operation is classified into a verb and a resource
//! name. Each resource with a Create operation becomes a [`Crd`]: Spec fields
//! come from the Create input members, Status fields from the Create output
//! members not already in Spec.

use std::collections::BTreeMap;

use ackgen_model::{Operation, Shape, ShapeGraph, ShapeRef, StructureShape};
use tracing::{debug, warn};

use crate::config::{AttributeFormat, FieldConfig, GeneratorConfig};
use crate::crd::{ATTRIBUTES_MEMBER, AttributeBinding, Crd, Field, Ops, ResourcePolicy};
use crate::error::{GenerateError, GenerateResult};
use crate::names::Names;
use crate::op::{OpType, classify};
use crate::rename::RenameTable;
use crate::types::{Imports, TypeContext, TypeMapper};

/// Classify an operation, honouring configured overrides.
#[must_use]
pub fn classify_operation(op_name: &str, config: &GeneratorConfig) -> (OpType, String) {
    let (mut op_type, mut resource) = classify(op_name);
    if let Some(op_config) = config.operation(op_name) {
        if let Some(forced) = op_config.operation_type {
            op_type = forced;
        }
        if let Some(name) = &op_config.resource_name {
            resource.clone_from(name);
        }
    }
    (op_type, resource)
}

/// Sorted names of all non-ignored resources that have a Create operation.
#[must_use]
pub fn resource_names(graph: &ShapeGraph, config: &GeneratorConfig) -> Vec<String> {
    let mut names: Vec<String> = graph
        .operations()
        .filter(|op| !config.is_ignored_operation(&op.name))
        .filter_map(|op| match classify_operation(&op.name, config) {
            (OpType::Create, resource) if !config.is_ignored_resource(&resource) => Some(resource),
            _ => None,
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Derive every resource, sorted by Camel name.
pub fn derive_crds(
    graph: &ShapeGraph,
    config: &GeneratorConfig,
    renames: &RenameTable,
) -> GenerateResult<Vec<Crd>> {
    let ops_by_resource = group_operations(graph, config);
    let mapper = TypeMapper::new(graph, renames);

    let mut crds = Vec::new();
    for (resource, ops) in ops_by_resource {
        if ops.create.is_none() || config.is_ignored_resource(&resource) {
            continue;
        }
        let crd = Deriver {
            graph,
            config,
            mapper,
            policy: ResourcePolicy::new(&resource, config),
            resource: &resource,
        }
        .derive(ops)?;
        debug!(
            resource = %crd.names.camel,
            spec = crd.spec_fields.len(),
            status = crd.status_fields.len(),
            "derived resource"
        );
        crds.push(crd);
    }
    crds.sort_by(|a, b| a.names.camel.cmp(&b.names.camel));
    Ok(crds)
}

/// Group non-ignored operations by resource name, first match winning.
fn group_operations(graph: &ShapeGraph, config: &GeneratorConfig) -> BTreeMap<String, Ops> {
    let mut ops: Vec<&Operation> = graph.operations().collect();
    ops.sort_by(|a, b| a.name.cmp(&b.name));

    let mut grouped: BTreeMap<String, Ops> = BTreeMap::new();
    for op in ops {
        if config.is_ignored_operation(&op.name) {
            continue;
        }
        let (op_type, resource) = classify_operation(&op.name, config);
        let entry = grouped.entry(resource.clone()).or_default();
        let Some(slot) = entry.slot_mut(op_type) else {
            continue;
        };
        if let Some(existing) = slot.as_ref() {
            warn!(
                resource = %resource,
                kept = %existing.name,
                skipped = %op.name,
                "multiple {op_type} operations for resource"
            );
            continue;
        }
        *slot = Some(op.clone());
    }
    grouped
}

#[derive(Debug)]
struct Deriver<'a> {
    graph: &'a ShapeGraph,
    config: &'a GeneratorConfig,
    mapper: TypeMapper<'a>,
    policy: ResourcePolicy,
    resource: &'a str,
}

impl Deriver<'_> {
    fn derive(self, ops: Ops) -> GenerateResult<Crd> {
        let create = ops.create.as_ref().ok_or_else(|| GenerateError::MissingOperation {
            resource: self.resource.to_owned(),
            op_type: OpType::Create.to_string(),
        })?;
        let resource_config = self.config.resource(self.resource).cloned().unwrap_or_default();

        let mut spec_fields = BTreeMap::new();
        let mut status_fields = BTreeMap::new();
        self.spec_from_input(create, &mut spec_fields, &mut status_fields)?;
        self.extra_fields(&resource_config.fields, &mut spec_fields, &mut status_fields)?;
        let primary_arn_member = self.status_from_output(create, &spec_fields, &mut status_fields)?;

        Ok(Crd {
            names: Names::new(self.resource),
            ops,
            spec_fields,
            status_fields,
            primary_arn_member,
            policy: self.policy,
            config: resource_config,
        })
    }

    fn spec_from_input(
        &self,
        create: &Operation,
        spec: &mut BTreeMap<String, Field>,
        status: &mut BTreeMap<String, Field>,
    ) -> GenerateResult<()> {
        let input_ref = create
            .input
            .as_ref()
            .ok_or_else(|| GenerateError::nil_ref("<none>", format!("{} input", create.name)))?;
        let (input, body) = self.structure(input_ref, &format!("{} input", create.name))?;

        for (member, member_ref) in &body.members {
            if self.config.is_ignored_member(&input.name, member, &member_ref.shape) {
                continue;
            }
            if self.policy.is_unpacked_map(member) {
                self.unpack_attributes(spec, status);
                continue;
            }
            let field_name = self.config.input_field_name(self.resource, &create.name, member);
            let field = self.shape_field(field_name, member_ref, &input.name)?;
            spec.insert(field_name.to_owned(), field);
        }
        Ok(())
    }

    fn unpack_attributes(&self, spec: &mut BTreeMap<String, Field>, status: &mut BTreeMap<String, Field>) {
        let Some(attributes) = &self.policy.attributes else {
            return;
        };
        for key in &attributes.keys {
            if key.primary_arn {
                continue;
            }
            let field = attribute_field(&key.key, key.format);
            if key.read_only {
                status.insert(key.key.clone(), field);
            } else {
                spec.insert(key.key.clone(), field);
            }
        }
    }

    fn extra_fields(
        &self,
        fields: &BTreeMap<String, FieldConfig>,
        spec: &mut BTreeMap<String, Field>,
        status: &mut BTreeMap<String, Field>,
    ) -> GenerateResult<()> {
        for (name, field_config) in fields {
            if field_config.is_attribute || spec.contains_key(name) || status.contains_key(name) {
                continue;
            }
            let field = if let Some(from) = &field_config.from {
                let shape_ref = self.source_member(&from.operation, &from.path)?;
                self.shape_field(name, &shape_ref, &from.operation)?
            } else if let Some(rust_type) = &field_config.type_override {
                Field {
                    names: Names::new(name),
                    rust_type: rust_type.clone(),
                    shape_ref: None,
                    required: field_config.is_required,
                    attribute: None,
                }
            } else {
                continue;
            };
            if field_config.is_read_only {
                status.insert(name.clone(), field);
            } else {
                spec.insert(name.clone(), field);
            }
        }
        Ok(())
    }

    /// Follow a dotted member path from an operation's input shape.
    fn source_member(&self, op_name: &str, path: &str) -> GenerateResult<ShapeRef> {
        let context = format!("{op_name} input");
        let op = self
            .graph
            .operation(op_name)
            .ok_or_else(|| GenerateError::nil_ref(op_name, "field source operation"))?;
        let mut current = op
            .input
            .clone()
            .ok_or_else(|| GenerateError::nil_ref("<none>", context.clone()))?;
        for segment in path.split('.') {
            let (shape, body) = self.structure(&current, &context)?;
            current = body
                .members
                .get(segment)
                .cloned()
                .ok_or_else(|| GenerateError::nil_ref(&format!("{}.{segment}", shape.name), context.clone()))?;
        }
        Ok(current)
    }

    fn status_from_output(
        &self,
        create: &Operation,
        spec: &BTreeMap<String, Field>,
        status: &mut BTreeMap<String, Field>,
    ) -> GenerateResult<Option<String>> {
        let Some(output_ref) = &create.output else {
            return Ok(None);
        };
        let context = format!("{} output", create.name);
        let (outer, outer_body) = self.structure(output_ref, &context)?;
        let (output, body) = match self.policy.wrapper_member(self.graph, &outer_body.members) {
            Some((wrapper, inner_ref)) => {
                debug!(resource = %self.resource, wrapper = %wrapper, "unwrapping single-member output");
                self.structure(inner_ref, &context)?
            }
            None => (outer, outer_body),
        };

        let mut primary_arn_member = None;
        for (member, member_ref) in &body.members {
            if self.config.is_ignored_member(&output.name, member, &member_ref.shape) {
                continue;
            }
            let field_name = self.config.output_field_name(self.resource, &create.name, member);
            if spec.contains_key(field_name) || status.contains_key(field_name) {
                continue;
            }
            if self.policy.is_unpacked_map(member) {
                continue;
            }
            if self.policy.is_primary_arn(field_name) {
                primary_arn_member = Some(member.clone());
                continue;
            }
            let field = self.shape_field(field_name, member_ref, &output.name)?;
            status.insert(field_name.to_owned(), field);
        }
        Ok(primary_arn_member)
    }

    fn shape_field(&self, name: &str, shape_ref: &ShapeRef, owner: &str) -> GenerateResult<Field> {
        if self.graph.resolve(shape_ref).is_none() {
            return Err(GenerateError::nil_ref(&shape_ref.shape, format!("{owner}.{name}")));
        }
        let rust_type = self
            .mapper
            .rust_type(shape_ref, TypeContext::Field, &mut Imports::new())?;
        Ok(Field {
            names: Names::new(name),
            rust_type,
            shape_ref: Some(shape_ref.clone()),
            required: shape_ref.required,
            attribute: None,
        })
    }

    fn structure(&self, shape_ref: &ShapeRef, context: &str) -> GenerateResult<(&Shape, &StructureShape)> {
        resolve_structure(self.graph, shape_ref, context)
    }
}

/// Resolve a reference that must name a structure.
pub(crate) fn resolve_structure<'g>(
    graph: &'g ShapeGraph,
    shape_ref: &ShapeRef,
    context: &str,
) -> GenerateResult<(&'g Shape, &'g StructureShape)> {
    let shape = graph
        .resolve(shape_ref)
        .ok_or_else(|| GenerateError::nil_ref(&shape_ref.shape, context))?;
    let body = shape.as_structure().ok_or_else(|| GenerateError::UnexpectedShape {
        shape: shape.name.clone(),
        expected: "structure",
    })?;
    Ok((shape, body))
}

fn attribute_field(key: &str, format: AttributeFormat) -> Field {
    Field {
        names: Names::new(key),
        rust_type: format.rust_type().to_owned(),
        shape_ref: None,
        required: false,
        attribute: Some(AttributeBinding {
            key: key.to_owned(),
            format,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    fn derive(descriptor: &str, yaml: &str) -> GenerateResult<Vec<Crd>> {
        let graph = ShapeGraph::from_json(descriptor).expect("test graph");
        let config = GeneratorConfig::from_str_with_format(yaml, ConfigFormat::Yaml).expect("test config");
        let names = resource_names(&graph, &config);
        let renames = RenameTable::build(&graph, &config, &names);
        derive_crds(&graph, &config, &renames)
    }

    fn keys(fields: &BTreeMap<String, Field>) -> Vec<&str> {
        fields.keys().map(String::as_str).collect()
    }

    const BOOKS: &str = r#"{
        "operations": {
            "CreateBook": {"input": {"shape": "CreateBookRequest"}, "output": {"shape": "CreateBookResponse"}},
            "DescribeBook": {"input": {"shape": "DescribeBookRequest"}, "output": {"shape": "CreateBookResponse"}},
            "DeleteBook": {"input": {"shape": "DescribeBookRequest"}},
            "ListBooks": {"output": {"shape": "ListBooksResponse"}},
            "CreateAuthor": {"input": {"shape": "CreateAuthorRequest"}},
            "ArchiveBook": {"input": {"shape": "DescribeBookRequest"}}
        },
        "shapes": {
            "CreateBookRequest": {"type": "structure", "required": ["Title"], "members": {
                "Title": {"shape": "String"},
                "Bucket": {"shape": "String"},
                "Debug": {"shape": "Boolean"},
                "Legacy": {"shape": "LegacyConfig"}
            }},
            "CreateBookResponse": {"type": "structure", "members": {
                "Title": {"shape": "String"},
                "BookArn": {"shape": "String"},
                "CreatedAt": {"shape": "Timestamp"},
                "Pages": {"shape": "Long"}
            }},
            "DescribeBookRequest": {"type": "structure", "members": {"Title": {"shape": "String"}}},
            "ListBooksResponse": {"type": "structure", "members": {"Books": {"shape": "BookList"}}},
            "BookList": {"type": "list", "member": {"shape": "BookSummary"}},
            "BookSummary": {"type": "structure", "members": {"Title": {"shape": "String"}}},
            "CreateAuthorRequest": {"type": "structure", "members": {"Name": {"shape": "String"}}},
            "LegacyConfig": {"type": "structure", "members": {}},
            "String": {"type": "string"},
            "Boolean": {"type": "boolean"},
            "Long": {"type": "long"},
            "Timestamp": {"type": "timestamp"}
        }
    }"#;

    #[test]
    fn test_should_derive_spec_and_status_fields() {
        let crds = derive(BOOKS, "").expect("test derive");
        let names: Vec<&str> = crds.iter().map(|c| c.names.camel.as_str()).collect();
        assert_eq!(names, vec!["Author", "Book"]);

        let book = &crds[1];
        assert_eq!(keys(&book.spec_fields), vec!["Bucket", "Debug", "Legacy", "Title"]);
        // Title is in both shapes and stays in Spec; BookArn goes to metadata.
        assert_eq!(keys(&book.status_fields), vec!["CreatedAt", "Pages"]);
        assert_eq!(book.primary_arn_member.as_deref(), Some("BookArn"));
        assert!(book.spec_fields["Title"].required);
        assert_eq!(book.status_fields["CreatedAt"].rust_type, "metav1::Time");
        assert_eq!(book.status_fields["Pages"].rust_type, "i64");
    }

    #[test]
    fn test_should_collect_operations_by_verb() {
        let crds = derive(BOOKS, "").expect("test derive");
        let book = &crds[1];
        assert_eq!(book.ops.create.as_ref().map(|o| o.name.as_str()), Some("CreateBook"));
        assert_eq!(book.ops.read_one.as_ref().map(|o| o.name.as_str()), Some("DescribeBook"));
        assert_eq!(book.ops.read_many.as_ref().map(|o| o.name.as_str()), Some("ListBooks"));
        assert_eq!(book.ops.delete.as_ref().map(|o| o.name.as_str()), Some("DeleteBook"));
        assert!(book.ops.update.is_none());
        assert!(book.ops.get_attributes.is_none());
    }

    #[test]
    fn test_should_apply_ignore_and_rename_rules() {
        let yaml = r"
ignore:
  operations: [DeleteBook]
  resource_names: [Author]
  shape_names: [LegacyConfig]
  field_paths: [CreateBookRequest.Debug]
renames:
  CreateBook:
    Bucket: Shelf
";
        let crds = derive(BOOKS, yaml).expect("test derive");
        assert_eq!(crds.len(), 1);
        let book = &crds[0];
        assert_eq!(keys(&book.spec_fields), vec!["Shelf", "Title"]);
        assert!(book.ops.delete.is_none());
    }

    #[test]
    fn test_should_honour_operation_overrides() {
        let yaml = r"
operations:
  ArchiveBook:
    operation_type: Update
    resource_name: Book
";
        let crds = derive(BOOKS, yaml).expect("test derive");
        let book = crds.iter().find(|c| c.names.original == "Book").expect("book");
        assert_eq!(book.ops.update.as_ref().map(|o| o.name.as_str()), Some("ArchiveBook"));
    }

    #[test]
    fn test_should_add_configured_extra_fields() {
        let yaml = r"
resources:
  Book:
    fields:
      Summary:
        from:
          operation: DescribeBook
          path: Title
      Revision:
        type: u32
        is_read_only: true
";
        let crds = derive(BOOKS, yaml).expect("test derive");
        let book = &crds[1];
        assert!(book.spec_fields.contains_key("Summary"));
        assert_eq!(book.status_fields["Revision"].rust_type, "u32");
        assert!(book.status_fields["Revision"].shape_ref.is_none());
    }

    #[test]
    fn test_should_fail_on_nil_create_input() {
        let descriptor = r#"{
            "operations": {"CreateThing": {"input": {"shape": "Missing"}}},
            "shapes": {}
        }"#;
        match derive(descriptor, "") {
            Err(GenerateError::NilShapeReference { shape, .. }) => assert_eq!(shape, "Missing"),
            other => panic!("expected NilShapeReference, got {other:?}"),
        }
    }

    #[test]
    fn test_should_fail_on_nil_member_reference() {
        let descriptor = r#"{
            "operations": {"CreateThing": {"input": {"shape": "Req"}}},
            "shapes": {"Req": {"type": "structure", "members": {"Broken": {"shape": "Nowhere"}}}}
        }"#;
        assert!(matches!(
            derive(descriptor, ""),
            Err(GenerateError::NilShapeReference { .. })
        ));
    }

    #[test]
    fn test_should_list_resource_names() {
        let graph = ShapeGraph::from_json(BOOKS).expect("test graph");
        let config = GeneratorConfig::default();
        assert_eq!(resource_names(&graph, &config), vec!["Author".to_owned(), "Book".to_owned()]);
    }
}
