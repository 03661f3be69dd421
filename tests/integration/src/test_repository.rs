//! Repository: single-member output wrapper with nested types.

#[cfg(test)]
mod tests {
    use ackgen_core::{OpType, exception_code};

    use crate::load_generator;

    #[test]
    fn test_should_derive_status_from_wrapped_structure() {
        let generator = load_generator("repository");
        let repository = generator.crd("Repository").expect("derive").expect("repository resource");

        let spec: Vec<&str> = repository.spec_fields.keys().map(String::as_str).collect();
        assert_eq!(
            spec,
            vec![
                "encryptionConfiguration",
                "imageScanningConfiguration",
                "imageTagMutability",
                "registryId",
                "repositoryName",
                "tags",
            ]
        );
        let status: Vec<&str> = repository.status_fields.keys().map(String::as_str).collect();
        assert_eq!(status, vec!["createdAt", "repositoryUri"]);
        assert!(!repository.status_fields.contains_key("repository"));
        assert_eq!(repository.primary_arn_member.as_deref(), Some("repositoryArn"));

        assert_eq!(repository.spec_fields["tags"].rust_type, "Vec<Tag>");
        assert_eq!(repository.status_fields["createdAt"].rust_type, "metav1::Time");
    }

    #[test]
    fn test_should_collect_nested_types_and_enums() {
        let generator = load_generator("repository");
        let type_defs: Vec<&str> = generator
            .type_defs()
            .expect("type defs")
            .iter()
            .map(|d| d.names.camel.as_str())
            .collect();
        assert_eq!(type_defs, vec!["EncryptionConfiguration", "ImageScanningConfiguration", "Tag"]);

        let enum_defs: Vec<&str> = generator.enum_defs().iter().map(|d| d.names.camel.as_str()).collect();
        assert_eq!(enum_defs, vec!["EncryptionType", "ImageTagMutability"]);
    }

    #[test]
    fn test_should_suffix_shape_colliding_with_resource() {
        let generator = load_generator("repository");
        let renames = generator.renames();
        assert_eq!(renames.type_name("Repository"), "RepositorySDK");
        assert!(renames.is_renamed("Repository"));
        assert_eq!(renames.type_name("Tag"), "Tag");
        assert!(!renames.is_renamed("Tag"));
    }

    #[test]
    fn test_should_unwrap_create_output() {
        let generator = load_generator("repository");
        let repository = generator.crd("Repository").expect("derive").expect("repository resource");
        let code = generator
            .synthesizer(repository)
            .set_output(OpType::Create, "resp", "ko", 0)
            .expect("create output");

        assert!(code.starts_with("if let Some(wrapper) = &resp.repository {\n"));
        assert!(code.contains("    if let Some(f0) = &wrapper.repository_arn {\n"));
        assert!(code.contains("AwsResourceName::from(f0.clone())"));
        assert!(code.contains("    if let Some(f3) = &wrapper.repository_uri {\n        ko.status.repository_uri = Some(f3.clone());\n"));
        assert!(code.contains("        ko.status.created_at = Some(metav1::Time(*f4));\n"));
        // Create responses never overwrite desired state.
        assert!(!code.contains("ko.spec."));
        assert!(code.ends_with("}\n"));
    }

    #[test]
    fn test_should_build_nested_request_values() {
        let generator = load_generator("repository");
        let repository = generator.crd("Repository").expect("derive").expect("repository resource");
        let code = generator
            .synthesizer(repository)
            .set_input(OpType::Create, "ko", "res", 0)
            .expect("create input");

        let tags = "if let Some(f2) = &ko.spec.tags {
    let mut f2val = Vec::with_capacity(f2.len());
    for f2iter in f2 {
        let mut f2elemval = svcsdk::Tag::default();
        if let Some(f2elemf0) = &f2iter.key {
            f2elemval.key = Some(f2elemf0.clone());
        }
        if let Some(f2elemf1) = &f2iter.value {
            f2elemval.value = Some(f2elemf1.clone());
        }
        f2val.push(f2elemval);
    }
    res.tags = Some(f2val);
}
";
        assert!(code.contains(tags), "unexpected tags block in:\n{code}");
        assert!(code.contains("let mut f5val = svcsdk::EncryptionConfiguration::default();"));
        assert!(code.contains("res.image_tag_mutability = Some(f3.clone());"));
    }

    #[test]
    fn test_should_scan_described_repositories() {
        let generator = load_generator("repository");
        let repository = generator.crd("Repository").expect("derive").expect("repository resource");
        let code = generator
            .synthesizer(repository)
            .set_output(OpType::List, "resp", "ko", 0)
            .expect("list output");

        assert!(code.starts_with("let mut found = false;\nfor elem in resp.repositories.iter().flatten() {\n"));
        let name_check = "    if let Some(elemf2) = &elem.repository_name {
        if ko.spec.repository_name.as_ref().is_some_and(|known| known != elemf2) {
            continue;
        }
    }
    if let Some(elemf1) = &elem.registry_id {
        if ko.spec.registry_id.as_ref().is_some_and(|known| known != elemf1) {
            continue;
        }
    }
";
        assert!(code.contains(name_check), "unexpected match checks in:\n{code}");
        assert!(code.contains("        let mut elemf6val = svcapitypes::ImageScanningConfiguration::default();\n"));
        assert!(code.contains("        ko.spec.image_tag_mutability = Some(elemf5.clone());\n"));
        assert!(code.ends_with("if !found {\n    return Err(ackerr::Error::NotFound);\n}\n"));
    }

    #[test]
    fn test_should_apply_override_values_to_delete() {
        let generator = load_generator("repository");
        let repository = generator.crd("Repository").expect("derive").expect("repository resource");
        let code = generator
            .synthesizer(repository)
            .set_input(OpType::Delete, "ko", "res", 0)
            .expect("delete input");
        assert!(code.contains("res.repository_name = Some(f1.clone());"));
        assert!(code.ends_with("res.force = Some(true);\n"));
    }

    #[test]
    fn test_should_prefer_configured_exception_code() {
        let generator = load_generator("repository");
        let repository = generator.crd("Repository").expect("derive").expect("repository resource");
        assert_eq!(exception_code(generator.graph(), repository, 404), "RepositoryNotFoundException");
        // No point read, so the list read's declared errors are consulted.
        assert_eq!(exception_code(generator.graph(), repository, 500), "ServerException");

        let files = generator.generate_all().expect("generate");
        assert!(files["resource/repository/mod.rs"]
            .contains("pub const NOT_FOUND_CODE: &str = \"RepositoryNotFoundException\";"));
    }

    #[test]
    fn test_should_render_nested_types() {
        let files = load_generator("repository").generate_all().expect("generate");
        let types = &files["apis/types.rs"];
        assert!(types.contains("pub struct Tag {"));
        assert!(types.contains("    pub encryption_type: Option<String>,"));
        assert!(!types.contains("pub struct RepositorySDK"));

        let resource = &files["apis/repository.rs"];
        assert!(resource.contains("use super::types::*;"));
        assert!(resource.contains("    pub tags: Option<Vec<Tag>>,"));
        assert!(resource.contains("    pub created_at: Option<metav1::Time>,"));

        let enums = &files["apis/enums.rs"];
        assert!(enums.contains("    #[serde(rename = \"AES256\")]\n    AES256,"));
    }
}
