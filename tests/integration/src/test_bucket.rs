//! Bucket: resource whose only read is a list.

#[cfg(test)]
mod tests {
    use ackgen_core::{OpType, exception_code};
    use pretty_assertions::assert_eq;

    use crate::load_generator;

    #[test]
    fn test_should_derive_list_only_resource() {
        let generator = load_generator("bucket");
        let bucket = generator.crd("Bucket").expect("derive").expect("bucket resource");

        assert!(bucket.ops.read_one.is_none());
        assert!(bucket.ops.read_many.is_some());
        let spec: Vec<&str> = bucket.spec_fields.keys().map(String::as_str).collect();
        assert_eq!(spec, vec!["ACL", "CreateBucketConfiguration", "Name"]);
        let status: Vec<&str> = bucket.status_fields.keys().map(String::as_str).collect();
        assert_eq!(status, vec!["Location"]);
    }

    #[test]
    fn test_should_scan_listed_buckets_by_name() {
        let generator = load_generator("bucket");
        let bucket = generator.crd("Bucket").expect("derive").expect("bucket resource");
        let code = generator
            .synthesizer(bucket)
            .set_output(OpType::List, "resp", "ko", 0)
            .expect("list output");
        let expected = "let mut found = false;
for elem in resp.buckets.iter().flatten() {
    if let Some(elemf0) = &elem.name {
        if ko.spec.name.as_ref().is_some_and(|known| known != elemf0) {
            continue;
        }
    }
    if let Some(elemf0) = &elem.name {
        ko.spec.name = Some(elemf0.clone());
    }
    found = true;
    break;
}
if !found {
    return Err(ackerr::Error::NotFound);
}
";
        assert_eq!(code, expected);
    }

    #[test]
    fn test_should_apply_member_renames_to_requests() {
        let generator = load_generator("bucket");
        let bucket = generator.crd("Bucket").expect("derive").expect("bucket resource");
        let synth = generator.synthesizer(bucket);

        let delete = synth.set_input(OpType::Delete, "ko", "res", 0).expect("delete input");
        assert_eq!(delete, "if let Some(f0) = &ko.spec.name {\n    res.bucket = Some(f0.clone());\n}\n");

        let create = synth.set_input(OpType::Create, "ko", "res", 0).expect("create input");
        assert!(create.contains("if let Some(f1) = &ko.spec.name {\n    res.bucket = Some(f1.clone());\n}\n"));
        assert!(create.contains("    let mut f2val = svcsdk::CreateBucketConfiguration::default();\n"));
        assert!(!create.contains("object_lock"));
    }

    #[test]
    fn test_should_fall_back_to_list_errors_for_not_found() {
        let generator = load_generator("bucket");
        let bucket = generator.crd("Bucket").expect("derive").expect("bucket resource");
        assert_eq!(exception_code(generator.graph(), bucket, 404), "NoSuchBucket");
    }

    #[test]
    fn test_should_render_not_found_inside_output_function() {
        let files = load_generator("bucket").generate_all().expect("generate");
        let sdk = &files["resource/bucket/sdk.rs"];
        assert!(!sdk.contains("new_read_many_request"));
        assert!(sdk.contains(
            "pub fn set_read_many_output(resp: &svcsdk::ListBucketsOutput, ko: &mut svcapitypes::Bucket) -> Result<(), ackerr::Error> {\n    let mut found = false;\n"
        ));
        assert!(sdk.contains("    if !found {\n        return Err(ackerr::Error::NotFound);\n    }\n    Ok(())\n}\n"));
        assert!(files["resource/bucket/mod.rs"].contains("pub const NOT_FOUND_CODE: &str = \"NoSuchBucket\";"));
    }
}
