//! Queue: attribute-map resource without point read or update.

#[cfg(test)]
mod tests {
    use ackgen_core::{OpType, exception_code};

    use crate::load_generator;

    #[test]
    fn test_should_derive_present_operations_only() {
        let generator = load_generator("queue");
        let queue = generator.crd("Queue").expect("derive").expect("queue resource");

        assert!(queue.ops.update.is_none());
        assert!(queue.ops.read_one.is_none());
        for op_type in [
            OpType::Create,
            OpType::Delete,
            OpType::List,
            OpType::GetAttributes,
            OpType::SetAttributes,
        ] {
            assert!(queue.ops.get(op_type).is_some(), "{op_type} should be present");
        }
        assert_eq!(generator.crds().expect("derive").len(), 1);
    }

    #[test]
    fn test_should_split_attributes_into_spec_and_status() {
        let generator = load_generator("queue");
        let queue = generator.crd("Queue").expect("derive").expect("queue resource");

        let spec: Vec<&str> = queue.spec_fields.keys().map(String::as_str).collect();
        assert_eq!(
            spec,
            vec!["DelaySeconds", "FifoQueue", "MessageRetentionPeriod", "Policy", "QueueName", "Tags"]
        );
        let status: Vec<&str> = queue.status_fields.keys().map(String::as_str).collect();
        assert_eq!(status, vec!["CreatedTimestamp", "QueueUrl"]);

        assert_eq!(queue.spec_fields["DelaySeconds"].rust_type, "i64");
        assert_eq!(queue.spec_fields["MessageRetentionPeriod"].rust_type, "std::time::Duration");
        assert_eq!(queue.spec_fields["Tags"].rust_type, "HashMap<String, String>");
        assert!(queue.spec_fields["QueueName"].required);
    }

    #[test]
    fn test_should_build_attribute_requests() {
        let generator = load_generator("queue");
        let queue = generator.crd("Queue").expect("derive").expect("queue resource");
        let synth = generator.synthesizer(queue);

        let create = synth.set_input(OpType::Create, "ko", "res", 1).expect("create input");
        assert!(create.contains("    let mut f1val = std::collections::HashMap::new();\n"));
        assert!(create.contains("        f1val.insert(\"DelaySeconds\".to_owned(), f1f1.to_string());\n"));
        assert!(create.contains("        f1val.insert(\"MessageRetentionPeriod\".to_owned(), f1f3.as_secs().to_string());\n"));
        assert!(create.contains("        f1val.insert(\"Policy\".to_owned(), f1f4.clone());\n"));
        assert!(!create.contains("\"QueueArn\""));
        assert!(!create.contains("\"CreatedTimestamp\""));

        let get = synth.set_input(OpType::GetAttributes, "ko", "res", 0).expect("get input");
        let expected = "if let Some(f0) = &ko.status.queue_url {
    res.queue_url = Some(f0.clone());
}
res.attribute_names = Some(vec![\"All\".to_owned()]);
";
        pretty_assertions::assert_eq!(get, expected);

        let set = synth.set_input(OpType::SetAttributes, "ko", "res", 0).expect("set input");
        assert!(set.contains("res.attributes = Some(f1val);"));
    }

    #[test]
    fn test_should_parse_attribute_responses() {
        let generator = load_generator("queue");
        let queue = generator.crd("Queue").expect("derive").expect("queue resource");
        let code = generator
            .synthesizer(queue)
            .set_output(OpType::GetAttributes, "resp", "ko", 0)
            .expect("get output");

        assert!(code.starts_with("if let Some(f0) = &resp.attributes {\n"));
        assert!(code.contains("        if let Ok(f0f0val) = f0f0.parse::<i64>() {\n            ko.status.created_timestamp = Some(f0f0val);\n"));
        assert!(code.contains("        if let Ok(f0f2val) = f0f2.parse::<bool>() {\n            ko.spec.fifo_queue = Some(f0f2val);\n"));
        assert!(code.contains(
            "ko.spec.message_retention_period = Some(std::time::Duration::from_secs(f0f3val));"
        ));
        assert!(code.contains("AwsResourceName::from(f0f5.clone())"));
    }

    #[test]
    fn test_should_check_required_request_fields() {
        let generator = load_generator("queue");
        let queue = generator.crd("Queue").expect("derive").expect("queue resource");
        let synth = generator.synthesizer(queue);
        for op_type in [OpType::GetAttributes, OpType::SetAttributes] {
            assert_eq!(
                synth.required_fields_missing(op_type, "ko").expect("check"),
                "ko.status.queue_url.is_none()"
            );
        }
    }

    #[test]
    fn test_should_resolve_exception_codes_from_attribute_read() {
        let generator = load_generator("queue");
        let queue = generator.crd("Queue").expect("derive").expect("queue resource");
        assert_eq!(
            exception_code(generator.graph(), queue, 400),
            "AWS.SimpleQueueService.NonExistentQueue"
        );
        assert_eq!(exception_code(generator.graph(), queue, 404), "UNKNOWN");
    }

    #[test]
    fn test_should_render_queue_files() {
        let files = load_generator("queue").generate_all().expect("generate");
        let sdk = &files["resource/queue/sdk.rs"];
        assert!(sdk.contains("pub fn new_get_attributes_request(ko: &svcapitypes::Queue) -> svcsdk::GetQueueAttributesRequest {"));
        assert!(sdk.contains("pub fn requires_missing_get_attributes_fields(ko: &svcapitypes::Queue) -> bool {"));
        assert!(!sdk.contains("new_read_one_request"));
        assert!(!sdk.contains("new_update_request"));

        let module = &files["resource/queue/mod.rs"];
        assert!(module.contains("pub const TERMINAL_CODES: &[&str] = &[\"InvalidAttributeName\"];"));

        let types = &files["apis/queue.rs"];
        assert!(types.contains("use std::collections::HashMap;"));
        assert!(types.contains("    pub message_retention_period: Option<std::time::Duration>,"));
        assert!(types.contains("pub struct QueueStatus {"));
    }
}
