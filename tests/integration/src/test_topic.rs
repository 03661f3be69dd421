//! Topic: attribute-map resource with owner and ARN routing.

#[cfg(test)]
mod tests {
    use ackgen_core::{OpType, exception_code};
    use pretty_assertions::assert_eq;

    use crate::load_generator;

    #[test]
    fn test_should_expose_attribute_keys_as_fields() {
        let generator = load_generator("topic");
        let topic = generator.crd("Topic").expect("derive").expect("topic resource");

        let spec: Vec<&str> = topic.spec_fields.keys().map(String::as_str).collect();
        assert_eq!(spec, vec!["DisplayName", "Name", "Policy", "Tags"]);
        let status: Vec<&str> = topic.status_fields.keys().map(String::as_str).collect();
        assert_eq!(status, vec!["EffectiveDeliveryPolicy", "Owner"]);
        assert!(!topic.spec_fields.contains_key("TopicArn"));
        assert!(!topic.status_fields.contains_key("TopicArn"));
        assert_eq!(topic.primary_arn_member.as_deref(), Some("TopicArn"));
        assert!(topic.unpacks_attributes());
    }

    #[test]
    fn test_should_parse_attributes_key_by_key() {
        let generator = load_generator("topic");
        let topic = generator.crd("Topic").expect("derive").expect("topic resource");
        let code = generator
            .synthesizer(topic)
            .set_output(OpType::GetAttributes, "resp", "ko", 0)
            .expect("get attributes output");
        let expected = r#"if let Some(f0) = &resp.attributes {
    if let Some(f0f0) = f0.get("DisplayName") {
        ko.spec.display_name = Some(f0f0.clone());
    }
    if let Some(f0f1) = f0.get("EffectiveDeliveryPolicy") {
        ko.status.effective_delivery_policy = Some(f0f1.clone());
    }
    if let Some(f0f2) = f0.get("Owner") {
        ko.status.ack_resource_metadata.get_or_insert_with(ackv1alpha1::ResourceMetadata::default).owner_account_id = Some(ackv1alpha1::AwsAccountId::from(f0f2.clone()));
        ko.status.owner = Some(f0f2.clone());
    }
    if let Some(f0f3) = f0.get("Policy") {
        ko.spec.policy = Some(f0f3.clone());
    }
    if let Some(f0f4) = f0.get("TopicArn") {
        ko.status.ack_resource_metadata.get_or_insert_with(ackv1alpha1::ResourceMetadata::default).arn = Some(ackv1alpha1::AwsResourceName::from(f0f4.clone()));
    }
}
"#;
        assert_eq!(code, expected);
    }

    #[test]
    fn test_should_format_spec_attributes_on_create() {
        let generator = load_generator("topic");
        let topic = generator.crd("Topic").expect("derive").expect("topic resource");
        let code = generator
            .synthesizer(topic)
            .set_input(OpType::Create, "ko", "res", 0)
            .expect("create input");

        let attributes = r#"let mut f1val = std::collections::HashMap::new();
if let Some(f1f0) = &ko.spec.display_name {
    f1val.insert("DisplayName".to_owned(), f1f0.clone());
}
if let Some(f1f3) = &ko.spec.policy {
    f1val.insert("Policy".to_owned(), f1f3.clone());
}
if !f1val.is_empty() {
    res.attributes = Some(f1val);
}
"#;
        assert!(code.contains(attributes), "unexpected attribute block in:\n{code}");
        assert!(!code.contains("\"Owner\""));
        assert!(!code.contains("\"EffectiveDeliveryPolicy\""));
    }

    #[test]
    fn test_should_route_arn_through_metadata_on_requests() {
        let generator = load_generator("topic");
        let topic = generator.crd("Topic").expect("derive").expect("topic resource");
        let synth = generator.synthesizer(topic);

        let code = synth.set_input(OpType::GetAttributes, "ko", "res", 0).expect("get input");
        assert_eq!(
            code,
            "if let Some(f0) = ko.status.ack_resource_metadata.as_ref().and_then(|m| m.arn.as_ref()) {\n    res.topic_arn = Some(f0.to_string());\n}\n"
        );
        assert!(synth.set_input(OpType::SetAttributes, "ko", "res", 0).expect("set input").is_empty());
        assert_eq!(
            synth.required_fields_missing(OpType::SetAttributes, "ko").expect("check"),
            "ko.status.ack_resource_metadata.as_ref().and_then(|m| m.arn.as_ref()).is_none()"
        );
    }

    #[test]
    fn test_should_resolve_topic_exception_codes() {
        let generator = load_generator("topic");
        let topic = generator.crd("Topic").expect("derive").expect("topic resource");
        assert_eq!(exception_code(generator.graph(), topic, 404), "NotFound");
        assert_eq!(exception_code(generator.graph(), topic, 400), "InvalidParameter");
        assert_eq!(exception_code(generator.graph(), topic, 503), "UNKNOWN");
    }
}
