//! Whole-run properties: reproducible output, scalar round trips, cycles.

#[cfg(test)]
mod tests {
    use std::fs;

    use ackgen_core::{GenerateError, Generator, OpType, Target};

    use crate::{load_config, load_generator, load_graph};

    const FIXTURES: [&str; 4] = ["bucket", "queue", "repository", "topic"];

    #[test]
    fn test_should_generate_identical_files_on_every_run() {
        for name in FIXTURES {
            let first = load_generator(name).generate_all().expect("first run");
            let second = load_generator(name).generate_all().expect("second run");
            assert_eq!(first, second, "{name} output differs between runs");
        }
    }

    #[test]
    fn test_should_write_reproducible_trees() {
        let files = load_generator("repository").generate_all().expect("generate");
        let dirs = [tempfile::tempdir().expect("tempdir"), tempfile::tempdir().expect("tempdir")];
        for dir in &dirs {
            for (path, content) in &files {
                let full = dir.path().join(path);
                fs::create_dir_all(full.parent().expect("parent")).expect("mkdir");
                fs::write(&full, content).expect("write");
            }
        }
        for path in files.keys() {
            let a = fs::read(dirs[0].path().join(path)).expect("read");
            let b = fs::read(dirs[1].path().join(path)).expect("read");
            assert_eq!(a, b, "{path} differs");
        }
    }

    #[test]
    fn test_should_keep_targets_disjoint() {
        let generator = load_generator("topic");
        let apis = generator.generate(&[Target::Apis]).expect("apis");
        let sdk = generator.generate(&[Target::Sdk]).expect("sdk");
        let all = generator.generate_all().expect("all");
        assert_eq!(apis.len() + sdk.len(), all.len());
        assert!(sdk.keys().all(|path| path.starts_with("resource/")));
        assert!(apis.contains_key("apis/topic.rs"));
    }

    #[test]
    fn test_should_define_every_type_named_by_resource_fields() {
        for name in FIXTURES {
            let files = load_generator(name).generate(&[Target::Apis]).expect("apis");
            let types = &files["apis/types.rs"];
            let resources = files
                .iter()
                .filter(|(p, _)| !["apis/mod.rs", "apis/types.rs", "apis/enums.rs"].contains(&p.as_str()));
            for (path, content) in resources {
                let local = content
                    .lines()
                    .filter_map(|line| line.trim().strip_prefix("pub "))
                    .filter_map(|decl| decl.split_once(": ").map(|(_, ty)| ty))
                    .flat_map(|ty| ty.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':')))
                    .filter(|word| word.starts_with(|c: char| c.is_ascii_uppercase()) && !word.contains("::"));
                for ty in local {
                    let known = ["Option", "Vec", "HashMap", "Box", "String", "JsonValue"].contains(&ty)
                        || content.contains(&format!("pub struct {ty} {{"));
                    assert!(
                        known || types.contains(&format!("pub struct {ty} {{")),
                        "{name}: {path} names undefined type {ty}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_should_round_trip_scalar_members() {
        let generator = Generator::new(load_graph("widget"), load_config("widget"));
        let widget = generator.crd("Widget").expect("derive").expect("widget resource");
        let synth = generator.synthesizer(widget);
        let input = synth.set_input(OpType::Create, "ko", "res", 0).expect("create input");
        let output = synth.set_output(OpType::Get, "resp", "ko", 0).expect("get output");

        let members = [
            ("name", "f0.clone()"),
            ("size", "*f1"),
            ("weight", "*f2"),
            ("enabled", "*f3"),
            ("ratio", "*f4"),
            ("color", "f5.clone()"),
            ("payload", "f6.clone()"),
        ];
        for (i, (field, expr)) in members.iter().enumerate() {
            let to_wire = format!("if let Some(f{i}) = &ko.spec.{field} {{\n    res.{field} = Some({expr});\n}}\n");
            let to_resource = format!("if let Some(f{i}) = &resp.{field} {{\n    ko.spec.{field} = Some({expr});\n}}\n");
            assert!(input.contains(&to_wire), "missing {field} in request code:\n{input}");
            assert!(output.contains(&to_resource), "missing {field} in response code:\n{output}");
        }
    }

    #[test]
    fn test_should_wrap_timestamps_toward_resource() {
        let generator = Generator::new(load_graph("widget"), load_config("widget"));
        let widget = generator.crd("Widget").expect("derive").expect("widget resource");
        let code = generator
            .synthesizer(widget)
            .set_output(OpType::Create, "resp", "ko", 0)
            .expect("create output");
        assert!(code.contains("ko.status.created_at = Some(metav1::Time(*f1));"));
        assert!(code.contains("ko.status.widget_id = Some(f0.clone());"));
    }

    #[test]
    fn test_should_abort_whole_run_on_recursive_structure() {
        let generator = Generator::new(load_graph("widget"), load_config("widget"));
        match generator.generate_all() {
            Err(GenerateError::ShapeCycle { shape, path }) => {
                assert_eq!(shape, "Part");
                assert_eq!(path, "CreateGadgetInput -> Part -> Part");
            }
            other => panic!("expected ShapeCycle, got {other:?}"),
        }
        // Derivation alone does not walk members recursively.
        assert!(generator.crd("Gadget").expect("derive").is_some());
    }
}
