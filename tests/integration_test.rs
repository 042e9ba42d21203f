//! 통합 테스트 모듈
//!
//! 소스 트리 전체를 변환하는 흐름을 테스트합니다.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 테스트용 JSON 파일 생성 헬퍼
fn create_json_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// 스토어 내보내기 구조 생성
fn setup_store() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let flows = root.join("flows");
    let components = root.join("components");

    create_json_file(
        root,
        "store_index.json",
        r#"{"total": 3, "source": "https://langflow.org", "modules": ["langflow.custom"]}"#,
    );
    create_json_file(
        &flows,
        "flows_index.json",
        r#"{"flows": [{"id": "flow1", "module": "langflow.io"}]}"#,
    );
    create_json_file(
        &flows,
        "flow1.json",
        r#"{"id": "flow1", "description": "Chat", "data": {"code": "from langflow.custom import Foo"}}"#,
    );
    create_json_file(
        &flows,
        "flow2.json",
        r#"{"id": "flow2", "data": {"nodes": [{"text": "hello"}]}}"#,
    );
    create_json_file(
        &components,
        "components_index.json",
        r#"{"components": []}"#,
    );
    create_json_file(
        &components,
        "comp1.json",
        r#"{"data": {"url": "https://docs.langflow.org/x"}, "original": {"data": {"type": "'langflow.schema.message'"}}}"#,
    );

    temp_dir
}

mod converter_tests {
    use super::*;
    use flowport::Converter;

    #[test]
    fn test_full_run() {
        let source = setup_store();
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("converted");

        let stats = Converter::default().run(source.path(), &out).unwrap();

        assert_eq!(stats.total_files(), 3);
        assert_eq!(stats.converted_files(), 2);
        assert_eq!(stats.unchanged_files(), 1);
        assert_eq!(stats.error_files(), 0);
        assert_eq!(stats.index_files(), 3);
        assert!(stats.total_substitutions() >= 3);

        let flow1 = read_json(&out.join("flows/flow1.json"));
        assert_eq!(flow1["data"]["code"], "from axiestudio.custom import Foo");
        assert!(flow1["conversion"]["conversionsMade"].as_u64().unwrap() >= 1);
        assert!(flow1["description"]
            .as_str()
            .unwrap()
            .starts_with("Chat (Converted from Langflow Store"));

        let flow2 = read_json(&out.join("flows/flow2.json"));
        assert_eq!(flow2["data"], json!({"nodes": [{"text": "hello"}]}));
        assert_eq!(flow2["conversion"]["conversionsMade"], 0);

        let comp1 = read_json(&out.join("components/comp1.json"));
        assert_eq!(comp1["data"]["url"], "https://docs.axiestudio.org/x");
        assert_eq!(comp1["original"]["data"]["type"], "'axiestudio.schema.message'");
    }

    #[test]
    fn test_index_files_get_metadata_only() {
        let source = setup_store();
        let out = TempDir::new().unwrap();

        Converter::default().run(source.path(), out.path()).unwrap();

        let store = read_json(&out.path().join("store_index.json"));
        assert_eq!(store["source"], "https://langflow.org");
        assert_eq!(store["modules"][0], "langflow.custom");
        assert_eq!(store["conversionInfo"]["convertedFrom"], "langflow");
        assert_eq!(store["conversionInfo"]["originalSource"], "Langflow Store");

        let flows_index = read_json(&out.path().join("flows/flows_index.json"));
        assert_eq!(flows_index["flows"][0]["module"], "langflow.io");
        assert_eq!(flows_index["conversionInfo"]["convertedTo"], "axiestudio");
        assert!(flows_index["conversionInfo"].get("originalSource").is_none());

        assert!(out.path().join("components/components_index.json").exists());
    }

    #[test]
    fn test_partial_failure_tolerance() {
        let source = TempDir::new().unwrap();
        let flows = source.path().join("flows");
        for i in 0..5 {
            create_json_file(
                &flows,
                &format!("flow{}.json", i),
                r#"{"data": {"code": "import langflow.io"}}"#,
            );
        }
        create_json_file(&flows, "flow2.json", r#"{"data": broken"#);

        let out = TempDir::new().unwrap();
        let stats = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(stats.total_files(), 5);
        assert_eq!(stats.error_files(), 1);
        assert_eq!(stats.converted_files(), 4);
        assert!(!out.path().join("flows/flow2.json").exists());
        for i in [0, 1, 3, 4] {
            let flow = read_json(&out.path().join(format!("flows/flow{}.json", i)));
            assert_eq!(flow["data"]["code"], "import axiestudio.io");
        }

        let failures = stats.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].path.ends_with("flow2.json"));
        assert!(failures[0].message.contains("JSON 파싱 실패"));
    }

    #[test]
    fn test_index_failure_recorded_like_item_failure() {
        let source = setup_store();
        create_json_file(&source.path().join("flows"), "flows_index.json", "{broken");

        let out = TempDir::new().unwrap();
        let stats = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(stats.total_files(), 3);
        assert_eq!(stats.index_files(), 2);
        assert_eq!(stats.error_files(), 1);
        assert!(!out.path().join("flows/flows_index.json").exists());
        assert!(out.path().join("store_index.json").exists());

        let failures = stats.failures();
        assert!(failures[0].path.ends_with("flows_index.json"));
        assert!(failures[0].message.contains("JSON 파싱 실패"));
    }

    #[test]
    fn test_non_object_item_counted_as_error() {
        let source = TempDir::new().unwrap();
        create_json_file(&source.path().join("components"), "list.json", "[1, 2]");

        let out = TempDir::new().unwrap();
        let stats = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(stats.total_files(), 1);
        assert_eq!(stats.error_files(), 1);
        assert!(!out.path().join("components/list.json").exists());
    }

    #[test]
    fn test_missing_collections_are_skipped() {
        let source = TempDir::new().unwrap();
        create_json_file(source.path(), "store_index.json", r#"{"total": 0}"#);

        let out = TempDir::new().unwrap();
        let stats = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(stats.total_files(), 0);
        assert_eq!(stats.error_files(), 0);
        assert_eq!(stats.index_files(), 1);
        assert!(out.path().join("flows").is_dir());
        assert!(out.path().join("components").is_dir());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let err = Converter::default()
            .run(&temp_dir.path().join("absent"), &temp_dir.path().join("out"))
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_rerun_over_previous_output() {
        let source = setup_store();
        let out = TempDir::new().unwrap();

        Converter::default().run(source.path(), out.path()).unwrap();
        let second = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(second.error_files(), 0);
        let flow1 = read_json(&out.path().join("flows/flow1.json"));
        assert_eq!(flow1["data"]["code"], "from axiestudio.custom import Foo");
    }

    #[test]
    fn test_converting_output_again_finds_nothing() {
        let source = setup_store();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        Converter::default().run(source.path(), first.path()).unwrap();
        let stats = Converter::default().run(first.path(), second.path()).unwrap();

        assert_eq!(stats.total_files(), 3);
        assert_eq!(stats.converted_files(), 0);
        assert_eq!(stats.total_substitutions(), 0);
    }
}

mod discovery_tests {
    use super::*;
    use flowport::Converter;

    #[cfg(unix)]
    #[test]
    fn test_symlinked_item_is_converted() {
        use std::os::unix::fs::symlink;

        let source = TempDir::new().unwrap();
        let flows = source.path().join("flows");
        create_json_file(&flows, "plain.json", r#"{"data": {"code": "x = 1"}}"#);
        let target = create_json_file(
            &source.path().join("shared"),
            "real.json",
            r#"{"data": {"code": "import langflow.io"}}"#,
        );
        symlink(&target, flows.join("linked.json")).unwrap();

        let out = TempDir::new().unwrap();
        let stats = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(stats.total_files(), 2);
        assert_eq!(stats.error_files(), 0);
        let linked = read_json(&out.path().join("flows/linked.json"));
        assert_eq!(linked["data"]["code"], "import axiestudio.io");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_is_counted() {
        use std::os::unix::fs::symlink;

        let source = TempDir::new().unwrap();
        let components = source.path().join("components");
        create_json_file(&components, "ok.json", r#"{"data": {}}"#);
        symlink(source.path().join("missing.json"), components.join("broken.json")).unwrap();

        let out = TempDir::new().unwrap();
        let stats = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(stats.total_files(), 1);
        assert_eq!(stats.error_files(), 1);
        assert!(out.path().join("components/ok.json").exists());

        let failures = stats.failures();
        assert!(failures[0].path.ends_with("broken.json"));
        assert!(failures[0].message.contains("항목을 읽을 수 없습니다"));
    }
}

mod write_failure_tests {
    use super::*;
    use flowport::Converter;

    #[test]
    fn test_write_failure_is_recovered() {
        let source = setup_store();
        let out = TempDir::new().unwrap();
        // 출력 자리에 폴더가 있어 rename이 실패한다
        fs::create_dir_all(out.path().join("flows/flow1.json/occupied")).unwrap();

        let stats = Converter::default().run(source.path(), out.path()).unwrap();

        assert_eq!(stats.total_files(), 3);
        assert_eq!(stats.error_files(), 1);
        assert_eq!(stats.converted_files() + stats.unchanged_files(), 2);

        let failures = stats.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].path.ends_with("flow1.json"));
        assert!(failures[0].message.contains("파일 쓰기 실패"));
        assert!(failures[0].message.contains("flow1.json"));

        assert!(out.path().join("flows/flow1.json").is_dir());
        assert!(out.path().join("flows/flow2.json").is_file());
        assert!(out.path().join("components/comp1.json").is_file());
        assert_eq!(stats.index_files(), 3);
    }
}

mod pattern_tests {
    use super::*;
    use flowport::{Converter, PatternMatcher};

    #[test]
    fn test_pattern_limits_item_files() {
        let source = setup_store();
        let out = TempDir::new().unwrap();

        let stats = Converter::default()
            .with_matcher(PatternMatcher::new(Some("flow1*".to_string())).unwrap())
            .run(source.path(), out.path())
            .unwrap();

        assert_eq!(stats.total_files(), 1);
        assert!(out.path().join("flows/flow1.json").exists());
        assert!(!out.path().join("flows/flow2.json").exists());
        // 인덱스 파일은 패턴과 무관
        assert_eq!(stats.index_files(), 3);
    }
}

mod malformed_tests {
    use super::*;
    use flowport::{ConversionProfile, Converter, DocumentTransformer, RuleSet};

    #[test]
    fn test_corrupting_rule_reported_per_file() {
        let source = TempDir::new().unwrap();
        let flows = source.path().join("flows");
        create_json_file(&flows, "bad.json", r#"{"data": {"code": "import old_pkg"}}"#);
        create_json_file(&flows, "good.json", r#"{"data": {"code": "nothing here"}}"#);

        let rules = RuleSet::builder()
            .exact("old_pkg", "new\"pkg")
            .unwrap()
            .build();
        let converter =
            Converter::new(DocumentTransformer::new(rules, ConversionProfile::default()));

        let out = TempDir::new().unwrap();
        let stats = converter.run(source.path(), out.path()).unwrap();

        assert_eq!(stats.error_files(), 1);
        assert_eq!(stats.unchanged_files(), 1);
        assert!(!out.path().join("flows/bad.json").exists());
        assert!(stats.failures()[0].message.contains("data"));
    }
}

mod plan_tests {
    use super::*;
    use flowport::{plan, report, PatternMatcher};

    #[test]
    fn test_dry_run_plan_writes_nothing() {
        let source = setup_store();
        let plan = plan(source.path(), &PatternMatcher::default()).unwrap();

        assert_eq!(plan.item_count(), 3);
        assert_eq!(plan.index_files.len(), 3);

        let text = report::format_plan(&plan);
        assert!(text.contains("flow1.json"));
        assert!(text.contains("comp1.json"));
    }
}

mod output_format_tests {
    use super::*;
    use flowport::{Converter, ProcessOptions};

    #[test]
    fn test_compact_output() {
        let source = setup_store();
        let out = TempDir::new().unwrap();

        Converter::default()
            .with_options(ProcessOptions::new().with_pretty(false))
            .run(source.path(), out.path())
            .unwrap();

        let text = fs::read_to_string(out.path().join("flows/flow2.json")).unwrap();
        assert!(!text.contains('\n'));
        assert!(text.starts_with(r#"{"id":"flow2""#));
    }

    #[test]
    fn test_key_order_preserved() {
        let source = setup_store();
        let out = TempDir::new().unwrap();

        Converter::default().run(source.path(), out.path()).unwrap();

        let text = fs::read_to_string(out.path().join("flows/flow1.json")).unwrap();
        let id = text.find("\"id\"").unwrap();
        let description = text.find("\"description\"").unwrap();
        let conversion = text.find("\"conversion\"").unwrap();
        assert!(id < description && description < conversion);
    }
}
