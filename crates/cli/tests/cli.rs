use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn promptline() -> Command {
    let mut cmd = Command::cargo_bin("promptline").expect("binary");
    cmd.env_remove("PROMPTLINE_CONFIG")
        .env_remove("PROMPTLINE_INTENT_RULES")
        .arg("--quiet");
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn normalize_cleans_prose_and_keeps_urls() {
    let body = run_json(
        promptline()
            .arg("normalize")
            .arg("i like teh apples!! see https://a.b"),
    );
    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("I "), "{text}");
    assert!(text.contains("apples!"));
    assert!(!text.contains("!!"));
    assert!(text.contains("https://a.b"));
    assert_eq!(body["has_code"], false);
}

#[test]
fn reads_the_message_from_stdin() {
    let body = run_json(
        promptline()
            .arg("classify")
            .write_stdin("Hello there!\n"),
    );
    assert_eq!(body["intent"], "GREETING");
    let tags: Vec<&str> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(tags.contains(&"intent:greeting"), "{tags:?}");
}

#[test]
fn classify_reports_the_winning_rule() {
    let body = run_json(
        promptline()
            .arg("classify")
            .arg("My app crashes with a stack trace error"),
    );
    assert_eq!(body["intent"], "BUG_REPORT");
    let tags = body["tags"].as_array().unwrap();
    assert!(tags.iter().any(|t| t == "rule:bug-report"), "{tags:?}");
    assert_eq!(body["trace"].as_array().unwrap().len(), 3);
}

#[test]
fn detect_translates_domain_terms() {
    let body = run_json(
        promptline()
            .arg("detect")
            .arg("我想用微信支付购买会员，请问应该怎么操作？"),
    );
    let index_text = body["index_text"].as_str().unwrap();
    assert!(index_text.contains("wechat pay"), "{index_text}");
    assert!(index_text
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
}

#[test]
fn repeated_process_hits_the_cache() {
    let body = run_json(
        promptline()
            .args(["process", "--repeat", "3"])
            .arg("Where can I download the invoice for my last payment?"),
    );
    let request = &body["request"];
    assert_eq!(request["cache_hit"], true);
    assert_eq!(request["cache_frequency"], 3);
    assert!(request["answer"].as_str().unwrap().starts_with("Echo: "));
    assert_eq!(body["cache"]["entries"], 1);
    assert_eq!(body["cache"]["hits"], 2);
}

#[test]
fn greeting_gets_the_configured_reply() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("promptline.toml");
    fs::write(&config, "[prompt]\ngreeting_reply = \"Hi, what do you need?\"\n").unwrap();

    let body = run_json(
        promptline()
            .arg("--config")
            .arg(&config)
            .arg("process")
            .arg("Good morning"),
    );
    let request = &body["request"];
    assert_eq!(request["intent"], "GREETING");
    assert_eq!(request["answer"], "Hi, what do you need?");
    assert_eq!(body["cache"]["entries"], 0);
}

#[test]
fn process_uses_the_seeded_knowledge_base() {
    let dir = tempdir().unwrap();
    let kb = dir.path().join("kb.json");
    fs::write(
        &kb,
        r#"[
            {"id": "reset", "doc_type": "faq", "content": "reset your account password from the login page"},
            {"id": "deploy", "doc_type": "manual", "content": "deploy the service with docker compose"}
        ]"#,
    )
    .unwrap();

    let body = run_json(
        promptline()
            .arg("--kb")
            .arg(&kb)
            .args(["process", "--stream"])
            .arg("How can I reset my password?"),
    );
    let matches = body["request"]["kb_matches"].as_array().unwrap();
    assert_eq!(matches[0]["id"], "reset");
    let system = body["request"]["prompt"]["system"].as_str().unwrap();
    assert!(system.contains("Relevant knowledge:"), "{system}");

    let body = run_json(
        promptline()
            .arg("--kb")
            .arg(&kb)
            .args(["retrieve", "-k", "1"])
            .arg("docker deploy"),
    );
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["id"], "deploy");
}

#[test]
fn blank_input_fails() {
    promptline()
        .arg("process")
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Message is empty"));
}

#[test]
fn invalid_config_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[cache]\nmax_entries = 0\n").unwrap();

    promptline()
        .arg("--config")
        .arg(&config)
        .args(["normalize", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_entries"));
}
