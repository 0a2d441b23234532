//! Integration tests for the `tagxml` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the to-xml,
//! to-json and check subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, envelopes, error handling, and roundtrip
//! correctness.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the sample.json fixture.
fn sample_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.json")
}

/// Helper: path to the sample.xml fixture (canonical encoding of sample.json).
fn sample_xml_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.xml")
}

fn sample_json() -> String {
    std::fs::read_to_string(sample_json_path()).expect("sample.json fixture must exist")
}

fn sample_xml() -> String {
    std::fs::read_to_string(sample_xml_path()).expect("sample.xml fixture must exist")
}

/// Helper: a `tagxml` command isolated from the caller's environment.
fn tagxml() -> Command {
    let mut cmd = Command::cargo_bin("tagxml").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("TAGXML_MAX_DEPTH");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// to-xml subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn to_xml_stdin_to_stdout() {
    tagxml()
        .arg("to-xml")
        .write_stdin(r#"{"a":1,"b":[true,null]}"#)
        .assert()
        .success()
        .stdout(concat!(
            r#"<ITEM type="object"><ITEM type="integer" key="a" value="1"></ITEM>"#,
            r#"<ITEM type="list" key="b"><ITEM type="boolean" value="true"></ITEM>"#,
            r#"<ITEM type="null"></ITEM></ITEM></ITEM>"#,
        ));
}

#[test]
fn to_xml_file_matches_fixture() {
    tagxml()
        .args(["to-xml", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout(sample_xml());
}

#[test]
fn to_xml_file_to_file() {
    let output_path = "/tmp/tagxml-test-to-xml-output.xml";
    let _ = std::fs::remove_file(output_path);

    tagxml()
        .args(["to-xml", "-i", sample_json_path(), "-o", output_path])
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert_eq!(content, sample_xml());

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn to_xml_invalid_json_fails() {
    tagxml()
        .arg("to-xml")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON input"));
}

#[test]
fn to_xml_rejects_values_xml_cannot_carry() {
    for json in [r#"{"s":"a\u0001b"}"#, "[18446744073709551616]"] {
        tagxml()
            .arg("to-xml")
            .write_stdin(json)
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Unsupported value type"));
    }
}

#[test]
fn to_xml_missing_file_fails() {
    tagxml()
        .args(["to-xml", "-i", "/tmp/tagxml-test-does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// to-json subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn to_json_stdin_to_stdout_compact() {
    tagxml()
        .arg("to-json")
        .write_stdin(r#"<ITEM type="list"><ITEM type="float" value="3.0"/><ITEM type="integer" value="3"/></ITEM>"#)
        .assert()
        .success()
        .stdout("[3.0,3]");
}

#[test]
fn to_json_pretty_matches_fixture() {
    tagxml()
        .args(["to-json", "--pretty", "-i", sample_xml_path()])
        .assert()
        .success()
        .stdout(sample_json().trim_end().to_string());
}

#[test]
fn to_json_file_to_file() {
    let json_path = "/tmp/tagxml-test-to-json-output.json";
    let _ = std::fs::remove_file(json_path);

    tagxml()
        .args(["to-json", "-i", sample_xml_path(), "-o", json_path])
        .assert()
        .success();

    let content = std::fs::read_to_string(json_path).expect("output JSON file must exist");
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    let expected: serde_json::Value = serde_json::from_str(&sample_json()).unwrap();
    assert_eq!(parsed, expected);

    let _ = std::fs::remove_file(json_path);
}

#[test]
fn to_json_envelope_wraps_data() {
    let output = tagxml()
        .args(["to-json", "--envelope"])
        .write_stdin(r#"<ITEM type="object"><ITEM type="string" key="k" value="v"/></ITEM>"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "success": true, "data": { "k": "v" } })
    );
}

#[test]
fn to_json_envelope_reports_errors_on_stdout() {
    let output = tagxml()
        .args(["to-json", "--envelope"])
        .write_stdin(r#"<ITEM type="list"><ITEM type="null"/>"#)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["success"], serde_json::json!(false));
    let errors = body["errors"].as_str().unwrap();
    assert!(errors.contains("Malformed markup"), "{errors}");
}

#[test]
fn to_json_malformed_markup_fails() {
    tagxml()
        .arg("to-json")
        .write_stdin(r#"<ITEM type="list">"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed markup"));
}

#[test]
fn to_json_mixed_keys_fails() {
    tagxml()
        .arg("to-json")
        .write_stdin(r#"<ITEM type="object"><ITEM type="null" key="a"/><ITEM type="null"/></ITEM>"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid schema"));
}

#[test]
fn to_json_respects_max_depth_flag() {
    let xml = r#"<ITEM type="list"><ITEM type="list"><ITEM type="list"/></ITEM></ITEM>"#;

    tagxml()
        .args(["to-json", "--max-depth", "2"])
        .write_stdin(xml)
        .assert()
        .failure()
        .stderr(predicate::str::contains("maximum depth of 2"));

    tagxml()
        .args(["to-json", "--max-depth", "3"])
        .write_stdin(xml)
        .assert()
        .success()
        .stdout("[[[]]]");
}

#[test]
fn to_json_reads_max_depth_from_env() {
    tagxml()
        .arg("to-json")
        .env("TAGXML_MAX_DEPTH", "1")
        .write_stdin(r#"<ITEM type="list"><ITEM type="null"/></ITEM>"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("maximum depth of 1"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_valid_document() {
    tagxml()
        .args(["check", "-i", sample_xml_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: object"));
}

#[test]
fn check_rejects_capitalized_boolean() {
    tagxml()
        .arg("check")
        .write_stdin(r#"<ITEM type="boolean" value="True"/>"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("tagged-element convention"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Roundtrip and misc
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_to_xml_to_json_pipeline() {
    let input = r#"{"id":7,"ratio":2.0,"items":[{},[],null,"x"],"nested":{"deep":{"flag":false}}}"#;

    let xml_output = tagxml()
        .arg("to-xml")
        .write_stdin(input)
        .output()
        .expect("to-xml should run");
    assert!(xml_output.status.success(), "to-xml must succeed");

    tagxml()
        .arg("to-json")
        .write_stdin(xml_output.stdout)
        .assert()
        .success()
        .stdout(input);
}

#[test]
fn verbose_logging_goes_to_stderr() {
    tagxml()
        .args(["-v", "to-xml"])
        .write_stdin("42")
        .assert()
        .success()
        .stdout(r#"<ITEM type="integer" value="42"></ITEM>"#)
        .stderr(predicate::str::contains("encoded JSON to XML"));
}

#[test]
fn help_flag_shows_usage() {
    tagxml()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("to-xml"))
        .stdout(predicate::str::contains("to-json"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn unknown_subcommand_fails() {
    tagxml().arg("stats").assert().failure();
}
