//! CLI tests for `mt-narrative resolve` and `free-format`.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use assert_cmd::cargo;

fn narrative_cmd() -> Command {
    Command::new(cargo::cargo_bin!("mt-narrative"))
}

fn write_temp(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("field.txt");
    fs::write(&path, content).expect("write temp field");
    (dir, path.to_string_lossy().to_string())
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = narrative_cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid json ({e}): {stdout}"))
}

#[test]
fn resolve_file_json() {
    let (_dir, path) = write_temp("/DEAL/REFERENCE TEXT\n//MORE TEXT\n");
    let output = narrative_cmd()
        .args(["resolve", "--field", "77A", &path, "--output", "json"])
        .output()
        .expect("run resolve");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["field"], "77A");
    assert_eq!(json["format"], "format1");
    let item = &json["narrative"]["structured"][0];
    assert_eq!(item["codeword"], "DEAL");
    assert_eq!(item["narrative_fragments"][0], "REFERENCE TEXT");
    assert_eq!(item["narrative_fragments"][1], "MORE TEXT");
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn resolve_stdin_with_currency() {
    let output = run_with_stdin(
        &["resolve", "-f", "71B", "--output", "json"],
        "/CHGS/USD12,50late fee\n",
    );
    assert!(output.status.success());
    let json = stdout_json(&output);
    let item = &json["narrative"]["structured"][0];
    assert_eq!(item["currency"], "USD");
    assert_eq!(item["amount"], "12.50");
    assert_eq!(item["narrative_fragments"][0], "late fee");
}

#[test]
fn rejected_codeword_is_reported_as_info() {
    let (_dir, path) = write_temp("/DEAL/A\n/bad/B\n");
    let output = narrative_cmd()
        .args(["resolve", "--field", "77A", &path, "--output", "json"])
        .output()
        .expect("run resolve");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["narrative"]["unstructured"][0], "/bad/B");
    let diag = &json["diagnostics"][0];
    assert_eq!(diag["id"], "NARR1101");
    assert_eq!(diag["severity"], "info");
    assert_eq!(diag["span"]["start"], 8);
}

#[test]
fn unknown_field_warns_and_succeeds() {
    let (_dir, path) = write_temp("/DEAL/X\n");
    let output = narrative_cmd()
        .args(["resolve", "--field", "20", &path, "--output", "json"])
        .output()
        .expect("run resolve");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert!(json["format"].is_null());
    assert_eq!(json["diagnostics"][0]["id"], "NARR1001");
    assert_eq!(json["diagnostics"][0]["severity"], "warn");
}

#[test]
fn bad_amount_exits_with_error() {
    let (_dir, path) = write_temp("/CHGS/USD12,50.3\n");
    let output = narrative_cmd()
        .args(["resolve", "--field", "71B", &path, "--output", "json"])
        .output()
        .expect("run resolve");

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert!(json["narrative"].is_null());
    let diag = &json["diagnostics"][0];
    assert_eq!(diag["id"], "NARR1002");
    assert_eq!(diag["severity"], "error");
    assert_eq!(diag["context"]["amount"], "12.50.3");
    assert_eq!(diag["context"]["field"], "71B");
}

#[test]
fn pretty_output_renders_diagnostics_on_stderr() {
    let (_dir, path) = write_temp("/DEAL/A\n/bad/B\n");
    let output = narrative_cmd()
        .args(["resolve", "--field", "77A", &path, "--output", "pretty"])
        .output()
        .expect("run resolve");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("\"DEAL\""), "unexpected stdout: {stdout}");
    assert!(stderr.contains("NARR1101"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("1 info"), "unexpected stderr: {stderr}");
}

#[test]
fn pretty_output_prints_unknown_field_as_plain_line() {
    let (_dir, path) = write_temp("/DEAL/A\n");
    let output = narrative_cmd()
        .args(["resolve", "--field", "32A", &path, "--output", "pretty"])
        .output()
        .expect("run resolve");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warn[NARR1001]"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("= note: field=32A"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("1 warning"), "unexpected stderr: {stderr}");
}

#[test]
fn custom_formats_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    let table = dir.path().join("formats.jsonc");
    fs::write(
        &table,
        r#"{
  // treat field 20 as a codeword field
  "schema_version": "1.0.0",
  "fields": { "20": { "format": "format2" }, },
}"#,
    )
    .expect("write table");
    let output = run_with_stdin(
        &[
            "resolve",
            "--field",
            "20",
            "--formats",
            table.to_str().unwrap(),
            "--output",
            "json",
        ],
        "/REF1/ABC\n",
    );
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["format"], "format2");
    assert_eq!(json["narrative"]["structured"][0]["codeword"], "REF1");
}

#[test]
fn free_format_command() {
    let output = run_with_stdin(&["free-format", "--output", "json"], "/ABC/text1/DEF/text2");
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["format"], "format8");
    assert_eq!(json["narrative"]["structured"][0]["codeword"], "ABC");
    assert_eq!(json["narrative"]["structured"][1]["narrative_fragments"][0], "text2");
}
