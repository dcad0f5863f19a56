//! CLI tests for `mt-narrative formats`.

use std::process::Command;

use assert_cmd::cargo;

fn narrative_cmd() -> Command {
    Command::new(cargo::cargo_bin!("mt-narrative"))
}

#[test]
fn formats_json_lists_builtin_table() {
    let output = narrative_cmd()
        .args(["formats", "--output", "json"])
        .output()
        .expect("run formats command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    let fields = json["fields"].as_array().expect("fields array");
    assert_eq!(fields.len(), 24);
    let f77a = fields.iter().find(|f| f["field"] == "77A").expect("77A");
    assert_eq!(f77a["format"], "format1");
    let f61 = fields.iter().find(|f| f["field"] == "61").expect("61");
    assert_eq!(f61["format"], "format8");
    assert_eq!(f61["source"], "supplementary_details");
}

#[test]
fn formats_pretty_groups_by_format() {
    let output = narrative_cmd()
        .args(["formats", "--output", "pretty"])
        .output()
        .expect("run formats command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("format5"), "unexpected output: {stdout}");
    assert!(stdout.contains("supplementary details: 61"), "unexpected output: {stdout}");
}
