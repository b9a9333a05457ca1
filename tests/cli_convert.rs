//! End-to-end tests for the mejson binary

use std::io::Write;
use std::process::{Command, Stdio};

use bson::{Bson, Document, doc, oid::ObjectId};
use serde_json::{Value, json};
use tempfile::TempPath;

/// The binary with an empty config file, which keeps the user's own
/// settings out of the picture. The file is removed when the returned
/// handle drops, so keep it alive until the command has run.
fn mejson() -> (Command, TempPath) {
    let config = tempfile::NamedTempFile::new().unwrap().into_temp_path();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mejson"));
    cmd.arg("--config").arg(config.as_os_str());
    (cmd, config)
}

fn dump(docs: &[Document]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for doc in docs {
        doc.to_writer(&mut file).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn converts_dump_file_to_json_lines() {
    let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    let input = dump(&[
        doc! { "id": [oid], "n": 3 },
        doc! { "when": bson::DateTime::from_millis(1_000), "u": Bson::Undefined },
    ]);

    let (mut cmd, _config) = mejson();
    let output = cmd.arg(input.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(
        lines,
        vec![
            json!({ "id": [{ "$oid": "507f1f77bcf86cd799439011" }], "n": 3 }),
            json!({ "when": { "$date": 1000 }, "u": { "$undefined": true } }),
        ]
    );
}

#[test]
fn reads_stdin_and_writes_output_file() {
    let input = dump(&[doc! { "a": 1 }]);
    let bytes = std::fs::read(input.path()).unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let out_path = out_dir.path().join("out.json");

    let (mut cmd, _config) = mejson();
    let mut child = cmd
        .args(["--format", "pretty", "--no-color", "-o"])
        .arg(&out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&bytes).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains('\n'));
    assert_eq!(serde_json::from_str::<Value>(&written).unwrap(), json!({ "a": 1 }));
}

#[test]
fn unknown_types_reported_on_stderr() {
    let input = dump(&[doc! { "k": Bson::MaxKey }]);

    let (mut cmd, _config) = mejson();
    let output = cmd
        .args(["--diagnostics", "stderr"])
        .arg(input.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("mejson: unknown type: MaxKey"));

    let line: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(line["k"], Bson::MaxKey.into_relaxed_extjson());
}

#[test]
fn depth_limit_fails_conversion() {
    let input = dump(&[doc! { "a": { "b": { "c": 1 } } }]);

    let (mut cmd, _config) = mejson();
    let output = cmd
        .args(["--max-depth", "2"])
        .arg(input.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("nesting depth exceeds limit of 2"));
}

#[test]
fn truncated_dump_fails() {
    let input = dump(&[doc! { "a": 1 }]);
    let mut bytes = std::fs::read(input.path()).unwrap();
    bytes.pop();
    let mut truncated = tempfile::NamedTempFile::new().unwrap();
    truncated.write_all(&bytes).unwrap();

    let (mut cmd, _config) = mejson();
    let output = cmd.arg(truncated.path()).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("truncated"));
}

#[test]
fn version_subcommand() {
    let (mut cmd, _config) = mejson();
    let output = cmd.arg("version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("mejson "));
}

#[test]
fn pretty_output_file_keeps_colors_out() {
    let input = dump(&[doc! { "a": 1, "b": [true] }]);
    let out_dir = tempfile::tempdir().unwrap();
    let out_path = out_dir.path().join("out.json");

    // Colors stay enabled from the (empty) config
    let (mut cmd, _config) = mejson();
    let output = cmd
        .args(["--format", "pretty", "-o"])
        .arg(&out_path)
        .arg(input.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(!written.contains('\x1b'));
    assert_eq!(
        serde_json::from_str::<Value>(&written).unwrap(),
        json!({ "a": 1, "b": [true] })
    );
}

#[test]
fn config_file_survives_until_command_runs() {
    let (mut cmd, config) = mejson();
    let path = config.to_path_buf();
    assert!(path.exists());

    let output = cmd.args(["config", "--show"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("[marshal]"));

    drop(config);
    assert!(!path.exists());
}

#[test]
fn rust_log_overrides_configured_level() {
    let input = dump(&[doc! { "a": 1 }]);

    let (mut cmd, _config) = mejson();
    let output = cmd
        .env("RUST_LOG", "debug")
        .arg(input.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Reading dump from"));

    let (mut cmd, _config) = mejson();
    let output = cmd.env_remove("RUST_LOG").arg(input.path()).output().unwrap();
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Reading dump from"));
}
