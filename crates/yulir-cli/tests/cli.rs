//! Integration tests for the `yulir` binary.

use std::path::Path;
use std::process::{Command, Output};

const PROGRAM: &str = r#"{
    "statements": [{
        "kind": "FunctionDefinition",
        "name": "main",
        "parameters": [{ "name": "p", "type": "u32" }],
        "body": { "statements": [
            { "kind": "ExpressionStatement",
              "expression": { "kind": "FunctionCall",
                              "function_name": { "name": "eth.finish" },
                              "arguments": [
                                  { "kind": "Identifier", "name": "p" },
                                  { "kind": "Identifier", "name": "p" }
                              ] } }
        ] }
    }]
}"#;

fn yulir(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yulir"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run yulir")
}

#[test]
fn test_lower_prints_ir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("program.json"), PROGRAM).unwrap();

    let output = yulir(&["lower", "program.json"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("; module yul"));
    assert!(stdout.contains("declare void @eth.finish(i32, i32)"));
    assert!(stdout.contains("define void @main(i32 %0)"));
}

#[test]
fn test_lower_writes_output_with_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("program.json"), PROGRAM).unwrap();
    std::fs::write(dir.path().join("custom.toml"), "module_name = \"token\"\n").unwrap();

    let output = yulir(
        &["lower", "program.json", "-c", "custom.toml", "-o", "out.ll"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let written = std::fs::read_to_string(dir.path().join("out.ll")).unwrap();
    assert!(written.starts_with("; module token"));
}

#[test]
fn test_lower_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let broken = PROGRAM.replace("eth.finish", "missing");
    std::fs::write(dir.path().join("program.json"), broken).unwrap();

    let output = yulir(&["lower", "program.json"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unresolved name: missing"), "{stderr}");
}

#[test]
fn test_builtins_lists_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let output = yulir(&["builtins"], dir.path());
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("32 builtins (Strict flavour)"));
    assert!(stdout.contains("eth.storageStore(i32, i32) -> () [invalidates-storage invalidates-memory]"));
}
