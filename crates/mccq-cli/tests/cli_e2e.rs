use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};

fn write_version(root: &Path, version: &str, grammar: &Value) {
    let dir = root.join(version).join("generated").join("reports");
    std::fs::create_dir_all(&dir).expect("create version dir");
    std::fs::write(dir.join("commands.json"), grammar.to_string()).expect("write grammar");
}

fn grammar() -> Value {
    json!({
        "type": "root",
        "children": {
            "gamemode": {
                "type": "literal",
                "children": {
                    "mode": {
                        "type": "argument",
                        "parser": "minecraft:gamemode",
                        "executable": true,
                        "children": {
                            "target": { "type": "argument", "parser": "minecraft:entity", "executable": true }
                        }
                    }
                }
            },
            "seed": { "type": "literal", "executable": true }
        }
    })
}

fn mccq(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mccq"))
        .arg("-d")
        .arg(db)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run mccq")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn query_prints_grouped_results() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1.13", &grammar());

    let output = mccq(dir.path(), &["-s", "1.13", "query", "gamemode"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "# 1.13\ngamemode <mode>\ngamemode <mode> <target>\n"
    );
}

#[test]
fn query_flags_follow_double_dash() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1.13", &grammar());
    write_version(dir.path(), "1.14", &grammar());

    let output = mccq(
        dir.path(),
        &["query", "--json", "--", "-t", "-v", "1.14", "-v", "1.13", "gamemode", ".", "."],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("json output");
    let line = "gamemode <mode: gamemode> <target: entity>";
    assert_eq!(
        parsed,
        json!([
            { "version": "1.14", "lines": [line] },
            { "version": "1.13", "lines": [line] }
        ])
    );
}

#[test]
fn config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1.13", &grammar());
    let config = dir.path().join("mccq.json");
    std::fs::write(&config, r#"{ "show_versions": ["1.13"], "log": "error" }"#).unwrap();

    let output = mccq(
        dir.path(),
        &["--config", config.to_str().unwrap(), "query", "seed"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "# 1.13\nseed\n");
}

#[test]
fn missing_version_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1.13", &grammar());

    let output = mccq(dir.path(), &["-s", "1.99", "query", "seed"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("1.99"));
    assert!(output.stdout.is_empty());
}

#[test]
fn whitelist_rejects_other_versions() {
    let dir = tempfile::tempdir().unwrap();
    write_version(dir.path(), "1.13", &grammar());

    let output = mccq(dir.path(), &["-w", "1.13", "-s", "1.12", "query", "seed"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("none of the requested versions"));
}

#[test]
fn unknown_parser_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let output = mccq(dir.path(), &["--parser", "v7", "-s", "1.13", "query", "seed"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("v7"));
}
