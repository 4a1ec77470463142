//! End-to-end CLI tests
//!
//! Each test builds a small project inside a tempdir and drives the binary
//! over it. Search tests pin the built-in engine with `--no-rg` so results
//! do not depend on what is installed on the host; one smoke test without
//! the flag checks that the external path agrees when rg is present.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn depsearch() -> Command {
    Command::cargo_bin("depsearch").unwrap()
}

fn project() -> TempDir {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("tsconfig.json"), "{}").unwrap();
    temp
}

fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn parse_jsonl(output: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid jsonl line"))
        .collect()
}

#[test]
fn test_deps_resolves_transitive_closure() {
    let temp = project();
    write_file(temp.path(), "a.ts", "import { b } from './b';");
    write_file(temp.path(), "b.ts", "import { c } from './c';");
    write_file(temp.path(), "c.ts", "export const c = 1;");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["deps", "a.ts"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    assert_eq!(lines[0]["title"], "setEntryFile");
    assert_eq!(lines[0]["entryFile"], "a.ts");

    let paths: Vec<String> = lines[1..]
        .iter()
        .map(|l| l["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths.len(), 3);
    assert!(paths[0].ends_with("/a.ts"));
    assert!(paths[1].ends_with("/b.ts"));
    assert!(paths[2].ends_with("/c.ts"));
}

#[test]
fn test_deps_depth_bound() {
    let temp = project();
    for i in 0..8 {
        let content = if i < 7 {
            format!("import {{ x }} from './f{}';", i + 1)
        } else {
            "export const x = 1;".to_string()
        };
        write_file(temp.path(), &format!("f{}.ts", i), &content);
    }

    let output = depsearch()
        .current_dir(temp.path())
        .args(["deps", "f0.ts", "--max-depth", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("f2.ts"));
    assert!(!stdout.contains("f3.ts"));
}

#[test]
fn test_deps_exclusions() {
    let temp = project();
    write_file(
        temp.path(),
        "a.ts",
        "import { T } from './types.d.ts';\nimport pkg from './node_modules/pkg/index';\nimport { b } from './b';\n",
    );
    write_file(temp.path(), "types.d.ts", "export type T = string;");
    write_file(temp.path(), "node_modules/pkg/index.ts", "export default 1;");
    write_file(temp.path(), "b.ts", "export const b = 1;");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["deps", "a.ts"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("b.ts"));
    assert!(!stdout.contains("types.d.ts"));
    assert!(!stdout.contains("node_modules"));
}

#[test]
fn test_deps_cycle_terminates() {
    let temp = project();
    write_file(temp.path(), "a.ts", "import { b } from './b';");
    write_file(temp.path(), "b.ts", "import { a } from './a';");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["deps", "a.ts"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(parse_jsonl(&output.stdout).len(), 3); // message + two paths
}

#[test]
fn test_deps_without_config_fails() {
    let temp = tempdir().unwrap();
    write_file(temp.path(), "a.ts", "export const a = 1;");

    depsearch()
        .current_dir(temp.path())
        .args(["deps", "a.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tsconfig.json"));
}

#[test]
fn test_search_emits_import_results_across_closure() {
    let temp = project();
    write_file(temp.path(), "a.ts", "import { b } from './b';\n");
    write_file(temp.path(), "b.ts", "export const needle = 1;\n");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["search", "a.ts", "needle", "--no-rg"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    assert_eq!(lines[0]["title"], "importResults");
    assert_eq!(lines[0]["query"], "needle");
    assert_eq!(lines[0]["entryFile"], "a.ts");

    let results = lines[0]["importResults"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0]["filePath"].as_str().unwrap().ends_with("/b.ts"));
    assert_eq!(results[0]["lineNumber"], 1);
    assert_eq!(results[0]["matchText"], "export const needle = 1;");
}

#[test]
fn test_search_case_and_word_flags() {
    let temp = project();
    write_file(temp.path(), "a.ts", "Foo foo Foobar\n");

    let count = |extra: &[&str]| -> usize {
        let mut args = vec!["search", "a.ts", "foo", "--no-rg"];
        args.extend_from_slice(extra);
        let output = depsearch()
            .current_dir(temp.path())
            .args(&args)
            .output()
            .unwrap();
        assert!(output.status.success());
        parse_jsonl(&output.stdout)[0]["importResults"]
            .as_array()
            .unwrap()
            .len()
    };

    assert_eq!(count(&[]), 3);
    assert_eq!(count(&["--case-sensitive"]), 1);
    assert_eq!(count(&["--whole-word"]), 2);
    assert_eq!(count(&["-c", "-w"]), 1);
}

#[test]
fn test_search_query_is_literal() {
    let temp = project();
    write_file(temp.path(), "a.ts", "call a.b(c) now\naXb(c)\n");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["search", "a.ts", "a.b(c)", "--no-rg"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let results = parse_jsonl(&output.stdout)[0]["importResults"].clone();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["lineNumber"], 1);
}

#[test]
fn test_search_column_and_range() {
    let temp = project();
    write_file(temp.path(), "a.ts", "import { cn } from './x'\n");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["search", "a.ts", "cn", "--no-rg"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    let m = &lines[0]["importResults"][0];
    assert_eq!(m["column"], 10);
    assert_eq!(m["range"]["start"]["line"], 0);
    assert_eq!(m["range"]["start"]["character"], 9);
    assert_eq!(m["range"]["end"]["character"], 11);
}

#[test]
fn test_search_blank_query_reports_error_without_failing() {
    let temp = project();
    write_file(temp.path(), "a.ts", "export const a = 1;\n");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["search", "a.ts", "   ", "--no-rg"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    assert_eq!(lines[0]["title"], "searchError");
}

#[test]
fn test_search_without_config_reports_error_without_failing() {
    let temp = tempdir().unwrap();
    write_file(temp.path(), "a.ts", "export const a = 1;\n");

    let output = depsearch()
        .current_dir(temp.path())
        .args(["search", "a.ts", "a", "--no-rg"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    assert_eq!(lines[0]["title"], "searchError");
    assert!(lines[0]["msg"]
        .as_str()
        .unwrap()
        .contains("tsconfig.json"));
}

#[test]
fn test_state_replays_last_search() {
    let temp = project();
    write_file(temp.path(), "a.ts", "export const needle = 1;\n");

    depsearch()
        .current_dir(temp.path())
        .args(["search", "a.ts", "needle", "-c", "--no-rg"])
        .assert()
        .success();

    let output = depsearch()
        .current_dir(temp.path())
        .args(["state", "."])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    assert_eq!(lines[0]["title"], "restoreState");
    assert_eq!(lines[0]["query"], "needle");
    assert_eq!(lines[0]["isCaseSensitive"], true);
    assert_eq!(lines[0]["isWholeWord"], false);
    assert_eq!(lines[0]["importResults"].as_array().unwrap().len(), 1);
}

#[test]
fn test_state_replays_from_project_subdirectory() {
    let temp = project();
    write_file(temp.path(), "src/a.ts", "export const needle = 1;\n");

    depsearch()
        .current_dir(temp.path())
        .args(["search", "src/a.ts", "needle", "--no-rg"])
        .assert()
        .success();

    // State is saved under the project root; asking from a subdirectory
    // must find the same session.
    let output = depsearch()
        .current_dir(temp.path().join("src"))
        .args(["state", "."])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    assert_eq!(lines[0]["title"], "restoreState");
    assert_eq!(lines[0]["query"], "needle");
}

#[test]
fn test_state_without_saved_session_reports_error() {
    let temp = tempdir().unwrap();

    let output = depsearch()
        .current_dir(temp.path())
        .args(["state", "."])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = parse_jsonl(&output.stdout);
    assert_eq!(lines[0]["title"], "searchError");
    assert!(lines[0]["msg"]
        .as_str()
        .unwrap()
        .contains("no saved session"));
}

#[test]
fn test_search_engines_agree() {
    let temp = project();
    write_file(temp.path(), "a.ts", "import { b } from './b';\nlet foo = 1;\n");
    write_file(temp.path(), "b.ts", "let Foo = 2;\nlet foobar = 3;\n");

    let run = |no_rg: bool| -> Vec<serde_json::Value> {
        let mut args = vec!["search", "a.ts", "foo", "-w"];
        if no_rg {
            args.push("--no-rg");
        }
        let output = depsearch()
            .current_dir(temp.path())
            .args(&args)
            .output()
            .unwrap();
        assert!(output.status.success());
        parse_jsonl(&output.stdout)[0]["importResults"]
            .as_array()
            .unwrap()
            .clone()
    };

    let builtin = run(true);
    let default = run(false);

    // With rg installed this exercises the external engine; without it the
    // fallback runs twice. Either way the records must agree.
    assert_eq!(builtin.len(), default.len());
    for (a, b) in builtin.iter().zip(&default) {
        assert_eq!(a["lineNumber"], b["lineNumber"]);
        assert_eq!(a["column"], b["column"]);
        assert_eq!(a["matchText"], b["matchText"]);
    }
}

#[test]
fn test_text_format_output() {
    let temp = project();
    write_file(temp.path(), "a.ts", "let needle = 1;\n");

    depsearch()
        .current_dir(temp.path())
        .args(["search", "a.ts", "needle", "--no-rg", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("needle"))
        .stdout(predicate::str::contains(":1:"));
}

#[test]
fn test_doctor_runs() {
    depsearch()
        .args(["doctor", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active engine"));
}
