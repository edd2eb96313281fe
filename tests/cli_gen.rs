//! E2E tests for `barrelgen gen` (one-shot mode)

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Helper to create a directory of source files for generation tests
fn setup_sources(dir: &Path, names: &[&str]) {
    let src = dir.join("src");
    fs::create_dir_all(&src).unwrap();
    for name in names {
        fs::write(src.join(name), "// source\n").unwrap();
    }
}

#[test]
fn gen_writes_import_barrel_and_exits() {
    let temp = tempdir().unwrap();
    setup_sources(temp.path(), &["a.ts", "b.ts", "c.ts"]);

    let output = Command::new(env!("CARGO_BIN_EXE_barrelgen"))
        .arg("gen")
        .arg("--glob")
        .arg("src/*.ts")
        .arg("--out")
        .arg("src/index.ts")
        .current_dir(temp.path())
        .output()
        .expect("Failed to run barrelgen gen");

    assert!(output.status.success(), "gen failed: {output:?}");

    let contents = fs::read_to_string(temp.path().join("src/index.ts")).unwrap();
    // The initial scan walks the directory in a platform-defined order, so
    // compare the line set rather than the order.
    let mut lines: Vec<_> = contents.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, ["import './a';", "import './b';", "import './c';"]);
}

#[test]
fn gen_writes_stylesheet_barrel() {
    let temp = tempdir().unwrap();
    let styles = temp.path().join("styles");
    fs::create_dir_all(&styles).unwrap();
    fs::write(styles.join("a.scss"), "").unwrap();
    fs::write(styles.join("b.scss"), "").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_barrelgen"))
        .arg("gen")
        .arg("--glob")
        .arg("styles/*.scss")
        .arg("--out")
        .arg("styles/main.scss")
        .current_dir(temp.path())
        .output()
        .expect("Failed to run barrelgen gen");

    assert!(output.status.success());

    let contents = fs::read_to_string(styles.join("main.scss")).unwrap();
    let mut lines: Vec<_> = contents.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, ["@import './a.scss';", "@import './b.scss';"]);
}

#[test]
fn gen_recurses_into_subdirectories() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("src/components");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("button.ts"), "").unwrap();
    fs::create_dir_all(temp.path().join("src/gen")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_barrelgen"))
        .arg("gen")
        .arg("--glob")
        .arg("src/components/**/*.ts")
        .arg("--out")
        .arg("src/gen/index.ts")
        .current_dir(temp.path())
        .output()
        .expect("Failed to run barrelgen gen");

    assert!(output.status.success());

    let contents = fs::read_to_string(temp.path().join("src/gen/index.ts")).unwrap();
    assert_eq!(contents, "import '../components/button';\n");
}

#[test]
fn gen_json_emits_ndjson_events() {
    let temp = tempdir().unwrap();
    setup_sources(temp.path(), &["a.ts"]);

    let output = Command::new(env!("CARGO_BIN_EXE_barrelgen"))
        .arg("gen")
        .arg("--json")
        .arg("--glob")
        .arg("src/*.ts")
        .arg("--out")
        .arg("src/index.ts")
        .current_dir(temp.path())
        .output()
        .expect("Failed to run barrelgen gen");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"event\":\"watch_started\""), "{stdout}");
    assert!(stdout.contains("\"event\":\"ready\""), "{stdout}");
    assert!(stdout.contains("\"event\":\"output_written\""), "{stdout}");
    assert!(stdout.contains("\"event\":\"shutdown\""), "{stdout}");
}

#[test]
fn gen_rejects_unknown_output_extension() {
    let temp = tempdir().unwrap();
    setup_sources(temp.path(), &["a.ts"]);

    let output = Command::new(env!("CARGO_BIN_EXE_barrelgen"))
        .arg("gen")
        .arg("--glob")
        .arg("src/*.ts")
        .arg("--out")
        .arg("src/index.txt")
        .current_dir(temp.path())
        .output()
        .expect("Failed to run barrelgen gen");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "{stderr}");
}

#[test]
fn gen_explicit_format_overrides_extension() {
    let temp = tempdir().unwrap();
    setup_sources(temp.path(), &["a.ts"]);

    let output = Command::new(env!("CARGO_BIN_EXE_barrelgen"))
        .arg("gen")
        .arg("--glob")
        .arg("src/*.ts")
        .arg("--out")
        .arg("src/index.txt")
        .arg("--format")
        .arg("import")
        .current_dir(temp.path())
        .output()
        .expect("Failed to run barrelgen gen");

    assert!(output.status.success());
    let contents = fs::read_to_string(temp.path().join("src/index.txt")).unwrap();
    assert_eq!(contents, "import './a';\n");
}
