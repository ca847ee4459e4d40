use std::path::Path;
use std::process::{Command, Output};

use ov_test_example::{fixture_dir, fixture_names};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ov-cli"))
        .args(args)
        .output()
        .expect("cli should execute")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("path should be utf-8")
}

#[test]
fn inspect_runs_every_fixture_package() {
    let names = fixture_names();
    assert!(!names.is_empty(), "expected fixture packages");

    for name in names {
        let directory = fixture_dir(&name);
        let output = run_cli(&["inspect", "--package", path_arg(&directory)]);
        if !output.status.success() {
            panic!(
                "package {} failed\nstdout:\n{}\nstderr:\n{}",
                name,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("RESULT:OK"),
            "stdout missing RESULT:OK for {}",
            name
        );
        assert!(
            stdout.contains("DIALECT:"),
            "stdout missing DIALECT for {}",
            name
        );
    }
}

#[test]
fn inspect_prints_line_protocol_for_modern_package() {
    let package = fixture_dir("01-modern-basic");
    let output = run_cli(&["inspect", "--package", path_arg(&package)]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "RESULT:OK");
    assert!(lines.contains(&"MANIFEST:content.xml"));
    assert!(lines.contains(&"DIALECT:modern"));
    assert!(lines.contains(&"CHECK:success:Found 2 pages."));
    assert!(lines.contains(&"META:pp_title=\"Basic project\""));
    assert!(lines.contains(&"PAGE:0:home:Home"));
    assert!(lines.contains(&"PAGE:1:about:About"));
    assert!(lines.contains(&"RESOURCE:content/resources/1/logo.png"));
    assert!(!stdout.contains("MISSING:"));
}

#[test]
fn inspect_accepts_manifest_file_path() {
    let manifest = fixture_dir("03-legacy-basic").join("contentv3.xml");
    let output = run_cli(&["inspect", "--package", path_arg(&manifest)]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DIALECT:legacy"));
    assert!(stdout.contains("CHECK:success:Legacy manifest detected (version 0.3)."));
    assert!(stdout.contains("PAGE:0:1:Home"));
    assert!(stdout.contains("PAGE:1:2:Topic"));
    assert!(stdout.contains("RESOURCE:resources/picture.jpg"));
}

#[test]
fn inspect_json_emits_package_report() {
    let package = fixture_dir("02-modern-nested");
    let output = run_cli(&["inspect", "--package", path_arg(&package), "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json["manifestPath"], "content.xml");
    assert_eq!(json["pages"][0]["id"], "unit-1");
    assert_eq!(
        json["missingResources"][0],
        "content/resources/gallery/photo 1.jpg"
    );
}

#[test]
fn validate_exit_code_tracks_error_checks() {
    let valid = run_cli(&[
        "validate",
        "--package",
        path_arg(&fixture_dir("01-modern-basic")),
    ]);
    assert!(valid.status.success());
    assert!(String::from_utf8_lossy(&valid.stdout).contains("VALID:true"));

    let broken = run_cli(&[
        "validate",
        "--package",
        path_arg(&fixture_dir("04-modern-broken")),
    ]);
    assert_eq!(broken.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&broken.stdout);
    assert!(stdout.contains("RESULT:OK"));
    assert!(stdout.contains("CHECK:error:Found 2 structural problem(s)"));
    assert!(stdout.contains("MISSING:content/resources/missing.png"));
    assert!(stdout.contains("VALID:false"));
}

#[test]
fn missing_package_reports_error_protocol() {
    let missing = std::env::temp_dir().join("odeview-rs-smoke-missing-package");
    let output = run_cli(&["inspect", "--package", path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:PACKAGE_NOT_FOUND"));
    assert!(stdout.contains("ERROR_MSG_JSON:\"package does not exist: "));
}
