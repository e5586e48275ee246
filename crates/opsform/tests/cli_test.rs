//! Integration tests for the `opsform` CLI binary.
//!
//! These tests exercise argument parsing, schema inspection, evaluation,
//! validation and non-interactive fills against the builtin entities.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `opsform` binary with env isolation.
///
/// Clears all `OPSFORM_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn opsform_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("opsform");
    cmd.env("HOME", "/tmp/opsform-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/opsform-cli-test-nonexistent")
        .env_remove("OPSFORM_SITE")
        .env_remove("OPSFORM_REGION")
        .env_remove("OPSFORM_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// A portal with everything but the authentication subset filled in.
fn portal_args() -> Vec<&'static str> {
    vec![
        "--set",
        "name=Lobby",
        "--set",
        "siteId=s1",
        "--set",
        r#"ssidIds=["guest"]"#,
    ]
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = opsform_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    opsform_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("entities")
            .and(predicate::str::contains("evaluate"))
            .and(predicate::str::contains("validate"))
            .and(predicate::str::contains("fill")),
    );
}

#[test]
fn test_version_flag() {
    opsform_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("opsform"));
}

#[test]
fn test_invalid_subcommand() {
    opsform_cmd().arg("frobnicate").assert().failure().code(2);
}

#[test]
fn test_unknown_entity_is_rejected() {
    let output = opsform_cmd().args(["fields", "router"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("router"));
}

#[test]
fn test_completions_bash() {
    opsform_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("opsform"));
}

#[test]
fn test_config_path() {
    opsform_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("opsform-cli-test-nonexistent"));
}

// ── Schema inspection ───────────────────────────────────────────────

#[test]
fn test_entities_lists_builtin_kinds() {
    opsform_cmd().args(["entities", "-o", "plain"]).assert().success().stdout(
        predicate::str::contains("portal")
            .and(predicate::str::contains("voucher"))
            .and(predicate::str::contains("radius-profile")),
    );
}

#[test]
fn test_fields_plain_lists_names_in_order() {
    let output = opsform_cmd()
        .args(["fields", "portal", "-o", "plain"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let name = stdout.find("name").unwrap();
    let auth = stdout.find("authType").unwrap();
    let landing = stdout.find("landingUrl").unwrap();
    assert!(name < auth && auth < landing, "unexpected order:\n{stdout}");
}

#[test]
fn test_fields_json_is_descriptor_array() {
    let output = opsform_cmd()
        .args(["fields", "ssid", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let fields: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &fields.as_array().unwrap()[0];
    assert_eq!(first["name"], "name");
    assert_eq!(first["defaultRequired"], true);
}

#[test]
fn test_rules_plain() {
    opsform_cmd()
        .args(["rules", "portal", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("when authType == 1 then require password")
                .and(predicate::str::contains("then reset password")),
        );
}

// ── Evaluate ────────────────────────────────────────────────────────

#[test]
fn test_evaluate_reports_pending_reset() {
    let output = opsform_cmd()
        .args(["evaluate", "portal", "-o", "json"])
        .args(portal_args())
        .args(["--set", "authType=2", "--set", "password=hunter22"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let states: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let field = |name: &str| {
        states
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["field"] == name)
            .cloned()
            .unwrap()
    };
    assert_eq!(field("password")["reset_to"], "");
    assert_eq!(field("password")["visible"], false);
    assert_eq!(field("radiusProfileId")["required"], true);
}

// ── Validate ────────────────────────────────────────────────────────

#[test]
fn test_validate_reports_missing_password() {
    let output = opsform_cmd()
        .args(["validate", "portal", "-o", "json"])
        .args(portal_args())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));

    let errors: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "password");
    assert_eq!(errors[0]["key"], "validation.required");
}

#[test]
fn test_validate_valid_portal() {
    opsform_cmd()
        .arg("validate")
        .arg("portal")
        .args(portal_args())
        .args(["--set", "authType=5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("portal is valid"));
}

#[test]
fn test_validate_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ssid.json");
    std::fs::write(
        &path,
        r#"{"name": "Corp", "security": "wpa2", "passphrase": "short"}"#,
    )
    .unwrap();

    opsform_cmd()
        .args(["validate", "ssid", "-o", "plain", "-F"])
        .arg(&path)
        .assert()
        .code(3)
        .stdout(predicate::str::contains("passphrase\tvalidation.tooShort"));
}

#[test]
fn test_validate_checks_lookup_options() {
    let dir = tempfile::tempdir().unwrap();
    let sites = dir.path().join("sites.json");
    std::fs::write(&sites, r#"[{"label": "HQ", "value": "s1"}]"#).unwrap();

    opsform_cmd()
        .args(["validate", "portal", "-o", "plain"])
        .args(portal_args())
        .args(["--set", "authType=5", "--set", "siteId=s9", "--lookup"])
        .arg(format!("siteId={}", sites.display()))
        .assert()
        .code(3)
        .stdout(predicate::str::contains("siteId\tvalidation.notAnOption"));
}

#[test]
fn test_lookup_for_unknown_field_is_usage_error() {
    opsform_cmd()
        .args(["validate", "portal", "--lookup", "nope=/tmp/none.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_malformed_set_is_usage_error() {
    opsform_cmd()
        .args(["validate", "portal", "--set", "novalue"])
        .assert()
        .code(2);
}

// ── Fill ────────────────────────────────────────────────────────────

#[test]
fn test_fill_without_prompts_prints_snapshot() {
    let output = opsform_cmd()
        .args(["fill", "portal", "--no-input", "-o", "json"])
        .args(portal_args())
        .args(["--set", "authType=1", "--set", "password=hunter22"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["name"], "Lobby");
    assert_eq!(snapshot["password"], "hunter22");
    assert_eq!(snapshot["radiusAuthMethod"], "pap");
}

#[test]
fn test_fill_saves_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portal.json");

    opsform_cmd()
        .args(["fill", "portal", "--no-input", "--save"])
        .arg(&path)
        .args(portal_args())
        .args(["--set", "authType=5"])
        .assert()
        .success();

    let raw = std::fs::read_to_string(&path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved["ssidIds"], serde_json::json!(["guest"]));
    assert_eq!(saved["authType"], serde_json::json!(5));

    // Whole numbers stay integers and fields keep dialog order.
    assert!(raw.contains(r#""authType": 5"#), "{raw}");
    assert!(!raw.contains("5.0"), "{raw}");
    let name_at = raw.find(r#""name""#).unwrap();
    let site_at = raw.find(r#""siteId""#).unwrap();
    let auth_at = raw.find(r#""authType""#).unwrap();
    assert!(name_at < site_at && site_at < auth_at, "{raw}");

    // The saved record loads back as a valid value set.
    opsform_cmd()
        .args(["validate", "portal", "--from-file"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_fill_invalid_exits_with_invalid_code() {
    opsform_cmd()
        .args(["fill", "portal", "--no-input", "-o", "plain"])
        .args(portal_args())
        .assert()
        .code(3)
        .stdout(predicate::str::contains("password"));
}
