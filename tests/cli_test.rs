/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify exit codes and output
mod common;

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use chrono::{Duration, Utc};
use common::{OwnerSpec, ProfileDirBuilder};
use predicates::prelude::*;

/// Binary with a sandboxed home and no settings file
fn companion(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jeveassets-companion"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("JEVEASSETS_DATA")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_check_all_fresh_exits_zero() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Fresh Pilot").updated_at(now - Duration::hours(1))])
        .build();

    companion(data.path())
        .args(["check", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Fresh Pilot: OK (last update 0 days ago)"));
}

#[test]
fn test_check_stale_exits_one() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_xml_store(
            "#Default.xml",
            &[
                OwnerSpec::new(1, "Fresh Pilot").updated_at(now - Duration::days(1)),
                OwnerSpec::new(2, "Stale Pilot").updated_at(now - Duration::days(20)),
            ],
        )
        .build();

    companion(data.path())
        .args(["check", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("jEveAssets ESI Token Alert"))
        .stdout(predicate::str::contains("Stale Pilot: last update 20 days ago"))
        .stdout(predicate::str::contains("Fresh Pilot").not());
}

#[test]
fn test_check_days_flag_changes_threshold() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Pilot").updated_at(now - Duration::days(5))])
        .build();

    companion(data.path())
        .args(["check", "--days", "3", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(1);

    companion(data.path())
        .args(["check", "--days", "7", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(0);
}

#[test]
fn test_check_no_profile_exits_two() {
    let home = tempfile::TempDir::new().unwrap();

    companion(home.path())
        .args(["check", "--data-dir"])
        .arg(home.path().join("missing"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no profile found"));
}

#[test]
fn test_check_uses_home_default_data_dir() {
    let home = tempfile::TempDir::new().unwrap();
    let profiles = home.path().join(".jeveassets").join("profiles");
    std::fs::create_dir_all(&profiles).unwrap();

    // Empty profiles dir under ~/.jeveassets means no stores
    companion(home.path()).arg("check").assert().code(2);
}

#[test]
fn test_check_data_env_var_is_base_dir() {
    let now = Utc::now();
    let home = tempfile::TempDir::new().unwrap();
    let base = tempfile::TempDir::new().unwrap();
    let data_dir = base.path().join(".jeveassets");
    std::fs::create_dir_all(data_dir.join("profiles")).unwrap();
    let builder = ProfileDirBuilder::new().with_sqlite_store(
        "#Default.db",
        &[OwnerSpec::new(1, "Env Pilot").updated_at(now - Duration::days(30))],
    );
    std::fs::copy(builder.profiles().join("#Default.db"), data_dir.join("profiles/#Default.db"))
        .unwrap();

    companion(home.path())
        .env("JEVEASSETS_DATA", base.path())
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Env Pilot"));
}

#[test]
fn test_check_unknown_owner_respects_flag() {
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Ghost")])
        .build();

    companion(data.path())
        .args(["check", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no recorded update"));

    companion(data.path())
        .args(["check", "--unknown-is-stale", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(1);
}

#[test]
fn test_check_quiet_prints_nothing() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Pilot").updated_at(now - Duration::days(20))])
        .build();

    companion(data.path())
        .args(["check", "--quiet", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_check_json_output() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(42, "Json Pilot").updated_at(now - Duration::days(20))])
        .build();

    let output = companion(data.path())
        .args(["check", "--json", "--data-dir"])
        .arg(data.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["identities"][0]["id"], "42");
    assert_eq!(json["identities"][0]["name"], "Json Pilot");
    assert_eq!(json["identities"][0]["freshness"], "stale");
    assert_eq!(json["stores"].as_array().unwrap().len(), 1);
}

#[test]
fn test_check_debug_lists_skipped_stores() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Pilot").updated_at(now - Duration::days(1))])
        .with_raw_file("junk.xml", b"not a profile")
        .build();

    companion(data.path())
        .args(["check", "--debug", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("skipped"))
        .stderr(predicate::str::contains("junk.xml"))
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn test_check_sanitizes_owner_names() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store(
            "#Default.db",
            &[OwnerSpec::new(1, "Evil\x1b[2JPilot").updated_at(now - Duration::days(1))],
        )
        .build();

    companion(data.path())
        .args(["check", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\x1b").not())
        .stdout(predicate::str::contains("EvilPilot"));
}

#[test]
fn test_settings_file_supplies_threshold() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Pilot").updated_at(now - Duration::days(5))])
        .build();
    let config = data.path().join("config.json");
    std::fs::write(&config, r#"{"warn_days": 2}"#).unwrap();

    companion(data.path())
        .arg("--config")
        .arg(&config)
        .args(["check", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(1);
}

#[test]
fn test_check_every_store_unreadable_is_not_ok() {
    let mut corrupt = b"SQLite format 3\0".to_vec();
    corrupt.extend(std::iter::repeat_n(0xAB, 4096));
    let data = ProfileDirBuilder::new().with_raw_file("#Default.db", &corrupt).build();

    companion(data.path())
        .args(["check", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("none of the profile stores could be read"))
        .stdout(predicate::str::contains("No ESI owners found").not());
}

#[test]
fn test_out_of_range_settings_do_not_crash() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Pilot").updated_at(now - Duration::days(20))])
        .build();
    let config = data.path().join("config.json");
    std::fs::write(&config, r#"{"warn_days": 9223372036854775807, "reminder_hours": 9223372036854775807}"#)
        .unwrap();

    // Falls back to the 14 day default
    companion(data.path())
        .arg("--config")
        .arg(&config)
        .args(["check", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Ignoring warn_days"));
}

#[test]
fn test_watch_single_check_logs_alert() {
    let now = Utc::now();
    let data = ProfileDirBuilder::new()
        .with_sqlite_store("#Default.db", &[OwnerSpec::new(1, "Watched Pilot").updated_at(now - Duration::days(20))])
        .build();
    let log_file = data.path().join("logs").join("watch.log");

    companion(data.path())
        .args(["watch", "--max-checks", "1", "--interval", "1", "--data-dir"])
        .arg(data.path())
        .arg("--log-file")
        .arg(&log_file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Watched Pilot"));

    let logged = std::fs::read_to_string(&log_file).unwrap();
    assert!(logged.contains("token alert"));
    assert!(logged.contains("Watched Pilot"));
}

#[test]
fn test_cli_no_command_shows_help_message() {
    let home = tempfile::TempDir::new().unwrap();
    companion(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --help for usage information"));
}

#[test]
fn test_cli_help_flag() {
    let home = tempfile::TempDir::new().unwrap();
    companion(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("jEveAssets"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_cli_version_flag() {
    let home = tempfile::TempDir::new().unwrap();
    companion(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_invalid_command() {
    let home = tempfile::TempDir::new().unwrap();
    companion(home.path()).arg("invalid-command").assert().failure();
}
