//! CLI interaction tests
//!
//! Every case here fails or exits before the first probe is sent, so none
//! of them touch the network.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "AWSPING_REPEATS",
    "AWSPING_TIMEOUT_SECONDS",
    "AWSPING_ENABLE_COLOR",
    "AWSPING_LOG_LEVEL",
    "AWSPING_LOG_FORMAT",
];

/// Command running in an empty directory with no AWSPING_* variables set
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("awsping").unwrap();
    cmd.current_dir(dir.path());
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Directory holding a `.env` with `content`
fn create_temp_env(content: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env"), content).unwrap();
    temp_dir
}

#[test]
fn test_help_lists_repeats() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--repeats"))
        .stdout(predicate::str::contains("-r"))
        .stdout(predicate::str::contains("AWSPING_REPEATS"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_zero_repeats_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--repeats", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repeats"));
}

#[test]
fn test_non_numeric_repeats_rejected() {
    let dir = TempDir::new().unwrap();
    for value in ["abc", "-1", "1.5", ""] {
        create_test_cmd(&dir)
            .args(["-r", value])
            .assert()
            .failure();
    }
}

#[test]
fn test_unknown_option_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--count")
        .arg("3")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--count"));
}

#[test]
fn test_invalid_env_repeats_is_config_error() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .env("AWSPING_REPEATS", "many")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("AWSPING_REPEATS"));
}

#[test]
fn test_out_of_range_env_timeout_is_config_error() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .env("AWSPING_TIMEOUT_SECONDS", "900")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Timeout"));
}

#[test]
fn test_invalid_log_level_is_config_error() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .env("AWSPING_LOG_LEVEL", "shouty")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_invalid_dotenv_value_is_config_error() {
    let dir = create_temp_env("AWSPING_REPEATS=0\n");
    create_test_cmd(&dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration help"));
}
