//! Integration tests for ChainSentinel

use std::process::Command;

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_chainsentinel"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Blockchain security dashboard backend"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--bind"));
    assert!(stdout.contains("--write-config"));
}

#[test]
fn test_version_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_chainsentinel"))
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("chainsentinel"));
    assert!(stdout.contains("0.1.0"));
}

#[test]
fn test_write_config() {
    let dir = std::env::temp_dir().join(format!("chainsentinel-cli-{}", std::process::id()));
    let path = dir.join("config.toml");

    let status = Command::new(env!("CARGO_BIN_EXE_chainsentinel"))
        .args(["--write-config", "--config"])
        .arg(&path)
        .status()
        .expect("Failed to execute command");
    assert!(status.success());

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[eternal_ai]"));
    assert!(written.contains("timeout_secs = 30"));

    std::fs::remove_dir_all(&dir).unwrap();
}
