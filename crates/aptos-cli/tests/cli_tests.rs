//! CLI integration tests for aptos-cli
//!
//! Runs the binary for the offline commands and config handling. Nothing here
//! talks to a node.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run the CLI with `HOME` pointed at `home`
fn run_in(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_aptos-lite"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn run(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().unwrap();
    run_in(home.path(), args)
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ==================== Help & Version Tests ====================

/// Help lists every subcommand
#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["info", "account", "balance", "transfer", "parse-type", "address", "encode-arg", "config"] {
        assert!(stdout.contains(cmd), "missing {cmd}");
    }
}

/// Version names the binary
#[test]
fn test_cli_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("aptos-lite"));
}

// ==================== Offline Command Tests ====================

/// parse-type prints the canonical form and BCS
#[test]
fn test_parse_type_json() {
    let output = run(&["--json", "parse-type", "vector<0x01::string::String>"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["type"], "vector<0x1::string::String>");
    assert!(json["bcs"].as_str().unwrap().starts_with("0607"));
}

/// A bad type tag fails with a JSON error
#[test]
fn test_parse_type_error() {
    let output = run(&["--json", "parse-type", "vector<u8"]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some());
}

/// address prints both forms
#[test]
fn test_address_forms() {
    let output = run(&["--json", "address", "0x0a"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["short"], "0xa");
    assert_eq!(json["long"].as_str().unwrap().len(), 66);
}

/// encode-arg in text mode prints prefixed hex
#[test]
fn test_encode_arg_text() {
    let output = run(&["encode-arg", "u64", "1000"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0xe803000000000000");
}

/// Unsupported argument types are rejected on stderr
#[test]
fn test_encode_arg_unsupported() {
    let output = run(&["encode-arg", "signer", "0x1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported argument type"));
}

/// Unknown networks are rejected by the argument parser
#[test]
fn test_invalid_network_flag() {
    let output = run(&["--network", "moonnet", "info"]);
    assert!(!output.status.success());
}

// ==================== Config Tests ====================

/// Settings written by config are read back by --show
#[test]
fn test_config_set_and_show() {
    let home = tempfile::tempdir().unwrap();

    let output = run_in(home.path(), &["config", "--set-network", "testnet"]);
    assert!(output.status.success());
    assert!(home.path().join(".aptos-lite").join("config.toml").exists());

    let output = run_in(home.path(), &["--json", "config", "--show"]);
    let json = stdout_json(&output);
    assert_eq!(json["network"], "testnet");
    assert_eq!(json["node_url"], "https://fullnode.testnet.aptoslabs.com/v1");
    assert_eq!(json["max_gas_amount"], 200000);
}

/// An explicit node URL wins over the network
#[test]
fn test_config_node_url() {
    let home = tempfile::tempdir().unwrap();
    run_in(home.path(), &["config", "--set-node-url", "http://127.0.0.1:9999/v1"]);

    let output = run_in(home.path(), &["--json", "config", "--show"]);
    assert_eq!(stdout_json(&output)["node_url"], "http://127.0.0.1:9999/v1");
}
