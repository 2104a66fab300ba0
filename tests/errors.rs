use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_CELL_SIZE")
        .env_remove("BF_MEMORY_SIZE")
        .env_remove("BF_RUNTIME_UNITS")
        .env_remove("BF_EOF")
        .env_remove("RUST_LOG")
        .timeout(Duration::from_secs(5));
    cmd
}

#[test]
fn test_unmatched_close_bracket_error() {
    cargo_bin()
        .args(["--code", "+]"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("Parse error: unmatched bracket ']'")
                .and(predicate::str::contains("at instruction 1"))
                .and(predicate::str::contains("^")),
        );
}

#[test]
fn test_unmatched_open_bracket_error() {
    cargo_bin()
        .args(["--code", "[[]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched bracket '['").and(predicate::str::contains("at instruction 0")));
}

#[test]
fn test_compile_error_prevents_any_output() {
    cargo_bin()
        .args(["--code", "++++++++[>++++++++<-]>+.["])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_pointer_underflow_is_runtime_error() {
    cargo_bin()
        .args(["--code", "<"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Runtime error: pointer out of bounds"));
}

#[test]
fn test_missing_file() {
    cargo_bin()
        .arg("does-not-exist.bf")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input error: cannot open does-not-exist.bf (no such file)"));
}

#[test]
fn test_wrong_extension() {
    let tf = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    cargo_bin()
        .arg(tf.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("incorrect filetype").and(predicate::str::contains("must be .b or .bf")));
}

#[test]
fn test_invalid_cell_size_is_usage_error() {
    cargo_bin()
        .args(["-c", "12", "--code", "+"])
        .assert()
        .code(2);
}

#[test]
fn test_zero_memory_size_is_usage_error() {
    cargo_bin()
        .args(["-m", "0", "--code", "+"])
        .assert()
        .code(2);
}

#[test]
fn test_huge_memory_size_is_usage_error() {
    cargo_bin()
        .args(["-m", "1000000000000000000", "--code", "+"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at most"));
}

#[test]
fn test_missing_source_is_usage_error() {
    cargo_bin().assert().code(2);
}
