// Exercises the ',' (input) instruction by feeding bytes on stdin.
use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_CELL_SIZE")
        .env_remove("BF_MEMORY_SIZE")
        .env_remove("BF_RUNTIME_UNITS")
        .env_remove("BF_EOF")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn reads_from_stdin_and_echoes_byte() {
    cargo_bin()
        .args(["-q", "--code", ",."])
        .write_stdin("Z")
        .assert()
        .success()
        .stdout("Z");
}

#[test]
fn folded_reads_consume_one_byte() {
    cargo_bin()
        .args(["-q", "--code", ",,.,."])
        .write_stdin("XY")
        .assert()
        .success()
        .stdout("XY");
}

#[test]
fn input_exhausted_fails_by_default() {
    cargo_bin()
        .args(["-q", "--code", ",[.,]"])
        .write_stdin("ab")
        .assert()
        .code(1)
        .stdout("ab")
        .stderr(predicate::str::contains("input exhausted"));
}

#[test]
fn eof_zero_policy_ends_cat_loop() {
    cargo_bin()
        .args(["-q", "--eof", "zero", "--code", ",[.,]"])
        .write_stdin("cat")
        .assert()
        .success()
        .stdout("cat");
}

#[test]
fn eof_policy_from_env() {
    cargo_bin()
        .env("BF_EOF", "unchanged")
        .args(["-q", "--code", "+++++++++++++++++++++++++++++++++,."])
        .write_stdin("")
        .assert()
        .success()
        .stdout("!");
}

#[test]
fn zero_trip_loop_leaves_stdin_unread() {
    cargo_bin()
        .args(["-q", "--code", "[,]"])
        .write_stdin("unused")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
