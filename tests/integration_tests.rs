mod common;

use assert_cmd::Command;
use predicates::str::{contains, diff, is_empty};

use common::{image, raw_image, ADD_AND_PRINT, R0};

#[test]
fn runs_image_from_bare_path() {
    let file = image(ADD_AND_PRINT);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(diff("\t"))
        .stderr(contains("Halted"));
}

#[test]
fn single_halt_prints_nothing() {
    let file = image(&[0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("run").arg(file.path()).arg("--minimal");

    cmd.assert().success().stdout(is_empty()).stderr(is_empty());
}

#[test]
fn reads_program_input() {
    // in r0; out r0; in r0; out r0; halt
    let file = image(&[20, R0, 19, R0, 20, R0, 19, R0, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("run").arg(file.path()).arg("--minimal").write_stdin("ok");

    cmd.assert().success().stdout(diff("ok"));
}

#[test]
fn traces_instructions() {
    let file = image(ADD_AND_PRINT);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("run").arg(file.path()).arg("--trace").arg("--minimal");

    cmd.assert()
        .success()
        .stdout(diff("\t"))
        .stderr(diff("    0  add r0(0) 4 5\n    4  out r0(9)\n    6  halt\n"));
}

#[test]
fn trace_from_environment() {
    let file = image(&[21, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("run")
        .arg(file.path())
        .arg("--minimal")
        .env("SYNVM_TRACE", "1");

    cmd.assert()
        .success()
        .stderr(diff("    0  noop\n    1  halt\n"));
}

#[test]
fn missing_image_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("run").arg(dir.path().join("missing.bin"));

    cmd.assert()
        .failure()
        .stdout(is_empty())
        .stderr(contains("load::unreadable"));
}

#[test]
fn odd_length_image_fails() {
    // Would print 'A' if the trailing byte were padded
    let file = raw_image(&[19, 0, 65, 0, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .stdout(is_empty())
        .stderr(contains("load::misaligned"));
}

#[test]
fn fails_without_arguments() {
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.assert()
        .failure()
        .stdout(is_empty())
        .stderr(contains("Welcome to synvm"));
}

#[test]
fn disassembles_image() {
    let file = image(&[9, R0, 4, 5, 19, 72, 99, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("disasm").arg(file.path());

    cmd.assert().success().stdout(diff(
        "    0  add r0 4 5\n    4  out 72  ; 'H'\n    6  .word 99\n    7  halt\n",
    ));
}

#[test]
fn disassembles_range() {
    let file = image(ADD_AND_PRINT);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("disasm")
        .arg(file.path())
        .arg("--from")
        .arg("4")
        .arg("--to")
        .arg("6");

    cmd.assert().success().stdout(diff("    4  out r0\n"));
}

#[test]
fn rejects_address_outside_memory() {
    let file = image(ADD_AND_PRINT);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("disasm").arg(file.path()).arg("--from").arg("40000");

    cmd.assert().failure().stderr(contains("0 to 32767"));
}
