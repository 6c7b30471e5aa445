mod common;

use assert_cmd::Command;
use predicates::str::{contains, diff};

use common::{image, R0};

/// `out r0; halt`
const PRINT_R0: &[u16] = &[19, R0, 0];

fn state(registers: &str, pointer: u16, breakpoint: u16) -> String {
    format!("Registers: [{registers}]\nStack: []\nPointer: {pointer}\nBreakpoint: {breakpoint}\n")
}

#[test]
fn breakpoint_at_start_pauses_before_first_instruction() {
    let file = image(PRINT_R0);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("--break")
        .arg("0")
        .arg("--command")
        .arg("r 0;w 0 65;q");

    let expected = [
        "Reached breakpoint at 0. Pausing execution.\n".to_string(),
        "Debugger> r 0\n".to_string(),
        "0\n".to_string(),
        state("0 0 0 0 0 0 0 0", 0, 0),
        "Debugger> w 0 65\n".to_string(),
        "Current register value: 0\n".to_string(),
        "Updated register 0.\n".to_string(),
        state("65 0 0 0 0 0 0 0", 0, 0),
        "Debugger> q\n".to_string(),
        state("65 0 0 0 0 0 0 0", 0, 0),
    ]
    .concat();

    cmd.assert()
        .success()
        .stdout(diff("A"))
        .stderr(diff(expected));
}

#[test]
fn prompts_for_missing_arguments() {
    let file = image(PRINT_R0);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("-b")
        .arg("0")
        .arg("--command")
        .arg("w\n3\n66\nq");

    cmd.assert()
        .success()
        .stdout(diff("\0"))
        .stderr(contains("Register to write> 3\n"))
        .stderr(contains("New value> 66\n"))
        .stderr(contains("Registers: [0 0 0 66 0 0 0 0]"));
}

#[test]
fn breakpoint_from_environment() {
    let file = image(PRINT_R0);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("--command")
        .arg("w 0 90")
        .env("SYNVM_BREAK", "0");

    cmd.assert().success().stdout(diff("Z"));
}

#[test]
fn relocates_instruction_pointer() {
    // out 'A'; out 'B'; halt
    let file = image(&[19, 65, 19, 66, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("-b")
        .arg("0")
        .arg("--command")
        .arg("a 2;q");

    cmd.assert()
        .success()
        .stdout(diff("B"))
        .stderr(contains("Set instruction pointer to 2."));
}

#[test]
fn moves_breakpoint_and_steps() {
    // noop; noop; out 'C'; halt
    let file = image(&[21, 21, 19, 67, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("-b")
        .arg("0")
        .arg("--command")
        .arg("b 2;q;s;q");

    cmd.assert()
        .success()
        .stdout(diff("C"))
        .stderr(contains("Reached breakpoint at 2."))
        .stderr(contains("Pointer: 2\nBreakpoint: 2\n"));
}

#[test]
fn exit_command_stops_program() {
    let file = image(&[19, 65, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("-b")
        .arg("0")
        .arg("--command")
        .arg("x");

    cmd.assert()
        .success()
        .stdout(diff(""))
        .stderr(contains("Exiting program."));
}

#[test]
fn ignores_bad_commands() {
    let file = image(PRINT_R0);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("-b")
        .arg("0")
        .arg("--command")
        .arg("z;r 8;w 0 abc;w 0 68;q");

    cmd.assert()
        .success()
        .stdout(diff("D"))
        .stderr(contains("Unknown command `z`."))
        .stderr(contains("There is no register 8."))
        .stderr(contains("`abc` is not a decimal integer"));
}

#[test]
fn toggles_tracing() {
    let file = image(&[21, 0]);
    let mut cmd = Command::cargo_bin("synvm").unwrap();
    cmd.arg("debug")
        .arg(file.path())
        .arg("--minimal")
        .arg("-b")
        .arg("0")
        .arg("--command")
        .arg("d;q");

    cmd.assert()
        .success()
        .stderr(contains("Instruction tracing enabled.\n"))
        .stderr(contains("    0  noop\n    1  halt\n"));
}
