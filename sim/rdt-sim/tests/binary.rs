//! Runs the built `rdt-sim` binary and checks its exit codes and output.

use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn rdt_sim(args: &[&str], stdin: &str) -> anyhow::Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rdt-sim"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut input) = child.stdin.take() {
        input.write_all(stdin.as_bytes())?;
    }
    Ok(child.wait_with_output()?)
}

#[test]
fn quit_exits_cleanly() -> anyhow::Result<()> {
    let output = rdt_sim(&[], "r\nq\n")?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Transition: WAIT_CALL_0 -> WAIT_ACK_0"));
    assert!(stdout.contains("Program is shutting down at user's request"));
    Ok(())
}

#[test]
fn script_replays_answers() -> anyhow::Result<()> {
    let output = rdt_sim(&["--script", &fixture("full_cycle.txt")], "")?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Transition: WAIT_ACK_1 -> WAIT_CALL_0"));
    Ok(())
}

#[test]
fn invalid_state_in_table_exits_with_failure() -> anyhow::Result<()> {
    let output = rdt_sim(&["--table", &fixture("invalid_state.csv")], "")?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Invalid state 4"));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn missing_script_exits_with_failure() -> anyhow::Result<()> {
    let output = rdt_sim(&["--script", &fixture("no_such_script.txt")], "")?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("no_such_script.txt"));
    Ok(())
}

#[test]
fn print_table_matches_the_fixture() -> anyhow::Result<()> {
    let output = rdt_sim(&["--print-table"], "")?;
    assert_eq!(output.status.code(), Some(0));
    let expected = std::fs::read_to_string(fixture("sender_table.csv"))?;
    assert_eq!(String::from_utf8(output.stdout)?, expected);
    Ok(())
}
