//! End-to-end checks of the `shoe-oracle` binary.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

fn oracle() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shoe-oracle"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .stderr(Stdio::null());
    cmd
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_no_arguments_prints_look() {
    let output = oracle().stdin(Stdio::null()).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "LOOK\n");
}

#[test]
fn test_empty_recommend_prints_look() {
    let output = oracle().args(["--recommend", ""]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "LOOK\n");
}

#[test]
fn test_recommend_prints_single_token() {
    let output = oracle().args(["--recommend", "PPBBPBTBB"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "B\n");
}

#[test]
fn test_live_reads_piped_input_to_eof() {
    let mut child = oracle()
        .arg("--live")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"p\nx\nb\n").unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let text = stdout_of(&output);
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["P", "LOOK"]);
}

#[cfg(unix)]
#[test]
fn test_live_exits_on_interrupt_with_stdin_open() {
    let mut child = oracle()
        .arg("--live")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    // Keep the write half alive so the process never sees EOF.
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"p\n").unwrap();
    stdin.flush().unwrap();

    // Once the first answer arrives the interrupt handler is installed.
    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    let mut first = String::new();
    stdout.read_line(&mut first).unwrap();
    assert_eq!(first, "P\n");

    let sent = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(sent.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() >= deadline {
            child.kill().unwrap();
            panic!("live mode still running after interrupt");
        }
        std::thread::sleep(Duration::from_millis(20));
    };
    assert!(status.success());
    drop(stdin);
}
