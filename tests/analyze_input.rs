use std::io::Write;
use std::process::{Command, Stdio};

fn augur() -> Command {
    Command::new(env!("CARGO_BIN_EXE_augur"))
}

#[test]
fn analyze_rejects_empty_stdin() {
    let dir = tempfile::tempdir().unwrap();

    let mut child = augur()
        .arg("analyze")
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    drop(child.stdin.take());

    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Empty diff input"), "stderr: {stderr}");
}

#[test]
fn analyze_rejects_whitespace_only_stdin() {
    let dir = tempfile::tempdir().unwrap();

    let mut child = augur()
        .arg("analyze")
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"   \n\t\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Empty diff input"), "stderr: {stderr}");
}

#[test]
fn analyze_reports_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();

    let output = augur()
        .args(["analyze", "--file", "no-such.patch"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such.patch"), "stderr: {stderr}");
}
