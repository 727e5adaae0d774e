//! Runs the nyush binary with a scripted standard input.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn nyush(dir: &Path, script: &str) -> Output {
	let mut child = Command::new(env!("CARGO_BIN_EXE_nyush"))
		.current_dir(dir)
		.env_remove("RUST_LOG")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("spawn nyush");
	child.stdin.take().unwrap().write_all(script.as_bytes()).unwrap();
	child.wait_with_output().expect("wait for nyush")
}

fn text(bytes: &[u8]) -> String {
	String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn prompt_shows_directory_basename() {
	let dir = TempDir::new().unwrap();
	let out = nyush(dir.path(), "exit\n");
	let base = dir.path().file_name().unwrap().to_string_lossy().into_owned();
	assert!(out.status.success());
	assert_eq!(text(&out.stdout), format!("[nyush {}]$ ", base));
}

#[test]
fn end_of_input_exits_cleanly() {
	let dir = TempDir::new().unwrap();
	let out = nyush(dir.path(), "\n   \n");
	assert!(out.status.success());
	assert!(text(&out.stderr).is_empty());
}

#[test]
fn pipeline_output_and_errors() {
	let dir = TempDir::new().unwrap();
	let out = nyush(dir.path(), "echo hi | wc -l\nls |\n| ls\nnyush-no-such-program\nexit\n");
	let stdout = text(&out.stdout);
	let stderr = text(&out.stderr);
	assert!(out.status.success());
	assert!(stdout.lines().any(|l| l.trim_start().ends_with('1')), "stdout: {}", stdout);
	assert_eq!(stderr.matches("Error: invalid command").count(), 2, "stderr: {}", stderr);
	assert!(stderr.contains("Error: invalid program"), "stderr: {}", stderr);
}

#[test]
fn relative_redirection_targets() {
	let dir = TempDir::new().unwrap();
	fs::write(dir.path().join("in.txt"), "hello\n").unwrap();
	let out = nyush(dir.path(), "cat < in.txt > out.txt\ncat < missing.txt\nexit\n");
	assert!(out.status.success());
	assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hello\n");
	assert!(text(&out.stderr).contains("Error: invalid file"));
}

#[test]
fn cd_changes_the_prompt() {
	let dir = TempDir::new().unwrap();
	fs::create_dir(dir.path().join("sub")).unwrap();
	let out = nyush(dir.path(), "cd sub\ncd\ncd nowhere\nexit\n");
	let stdout = text(&out.stdout);
	let stderr = text(&out.stderr);
	assert!(stdout.contains("[nyush sub]$ "), "stdout: {}", stdout);
	assert!(stderr.contains("Error: invalid command"));
	assert!(stderr.contains("Error: invalid directory"));
}

#[test]
fn suspended_job_blocks_exit_until_resumed() {
	let dir = TempDir::new().unwrap();
	fs::write(dir.path().join("stop.sh"), "kill -STOP $$\necho resumed\n").unwrap();
	let out = nyush(dir.path(), "/bin/sh stop.sh\njobs\nexit\nfg 3\nfg 1\njobs\nexit\n");
	let stdout = text(&out.stdout);
	let stderr = text(&out.stderr);
	assert!(out.status.success());
	assert!(stdout.contains("[1] /bin/sh stop.sh\n"), "stdout: {}", stdout);
	assert!(stdout.contains("resumed\n"), "stdout: {}", stdout);
	assert!(stderr.contains("Error: there are suspended jobs"), "stderr: {}", stderr);
	assert!(stderr.contains("Error: invalid job"), "stderr: {}", stderr);
	assert_eq!(stdout.matches("[1] ").count(), 1, "stdout: {}", stdout);
}
