use std::io;
use std::io::Write;

use nix::unistd;
use tracing::debug;

use crate::error::{Result, ShellError};
use crate::global;
use crate::job;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow { Continue, Exit }

pub type Builtin = fn(&mut global::State, &[String]) -> Result<Flow>;

fn expect_args(args: &[String], n: usize) -> Result<()> {
	if args.len() == n { Ok(()) } else { Err(ShellError::InvalidCommand) }
}

pub fn builtin_cd(_: &mut global::State, args: &[String]) -> Result<Flow> {
	expect_args(args, 1)?;
	unistd::chdir(args[0].as_str()).map_err(|e| {
		debug!(dir = %args[0], error = %e, "chdir failed");
		ShellError::InvalidDirectory
	})?;
	Ok(Flow::Continue)
}

pub fn builtin_exit(state: &mut global::State, args: &[String]) -> Result<Flow> {
	expect_args(args, 0)?;
	if !state.jobs.is_empty() {
		return Err(ShellError::SuspendedJobs);
	}
	Ok(Flow::Exit)
}

pub fn builtin_jobs(state: &mut global::State, args: &[String]) -> Result<Flow> {
	expect_args(args, 0)?;
	let stdout = io::stdout();
	let mut out = stdout.lock();
	for line in state.jobs.listing() {
		let _ = writeln!(out, "{}", line);
	}
	let _ = out.flush();
	Ok(Flow::Continue)
}

pub fn builtin_fg(state: &mut global::State, args: &[String]) -> Result<Flow> {
	expect_args(args, 1)?;
	if args[0].is_empty() || !args[0].bytes().all(|b| b.is_ascii_digit()) {
		return Err(ShellError::InvalidJob);
	}
	let number: usize = args[0].parse().map_err(|_| ShellError::InvalidJob)?;
	job::foreground(&mut state.jobs, number)?;
	Ok(Flow::Continue)
}

pub fn match_builtin(name: &str) -> Option<Builtin> {
	match name {
		"cd" => Some(builtin_cd),
		"exit" => Some(builtin_exit),
		"jobs" => Some(builtin_jobs),
		"fg" => Some(builtin_fg),
		_ => None,
	}
}

pub fn is_builtin(name: &str) -> bool {
	match_builtin(name).is_some()
}
