use std::fs;
use std::os::unix::io::{IntoRawFd, RawFd};

use nix::unistd;
use tracing::debug;

use crate::error::{Result, ShellError};
use crate::types::{is_operator, ArgumentVector, Redirect, RedirectType};

/// Redirections pulled out of an argument vector.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Redirections {
	pub input: Option<Redirect>,
	pub output: Option<Redirect>,
}

impl Redirections {
	pub fn is_empty(&self) -> bool {
		self.input.is_none() && self.output.is_none()
	}

	/// Opens every target and moves it onto standard input or output.
	///
	/// Only ever called in a forked child right before exec.
	pub fn apply(&self) -> Result<()> {
		if let Some(ref redirect) = self.input {
			move_onto(open(redirect)?, libc::STDIN_FILENO)?;
		}
		if let Some(ref redirect) = self.output {
			move_onto(open(redirect)?, libc::STDOUT_FILENO)?;
		}
		Ok(())
	}
}

fn move_onto(file: fs::File, to: RawFd) -> Result<()> {
	let fd = file.into_raw_fd();
	if fd != to {
		unistd::dup2(fd, to)?;
		unistd::close(fd)?;
	}
	Ok(())
}

fn open(redirect: &Redirect) -> Result<fs::File> {
	let mut oopt = fs::OpenOptions::new();
	let _ = match redirect.typ {
		RedirectType::Input => oopt.read(true),
		RedirectType::Output => oopt.write(true).create(true).truncate(true),
		RedirectType::Append => oopt.append(true).create(true),
	};
	oopt.open(&redirect.target).map_err(|e| {
		debug!(path = %redirect.target, error = %e, "cannot open redirection target");
		ShellError::InvalidFile
	})
}

/// Strips every `<`, `>` and `>>` together with its operand from `argv`,
/// keeping the remaining arguments in order.
///
/// A direction given twice, an operator with no operand, or an operand that is
/// itself an operator makes the command invalid; `argv` is left untouched then.
pub fn plan(argv: &mut ArgumentVector) -> Result<Redirections> {
	let mut redirections = Redirections::default();
	let mut spans = vec![];
	let mut i = 0;
	while i < argv.len() {
		let typ = match RedirectType::from_token(&argv[i]) {
			Some(typ) => typ,
			None => {
				i += 1;
				continue;
			},
		};
		let target = match argv.get(i + 1) {
			Some(target) if !is_operator(target) => target.clone(),
			_ => return Err(ShellError::InvalidCommand),
		};
		let slot = if typ.is_input() { &mut redirections.input } else { &mut redirections.output };
		if slot.is_some() {
			return Err(ShellError::InvalidCommand);
		}
		*slot = Some(Redirect { target, typ });
		spans.push(i);
		i += 2;
	}
	for &start in spans.iter().rev() {
		argv.drain(start .. start + 2);
	}
	Ok(redirections)
}

/// Strips and applies the redirections of one stage.
///
/// `allow_input`/`allow_output` say whether the stage sits at the head or tail
/// of its pipeline; a redirection in a disallowed direction is rejected before
/// any file is opened.
pub fn install(argv: &mut ArgumentVector, allow_input: bool, allow_output: bool) -> Result<()> {
	let redirections = plan(argv)?;
	if (redirections.input.is_some() && !allow_input) || (redirections.output.is_some() && !allow_output) {
		return Err(ShellError::InvalidCommand);
	}
	redirections.apply()
}
