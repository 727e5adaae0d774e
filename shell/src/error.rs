use std::io;
use std::io::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
	#[error("invalid command")]
	InvalidCommand,
	#[error("invalid program")]
	InvalidProgram,
	#[error("invalid file")]
	InvalidFile,
	#[error("invalid job")]
	InvalidJob,
	#[error("invalid directory")]
	InvalidDirectory,
	#[error("there are suspended jobs")]
	SuspendedJobs,
	#[error("too many suspended jobs")]
	TooManyJobs,
	/// A pipe, fork, wait or kill failed; the errno goes to the log, not the user.
	#[error("resource exhausted")]
	Sys(#[from] nix::Error),
	#[error("invalid value for {key}: {value:?}")]
	InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ShellError>;

/// Writes `Error: <e>` to standard error.
pub fn report(e: &ShellError) {
	let mut stderr = io::stderr();
	let _ = writeln!(stderr, "Error: {}", e);
	let _ = stderr.flush();
}

#[cfg(test)]
mod tests {
	use super::*;
	use nix::errno::Errno;

	#[test]
	fn messages_stay_within_the_taxonomy() {
		assert_eq!(ShellError::Sys(Errno::EMFILE).to_string(), "resource exhausted");
		assert_eq!(ShellError::Sys(Errno::EAGAIN).to_string(), "resource exhausted");
		assert_eq!(ShellError::InvalidJob.to_string(), "invalid job");
		assert_eq!(ShellError::SuspendedJobs.to_string(), "there are suspended jobs");
	}
}
