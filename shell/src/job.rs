use std::fmt;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::error::{report, Result, ShellError};
use crate::types::ArgumentVector;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
	Running,
	Exited(i32),
	Signaled(Signal),
	Stopped(Signal),
}

impl State {
	pub fn is_stopped(self) -> bool {
		matches!(self, State::Stopped(_))
	}
}

trait WaitStatusExt {
	fn state(self) -> State;
}

impl WaitStatusExt for WaitStatus {
	fn state(self) -> State {
		match self {
			WaitStatus::Exited(_, code) => State::Exited(code),
			WaitStatus::Signaled(_, sig, _) => State::Signaled(sig),
			WaitStatus::Stopped(_, sig) => State::Stopped(sig),
			#[cfg(any(target_os = "linux", target_os = "android"))]
			WaitStatus::PtraceEvent(_, sig, _) => State::Stopped(sig),
			#[cfg(any(target_os = "linux", target_os = "android"))]
			WaitStatus::PtraceSyscall(_) => State::Stopped(Signal::SIGTRAP),
			WaitStatus::Continued(_) => State::Running,
			WaitStatus::StillAlive => State::Running,
		}
	}
}

/// A forked stage the shell still has to collect.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Process {
	pub pid: Pid,
	pub program: String,
	pub argv: ArgumentVector,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SuspendedJob {
	pub pid: Pid,
	/// Current 1-based rank in the table, not a stable id.
	pub number: usize,
	pub program: String,
	pub argv: ArgumentVector,
}

impl SuspendedJob {
	fn into_process(self) -> Process {
		Process { pid: self.pid, program: self.program, argv: self.argv }
	}
}

impl fmt::Display for SuspendedJob {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "[{}] {}", self.number, self.argv.join(" "))
	}
}

/// Stopped processes, kept in the order they stopped.
///
/// Numbers are always `1..=len()`: removing a job shifts every later job down
/// by one, and a pushed job always lands at the end.
#[derive(Debug)]
pub struct JobTable {
	jobs: Vec<SuspendedJob>,
	capacity: usize,
}

impl JobTable {
	pub fn new(capacity: usize) -> JobTable {
		JobTable { jobs: Vec::new(), capacity }
	}

	pub fn len(&self) -> usize {
		self.jobs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.jobs.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn get(&self, number: usize) -> Option<&SuspendedJob> {
		number.checked_sub(1).and_then(|i| self.jobs.get(i))
	}

	pub fn iter(&self) -> impl Iterator<Item = &SuspendedJob> + '_ {
		self.jobs.iter()
	}

	/// One `[n] argv...` line per job, in job number order.
	pub fn listing(&self) -> impl Iterator<Item = String> + '_ {
		self.jobs.iter().map(|job| job.to_string())
	}

	pub fn push(&mut self, process: Process) -> Result<usize> {
		if self.jobs.len() >= self.capacity {
			return Err(ShellError::TooManyJobs);
		}
		let number = self.jobs.len() + 1;
		self.jobs.push(SuspendedJob { pid: process.pid, number, program: process.program, argv: process.argv });
		Ok(number)
	}

	pub fn remove(&mut self, number: usize) -> Result<SuspendedJob> {
		if number == 0 || number > self.jobs.len() {
			return Err(ShellError::InvalidJob);
		}
		let job = self.jobs.remove(number - 1);
		for later in &mut self.jobs[number - 1 ..] {
			later.number -= 1;
		}
		Ok(job)
	}
}

/// Blocks until `pid` exits, dies from a signal, or stops.
pub fn wait_for(pid: Pid) -> Result<State> {
	loop {
		match wait::waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
			Ok(status) => match status.state() {
				State::Running => continue,
				state => return Ok(state),
			},
			Err(Errno::EINTR) => continue,
			Err(errno) => {
				warn!(%pid, %errno, "waitpid failed");
				return Err(errno.into());
			},
		}
	}
}

/// Waits for one foreground process and files it in `jobs` if it stopped.
///
/// A stopped process that does not fit in the table is reported and left
/// stopped; the returned state is still `Stopped`.
pub fn settle(jobs: &mut JobTable, process: Process) -> Result<State> {
	let state = wait_for(process.pid)?;
	debug!(pid = %process.pid, ?state, program = %process.program, "stage settled");
	if state.is_stopped() {
		let pid = process.pid;
		match jobs.push(process) {
			Ok(number) => debug!(%pid, number, "job suspended"),
			Err(e) => {
				warn!(%pid, capacity = jobs.capacity(), "stopped process left untracked");
				report(&e);
			},
		}
	}
	Ok(state)
}

/// Moves job `number` back to the foreground and waits for it again.
///
/// The job leaves the table before it is continued; if it stops once more it
/// is appended at the end with a fresh number.
pub fn foreground(jobs: &mut JobTable, number: usize) -> Result<State> {
	let job = jobs.remove(number)?;
	let process = job.into_process();
	debug!(pid = %process.pid, number, "resuming job");
	if let Err(errno) = signal::kill(process.pid, Signal::SIGCONT) {
		warn!(pid = %process.pid, %errno, "cannot continue job");
		return Err(errno.into());
	}
	settle(jobs, process)
}
