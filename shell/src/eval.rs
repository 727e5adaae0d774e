use std::convert::Infallible;
use std::ffi::CString;
use std::fs;
use std::io::{Read, Write};
use std::os::unix::io::{AsRawFd, OwnedFd};

use nix::fcntl::OFlag;
use nix::sys::signal::{self, Signal};
use nix::sys::wait;
use nix::unistd::{self, ForkResult, Pid};
use tracing::{debug, warn};

use crate::builtin::{self, Flow};
use crate::error::{report, Result, ShellError};
use crate::global;
use crate::job;
use crate::pipeline;
use crate::redirect;
use crate::signals::Dispositions;
use crate::types::{ArgumentVector, Pipeline, PipelineStage, PIPE};

/// What became of one command line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
	/// Nothing to run.
	Skipped,
	BuiltinHandled,
	PipelineLaunched,
	InvalidCommand,
	InvalidProgram,
	/// A pipe or fork failed; nothing of the pipeline is left running.
	ResourceExhausted,
	/// `exit` was accepted.
	Exit,
}

/// Why a child gave up before or at exec, sent back over its status pipe.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LaunchFailure {
	InvalidFile = 1,
	InvalidProgram = 2,
	Other = 3,
}

impl LaunchFailure {
	fn of(e: &ShellError) -> LaunchFailure {
		match *e {
			ShellError::InvalidFile => LaunchFailure::InvalidFile,
			ShellError::InvalidProgram => LaunchFailure::InvalidProgram,
			_ => LaunchFailure::Other,
		}
	}

	fn from_byte(b: u8) -> LaunchFailure {
		match b {
			1 => LaunchFailure::InvalidFile,
			2 => LaunchFailure::InvalidProgram,
			_ => LaunchFailure::Other,
		}
	}
}

/// A forked stage together with the read end of its status pipe.
#[derive(Debug)]
pub struct Launched {
	pub process: job::Process,
	status: fs::File,
}

impl Launched {
	/// Reads what the child reported before exec.
	///
	/// Blocks until the child has exec'd or exited, so it must not be called
	/// for a child that may be stopped.
	fn failure(mut self) -> Option<LaunchFailure> {
		let mut buf = vec![];
		match self.status.read_to_end(&mut buf) {
			Ok(_) => buf.first().map(|&b| LaunchFailure::from_byte(b)),
			Err(e) => {
				warn!(pid = %self.process.pid, error = %e, "cannot read launch status");
				None
			},
		}
	}
}

type PipeEnds = (OwnedFd, OwnedFd);

fn do_exec_stage(stage: &PipelineStage, i: usize, pipes: &mut Vec<PipeEnds>) -> Result<Infallible> {
	if i > 0 {
		unistd::dup2(pipes[i - 1].0.as_raw_fd(), libc::STDIN_FILENO)?;
	}
	if i < pipes.len() {
		unistd::dup2(pipes[i].1.as_raw_fd(), libc::STDOUT_FILENO)?;
	}
	pipes.clear();

	let mut argv = stage.argv.clone();
	redirect::install(&mut argv, stage.is_first, stage.is_last)?;

	let path = CString::new(stage.program.as_str()).map_err(|_| ShellError::InvalidProgram)?;
	let args = argv.into_iter()
		.map(CString::new)
		.collect::<std::result::Result<Vec<CString>, _>>()
		.map_err(|_| ShellError::InvalidProgram)?;

	// Until here the child ignores ^C, ^\ and ^Z like the shell does.
	Dispositions::child().apply()?;
	unistd::execv(&path, &args).map_err(|e| {
		debug!(program = %stage.program, error = %e, "exec failed");
		ShellError::InvalidProgram
	})
}

/// Runs in the forked child; never returns into the shell.
fn exec_stage(stage: &PipelineStage, i: usize, pipes: &mut Vec<PipeEnds>, status: &mut Vec<PipeEnds>) -> ! {
	let (_, status_writer) = status.swap_remove(i);
	status.clear();

	let e = match do_exec_stage(stage, i, pipes) {
		Ok(never) => match never {},
		Err(e) => e,
	};
	report(&e);
	let mut status_writer = fs::File::from(status_writer);
	let _ = status_writer.write_all(&[LaunchFailure::of(&e) as u8]);
	unsafe { libc::_exit(1) }
}

fn abort_children(children: &[Pid]) {
	for &pid in children {
		let _ = signal::kill(pid, Signal::SIGKILL);
		let _ = wait::waitpid(pid, None);
	}
}

/// Forks every stage of `pipeline`, left to right, wired through fresh pipes.
///
/// All pipes exist before the first fork. If any pipe or fork fails, stages
/// already started are killed and reaped, so either the whole pipeline runs
/// or none of it does. The parent keeps no pipe descriptor afterwards except
/// the read ends of the status pipes, handed out in [`Launched`].
pub fn launch(pipeline: &Pipeline) -> Result<Vec<Launched>> {
	let n = pipeline.len();
	let mut pipes: Vec<PipeEnds> = Vec::with_capacity(n.saturating_sub(1));
	for _ in 1 .. n {
		pipes.push(unistd::pipe2(OFlag::O_CLOEXEC)?);
	}
	let mut status: Vec<PipeEnds> = Vec::with_capacity(n);
	for _ in 0 .. n {
		status.push(unistd::pipe2(OFlag::O_CLOEXEC)?);
	}

	let mut children: Vec<Pid> = Vec::with_capacity(n);
	for (i, stage) in pipeline.stages.iter().enumerate() {
		// SAFETY: the child only sets up descriptors and then execs or _exits.
		match unsafe { unistd::fork() } {
			Ok(ForkResult::Parent { child }) => {
				debug!(pid = %child, stage = i, program = %stage.program, "forked stage");
				children.push(child);
			},
			Ok(ForkResult::Child) => exec_stage(stage, i, &mut pipes, &mut status),
			Err(e) => {
				warn!(error = %e, started = children.len(), "fork failed, aborting pipeline");
				abort_children(&children);
				return Err(e.into());
			},
		}
	}
	drop(pipes);

	let launched = pipeline.stages.iter().zip(children).zip(status)
		.map(|((stage, pid), (reader, writer))| {
			drop(writer);
			Launched {
				process: job::Process { pid, program: stage.program.clone(), argv: stage.argv.clone() },
				status: fs::File::from(reader),
			}
		})
		.collect();
	Ok(launched)
}

/// Waits for every launched stage, in launch order, filing stopped ones in
/// `jobs`, and pairs each final state with the failure its child reported.
///
/// A stopped stage's status pipe is never read: it may have stopped before
/// exec and would keep the pipe open.
pub fn collect(jobs: &mut job::JobTable, launched: Vec<Launched>) -> Vec<(job::State, Option<LaunchFailure>)> {
	let mut results = Vec::with_capacity(launched.len());
	for stage in launched {
		let state = match job::settle(jobs, stage.process.clone()) {
			Ok(state) => state,
			Err(e) => {
				report(&e);
				continue;
			},
		};
		let failure = if state.is_stopped() { None } else { stage.failure() };
		if let Some(failure) = failure {
			debug!(?failure, ?state, "stage failed before exec");
		}
		results.push((state, failure));
	}
	results
}

/// Runs one tokenized command line to completion or suspension.
///
/// A single-stage line naming a built-in runs in the shell itself. Anything
/// else becomes a pipeline whose stages are all waited for; stages that stop
/// are filed in the job table. Every error is reported here and only affects
/// this command line.
pub fn run(state: &mut global::State, argv: ArgumentVector) -> Outcome {
	let name = match argv.first() {
		Some(name) => name.clone(),
		None => return Outcome::Skipped,
	};

	let builtin = if argv.iter().any(|w| w == PIPE) { None } else { builtin::match_builtin(&name) };
	if let Some(builtin) = builtin {
		return match builtin(state, &argv[1 ..]) {
			Ok(Flow::Continue) => Outcome::BuiltinHandled,
			Ok(Flow::Exit) => Outcome::Exit,
			Err(e) => {
				report(&e);
				Outcome::BuiltinHandled
			},
		};
	}

	let pipeline = match pipeline::build(argv, &state.config.bin_dir) {
		Ok(pipeline) => pipeline,
		Err(e) => {
			report(&e);
			return Outcome::InvalidCommand;
		},
	};

	let launched = match launch(&pipeline) {
		Ok(launched) => launched,
		Err(e) => {
			warn!(error = ?e, stages = pipeline.len(), "cannot launch pipeline");
			report(&e);
			return Outcome::ResourceExhausted;
		},
	};

	let results = collect(&mut state.jobs, launched);
	if results.iter().any(|&(_, failure)| failure == Some(LaunchFailure::InvalidProgram)) {
		Outcome::InvalidProgram
	} else {
		Outcome::PipelineLaunched
	}
}
