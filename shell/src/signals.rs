use nix::sys::signal::{self, SigHandler, Signal};

/// Terminal-generated signals the shell shields itself from.
pub const CONTROL_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP];

/// A set of signal dispositions installed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispositions {
	entries: Vec<(Signal, SigHandler)>,
}

impl Dispositions {
	fn all(handler: SigHandler) -> Dispositions {
		Dispositions { entries: CONTROL_SIGNALS.iter().map(|&sig| (sig, handler)).collect() }
	}

	/// What the shell process runs with: the control signals are ignored.
	pub fn shell() -> Dispositions {
		Dispositions::all(SigHandler::SigIgn)
	}

	/// What every forked stage gets before exec, so ^C, ^\ and ^Z reach it.
	pub fn child() -> Dispositions {
		Dispositions::all(SigHandler::SigDfl)
	}

	pub fn entries(&self) -> &[(Signal, SigHandler)] {
		&self.entries
	}

	pub fn apply(&self) -> nix::Result<()> {
		for &(sig, handler) in &self.entries {
			// SAFETY: only SigIgn and SigDfl are ever installed, no handler code runs.
			unsafe { signal::signal(sig, handler) }?;
		}
		Ok(())
	}
}
