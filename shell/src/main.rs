use std::env;
use std::io;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nyush::config::Config;
use nyush::signals::Dispositions;
use nyush::{eval, parser, Outcome, State};

fn prompt() -> Result<String> {
	let cwd = env::current_dir().context("cannot read the current directory")?;
	let base = match cwd.file_name() {
		Some(name) => name.to_string_lossy().into_owned(),
		None => "/".to_string(),
	};
	Ok(format!("[nyush {}]$ ", base))
}

fn repl() -> Result<()> {
	let config = Config::from_env()?;
	Dispositions::shell().apply().context("cannot ignore terminal signals")?;
	let mut state = State::new(config);

	let mut stdout = io::stdout();
	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();
	loop {
		let _ = stdout.write_all(prompt()?.as_bytes());
		let _ = stdout.flush();
		let mut line: Vec<u8> = vec![];
		let n = stdin_locked.read_until(b'\n', &mut line).context("cannot read standard input")?;
		if n == 0 {
			if !state.jobs.is_empty() {
				warn!(jobs = state.jobs.len(), "end of input with suspended jobs left behind");
			}
			return Ok(());
		}
		if eval::run(&mut state, parser::tokenize(&line)) == Outcome::Exit {
			return Ok(());
		}
	}
}

fn main() -> ExitCode {
	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(io::stderr))
		.with(EnvFilter::from_default_env())
		.init();

	match repl() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Error: {:#}", e);
			ExitCode::FAILURE
		},
	}
}
