use crate::config::Config;
use crate::job;

/// Everything the shell carries from one command line to the next.
pub struct State {
	pub config: Config,
	pub jobs: job::JobTable,
}

impl State {
	pub fn new(config: Config) -> State {
		let jobs = job::JobTable::new(config.max_jobs);
		State { config, jobs }
	}
}
