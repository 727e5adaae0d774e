use std::env;

use crate::error::{Result, ShellError};

const BIN_DIR_KEY: &str = "NYUSH_BIN_DIR";
const MAX_JOBS_KEY: &str = "NYUSH_MAX_JOBS";

pub const DEFAULT_BIN_DIR: &str = "/usr/bin/";
pub const DEFAULT_MAX_JOBS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Directory bare program names are resolved against. Always ends in `/`.
	pub bin_dir: String,
	/// Capacity of the job table.
	pub max_jobs: usize,
}

impl Default for Config {
	fn default() -> Config {
		Config { bin_dir: DEFAULT_BIN_DIR.to_string(), max_jobs: DEFAULT_MAX_JOBS }
	}
}

impl Config {
	pub fn from_env() -> Result<Config> {
		Config::from_lookup(|key| env::var(key).ok())
	}

	fn from_lookup<F>(lookup: F) -> Result<Config> where F: Fn(&str) -> Option<String> {
		let mut config = Config::default();
		if let Some(dir) = lookup(BIN_DIR_KEY) {
			if dir.is_empty() {
				return Err(ShellError::InvalidConfig { key: BIN_DIR_KEY, value: dir });
			}
			config.bin_dir = if dir.ends_with('/') { dir } else { dir + "/" };
		}
		if let Some(value) = lookup(MAX_JOBS_KEY) {
			config.max_jobs = match value.trim().parse::<usize>() {
				Ok(n) if n > 0 => n,
				_ => return Err(ShellError::InvalidConfig { key: MAX_JOBS_KEY, value }),
			};
		}
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
		move |key| pairs.iter().find(|&&(k, _)| k == key).map(|&(_, v)| v.to_string())
	}

	#[test]
	fn defaults_without_overrides() {
		let config = Config::from_lookup(lookup_from(&[])).unwrap();
		assert_eq!(config, Config::default());
		assert_eq!(config.bin_dir, "/usr/bin/");
		assert_eq!(config.max_jobs, 100);
	}

	#[test]
	fn bin_dir_gets_trailing_slash() {
		let config = Config::from_lookup(lookup_from(&[("NYUSH_BIN_DIR", "/opt/bin")])).unwrap();
		assert_eq!(config.bin_dir, "/opt/bin/");
	}

	#[test]
	fn max_jobs_must_be_positive() {
		let zero = Config::from_lookup(lookup_from(&[("NYUSH_MAX_JOBS", "0")]));
		assert!(matches!(zero, Err(ShellError::InvalidConfig { key: "NYUSH_MAX_JOBS", .. })));
		let junk = Config::from_lookup(lookup_from(&[("NYUSH_MAX_JOBS", "many")]));
		assert!(junk.is_err());
		let five = Config::from_lookup(lookup_from(&[("NYUSH_MAX_JOBS", "5")])).unwrap();
		assert_eq!(five.max_jobs, 5);
	}
}
