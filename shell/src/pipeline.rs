use crate::builtin;
use crate::error::{Result, ShellError};
use crate::redirect;
use crate::search;
use crate::types::{ArgumentVector, Pipeline, PipelineStage, RedirectType, PIPE};

/// Splits a command line at `|` into launch-ready stages.
///
/// Any syntax problem rejects the whole line before a descriptor is touched:
/// a leading, trailing or doubled `|`, a stage that does not start with a
/// program, a built-in inside a multi-stage pipeline, or a redirection the
/// stage's position does not allow (`<` only in the first stage, `>`/`>>`
/// only in the last).
pub fn build(argv: ArgumentVector, bin_dir: &str) -> Result<Pipeline> {
	let mut groups: Vec<ArgumentVector> = vec![vec![]];
	for word in argv {
		if word == PIPE {
			groups.push(vec![]);
		} else if let Some(last) = groups.last_mut() {
			last.push(word);
		}
	}

	let n = groups.len();
	let mut stages = Vec::with_capacity(n);
	for (i, group) in groups.into_iter().enumerate() {
		let is_first = i == 0;
		let is_last = i + 1 == n;
		let program = match group.first() {
			Some(p) if RedirectType::from_token(p).is_none() => p,
			_ => return Err(ShellError::InvalidCommand),
		};
		if n > 1 && builtin::is_builtin(program) {
			return Err(ShellError::InvalidCommand);
		}
		let resolved = search::resolve(program, bin_dir);

		let mut stripped = group.clone();
		let redirections = redirect::plan(&mut stripped)?;
		if (redirections.input.is_some() && !is_first) || (redirections.output.is_some() && !is_last) {
			return Err(ShellError::InvalidCommand);
		}

		stages.push(PipelineStage {
			program: resolved,
			argv: group,
			is_first,
			is_last,
		});
	}
	Ok(Pipeline { stages })
}

#[cfg(test)]
mod tests {
	use super::*;

	const BIN: &str = "/usr/bin/";

	fn argv(line: &str) -> ArgumentVector {
		line.split_whitespace().map(String::from).collect()
	}

	fn invalid(line: &str) -> bool {
		matches!(build(argv(line), BIN), Err(ShellError::InvalidCommand))
	}

	#[test]
	fn single_stage() {
		let p = build(argv("ls -l"), BIN).unwrap();
		assert_eq!(p.len(), 1);
		let s = &p.stages[0];
		assert_eq!(s.program, "/usr/bin/ls");
		assert_eq!(s.argv, argv("ls -l"));
		assert!(s.is_first && s.is_last);
	}

	#[test]
	fn splits_at_pipes() {
		let p = build(argv("cat < in | grep x | ./count > out"), BIN).unwrap();
		assert_eq!(p.len(), 3);
		assert_eq!(p.stages[0].argv, argv("cat < in"));
		assert_eq!(p.stages[1].program, "/usr/bin/grep");
		assert!(!p.stages[1].is_first && !p.stages[1].is_last);
		assert_eq!(p.stages[2].program, "./count");
		assert_eq!(p.stages[2].argv, argv("./count > out"));
	}

	#[test]
	fn dangling_pipes_are_invalid() {
		assert!(invalid("| ls"));
		assert!(invalid("ls |"));
		assert!(invalid("ls | | wc"));
		assert!(invalid("|"));
	}

	#[test]
	fn misplaced_redirections_are_invalid() {
		assert!(invalid("ls | wc < in"));
		assert!(invalid("ls > out | wc"));
		assert!(invalid("a | b >> out | c"));
		assert!(invalid("< in cat"));
		assert!(invalid("cat <"));
	}

	#[test]
	fn builtins_cannot_be_piped() {
		assert!(invalid("jobs | wc"));
		assert!(invalid("ls | cd /"));
	}
}
