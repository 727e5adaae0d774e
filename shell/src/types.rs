/// One command invocation, program name first.
pub type ArgumentVector = Vec<String>;

pub const PIPE: &str = "|";
pub const INPUT: &str = "<";
pub const OUTPUT: &str = ">";
pub const APPEND: &str = ">>";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output, Append }

impl RedirectType {
	pub fn from_token(token: &str) -> Option<RedirectType> {
		match token {
			INPUT => Some(RedirectType::Input),
			OUTPUT => Some(RedirectType::Output),
			APPEND => Some(RedirectType::Append),
			_ => None,
		}
	}

	pub fn is_input(self) -> bool {
		self == RedirectType::Input
	}
}

pub fn is_operator(token: &str) -> bool {
	token == PIPE || RedirectType::from_token(token).is_some()
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Redirect {
	pub target: String,
	pub typ: RedirectType,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PipelineStage {
	/// Resolved path handed to exec.
	pub program: String,
	/// Arguments as typed, redirection tokens included.
	pub argv: ArgumentVector,
	pub is_first: bool,
	pub is_last: bool,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Pipeline {
	pub stages: Vec<PipelineStage>,
}

impl Pipeline {
	pub fn len(&self) -> usize {
		self.stages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}
}
