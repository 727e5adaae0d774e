//! nyush: a small interactive shell with pipelines, redirection and
//! stop/resume job control.
//!
//! A command line goes through [`parser::tokenize`], then [`eval::run`], which
//! dispatches built-ins or builds a [`types::Pipeline`], forks its stages and
//! waits on them, filing stopped processes in the [`job::JobTable`] held by
//! [`global::State`].

pub mod builtin;
pub mod config;
pub mod error;
pub mod eval;
pub mod global;
pub mod job;
pub mod parser;
pub mod pipeline;
pub mod redirect;
pub mod search;
pub mod signals;
pub mod types;

pub use error::ShellError;
pub use eval::{run, Outcome};
pub use global::State;
