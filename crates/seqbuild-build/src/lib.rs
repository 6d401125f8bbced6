//! Build target description and runner for `seqc`.
//!
//! A [`BuildConfig`] says what to run; a [`BuildRunner`] runs it, wraps the
//! attempt in [`BuildHooks`], and hands the captured output to
//! [`seqbuild_log::ErrorExtractor`].

use seqbuild_log::ErrorRecord;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod hooks;
pub mod placeholders;
pub mod runner;

pub use config::{BuildConfig, CONFIG_FILE_NAME};
pub use hooks::{BuildHooks, LoggingHooks};
pub use placeholders::BuildContext;
pub use runner::BuildRunner;

/// Result of one build attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    /// Standard output followed by standard error.
    pub output: String,
    pub errors: Vec<ErrorRecord>,
}
