//! # seqbuild error extraction
//!
//! Turns the raw text printed by `seqc` into a list of typed
//! [`ErrorRecord`](ir::ErrorRecord)s that an editor can use for
//! jump-to-error navigation.
//!
//! ## Overview
//!
//! Compilers in the GNU tradition report problems as
//!
//! ```text
//! file:line:col: error: message
//! ```
//!
//! The extractor keeps every output line containing `: error:` and splits
//! the location prefix on `:`. Nothing is validated: `line` and `col` stay
//! as text, and a line with a short prefix simply yields a record with
//! fewer fields. Warnings and continuation lines are ignored.
//!
//! ## Examples
//!
//! ### One-shot
//!
//! ```
//! use seqbuild_log::ErrorExtractor;
//!
//! let output = "foo.c:10:5: error: bad token\nok line\nbar.c:3:1: error: missing semi";
//! let records = ErrorExtractor::new().parse(output);
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].file, "foo.c");
//! assert_eq!(records[0].line.as_deref(), Some("10"));
//! assert_eq!(records[1].message, "bar.c:3:1: error: missing semi");
//! ```
//!
//! ### Streaming
//!
//! ```
//! use seqbuild_log::ErrorExtractor;
//!
//! let mut extractor = ErrorExtractor::new();
//! let mut records = extractor.update("main.seq:4:2: err");
//! assert!(records.is_empty());
//!
//! records.extend(extractor.update("or: unknown op\n"));
//! records.extend(extractor.finish());
//! assert_eq!(records.len(), 1);
//! ```
//!
//! ### JSON
//!
//! Records implement `serde::Serialize`; absent `line`/`col` fields are
//! omitted from the output.

/// Error record IR.
pub mod ir;
/// Line-oriented extractor.
pub mod parser;


pub use ir::{ErrorRecord, Position};
pub use parser::{ErrorExtractor, extract_errors};

/// Schema version of the serialized [`ErrorRecord`].
///
/// Bumped on MAJOR for removed/renamed fields, MINOR for new optional fields.
pub const SCHEMA_VERSION: &str = "1.0.0";
