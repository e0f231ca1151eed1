//! # bakery-core
//!
//! Front end for PEBakery-style automation scripts.
//!
//! A script is an ini-like file whose code sections hold one command per
//! line. This crate turns those lines into a typed command tree ready for
//! an interpreter, without executing anything.
//!
//! ## Modules
//!
//! - [`tokenizer`] - Splits a line into arguments, honoring quotes and line continuation
//! - [`command`] - Command kinds and their typed payloads
//! - [`grammar`] - Per-kind argument validation and payload construction
//! - [`condition`] - Branch conditions used by `If` and `Debug,Breakpoint`
//! - [`fold`] - Folds `If`/`Else`/`Begin`/`End` into nested link lists
//! - [`optimizer`] - Packs runs of compatible commands into batch commands
//! - [`parser`] - Per-section driver that ties the stages together
//! - [`section`] - Script files and their sections
//! - [`checker`] - Whole-script syntax check following static section calls
//! - [`config`] - Parser switches and the persisted `~/.bakery/config.json`
//! - [`variables`] - Helpers for `%Var%`, `#N` and `#r` tokens
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use bakery_core::checker::{CheckResult, SyntaxChecker};
//! use bakery_core::config::ParserOptions;
//! use bakery_core::section::Script;
//!
//! let script = Script::parse(
//!     "demo.script",
//!     "[Process]\nIniRead,a.ini,S,K,%V%\nRun,%ScriptFile%,Greet\n[Greet]\nEcho,Hello\n",
//! );
//! let report = SyntaxChecker::new(&script, ParserOptions::default()).validate();
//! assert_eq!(report.result, CheckResult::Clean);
//! assert_eq!(report.visited.len(), 2);
//! ```

pub mod checker;
pub mod command;
pub mod condition;
pub mod config;
pub mod error;
pub mod fold;
pub mod grammar;
pub mod optimizer;
pub mod parser;
pub mod section;
pub mod tokenizer;
pub mod variables;
