//! Section parser.
//!
//! [`CodeParser`] runs the whole front end for one section: every line is
//! tokenized and matched against the grammar, the flat list is folded into
//! a tree, and the tree is optimized when enabled. A malformed line becomes
//! an `Error` command and the rest of the section still parses; a broken
//! block structure replaces the whole section with a single `Error`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bakery_core::command::CommandKind;
//! use bakery_core::config::ParserOptions;
//! use bakery_core::parser::CodeParser;
//! use bakery_core::section::SectionRef;
//!
//! let section = Arc::new(SectionRef::new("demo.script", "Process", 1));
//! let parser = CodeParser::new(section, ParserOptions::default());
//! let lines: Vec<String> = vec!["If,%A%,Equal,1,Echo,Hi".into(), "Else,Echo,Bye".into()];
//!
//! let output = parser.parse_statements(&lines);
//! assert!(output.logs.is_empty());
//! assert_eq!(output.commands[0].kind(), CommandKind::If);
//! assert_eq!(output.commands[1].kind(), CommandKind::Else);
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::command::{Command, CommandKind, Payload};
use crate::config::ParserOptions;
use crate::fold::fold;
use crate::grammar::{self, Context};
use crate::optimizer::optimize;
use crate::section::{Section, SectionRef};
use crate::tokenizer::{read_statement, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LogState {
    Info,
    Warning,
    Error,
}

/// A diagnostic tied to a source statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub state: LogState,
    pub message: String,
    pub section: String,
    pub raw: String,
    /// 1-based physical line.
    pub line: usize,
}

impl LogEntry {
    pub fn new(state: LogState, message: impl Into<String>, cmd: &Command) -> Self {
        Self {
            state,
            message: message.into(),
            section: cmd.section.name.clone(),
            raw: cmd.raw.clone(),
            line: cmd.line,
        }
    }

    pub fn error(message: impl Into<String>, cmd: &Command) -> Self {
        Self::new(LogState::Error, message, cmd)
    }

    pub fn warning(message: impl Into<String>, cmd: &Command) -> Self {
        Self::new(LogState::Warning, message, cmd)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            LogState::Info => "info",
            LogState::Warning => "warning",
            LogState::Error => "error",
        };
        write!(f, "{}: {} (Line {}: {})", state, self.message, self.line, self.raw)
    }
}

/// Commands of one section plus one log entry per error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutput {
    pub commands: Vec<Command>,
    pub logs: Vec<LogEntry>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.logs.iter().any(|l| l.state == LogState::Error)
    }
}

pub struct CodeParser {
    section: Arc<SectionRef>,
    options: ParserOptions,
}

impl CodeParser {
    pub fn new(section: Arc<SectionRef>, options: ParserOptions) -> Self {
        Self { section, options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a single line; failures become an `Error` command.
    pub fn parse_statement(&self, line: &str) -> Command {
        let lines = [line.to_string()];
        let mut idx = 0;
        self.parse_line(&lines, &mut idx)
    }

    /// Parse, fold and optionally optimize the lines of a section.
    pub fn parse_statements(&self, lines: &[String]) -> ParseOutput {
        let mut commands = Vec::with_capacity(lines.len());
        let mut idx = 0;
        while idx < lines.len() {
            commands.push(self.parse_line(lines, &mut idx));
            idx += 1;
        }

        let mut logs: Vec<LogEntry> = commands
            .iter()
            .filter_map(|cmd| cmd.error_message().map(|msg| LogEntry::error(msg, cmd)))
            .collect();
        commands.retain(|cmd| cmd.kind() != CommandKind::None);

        let folded = match fold(commands) {
            Ok(folded) => folded,
            Err(e) => {
                warn!(section = %self.section.name, line = e.line(), error = %e, "section replaced by structural error");
                let cmd = Command::error(e.raw(), Arc::clone(&self.section), e.line(), e.to_string());
                logs.push(LogEntry::error(format!("Cannot parse section [{}] : {}", self.section.name, e), &cmd));
                vec![cmd]
            }
        };

        let commands = if self.options.optimize_code { optimize(folded) } else { folded };
        debug!(
            section = %self.section.name,
            commands = commands.len(),
            errors = logs.len(),
            "section parsed"
        );
        ParseOutput { commands, logs }
    }

    /// Parse the statement at `lines[*idx]`, leaving `*idx` on its last
    /// physical line.
    fn parse_line(&self, lines: &[String], idx: &mut usize) -> Command {
        let section = Arc::clone(&self.section);
        let line = self.section.line + *idx + 1;

        let statement = match read_statement(lines, idx) {
            Ok(statement) => statement,
            Err(e) => {
                let raw = lines.get(*idx).map(|l| l.trim()).unwrap_or_default();
                return Command::error(raw, section, line, e.to_string());
            }
        };

        match statement {
            Statement::Blank => Command::new("", section, line, Payload::None),
            Statement::Comment(raw) => Command::new(raw, section, line, Payload::Comment),
            Statement::Command { raw, kind, args } => {
                let ctx = Context { options: &self.options, section: &self.section, raw: &raw, line };
                match grammar::parse_command(&kind, args, &ctx) {
                    Ok(cmd) => cmd,
                    Err(e) => Command::error(raw.as_str(), section, line, e.to_string()),
                }
            }
        }
    }
}

/// Parse a loaded section with `options`.
pub fn parse_section(section: &Section, options: ParserOptions) -> ParseOutput {
    CodeParser::new(Arc::clone(&section.reference), options).parse_statements(&section.lines)
}
