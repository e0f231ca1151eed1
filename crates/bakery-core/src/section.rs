//! Script files and their `[Section]`s.
//!
//! A script is an ini-like text file. Every `[Name]` header starts a new
//! section; the lines up to the next header belong to it. Lines before the
//! first header are ignored. Each section carries a [`SectionRef`] that the
//! parser stamps onto every command for diagnostics.
//!
//! # Example
//!
//! ```
//! use bakery_core::section::Script;
//!
//! let script = Script::parse("demo.script", "[Main]\nTitle=Demo\n[Process]\nEcho,Hello\n");
//! let process = script.section("process").unwrap();
//! assert_eq!(process.reference.line, 3);
//! assert_eq!(process.lines, vec!["Echo,Hello".to_string()]);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::ScriptError;

/// Sections holding data rather than commands.
const DATA_SECTIONS: &[&str] = &[
    "Main",
    "Variables",
    "Interface",
    "EncodedFolders",
    "AuthorEncoded",
    "InterfaceEncoded",
];

const ENCODED_FILE_PREFIX: &str = "EncodedFile-";

/// Identity of a section: where its commands came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRef {
    pub file: PathBuf,
    pub name: String,
    /// 1-based line number of the `[Name]` header.
    pub line: usize,
}

impl SectionRef {
    pub fn new(file: impl Into<PathBuf>, name: impl Into<String>, line: usize) -> Self {
        Self { file: file.into(), name: name.into(), line }
    }

    /// Placeholder identity for statements parsed outside any script.
    pub fn detached() -> Self {
        Self::new(PathBuf::new(), "", 0)
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub reference: Arc<SectionRef>,
    /// Raw lines, blank lines and comments included, so line numbers stay exact.
    pub lines: Vec<String>,
}

impl Section {
    pub fn name(&self) -> &str {
        &self.reference.name
    }

    /// Whether the section holds commands rather than data.
    pub fn is_code(&self) -> bool {
        is_code_section(self.name())
    }
}

pub fn is_code_section(name: &str) -> bool {
    if DATA_SECTIONS.iter().any(|s| s.eq_ignore_ascii_case(name)) {
        return false;
    }
    let prefix_len = ENCODED_FILE_PREFIX.len();
    !(name.len() >= prefix_len
        && name.is_char_boundary(prefix_len)
        && name[..prefix_len].eq_ignore_ascii_case(ENCODED_FILE_PREFIX))
}

/// A script file split into sections.
#[derive(Debug, Clone)]
pub struct Script {
    path: PathBuf,
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl Script {
    /// Read and split a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScriptError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, &text))
    }

    /// Split script text into sections.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        let mut sections: Vec<Section> = Vec::new();
        let mut index = HashMap::new();

        for (i, line) in text.lines().enumerate() {
            if let Some(name) = section_header(line) {
                let reference = SectionRef::new(path.clone(), name, i + 1);
                // First occurrence wins for lookups; later duplicates are still listed.
                index.entry(name.to_lowercase()).or_insert(sections.len());
                sections.push(Section { reference: Arc::new(reference), lines: Vec::new() });
            } else if let Some(current) = sections.last_mut() {
                current.lines.push(line.to_string());
            }
        }

        debug!(path = %path.display(), sections = sections.len(), "script loaded");
        Self { path, sections, index }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Case-insensitive section lookup.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.index.get(&name.to_lowercase()).map(|&i| &self.sections[i])
    }

    pub fn code_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_code())
    }
}

fn section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    let name = inner.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
; header comment
[Main]
Title=Sample

[Process]
Echo,Hello
Run,%ScriptFile%,Helper

[helper]
Echo,World
[EncodedFile-Folder-a.txt]
lines=0
";

    #[test]
    fn test_parse_sections() {
        let script = Script::parse("sample.script", SAMPLE);
        let names: Vec<&str> = script.sections().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Main", "Process", "helper", "EncodedFile-Folder-a.txt"]);
    }

    #[test]
    fn test_section_lines_and_header_line() {
        let script = Script::parse("sample.script", SAMPLE);
        let process = script.section("Process").unwrap();
        assert_eq!(process.reference.line, 5);
        assert_eq!(process.lines, vec!["Echo,Hello", "Run,%ScriptFile%,Helper", ""]);
    }

    #[test]
    fn test_section_lookup_is_case_insensitive() {
        let script = Script::parse("sample.script", SAMPLE);
        assert!(script.section("HELPER").is_some());
        assert!(script.section("process").is_some());
        assert!(script.section("Missing").is_none());
    }

    #[test]
    fn test_code_sections() {
        let script = Script::parse("sample.script", SAMPLE);
        let code: Vec<&str> = script.code_sections().map(|s| s.name()).collect();
        assert_eq!(code, vec!["Process", "helper"]);
    }

    #[test]
    fn test_is_code_section() {
        assert!(!is_code_section("main"));
        assert!(!is_code_section("Interface"));
        assert!(!is_code_section("encodedfile-Folder-x"));
        assert!(is_code_section("Process"));
        assert!(is_code_section("Encoded"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Script::load("/nonexistent/path/x.script").unwrap_err();
        assert!(matches!(err, ScriptError::NotFound(_)));
    }
}
