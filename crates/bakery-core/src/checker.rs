//! Static syntax checker for whole scripts.
//!
//! Starting at `[Process]`, every code section reachable through
//! `Run`/`Exec`/`RunEx`/`Loop*` calls on `%ScriptFile%` is parsed. Targets
//! whose section name contains a variable cannot be resolved without
//! running the script and are skipped.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::command::payload::Loop;
use crate::command::{Command, Payload};
use crate::condition::Predicate;
use crate::config::ParserOptions;
use crate::parser::{parse_section, LogEntry, LogState};
use crate::section::{Script, Section};
use crate::variables;

const ENTRY_SECTION: &str = "Process";
const SCRIPT_FILE: &str = "%ScriptFile%";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckResult {
    Clean,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub path: PathBuf,
    pub result: CheckResult,
    pub logs: Vec<LogEntry>,
    /// Code sections reached, in visiting order.
    pub visited: Vec<String>,
    pub code_sections: usize,
}

impl CheckReport {
    /// Share of code sections reached, `0.0` for a script without any.
    pub fn coverage(&self) -> f64 {
        if self.code_sections == 0 {
            0.0
        } else {
            self.visited.len() as f64 / self.code_sections as f64
        }
    }
}

pub struct SyntaxChecker<'a> {
    script: &'a Script,
    options: ParserOptions,
}

impl<'a> SyntaxChecker<'a> {
    pub fn new(script: &'a Script, options: ParserOptions) -> Self {
        Self { script, options }
    }

    pub fn validate(&self) -> CheckReport {
        let mut logs = Vec::new();
        let mut visited = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut pending: VecDeque<&Section> = self.script.section(ENTRY_SECTION).into_iter().collect();

        while let Some(section) = pending.pop_front() {
            if !seen.insert(section.name().to_lowercase()) {
                continue;
            }
            // Data sections can be called but hold no commands to check
            if !section.is_code() {
                debug!(section = section.name(), "skipping data section");
                continue;
            }
            visited.push(section.name().to_string());

            let output = parse_section(section, self.options);
            logs.extend(output.logs);

            for cmd in self.statements(&output.commands) {
                if let Some(message) = &cmd.deprecated {
                    logs.push(LogEntry::warning(message.clone(), cmd));
                }
                let Some(target) = call_target(cmd) else {
                    continue;
                };
                match self.script.section(target) {
                    Some(next) => pending.push_back(next),
                    None => logs.push(LogEntry::error(format!("Section [{}] does not exist", target), cmd)),
                }
            }
        }

        let result = if logs.iter().any(|l| l.state == LogState::Error) {
            CheckResult::Error
        } else if logs.iter().any(|l| l.state == LogState::Warning) {
            CheckResult::Warning
        } else {
            CheckResult::Clean
        };
        let code_sections = self.script.code_sections().count();
        debug!(path = %self.script.path().display(), ?result, visited = visited.len(), code_sections, "script checked");

        CheckReport { path: self.script.path().to_path_buf(), result, logs, visited, code_sections }
    }

    /// Every statement of a parsed section, including link lists, batched
    /// originals and exit handlers, except the bodies of self-guarded calls.
    fn statements<'c>(&self, commands: &'c [Command]) -> Vec<&'c Command> {
        let mut out = Vec::new();
        let mut stack: Vec<&Command> = commands.iter().rev().collect();
        while let Some(cmd) = stack.pop() {
            if is_self_guarded(cmd) {
                continue;
            }
            out.push(cmd);
            if let Some(link) = cmd.link() {
                stack.extend(link.iter().rev());
            }
            if let Some(batched) = cmd.batched() {
                stack.extend(batched.iter().rev());
            }
            if let Payload::System(system) = &cmd.payload {
                stack.extend(system.embedded());
            }
        }
        out
    }
}

/// Section a statement statically calls in the same script.
fn call_target(cmd: &Command) -> Option<&str> {
    let (script_file, section) = match &cmd.payload {
        Payload::Run(r) | Payload::Exec(r) | Payload::RunEx(r) => (&r.script_file, &r.section),
        Payload::Loop(Loop::Range(r))
        | Payload::LoopEx(Loop::Range(r))
        | Payload::LoopLetter(Loop::Range(r))
        | Payload::LoopLetterEx(Loop::Range(r)) => (&r.script_file, &r.section),
        _ => return None,
    };
    if script_file.eq_ignore_ascii_case(SCRIPT_FILE) && !variables::contains_variable(section) {
        Some(section.as_str())
    } else {
        None
    }
}

/// `If,ExistSection,%ScriptFile%,X,Run,%ScriptFile%,X` calls a section only
/// when it exists, so a missing `X` is not an error.
fn is_self_guarded(cmd: &Command) -> bool {
    let Payload::If(info) = &cmd.payload else {
        return false;
    };
    let Predicate::ExistSection { file, section } = &info.condition.predicate else {
        return false;
    };
    if info.condition.negate || !file.eq_ignore_ascii_case(SCRIPT_FILE) {
        return false;
    }
    match &info.embedded.payload {
        Payload::Run(r) | Payload::Exec(r) => {
            r.script_file.eq_ignore_ascii_case(SCRIPT_FILE) && r.section.eq_ignore_ascii_case(section)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> CheckReport {
        let script = Script::parse("test.script", text);
        SyntaxChecker::new(&script, ParserOptions::default()).validate()
    }

    #[test]
    fn test_clean_script() {
        let report = check("[Main]\nTitle=T\n[Process]\nEcho,A\nRun,%ScriptFile%,Helper\n[Helper]\nEcho,B\n");
        assert_eq!(report.result, CheckResult::Clean);
        assert_eq!(report.visited, vec!["Process".to_string(), "Helper".to_string()]);
        assert_eq!(report.code_sections, 2);
        assert_eq!(report.coverage(), 1.0);
    }

    #[test]
    fn test_missing_section() {
        let report = check("[Process]\nRun,%ScriptFile%,Nowhere\n");
        assert_eq!(report.result, CheckResult::Error);
        assert_eq!(report.logs[0].message, "Section [Nowhere] does not exist");
        assert_eq!(report.logs[0].line, 2);
    }

    #[test]
    fn test_variable_targets_are_skipped() {
        let report = check("[Process]\nRun,%ScriptFile%,%Target%\nRun,%Other%,Helper\n");
        assert_eq!(report.result, CheckResult::Clean);
    }

    #[test]
    fn test_self_guarded_call() {
        let report = check("[Process]\nIf,ExistSection,%ScriptFile%,Opt,Run,%ScriptFile%,Opt\n");
        assert_eq!(report.result, CheckResult::Clean);
    }

    #[test]
    fn test_follows_links_loops_and_exit_handlers() {
        let report = check(
            "[Process]\n\
             If,%A%,Equal,1,Begin\n\
             Loop,%ScriptFile%,Body,1,3\n\
             End\n\
             System,OnScriptExit,Run,%ScriptFile%,Cleanup\n\
             Loop,BREAK\n\
             [Body]\nEcho,B\n\
             [Cleanup]\nEcho,C\n\
             [Unused]\nEcho,U\n",
        );
        assert_eq!(report.result, CheckResult::Clean);
        assert_eq!(report.visited.len(), 3);
        assert!((report.coverage() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deprecation_is_a_warning() {
        let report = check("[Process]\nWebGetIfNotExist,https://a/b.zip,%Dest%\n");
        assert_eq!(report.result, CheckResult::Warning);
        assert_eq!(report.logs[0].state, LogState::Warning);
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let report = check("[Process]\nFileCopy,OnlyOne\n");
        assert_eq!(report.result, CheckResult::Error);
    }

    #[test]
    fn test_data_section_target_is_not_counted() {
        let report = check("[Main]\nTitle=T\n[Process]\nRun,%ScriptFile%,Main\nRun,%ScriptFile%,Helper\n[Helper]\nEcho,B\n");
        assert_eq!(report.result, CheckResult::Clean);
        assert_eq!(report.visited, vec!["Process".to_string(), "Helper".to_string()]);
        assert_eq!(report.code_sections, 2);
        assert_eq!(report.coverage(), 1.0);
    }

    #[test]
    fn test_recursive_call_visits_once() {
        let report = check("[Process]\nRun,%ScriptFile%,Process\n");
        assert_eq!(report.visited, vec!["Process".to_string()]);
    }
}
