use bakery_core::checker::{CheckReport, CheckResult};
use bakery_core::command::Command;
use bakery_core::parser::ParseOutput;

/// Plain-text rendering of parse and check results.
pub struct Renderer;

impl Renderer {
    /// One line per command, indented by nesting depth. Link lists and
    /// batched originals are listed under their parent.
    pub fn tree(commands: &[Command]) -> String {
        let mut lines = Vec::new();
        let mut stack: Vec<(&Command, usize)> = commands.iter().rev().map(|c| (c, 0)).collect();

        while let Some((cmd, depth)) = stack.pop() {
            lines.push(format!("{:>5} | {}{}", cmd.line, "  ".repeat(depth), Self::summary(cmd)));

            let children = cmd.link().or_else(|| cmd.batched()).unwrap_or_default();
            stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
        }
        lines.join("\n")
    }

    fn summary(cmd: &Command) -> String {
        if let Some(message) = cmd.error_message() {
            return format!("!! {} ({})", message, first_line(&cmd.raw));
        }
        if let Some(batched) = cmd.batched() {
            return format!("[{}] {} commands", cmd.kind(), batched.len());
        }
        let mut text = first_line(&cmd.raw).to_string();
        if cmd.raw.contains('\n') {
            text.push_str(" \\");
        }
        if cmd.deprecated.is_some() {
            text.push_str("  (deprecated)");
        }
        text
    }

    pub fn section(name: &str, output: &ParseOutput) -> String {
        let mut out = format!("[{}]\n", name);
        if !output.commands.is_empty() {
            out.push_str(&Self::tree(&output.commands));
            out.push('\n');
        }
        for log in &output.logs {
            out.push_str(&format!("  {}\n", log));
        }
        out
    }

    pub fn report(report: &CheckReport) -> String {
        let label = match report.result {
            CheckResult::Clean => "ok",
            CheckResult::Warning => "warning",
            CheckResult::Error => "error",
        };
        let mut out = format!(
            "{:<8}{} ({}/{} sections, {:.1}% coverage)\n",
            label,
            report.path.display(),
            report.visited.len(),
            report.code_sections,
            report.coverage() * 100.0,
        );
        for log in &report.logs {
            out.push_str(&format!("  [{}] {}\n", log.section, log));
        }
        out
    }
}

fn first_line(raw: &str) -> &str {
    raw.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use bakery_core::config::ParserOptions;
    use bakery_core::parser::CodeParser;
    use bakery_core::section::{Script, SectionRef};
    use bakery_core::checker::SyntaxChecker;

    fn parse(src: &[&str]) -> ParseOutput {
        let lines: Vec<String> = src.iter().map(|s| s.to_string()).collect();
        CodeParser::new(Arc::new(SectionRef::new("r.script", "Process", 0)), ParserOptions::default())
            .parse_statements(&lines)
    }

    #[test]
    fn test_tree_indents_links() {
        let output = parse(&["If,%A%,Equal,1,Begin", "Echo,X", "End", "Else,Echo,Y"]);
        let text = Renderer::tree(&output.commands);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    1 | If,%A%,Equal,1,Begin");
        assert_eq!(lines[1], "    2 |   Echo,X");
        assert_eq!(lines[2], "    4 | Else,Echo,Y");
        assert_eq!(lines[3], "    4 |   Echo,Y");
    }

    #[test]
    fn test_tree_lists_batched_commands() {
        let output = parse(&["IniWrite,a.ini,S,K1,V1", "IniWrite,a.ini,S,K2,V2"]);
        let text = Renderer::tree(&output.commands);
        assert_eq!(
            text,
            "    1 | [IniWriteOp] 2 commands\n    1 |   IniWrite,a.ini,S,K1,V1\n    2 |   IniWrite,a.ini,S,K2,V2"
        );
    }

    #[test]
    fn test_tree_marks_errors_and_continuations() {
        let output = parse(&["FileCopy,OnlyOne", "Set,%A%,\\", "B"]);
        let text = Renderer::tree(&output.commands);
        assert!(text.contains("!! Command [FileCopy] can have [2] ~ [5] arguments (FileCopy,OnlyOne)"));
        assert!(text.contains("Set,%A%,\\ \\"));
    }

    #[test]
    fn test_section_appends_logs() {
        let output = parse(&["FileCopy,OnlyOne"]);
        let text = Renderer::section("Process", &output);
        assert!(text.starts_with("[Process]\n"));
        assert!(text.contains("  error: Command [FileCopy]"));
    }

    #[test]
    fn test_report_line() {
        let script = Script::parse("demo.script", "[Process]\nRun,%ScriptFile%,Missing\n[Other]\nEcho,A\n");
        let report = SyntaxChecker::new(&script, ParserOptions::default()).validate();
        let text = Renderer::report(&report);
        assert!(text.starts_with("error   demo.script (1/2 sections, 50.0% coverage)"));
        assert!(text.contains("[Process] error: Section [Missing] does not exist"));
    }
}
