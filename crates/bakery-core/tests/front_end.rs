//! End-to-end tests for the section front end: tokenizer, grammar, block
//! folder and optimizer driven through the public `CodeParser` API.

use std::sync::Arc;

use bakery_core::command::{Command, CommandKind, Payload};
use bakery_core::config::ParserOptions;
use bakery_core::fold::walk;
use bakery_core::optimizer::optimize;
use bakery_core::parser::{CodeParser, ParseOutput};
use bakery_core::section::SectionRef;
use bakery_core::tokenizer::tokenize_args;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_with(options: ParserOptions, src: &[&str]) -> ParseOutput {
    let section = Arc::new(SectionRef::new("front_end.script", "Process", 1));
    let lines: Vec<String> = src.iter().map(|s| s.to_string()).collect();
    CodeParser::new(section, options).parse_statements(&lines)
}

fn parse(src: &[&str]) -> ParseOutput {
    parse_with(ParserOptions::default(), src)
}

fn statement(line: &str) -> Command {
    CodeParser::new(Arc::new(SectionRef::detached()), ParserOptions::default()).parse_statement(line)
}

fn kinds(cmds: &[Command]) -> Vec<CommandKind> {
    cmds.iter().map(|c| c.kind()).collect()
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[test]
fn test_doubled_quote_is_literal() {
    let args = tokenize_args(r#""a""b",c"#).unwrap();
    assert_eq!(args, vec![r#"a"b"#.to_string(), "c".to_string()]);
}

#[test]
fn test_odd_quote_count_fails() {
    for input in [r#"""#, r#""a,b"#, r#"a,"b"",c"#] {
        assert!(tokenize_args(input).is_err(), "{input} should be rejected");
    }
}

#[test]
fn test_continuation_joins_lines() {
    let output = parse(&["Set,%A%,\\", "B"]);
    assert_eq!(output.commands.len(), 1);
    let cmd = &output.commands[0];
    assert_eq!(cmd.raw, "Set,%A%,\\\nB");
    match &cmd.payload {
        Payload::Set(set) => {
            assert_eq!(set.key, "%A%");
            assert_eq!(set.value, "B");
        }
        _ => panic!("Expected Set"),
    }
}

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

#[test]
fn test_arity_bounds_independent_of_flag_order() {
    let accepted = [
        "FileCopy,a,b",
        "FileCopy,a,b,PRESERVE",
        "FileCopy,a,b,NOREC,PRESERVE",
        "FileCopy,a,b,NOWARN,NOREC,PRESERVE",
        "FileCopy,a,b,PRESERVE,NOWARN,NOREC",
    ];
    for line in accepted {
        assert!(!statement(line).is_error(), "{line} should parse");
    }

    let rejected = ["FileCopy,a", "FileCopy,a,b,PRESERVE,NOWARN,NOREC,PRESERVE"];
    for line in rejected {
        assert!(statement(line).is_error(), "{line} should fail");
    }
}

#[test]
fn test_keyword_only_on_its_family() {
    assert!(!statement("WimApply,a.wim,1,C:\\Dest,Split=a*.swm,CHECK").is_error());
    assert!(!statement("WimApply,a.wim,1,C:\\Dest,CHECK,Split=a*.swm").is_error());
    assert!(statement("FileCopy,a,b,Split=a*.swm").is_error());
}

#[test]
fn test_invalid_destination_variable() {
    let cmd = statement("IniRead,a.ini,S,K,NotAVariable");
    assert!(cmd.is_error());
    assert!(cmd.error_message().is_some_and(|m| m.contains("not a valid variable name")));
}

#[test]
fn test_error_isolation() {
    let output = parse(&["Echo,One", "Echo,Two", "FileCopy,OnlyOneArg", "Echo,Four", "Echo,Five"]);
    assert_eq!(output.commands.len(), 5);
    for (i, cmd) in output.commands.iter().enumerate() {
        assert_eq!(cmd.is_error(), i == 2, "line {}", cmd.line);
    }
    assert_eq!(output.logs.len(), 1);
    assert_eq!(output.logs[0].line, 4);
}

#[test]
fn test_reg_write_short_of_arguments_after_nowarn() {
    for line in ["RegWrite,HKLM,1,NOWARN", "RegWriteEx,HKLM,1,NOWARN", "RegWrite,HKLM,NOWARN"] {
        let cmd = statement(line);
        assert!(cmd.is_error(), "{line}");
        assert!(cmd.error_message().is_some_and(|m| m.contains("must have at least [3] arguments")));
    }

    let legacy = CodeParser::new(Arc::new(SectionRef::detached()), ParserOptions::legacy());
    for line in ["RegWrite,%H%,1,NOWARN", "RegWrite,%H%,NOWARN"] {
        assert!(legacy.parse_statement(line).is_error(), "{line}");
    }
    assert_eq!(legacy.parse_statement("RegWrite,%H%,1,Key,NOWARN").kind(), CommandKind::RegWriteLegacy);
}

// ---------------------------------------------------------------------------
// Block folder
// ---------------------------------------------------------------------------

#[test]
fn test_single_line_fold() {
    let output = parse(&["If,%A%,Equal,1,Echo,Hi", "Else,Echo,Bye"]);
    assert_eq!(kinds(&output.commands), vec![CommandKind::If, CommandKind::Else]);
    assert_eq!(kinds(output.commands[0].link().unwrap()), vec![CommandKind::Echo]);
    assert_eq!(kinds(output.commands[1].link().unwrap()), vec![CommandKind::Echo]);
}

#[test]
fn test_multi_line_fold_with_nesting() {
    let output = parse(&[
        "If,%A%,Equal,1,Begin",
        "If,%B%,Equal,2,Begin",
        "Echo,Inner",
        "End",
        "End",
    ]);
    assert!(output.logs.is_empty());
    assert_eq!(output.commands.len(), 1);

    let outer = output.commands[0].link().unwrap();
    assert_eq!(kinds(outer), vec![CommandKind::If]);
    assert_eq!(kinds(outer[0].link().unwrap()), vec![CommandKind::Echo]);

    let markers = walk(&output.commands)
        .into_iter()
        .filter(|c| matches!(c.kind(), CommandKind::Begin | CommandKind::End))
        .count();
    assert_eq!(markers, 0);
}

#[test]
fn test_unmatched_begin_fails_whole_section() {
    let output = parse(&["Echo,A", "If,%A%,Equal,1,Begin", "Echo,B", "Echo,C"]);
    assert_eq!(output.commands.len(), 1);
    assert!(output.commands[0].is_error());
    assert!(output.has_errors());
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

#[test]
fn test_independent_writes_are_merged_in_order() {
    let output = parse(&["IniWrite,a.ini,S,K1,V1", "IniWrite,A.INI,S,K2,V2"]);
    assert_eq!(output.commands.len(), 1);

    match &output.commands[0].payload {
        Payload::IniWriteOp(batch) => {
            let keys: Vec<&str> = batch
                .cmds
                .iter()
                .map(|c| match &c.payload {
                    Payload::IniWrite(w) => w.key.as_str(),
                    _ => panic!("Expected IniWrite"),
                })
                .collect();
            assert_eq!(keys, vec!["K1", "K2"]);
        }
        _ => panic!("Expected IniWriteOp"),
    }
}

#[test]
fn test_read_after_write_is_not_merged() {
    let output = parse(&["IniRead,a.ini,S,K,%Key%", "IniRead,a.ini,S,%Key%,%Value%"]);
    assert_eq!(kinds(&output.commands), vec![CommandKind::IniRead, CommandKind::IniRead]);
}

#[test]
fn test_optimizer_is_idempotent() {
    let src = [
        "IniWrite,a.ini,S,K1,V1",
        "IniWrite,a.ini,S,K2,V2",
        "Echo,Between",
        "TXTAddLine,b.txt,Line1,Append",
        "TXTAddLine,b.txt,Line2,Append",
    ];
    let once = parse(&src).commands;
    let twice = optimize(once.clone());
    assert_eq!(once, twice);

    let options = ParserOptions { optimize_code: false, ..ParserOptions::default() };
    let plain = parse_with(options, &src).commands;
    assert_eq!(plain.len(), 5);
}
