//! Text file and ini commands.

use crate::command::payload::{
    FileOnly, IniDelete, IniRead, IniReadSection, IniSection, IniWrite, IniWriteTextLine, SrcDest, TxtAddLine,
    TxtDelLine, TxtReplace,
};
use crate::command::{CommandKind, Payload};
use crate::error::{Arity, ParseError};
use crate::grammar::{check_arity, var, Parsed, Trailing};
use crate::variables;

pub(super) fn parse(kind: CommandKind, args: &[String]) -> Result<Parsed, ParseError> {
    match kind {
        // TXTAddLine,<FileName>,<Line>,<Mode>
        CommandKind::TXTAddLine => {
            check_arity(kind, args, Arity::Exact(3))?;
            let mode = &args[2];
            let fixed = mode.eq_ignore_ascii_case("Prepend") || mode.eq_ignore_ascii_case("Append");
            if !fixed && !variables::is_valid_variable(mode) {
                return Err(ParseError::invalid("Mode must be one of Prepend, Append, or variable."));
            }
            Ok(Payload::TXTAddLine(TxtAddLine { file: args[0].clone(), line: args[1].clone(), mode: mode.clone() }).into())
        }
        // TXTReplace,<FileName>,<OldStr>,<NewStr>
        CommandKind::TXTReplace => {
            check_arity(kind, args, Arity::Exact(3))?;
            Ok(Payload::TXTReplace(TxtReplace {
                file: args[0].clone(),
                old_str: args[1].clone(),
                new_str: args[2].clone(),
            })
            .into())
        }
        // TXTDelLine,<FileName>,<DeleteIfBeginWith>
        CommandKind::TXTDelLine => {
            check_arity(kind, args, Arity::Exact(2))?;
            if args[1].to_ascii_lowercase().contains("#$x") {
                return Err(ParseError::invalid("Keyword cannot include line feed"));
            }
            Ok(Payload::TXTDelLine(TxtDelLine { file: args[0].clone(), keyword: args[1].clone() }).into())
        }
        CommandKind::TXTDelSpaces | CommandKind::TXTDelEmptyLines | CommandKind::IniCompact => {
            check_arity(kind, args, Arity::Exact(1))?;
            let file = FileOnly { file: args[0].clone() };
            Ok(match kind {
                CommandKind::TXTDelSpaces => Payload::TXTDelSpaces(file),
                CommandKind::TXTDelEmptyLines => Payload::TXTDelEmptyLines(file),
                _ => Payload::IniCompact(file),
            }
            .into())
        }
        // IniRead,<FileName>,<Section>,<Key>,<DestVar>,[Default=<Value>]
        CommandKind::IniRead => {
            check_arity(kind, args, Arity::Range(4, 5))?;
            let t = Trailing::scan(&args[4..], &[], &["Default"])?;
            Ok(Payload::IniRead(IniRead {
                file: args[0].clone(),
                section: args[1].clone(),
                key: args[2].clone(),
                dest_var: var(args, 3)?,
                default: t.value("Default"),
            })
            .into())
        }
        // IniWrite,<FileName>,<Section>,<Key>,<Value>
        CommandKind::IniWrite => {
            check_arity(kind, args, Arity::Exact(4))?;
            Ok(Payload::IniWrite(IniWrite {
                file: args[0].clone(),
                section: args[1].clone(),
                key: args[2].clone(),
                value: args[3].clone(),
            })
            .into())
        }
        // IniDelete,<FileName>,<Section>,<Key>
        CommandKind::IniDelete => {
            check_arity(kind, args, Arity::Exact(3))?;
            Ok(Payload::IniDelete(IniDelete {
                file: args[0].clone(),
                section: args[1].clone(),
                key: args[2].clone(),
            })
            .into())
        }
        // IniReadSection,<FileName>,<Section>,<DestVar>,[Delim=<Str>]
        CommandKind::IniReadSection => {
            check_arity(kind, args, Arity::Range(3, 4))?;
            let t = Trailing::scan(&args[3..], &[], &["Delim"])?;
            Ok(Payload::IniReadSection(IniReadSection {
                file: args[0].clone(),
                section: args[1].clone(),
                dest_var: var(args, 2)?,
                delim: t.value("Delim"),
            })
            .into())
        }
        CommandKind::IniAddSection | CommandKind::IniDeleteSection => {
            check_arity(kind, args, Arity::Exact(2))?;
            let info = IniSection { file: args[0].clone(), section: args[1].clone() };
            Ok(match kind {
                CommandKind::IniAddSection => Payload::IniAddSection(info),
                _ => Payload::IniDeleteSection(info),
            }
            .into())
        }
        // IniWriteTextLine,<FileName>,<Section>,<Line>,[APPEND]
        CommandKind::IniWriteTextLine => {
            check_arity(kind, args, Arity::Range(3, 4))?;
            let append = match args.get(3) {
                None => false,
                Some(flag) if flag.eq_ignore_ascii_case("APPEND") => true,
                Some(other) => return Err(ParseError::invalid(format!("Wrong argument [{}]", other))),
            };
            Ok(Payload::IniWriteTextLine(IniWriteTextLine {
                file: args[0].clone(),
                section: args[1].clone(),
                line: args[2].clone(),
                append,
            })
            .into())
        }
        // IniMerge,<SrcFile>,<DestFile>
        CommandKind::IniMerge => {
            check_arity(kind, args, Arity::Exact(2))?;
            Ok(Payload::IniMerge(SrcDest { src: args[0].clone(), dest: args[1].clone() }).into())
        }
        _ => Err(ParseError::invalid(format!("Command [{}] is not a text command", kind))),
    }
}
