//! File and directory commands.

use crate::command::keyword::Keyword;
use crate::command::payload::{
    FileCopy, FileCreateBlank, FileDelete, PathOnly, PathToVar, SrcDest, TextEncoding,
};
use crate::command::{CommandKind, Payload};
use crate::error::{Arity, ParseError};
use crate::grammar::{check_arity, var, Parsed, Trailing};

pub(super) fn parse(kind: CommandKind, args: &[String]) -> Result<Parsed, ParseError> {
    match kind {
        // FileCopy,<SrcFile>,<DestPath>,[PRESERVE],[NOWARN],[NOREC]
        CommandKind::FileCopy => {
            check_arity(kind, args, Arity::Range(2, 5))?;
            let t = Trailing::scan(&args[2..], &["PRESERVE", "NOWARN", "NOREC"], &[])?;
            Ok(Payload::FileCopy(FileCopy {
                src: args[0].clone(),
                dest: args[1].clone(),
                preserve: t.flag("PRESERVE"),
                no_warn: t.flag("NOWARN"),
                no_rec: t.flag("NOREC"),
            })
            .into())
        }
        // FileDelete,<FilePath>,[NOWARN],[NOREC]
        CommandKind::FileDelete => {
            check_arity(kind, args, Arity::Range(1, 3))?;
            let t = Trailing::scan(&args[1..], &["NOWARN", "NOREC"], &[])?;
            Ok(Payload::FileDelete(FileDelete {
                path: args[0].clone(),
                no_warn: t.flag("NOWARN"),
                no_rec: t.flag("NOREC"),
            })
            .into())
        }
        CommandKind::FileRename | CommandKind::FileMove | CommandKind::DirCopy | CommandKind::DirMove | CommandKind::PathMove => {
            check_arity(kind, args, Arity::Exact(2))?;
            let sd = SrcDest { src: args[0].clone(), dest: args[1].clone() };
            Ok(match kind {
                CommandKind::FileRename => Payload::FileRename(sd),
                CommandKind::FileMove => Payload::FileMove(sd),
                CommandKind::DirCopy => Payload::DirCopy(sd),
                CommandKind::DirMove => Payload::DirMove(sd),
                _ => Payload::PathMove(sd),
            }
            .into())
        }
        CommandKind::FileCreateBlank => parse_file_create_blank(args),
        // FileSize,<FilePath>,<DestVar>
        CommandKind::FileSize | CommandKind::FileVersion | CommandKind::DirSize => {
            check_arity(kind, args, Arity::Exact(2))?;
            let ptv = PathToVar { path: args[0].clone(), dest_var: var(args, 1)? };
            Ok(match kind {
                CommandKind::FileSize => Payload::FileSize(ptv),
                CommandKind::FileVersion => Payload::FileVersion(ptv),
                _ => Payload::DirSize(ptv),
            }
            .into())
        }
        // DirDelete,<DirPath>,[FAST]
        CommandKind::DirDelete => {
            check_arity(kind, args, Arity::Range(1, 2))?;
            let t = Trailing::scan(&args[1..], &["FAST"], &[])?;
            let payload = Payload::DirDelete(PathOnly { path: args[0].clone() });
            if t.flag("FAST") {
                Ok(Parsed::deprecated(payload, "Flag [FAST] of [DirDelete] is deprecated and ignored"))
            } else {
                Ok(payload.into())
            }
        }
        // DirMake,<DestDir>
        CommandKind::DirMake => {
            check_arity(kind, args, Arity::Exact(1))?;
            Ok(Payload::DirMake(PathOnly { path: args[0].clone() }).into())
        }
        _ => Err(ParseError::invalid(format!("Command [{}] is not a file command", kind))),
    }
}

/// `FileCreateBlank,<FilePath>,[PRESERVE],[NOWARN],[Encoding=<Enc>]`
///
/// Bare `UTF8`, `UTF16`, `UTF16LE`, `UTF16BE` and `ANSI` flags are the old
/// way to pick an encoding.
fn parse_file_create_blank(args: &[String]) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::FileCreateBlank, args, Arity::Range(1, 4))?;

    let mut preserve = false;
    let mut no_warn = false;
    let mut encoding = None;
    let mut deprecated = None;

    for arg in &args[1..] {
        if arg.eq_ignore_ascii_case("PRESERVE") {
            if preserve {
                return Err(ParseError::DuplicateFlag("PRESERVE".to_string()));
            }
            preserve = true;
        } else if arg.eq_ignore_ascii_case("NOWARN") {
            if no_warn {
                return Err(ParseError::DuplicateFlag("NOWARN".to_string()));
            }
            no_warn = true;
        } else if let Some(value) = arg.get(..9).filter(|h| h.eq_ignore_ascii_case("Encoding=")).map(|_| &arg[9..]) {
            if encoding.is_some() {
                return Err(ParseError::DuplicateKeyword("Encoding".to_string()));
            }
            let enc = TextEncoding::lookup(value)
                .ok_or_else(|| ParseError::invalid(format!("Encoding [{}] is not supported", value)))?;
            encoding = Some(enc);
        } else if let Some(enc) = TextEncoding::lookup(arg) {
            if encoding.is_some() {
                return Err(ParseError::DuplicateFlag(arg.clone()));
            }
            encoding = Some(enc);
            deprecated = Some(format!("Flag [{}] is deprecated, use [Encoding={}] instead", arg, enc));
        } else {
            return Err(ParseError::UnknownOption(arg.clone()));
        }
    }

    let payload = Payload::FileCreateBlank(FileCreateBlank { path: args[0].clone(), preserve, no_warn, encoding });
    Ok(Parsed { payload, deprecated })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split(',').map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_file_copy_flags_any_order() {
        let parsed = parse(CommandKind::FileCopy, &args("a.txt,b.txt,NOREC,preserve")).unwrap();
        match parsed.payload {
            Payload::FileCopy(fc) => {
                assert_eq!(fc.src, "a.txt");
                assert_eq!(fc.dest, "b.txt");
                assert!(fc.preserve);
                assert!(!fc.no_warn);
                assert!(fc.no_rec);
            }
            _ => panic!("Expected FileCopy"),
        }
    }

    #[test]
    fn test_file_copy_arity() {
        let err = parse(CommandKind::FileCopy, &args("OnlyOneArg")).unwrap_err();
        assert_eq!(err.to_string(), "Command [FileCopy] can have [2] ~ [5] arguments");
    }

    #[test]
    fn test_file_copy_unknown_flag() {
        let err = parse(CommandKind::FileCopy, &args("a,b,FAST")).unwrap_err();
        assert_eq!(err, ParseError::UnknownOption("FAST".to_string()));
    }

    #[test]
    fn test_file_size_requires_variable() {
        assert!(parse(CommandKind::FileSize, &args("a.txt,%Size%")).is_ok());
        let err = parse(CommandKind::FileSize, &args("a.txt,Size")).unwrap_err();
        assert_eq!(err.to_string(), "[Size] is not a valid variable name");
    }

    #[test]
    fn test_file_create_blank_encoding() {
        let parsed = parse(CommandKind::FileCreateBlank, &args("a.txt,Encoding=UTF8,NOWARN")).unwrap();
        match parsed.payload {
            Payload::FileCreateBlank(fc) => {
                assert_eq!(fc.encoding, Some(TextEncoding::UTF8));
                assert!(fc.no_warn);
            }
            _ => panic!("Expected FileCreateBlank"),
        }
        assert!(parsed.deprecated.is_none());
    }

    #[test]
    fn test_file_create_blank_legacy_encoding() {
        let parsed = parse(CommandKind::FileCreateBlank, &args("a.txt,UTF16LE")).unwrap();
        match &parsed.payload {
            Payload::FileCreateBlank(fc) => assert_eq!(fc.encoding, Some(TextEncoding::UTF16)),
            _ => panic!("Expected FileCreateBlank"),
        }
        assert!(parsed.deprecated.is_some());

        let err = parse(CommandKind::FileCreateBlank, &args("a.txt,UTF8,Encoding=ANSI")).unwrap_err();
        assert_eq!(err, ParseError::DuplicateKeyword("Encoding".to_string()));
        let err = parse(CommandKind::FileCreateBlank, &args("a.txt,Encoding=ANSI,UTF8")).unwrap_err();
        assert_eq!(err, ParseError::DuplicateFlag("UTF8".to_string()));
    }

    #[test]
    fn test_dir_delete_fast_is_deprecated() {
        let parsed = parse(CommandKind::DirDelete, &args("%Target%,FAST")).unwrap();
        assert!(parsed.deprecated.is_some());
        assert!(matches!(parsed.payload, Payload::DirDelete(_)));
    }
}
