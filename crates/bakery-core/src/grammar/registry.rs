//! Registry commands.
//!
//! `RegWrite` needs its hive at parse time. A hive that is not one of the
//! known root keys (usually a variable) sends the statement to the legacy
//! free-form grammar, which only the compatibility switch accepts.

use crate::command::keyword::{parse_keyword, Keyword};
use crate::command::payload::{
    Hive, RegCopy, RegData, RegDelete, RegExport, RegHiveLoad, RegHiveUnload, RegImport, RegMulti, RegMultiType,
    RegRead, RegRoot, RegValueType, RegWrite, RegWriteLegacy,
};
use crate::command::{CommandKind, Payload};
use crate::error::{Arity, ParseError};
use crate::grammar::{check_arity, var, Context, Parsed, Trailing};

fn root(token: &str) -> RegRoot {
    match Hive::lookup(token) {
        Some(hive) => RegRoot::Known(hive),
        None => RegRoot::Unresolved(token.to_string()),
    }
}

pub(super) fn parse(kind: CommandKind, args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    match kind {
        // RegHiveLoad,<KeyPath>,<HiveFile>
        CommandKind::RegHiveLoad => {
            check_arity(kind, args, Arity::Exact(2))?;
            Ok(Payload::RegHiveLoad(RegHiveLoad { key_path: args[0].clone(), hive_file: args[1].clone() }).into())
        }
        // RegHiveUnload,<KeyPath>
        CommandKind::RegHiveUnload => {
            check_arity(kind, args, Arity::Exact(1))?;
            Ok(Payload::RegHiveUnload(RegHiveUnload { key_path: args[0].clone() }).into())
        }
        // RegRead,<HKey>,<KeyPath>,<ValueName>,<DestVar>
        CommandKind::RegRead => {
            check_arity(kind, args, Arity::Exact(4))?;
            Ok(Payload::RegRead(RegRead {
                root: root(&args[0]),
                key_path: args[1].clone(),
                value_name: args[2].clone(),
                dest_var: var(args, 3)?,
            })
            .into())
        }
        CommandKind::RegWrite | CommandKind::RegWriteEx => parse_reg_write(kind, args, ctx),
        CommandKind::RegWriteLegacy => parse_reg_write_legacy(args, ctx),
        // RegDelete,<HKey>,<KeyPath>,[ValueName]
        CommandKind::RegDelete => {
            check_arity(kind, args, Arity::Range(2, 3))?;
            Ok(Payload::RegDelete(RegDelete {
                root: root(&args[0]),
                key_path: args[1].clone(),
                value_name: args.get(2).cloned(),
            })
            .into())
        }
        // RegMulti,<HKey>,<KeyPath>,<ValueName>,<Type>,<Arg1>,[Arg2]
        CommandKind::RegMulti => {
            check_arity(kind, args, Arity::Range(5, 6))?;
            Ok(Payload::RegMulti(RegMulti {
                root: root(&args[0]),
                key_path: args[1].clone(),
                value_name: args[2].clone(),
                action: parse_keyword::<RegMultiType>(&args[3])?,
                arg1: args[4].clone(),
                arg2: args.get(5).cloned(),
            })
            .into())
        }
        // RegImport,<RegFile>
        CommandKind::RegImport => {
            check_arity(kind, args, Arity::Exact(1))?;
            Ok(Payload::RegImport(RegImport { reg_file: args[0].clone() }).into())
        }
        // RegExport,<HKey>,<KeyPath>,<RegFile>
        CommandKind::RegExport => {
            check_arity(kind, args, Arity::Exact(3))?;
            Ok(Payload::RegExport(RegExport {
                root: root(&args[0]),
                key_path: args[1].clone(),
                reg_file: args[2].clone(),
            })
            .into())
        }
        // RegCopy,<SrcKey>,<SrcKeyPath>,<DestKey>,<DestKeyPath>,[WILDCARD]
        CommandKind::RegCopy => {
            check_arity(kind, args, Arity::Range(4, 5))?;
            let t = Trailing::scan(&args[4..], &["WILDCARD"], &[])?;
            Ok(Payload::RegCopy(RegCopy {
                src_root: root(&args[0]),
                src_key_path: args[1].clone(),
                dest_root: root(&args[2]),
                dest_key_path: args[3].clone(),
                wildcard: t.flag("WILDCARD"),
            })
            .into())
        }
        _ => Err(ParseError::invalid(format!("Command [{}] is not a registry command", kind))),
    }
}

/// Drop a trailing `NOWARN`, reporting whether it was there.
fn strip_no_warn(args: &[String]) -> (&[String], bool) {
    match args.split_last() {
        Some((last, rest)) if last.eq_ignore_ascii_case("NOWARN") => (rest, true),
        _ => (args, false),
    }
}

fn parse_type_code(token: &str) -> Result<u32, ParseError> {
    let parsed = match token.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => u32::from_str_radix(&token[2..], 16),
        _ => token.parse::<u32>(),
    };
    parsed.map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

/// `RegWrite,<HKey>,<ValueType>,<KeyPath>,[ValueName],[ValueData...],[NOWARN]`
fn parse_reg_write(kind: CommandKind, args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    let (rest, no_warn) = strip_no_warn(args);
    check_arity(kind, rest, Arity::AtLeast(3))?;

    let Some(hive) = Hive::lookup(&rest[0]) else {
        return parse_reg_write_legacy(args, ctx);
    };
    let args = rest;
    let code = parse_type_code(&args[1])?;
    let value_type = RegValueType::from_code(code);
    if matches!(value_type, RegValueType::Unknown(_)) && kind != CommandKind::RegWriteEx {
        return Err(ParseError::invalid(format!("Invalid registry value type [0x{:X}]", code)));
    }

    let cnt = args.len();
    let key_path = args[2].clone();
    let name = || args.get(3).cloned();
    let syntax_error = || ParseError::invalid("Invalid RegWrite Syntax");

    let (value_name, data) = match value_type {
        RegValueType::None => match cnt {
            3 => (None, RegData::Empty),
            4 => (name(), RegData::Empty),
            _ => return Err(syntax_error()),
        },
        RegValueType::String | RegValueType::ExpandString => match cnt {
            3 => (None, RegData::Empty),
            4 => (name(), RegData::Single(String::new())),
            5 => (name(), RegData::Single(args[4].clone())),
            _ => return Err(syntax_error()),
        },
        RegValueType::MultiString => match cnt {
            4 => (name(), RegData::List(Vec::new())),
            5 if args[4].is_empty() => (name(), RegData::List(Vec::new())),
            n if n >= 5 => (name(), RegData::List(args[4..].to_vec())),
            _ => return Err(syntax_error()),
        },
        RegValueType::Binary | RegValueType::Unknown(_) => match cnt {
            4 => (name(), RegData::Single(String::new())),
            5 => (name(), RegData::Single(args[4].clone())),
            n if n >= 6 => (name(), RegData::List(args[4..].to_vec())),
            _ => return Err(syntax_error()),
        },
        RegValueType::DWord | RegValueType::QWord => match cnt {
            5 => (name(), RegData::Single(args[4].clone())),
            _ => return Err(syntax_error()),
        },
    };

    let info = RegWrite { hive, value_type, key_path, value_name, data, no_warn };
    Ok(match kind {
        CommandKind::RegWriteEx => Payload::RegWriteEx(info),
        _ => Payload::RegWrite(info),
    }
    .into())
}

/// Free-form `RegWrite` with a hive only known at run time.
fn parse_reg_write_legacy(args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    if !ctx.options.allow_legacy_reg_write {
        return Err(ParseError::invalid("<HKey> must be constant string"));
    }
    let (args, no_warn) = strip_no_warn(args);
    check_arity(CommandKind::RegWriteLegacy, args, Arity::AtLeast(3))?;
    let info = RegWriteLegacy {
        hive: args[0].clone(),
        value_type: args[1].clone(),
        key_path: args[2].clone(),
        value_name: args.get(3).cloned(),
        data: (args.len() >= 5).then(|| args[4..].to_vec()),
        no_warn,
    };
    Ok(Parsed::deprecated(
        Payload::RegWriteLegacy(info),
        "Non-constant <HKey> in [RegWrite] is deprecated, use a constant root key",
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ParserOptions;
    use crate::section::SectionRef;

    fn args(s: &str) -> Vec<String> {
        s.split(',').map(|a| a.to_string()).collect()
    }

    fn run(kind: CommandKind, line: &str, options: ParserOptions) -> Result<Parsed, ParseError> {
        let section = Arc::new(SectionRef::detached());
        let ctx = Context { options: &options, section: &section, raw: line, line: 1 };
        parse(kind, &args(line), &ctx)
    }

    fn reg_write(line: &str) -> Result<RegWrite, ParseError> {
        match run(CommandKind::RegWrite, line, ParserOptions::default())?.payload {
            Payload::RegWrite(rw) => Ok(rw),
            _ => panic!("Expected RegWrite"),
        }
    }

    #[test]
    fn test_reg_write_string() {
        let rw = reg_write("HKLM,0x1,Software\\Test,Name,Value").unwrap();
        assert_eq!(rw.hive, Hive::LocalMachine);
        assert_eq!(rw.value_type, RegValueType::String);
        assert_eq!(rw.value_name.as_deref(), Some("Name"));
        assert_eq!(rw.data, RegData::Single("Value".to_string()));
        assert!(!rw.no_warn);
    }

    #[test]
    fn test_reg_write_key_only() {
        let rw = reg_write("HKCU,1,Software\\Test").unwrap();
        assert_eq!(rw.value_name, None);
        assert_eq!(rw.data, RegData::Empty);
    }

    #[test]
    fn test_reg_write_multi_string() {
        let rw = reg_write("HKLM,0x7,Key,Name,A,B,C,NOWARN").unwrap();
        assert!(rw.no_warn);
        assert_eq!(rw.data, RegData::List(vec!["A".into(), "B".into(), "C".into()]));

        let rw = reg_write("HKLM,0x7,Key,Name,").unwrap();
        assert_eq!(rw.data, RegData::List(Vec::new()));
    }

    #[test]
    fn test_reg_write_binary_list() {
        let rw = reg_write("HKLM,0x3,Key,Name,00,01,02").unwrap();
        assert_eq!(rw.data, RegData::List(vec!["00".into(), "01".into(), "02".into()]));
    }

    #[test]
    fn test_reg_write_dword_requires_data() {
        assert!(reg_write("HKLM,0x4,Key,Name,1").is_ok());
        let err = reg_write("HKLM,0x4,Key,Name").unwrap_err();
        assert_eq!(err.to_string(), "Invalid RegWrite Syntax");
    }

    #[test]
    fn test_reg_write_invalid_type() {
        let err = reg_write("HKLM,0x5,Key,Name,1").unwrap_err();
        assert_eq!(err.to_string(), "Invalid registry value type [0x5]");
        let err = reg_write("HKLM,abc,Key").unwrap_err();
        assert_eq!(err.to_string(), "[abc] is not a valid number");

        let parsed = run(CommandKind::RegWriteEx, "HKLM,0x20,Key,Name,00", ParserOptions::default()).unwrap();
        match parsed.payload {
            Payload::RegWriteEx(rw) => assert_eq!(rw.value_type, RegValueType::Unknown(0x20)),
            _ => panic!("Expected RegWriteEx"),
        }
    }

    #[test]
    fn test_reg_write_variable_hive_needs_compat() {
        let err = run(CommandKind::RegWrite, "%Hive%,0x1,Key,Name,Value", ParserOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "<HKey> must be constant string");

        let parsed = run(CommandKind::RegWrite, "%Hive%,0x1,Key,Name,Value,NOWARN", ParserOptions::legacy()).unwrap();
        assert!(parsed.deprecated.is_some());
        match parsed.payload {
            Payload::RegWriteLegacy(rw) => {
                assert_eq!(rw.hive, "%Hive%");
                assert_eq!(rw.data, Some(vec!["Value".to_string()]));
                assert!(rw.no_warn);
            }
            _ => panic!("Expected RegWriteLegacy"),
        }
    }

    #[test]
    fn test_reg_write_no_warn_at_minimum() {
        for kind in [CommandKind::RegWrite, CommandKind::RegWriteEx] {
            let parsed = run(kind, "HKLM,0x1,Key,NOWARN", ParserOptions::default()).unwrap();
            match parsed.payload {
                Payload::RegWrite(rw) | Payload::RegWriteEx(rw) => {
                    assert!(rw.no_warn);
                    assert_eq!(rw.key_path, "Key");
                    assert_eq!(rw.value_name, None);
                }
                _ => panic!("Expected RegWrite"),
            }
        }

        let parsed = run(CommandKind::RegWrite, "%H%,0x1,Key,NOWARN", ParserOptions::legacy()).unwrap();
        match parsed.payload {
            Payload::RegWriteLegacy(rw) => {
                assert!(rw.no_warn);
                assert_eq!(rw.value_name, None);
            }
            _ => panic!("Expected RegWriteLegacy"),
        }
    }

    #[test]
    fn test_reg_write_no_warn_below_minimum() {
        for kind in [CommandKind::RegWrite, CommandKind::RegWriteEx] {
            let err = run(kind, "HKLM,1,NOWARN", ParserOptions::default()).unwrap_err();
            assert_eq!(err, ParseError::arity(kind.to_string(), Arity::AtLeast(3)));
        }

        let err = run(CommandKind::RegWrite, "%H%,1,NOWARN", ParserOptions::legacy()).unwrap_err();
        assert!(matches!(err, ParseError::Arity { .. }));
        let err = run(CommandKind::RegWriteLegacy, "%H%,1,NOWARN", ParserOptions::legacy()).unwrap_err();
        assert!(matches!(err, ParseError::Arity { .. }));
    }

    #[test]
    fn test_reg_multi_action() {
        let parsed = run(CommandKind::RegMulti, "HKLM,Key,Name,Before,A,B", ParserOptions::default()).unwrap();
        match parsed.payload {
            Payload::RegMulti(rm) => {
                assert_eq!(rm.action, RegMultiType::Before);
                assert_eq!(rm.arg2.as_deref(), Some("B"));
            }
            _ => panic!("Expected RegMulti"),
        }
        let err = run(CommandKind::RegMulti, "HKLM,Key,Name,Sideways,A", ParserOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid RegMultiType [Sideways]");
    }

    #[test]
    fn test_reg_read_keeps_unresolved_root() {
        let parsed = run(CommandKind::RegRead, "%Root%,Key,Name,%Dest%", ParserOptions::default()).unwrap();
        match parsed.payload {
            Payload::RegRead(rr) => assert_eq!(rr.root, RegRoot::Unresolved("%Root%".to_string())),
            _ => panic!("Expected RegRead"),
        }
    }
}
