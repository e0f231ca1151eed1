//! `StrFormat`, `Math` and `List`: commands whose first argument names a
//! sub-command with its own argument layout.

use crate::command::compound::{List, ListOp, ListType, Math, MathType, StrFormat, StrFormatType};
use crate::command::keyword::parse_keyword;
use crate::command::{CommandKind, Payload};
use crate::error::{Arity, ParseError};
use crate::grammar::{bit_size, check_arity, var, Parsed, Trailing};

pub(super) fn parse(kind: CommandKind, args: &[String]) -> Result<Parsed, ParseError> {
    match kind {
        CommandKind::StrFormat => parse_str_format(args),
        CommandKind::Math => parse_math(args),
        CommandKind::List => parse_list(args),
        _ => Err(ParseError::invalid(format!("Command [{}] has no sub-command", kind))),
    }
}

fn sub_arity(kind: CommandKind, sub: impl std::fmt::Display, args: &[String], arity: Arity) -> Result<(), ParseError> {
    check_arity(format!("{},{}", kind, sub), args, arity)
}

// ---------------------------------------------------------------------------
// StrFormat
// ---------------------------------------------------------------------------

fn parse_str_format(args: &[String]) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::StrFormat, args, Arity::AtLeast(2))?;
    let op = parse_keyword::<StrFormatType>(&args[0])?;
    let a = &args[1..];
    let arity = |n: Arity| sub_arity(CommandKind::StrFormat, op, a, n);

    use StrFormatType as T;
    let info = match op {
        // StrFormat,IntToBytes,<Integer>,[DestVar]
        T::IntToBytes => {
            arity(Arity::Range(1, 2))?;
            let dest = if a.len() == 2 { 1 } else { 0 };
            StrFormat::IntToBytes { integer: a[0].clone(), dest_var: var(a, dest)? }
        }
        T::BytesToInt => {
            arity(Arity::Exact(2))?;
            StrFormat::BytesToInt { human_readable: a[0].clone(), dest_var: var(a, 1)? }
        }
        T::Hex => {
            arity(Arity::Exact(2))?;
            StrFormat::Hex { integer: a[0].clone(), dest_var: var(a, 1)? }
        }
        // StrFormat,Ceil,<SizeVar>,<Unit>
        T::Ceil | T::Floor | T::Round => {
            arity(Arity::Exact(2))?;
            StrFormat::CeilFloorRound { op, size_var: var(a, 0)?, unit: a[1].clone() }
        }
        // StrFormat,Date,<DestVar>,<FormatString>
        T::Date => {
            arity(Arity::Exact(2))?;
            let dest_var = var(a, 0)?;
            let format = convert_date_format(&a[1])
                .ok_or_else(|| ParseError::invalid(format!("Invalid date format string [{}]", a[1])))?;
            StrFormat::Date { dest_var, format }
        }
        T::FileName | T::DirPath | T::Path | T::Ext => {
            arity(Arity::Exact(2))?;
            StrFormat::PathPart { op, file_path: a[0].clone(), dest_var: var(a, 1)? }
        }
        T::PathCombine => {
            arity(Arity::Exact(3))?;
            StrFormat::PathCombine { dir_path: a[0].clone(), file_name: a[1].clone(), dest_var: var(a, 2)? }
        }
        // StrFormat,Inc,<DestVar>,<Integer>
        T::Inc | T::Dec | T::Mult | T::Div => {
            arity(Arity::Exact(2))?;
            StrFormat::Arithmetic { op, dest_var: var(a, 0)?, operand: a[1].clone() }
        }
        T::Left | T::Right => {
            arity(Arity::Exact(3))?;
            StrFormat::LeftRight { op, src: a[0].clone(), count: a[1].clone(), dest_var: var(a, 2)? }
        }
        T::Mid => {
            arity(Arity::Exact(4))?;
            StrFormat::Mid { src: a[0].clone(), start: a[1].clone(), length: a[2].clone(), dest_var: var(a, 3)? }
        }
        T::Len => {
            arity(Arity::Exact(2))?;
            StrFormat::Len { src: a[0].clone(), dest_var: var(a, 1)? }
        }
        T::LTrim | T::RTrim | T::CTrim => {
            arity(Arity::Exact(3))?;
            StrFormat::Trim { op, src: a[0].clone(), to_trim: a[1].clone(), dest_var: var(a, 2)? }
        }
        T::NTrim => {
            arity(Arity::Exact(2))?;
            StrFormat::NTrim { src: a[0].clone(), dest_var: var(a, 1)? }
        }
        T::UCase | T::LCase => {
            arity(Arity::Exact(2))?;
            StrFormat::Case { op, src: a[0].clone(), dest_var: var(a, 1)? }
        }
        T::Pos | T::PosX => {
            arity(Arity::Exact(3))?;
            StrFormat::Pos { op, src: a[0].clone(), sub_str: a[1].clone(), dest_var: var(a, 2)? }
        }
        T::Replace | T::ReplaceX => {
            arity(Arity::Exact(4))?;
            StrFormat::Replace {
                op,
                src: a[0].clone(),
                to_be_replaced: a[1].clone(),
                replace_with: a[2].clone(),
                dest_var: var(a, 3)?,
            }
        }
        T::ShortPath | T::LongPath => {
            arity(Arity::Exact(2))?;
            let info = StrFormat::ShortLongPath { op, src: a[0].clone(), dest_var: var(a, 1)? };
            return Ok(Parsed::deprecated(
                Payload::StrFormat(info),
                format!("Command [StrFormat,{}] is deprecated", op),
            ));
        }
        T::Split => {
            arity(Arity::Exact(4))?;
            StrFormat::Split { src: a[0].clone(), delimiter: a[1].clone(), index: a[2].clone(), dest_var: var(a, 3)? }
        }
        T::PadLeft | T::PadRight => {
            arity(Arity::Exact(4))?;
            StrFormat::Pad { op, src: a[0].clone(), count: a[1].clone(), pad_char: a[2].clone(), dest_var: var(a, 3)? }
        }
    };
    Ok(Payload::StrFormat(info).into())
}

/// Date tokens, longest first within each length.
const DATE_TOKENS: &[(&str, &str)] = &[
    ("am/pm", "tt"),
    ("yyyy", "yyyy"),
    ("mmmm", "MMMM"),
    ("dddd", "dddd"),
    ("mmm", "MMM"),
    ("ddd", "ddd"),
    ("zzz", "fff"),
    ("yy", "yy"),
    ("mm", "MM"),
    ("dd", "dd"),
    ("hh", "HH"),
    ("nn", "mm"),
    ("ss", "ss"),
    ("zz", "fff"),
    ("tt", "h:mm:ss tt"),
    ("gg", "gg"),
    ("y", "y"),
    ("m", "M"),
    ("d", "d"),
    ("h", "H"),
    ("n", "m"),
    ("s", "s"),
    ("z", "fff"),
    ("t", "h:mm tt"),
    ("g", "gg"),
];

const DATE_LETTERS: &[char] = &['y', 'm', 'd', 'h', 'n', 's', 'z', 'a', 'p', 't', 'g'];

/// Convert a script date format (`yyyy-mm-dd hh:nn`) into the
/// `yyyy-MM-dd HH:mm` pattern style used by the executor.
///
/// Returns `None` if the format uses a letter outside the date vocabulary.
/// When `am/pm` is present, hours switch to the 12-hour `hh`/`h`.
pub fn convert_date_format(format: &str) -> Option<String> {
    let src = format.to_lowercase();
    if src.chars().any(|c| c.is_ascii_lowercase() && !DATE_LETTERS.contains(&c)) {
        return None;
    }

    let mut out = String::with_capacity(src.len());
    let mut hours: Vec<(usize, &str)> = Vec::new();
    let mut hour12 = false;
    let mut rest = src.as_str();

    while let Some(c) = rest.chars().next() {
        if let Some(&(token, mapped)) = DATE_TOKENS.iter().find(|(t, _)| rest.starts_with(t)) {
            match token {
                "am/pm" => hour12 = true,
                "hh" => hours.push((out.len(), "hh")),
                "h" => hours.push((out.len(), "h")),
                _ => {}
            }
            out.push_str(mapped);
            rest = &rest[token.len()..];
        } else if c.is_ascii_lowercase() {
            return None;
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    if hour12 {
        for (pos, twelve) in hours {
            out.replace_range(pos..pos + twelve.len(), twelve);
        }
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// Math
// ---------------------------------------------------------------------------

fn parse_math(args: &[String]) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::Math, args, Arity::AtLeast(1))?;
    let op = parse_keyword::<MathType>(&args[0])?;
    let a = &args[1..];
    let arity = |n: Arity| sub_arity(CommandKind::Math, op, a, n);

    use MathType as T;
    let info = match op {
        // Math,Add,<DestVar>,<Src1>,<Src2>
        T::Add | T::Sub | T::Mul | T::Div => {
            arity(Arity::Exact(3))?;
            Math::Arithmetic { op, dest_var: var(a, 0)?, src1: a[1].clone(), src2: a[2].clone() }
        }
        // Math,IntDiv,<QuotientVar>,<RemainderVar>,<Src1>,<Src2>
        T::IntDiv => {
            arity(Arity::Exact(4))?;
            Math::IntDiv { quotient_var: var(a, 0)?, remainder_var: var(a, 1)?, src1: a[2].clone(), src2: a[3].clone() }
        }
        T::Neg => {
            arity(Arity::Exact(2))?;
            Math::Neg { dest_var: var(a, 0)?, src: a[1].clone() }
        }
        // Math,ToSign,<DestVar>,<Src>,<BitSize>
        T::ToSign | T::ToUnsign => {
            arity(Arity::Exact(3))?;
            Math::IntegerSignedness { op, dest_var: var(a, 0)?, src: a[1].clone(), bit_size: bit_size(a, 2)? }
        }
        T::BoolAnd | T::BoolOr | T::BoolXor => {
            arity(Arity::Exact(3))?;
            Math::BoolLogic { op, dest_var: var(a, 0)?, src1: a[1].clone(), src2: a[2].clone() }
        }
        T::BoolNot => {
            arity(Arity::Exact(2))?;
            Math::BoolNot { dest_var: var(a, 0)?, src: a[1].clone() }
        }
        T::BitAnd | T::BitOr | T::BitXor => {
            arity(Arity::Exact(3))?;
            Math::BitLogic { op, dest_var: var(a, 0)?, src1: a[1].clone(), src2: a[2].clone() }
        }
        T::BitNot => {
            arity(Arity::Exact(3))?;
            Math::BitNot { dest_var: var(a, 0)?, src: a[1].clone(), bit_size: bit_size(a, 2)? }
        }
        // Math,BitShift,<DestVar>,<Src>,<LEFT|RIGHT>,<Shift>,<BitSize>,[UNSIGNED]
        T::BitShift => {
            arity(Arity::Range(5, 6))?;
            let unsigned = match a.get(5) {
                None => false,
                Some(flag) if flag.eq_ignore_ascii_case("UNSIGNED") => true,
                Some(other) => return Err(ParseError::invalid(format!("Invalid argument [{}]", other))),
            };
            Math::BitShift {
                dest_var: var(a, 0)?,
                src: a[1].clone(),
                direction: a[2].clone(),
                shift: a[3].clone(),
                bit_size: bit_size(a, 4)?,
                unsigned,
            }
        }
        T::Ceil | T::Floor | T::Round => {
            arity(Arity::Exact(3))?;
            Math::CeilFloorRound { op, dest_var: var(a, 0)?, src: a[1].clone(), unit: a[2].clone() }
        }
        T::Abs => {
            arity(Arity::Exact(2))?;
            Math::Abs { dest_var: var(a, 0)?, src: a[1].clone() }
        }
        T::Pow => {
            arity(Arity::Exact(3))?;
            Math::Pow { dest_var: var(a, 0)?, base: a[1].clone(), power: a[2].clone() }
        }
        T::Hex | T::Dec => {
            arity(Arity::Exact(3))?;
            Math::HexDec { op, dest_var: var(a, 0)?, src: a[1].clone(), bit_size: bit_size(a, 2)? }
        }
        // Math,Rand,<DestVar>,[Min,Max]
        T::Rand => {
            arity(Arity::Either(1, 3))?;
            Math::Rand { dest_var: var(a, 0)?, min: a.get(1).cloned(), max: a.get(2).cloned() }
        }
    };
    Ok(Payload::Math(info).into())
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

fn parse_list(args: &[String]) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::List, args, Arity::AtLeast(1))?;
    let op = parse_keyword::<ListType>(&args[0])?;
    let a = &args[1..];

    use ListType as T;
    // Required argument count, excluding the optional Delim=.
    let required = match op {
        T::Get | T::Set | T::Insert | T::Pos | T::PosX | T::LastPos | T::LastPosX => 3,
        T::Append | T::Remove | T::RemoveX | T::RemoveAt | T::Count | T::Sort | T::SortX | T::SortN | T::SortNX => 2,
    };
    sub_arity(CommandKind::List, op, a, Arity::Range(required, required + 1))?;

    let list_var = var(a, 0)?;
    let delim = Trailing::scan(&a[required..], &[], &["Delim"])?.value("Delim");

    let list_op = match op {
        // List,Get,<%ListVar%>,<Index>,<%DestVar%>
        T::Get => ListOp::Get { index: a[1].clone(), dest_var: var(a, 2)? },
        T::Set => ListOp::Set { index: a[1].clone(), item: a[2].clone() },
        T::Append => ListOp::Append { item: a[1].clone() },
        T::Insert => ListOp::Insert { index: a[1].clone(), item: a[2].clone() },
        T::Remove | T::RemoveX => ListOp::Remove { op, item: a[1].clone() },
        T::RemoveAt => ListOp::RemoveAt { index: a[1].clone() },
        // List,Count,<%ListVar%>,<%DestVar%>
        T::Count => ListOp::Count { dest_var: var(a, 1)? },
        // List,Pos,<%ListVar%>,<Item>,<%DestVar%>
        T::Pos | T::PosX | T::LastPos | T::LastPosX => ListOp::Pos { op, item: a[1].clone(), dest_var: var(a, 2)? },
        // List,Sort,<%ListVar%>,<Asc|Desc>
        T::Sort | T::SortX | T::SortN | T::SortNX => ListOp::Sort { op, order: a[1].clone() },
    };
    Ok(Payload::List(List { list_var, op: list_op, delim }).into())
}
