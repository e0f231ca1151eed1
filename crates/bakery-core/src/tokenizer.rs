//! Comma-separated, quote-aware argument tokenizer.
//!
//! A statement is `Kind,arg1,arg2,...`. An argument wrapped in double
//! quotes may contain commas; inside quotes `""` stands for a literal `"`.
//! A line whose last argument is a bare `\` continues on the next line.
//!
//! # Example
//!
//! ```
//! use bakery_core::tokenizer::tokenize_args;
//!
//! let args = tokenize_args(r#""a""b",c"#).unwrap();
//! assert_eq!(args, vec![r#"a"b"#.to_string(), "c".to_string()]);
//! ```

use crate::error::ParseError;

/// One logical statement read from a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Blank,
    Comment(String),
    Command {
        /// Trimmed source text, continuation lines joined with `\n`.
        raw: String,
        kind: String,
        args: Vec<String>,
    },
}

/// Split the first argument off `input`.
///
/// Returns the argument and the text after its comma, or `None` when it was
/// the last argument.
pub fn next_argument(input: &str) -> Result<(String, Option<&str>), ParseError> {
    let s = input.trim();

    if let Some(quoted) = s.strip_prefix('"') {
        let close = find_closing_quote(quoted).ok_or(ParseError::UnterminatedQuote)?;
        let token = quoted[..close].replace("\"\"", "\"");
        let after = &quoted[close + 1..];
        return match after.find(',') {
            Some(comma) => {
                if !after[..comma].trim().is_empty() {
                    return Err(ParseError::TrailingAfterQuote);
                }
                Ok((token, Some(after[comma + 1..].trim())))
            }
            None if after.trim().is_empty() => Ok((token, None)),
            None => Err(ParseError::TrailingAfterQuote),
        };
    }

    match s.find(',') {
        Some(comma) => Ok((s[..comma].trim().to_string(), Some(s[comma + 1..].trim()))),
        None => Ok((s.to_string(), None)),
    }
}

/// Byte offset of the quote closing a quoted argument, skipping `""` pairs.
fn find_closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Tokenize a whole argument list.
pub fn tokenize_args(input: &str) -> Result<Vec<String>, ParseError> {
    check_quote_count(input)?;
    let mut args = Vec::new();
    let mut rest = Some(input);
    while let Some(s) = rest {
        let (arg, next) = next_argument(s)?;
        args.push(arg);
        rest = next;
    }
    Ok(args)
}

fn is_comment(trimmed: &str) -> bool {
    matches!(trimmed.chars().next(), Some('/' | '#' | ';'))
}

fn is_kind_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_quote_count(line: &str) -> Result<(), ParseError> {
    if line.matches('"').count() % 2 == 1 {
        Err(ParseError::OddQuoteCount)
    } else {
        Ok(())
    }
}

/// Read the statement starting at `lines[*idx]`.
///
/// On return `*idx` points at the last physical line consumed, so a caller
/// iterating line by line advances past continuation lines.
pub fn read_statement(lines: &[String], idx: &mut usize) -> Result<Statement, ParseError> {
    let first = lines.get(*idx).map(|l| l.trim()).unwrap_or_default();
    if first.is_empty() {
        return Ok(Statement::Blank);
    }
    if is_comment(first) {
        return Ok(Statement::Comment(first.to_string()));
    }

    check_quote_count(first)?;
    let (kind, rest) = next_argument(first)?;
    if !is_kind_token(&kind) {
        return Err(ParseError::InvalidKindToken(kind));
    }
    let mut args = match rest {
        Some(rest) => tokenize_args(rest)?,
        None => Vec::new(),
    };

    let mut raw = first.to_string();
    while args.last().map(String::as_str) == Some("\\") && raw.ends_with(",\\") {
        let next = lines
            .get(*idx + 1)
            .map(|l| l.trim())
            .ok_or(ParseError::DanglingContinuation)?;
        if next.is_empty() || next.starts_with("//") || next.starts_with('#') || next.starts_with(';') {
            return Err(ParseError::EmptyContinuation);
        }
        check_quote_count(next)?;

        args.pop();
        args.extend(tokenize_args(next)?);
        raw.push('\n');
        raw.push_str(next);
        *idx += 1;
    }

    Ok(Statement::Command { raw, kind, args })
}
