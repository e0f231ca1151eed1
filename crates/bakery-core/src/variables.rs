//! Variable reference grammar.
//!
//! A destination argument must name something the executor can assign:
//! a `%Name%` variable, a section parameter (`#1`..`#9`), an out-parameter
//! (`#o1`..`#o9`), the return value `#r` or the loop counter `#c`.

use std::collections::HashSet;

/// Kind of variable reference a whole token denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKeyType {
    None,
    /// `%Name%`
    Variable,
    /// `#1` .. `#9`
    SectionInParams,
    /// `#o1` .. `#o9`
    SectionOutParams,
    /// `#r`
    ReturnValue,
    /// `#c`
    LoopCounter,
}

fn is_var_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '#' | '(' | ')' | '.')
}

fn is_param_digit(c: u8) -> bool {
    (b'1'..=b'9').contains(&c)
}

pub fn detect_type(key: &str) -> VarKeyType {
    let bytes = key.as_bytes();
    if key.len() >= 3
        && key.starts_with('%')
        && key.ends_with('%')
        && key[1..key.len() - 1].chars().all(is_var_name_char)
    {
        return VarKeyType::Variable;
    }
    match bytes {
        [b'#', d] if is_param_digit(*d) => VarKeyType::SectionInParams,
        [b'#', b'o' | b'O', d] if is_param_digit(*d) => VarKeyType::SectionOutParams,
        [b'#', b'r' | b'R'] => VarKeyType::ReturnValue,
        [b'#', b'c' | b'C'] => VarKeyType::LoopCounter,
        _ => VarKeyType::None,
    }
}

/// Whether `key` can receive a value.
pub fn is_valid_variable(key: &str) -> bool {
    detect_type(key) != VarKeyType::None
}

/// Whether `s` references any variable or section parameter.
pub fn contains_variable(s: &str) -> bool {
    if percent_names(s).next().is_some() {
        return true;
    }
    let bytes = s.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'#' {
            return false;
        }
        match (bytes.get(i + 1), bytes.get(i + 2)) {
            (Some(d), _) if is_param_digit(*d) => true,
            (Some(b'o' | b'O'), Some(d)) if is_param_digit(*d) => true,
            (Some(b'o' | b'O'), Some(b'a' | b'A')) => true,
            (Some(b'c' | b'C' | b'a' | b'A' | b'r' | b'R'), _) => true,
            _ => false,
        }
    })
}

/// Iterates over the inner names of `%Name%` references, left to right.
fn percent_names(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || loop {
        let start = rest.find('%')?;
        let after = &rest[start + 1..];
        let len = after.find(|c: char| !is_var_name_char(c)).unwrap_or(after.len());
        if len > 0 && after[len..].starts_with('%') {
            let name = &after[..len];
            rest = &after[len + 1..];
            return Some(name);
        }
        rest = after;
    })
}

/// Normalized key of an assignable token, used to compare reads and writes.
pub fn variable_key(token: &str) -> Option<String> {
    match detect_type(token) {
        VarKeyType::None => None,
        VarKeyType::Variable => Some(token[1..token.len() - 1].to_lowercase()),
        _ => Some(token.to_lowercase()),
    }
}

/// Every variable an argument reads, normalized by [`variable_key`].
pub fn referenced_variables(s: &str) -> HashSet<String> {
    let mut vars: HashSet<String> = percent_names(s).map(|n| n.to_lowercase()).collect();
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'#' {
            continue;
        }
        match (bytes.get(i + 1), bytes.get(i + 2)) {
            (Some(d), _) if is_param_digit(*d) => {
                vars.insert(s[i..i + 2].to_string());
            }
            (Some(b'o' | b'O'), Some(d)) if is_param_digit(*d) => {
                vars.insert(s[i..i + 3].to_lowercase());
            }
            (Some(b'r' | b'R' | b'c' | b'C'), _) => {
                vars.insert(s[i..i + 2].to_lowercase());
            }
            _ => {}
        }
    }
    vars
}

/// Strips surrounding `%` from an interface key (`%pTextBox1%` -> `pTextBox1`).
pub fn trim_percent(key: &str) -> &str {
    key.trim_matches('%')
}
