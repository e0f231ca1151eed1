//! Branch condition grammar used by `If` and `Debug,Breakpoint`.
//!
//! A condition is an optional `Not`, then either a fixed-arity predicate
//! (`ExistFile,<Path>`) or a comparison (`<Lhs>,<Op>,<Rhs>`). Parsing
//! reports how many arguments the condition consumed so the caller knows
//! where the embedded command starts.
//!
//! # Example
//!
//! ```
//! use bakery_core::condition::{parse_condition, Predicate};
//! use bakery_core::config::ParserOptions;
//!
//! let args: Vec<String> = ["Not", "ExistFile", "a.txt", "Echo", "missing"]
//!     .iter().map(|s| s.to_string()).collect();
//! let (cond, consumed) = parse_condition(&args, &ParserOptions::default()).unwrap();
//! assert!(cond.negate);
//! assert!(matches!(cond.predicate, Predicate::ExistFile { .. }));
//! assert_eq!(consumed, 3);
//! ```

use serde::Serialize;

use crate::command::keyword::{keyword_enum, Keyword};
use crate::config::ParserOptions;
use crate::error::ParseError;

keyword_enum! {
    /// Words that open a fixed-arity predicate.
    pub enum PredicateType: "BranchConditionType" {
        ExistFile,
        ExistDir,
        ExistSection,
        ExistRegSection,
        ExistRegSubKey,
        ExistRegKey,
        ExistRegValue,
        ExistRegMulti,
        ExistVar,
        ExistMacro,
        WimExistIndex,
        WimExistFile,
        WimExistDir,
        WimExistImageInfo,
        Ping,
        Online,
        Question,
        // Negated forms, only with legacy branch conditions enabled
        NotExistFile,
        NotExistDir,
        NotExistSection,
        NotExistRegSection,
        NotExistRegKey,
        NotExistVar,
    }
}

keyword_enum! {
    pub enum CompareOp: "CompareOp" {
        Equal | "==",
        EqualX | "===",
        Smaller | "<",
        Bigger | ">",
        SmallerEqual | "<=",
        BiggerEqual | ">=",
        NotEqual | "!=",
    }
}

/// Timeout and default answer of a timed `Question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedAnswer {
    pub timeout: String,
    pub default: String,
}

/// A predicate with exactly the arguments its kind takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Predicate {
    /// `NotEqual` never appears here; it is stored as a negated `Equal`.
    Compare { op: CompareOp, lhs: String, rhs: String },
    ExistFile { path: String },
    ExistDir { path: String },
    ExistSection { file: String, section: String },
    ExistRegSection { hive: String, key_path: String },
    ExistRegSubKey { hive: String, key_path: String },
    ExistRegKey { hive: String, key_path: String, value_name: String },
    ExistRegValue { hive: String, key_path: String, value_name: String },
    ExistRegMulti { hive: String, key_path: String, value_name: String, search: String },
    ExistVar { var: String },
    ExistMacro { name: String },
    WimExistIndex { wim: String, image_index: String },
    WimExistFile { wim: String, image_index: String, path: String },
    WimExistDir { wim: String, image_index: String, path: String },
    WimExistImageInfo { wim: String, image_index: String, key: String },
    Ping { host: String },
    Online,
    Question { message: String, timed: Option<TimedAnswer> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchCondition {
    pub predicate: Predicate,
    pub negate: bool,
    /// Deprecated spelling the condition was written with, if any.
    #[serde(skip)]
    legacy_form: Option<&'static str>,
}

impl BranchCondition {
    pub fn new(predicate: Predicate, negate: bool) -> Self {
        Self { predicate, negate, legacy_form: None }
    }

    /// Migration hint when the condition uses a deprecated form.
    pub fn deprecation(&self) -> Option<String> {
        if let Some(form) = self.legacy_form {
            let modern = match form {
                "NotEqual" => "Not,Equal",
                "NotExistFile" => "Not,ExistFile",
                "NotExistDir" => "Not,ExistDir",
                "NotExistSection" => "Not,ExistSection",
                "NotExistRegSection" => "Not,ExistRegSubKey",
                "NotExistRegKey" => "Not,ExistRegValue",
                _ => "Not,ExistVar",
            };
            return Some(format!("Branch condition [{}] is deprecated, use [{}] instead", form, modern));
        }
        match self.predicate {
            Predicate::ExistRegSection { .. } => {
                Some("Branch condition [ExistRegSection] is deprecated, use [ExistRegSubKey] instead".to_string())
            }
            Predicate::ExistRegKey { .. } => {
                Some("Branch condition [ExistRegKey] is deprecated, use [ExistRegValue] instead".to_string())
            }
            _ => None,
        }
    }
}

fn ends_with_digit(s: &str) -> bool {
    s.chars().last().is_some_and(|c| c.is_ascii_digit())
}

/// Parse a branch condition from the front of `args`.
///
/// Returns the condition and the number of arguments it consumed.
pub fn parse_condition(args: &[String], options: &ParserOptions) -> Result<(BranchCondition, usize), ParseError> {
    let first = args.first().ok_or(ParseError::EmptyCondition)?;

    let mut negate = false;
    let mut c = 0;
    if first.eq_ignore_ascii_case("Not") {
        negate = true;
        c = 1;
    }
    let head = args.get(c).ok_or(ParseError::IncorrectCondition)?;

    if let Some(ty) = PredicateType::lookup(head) {
        let legacy = matches!(
            ty,
            PredicateType::NotExistFile
                | PredicateType::NotExistDir
                | PredicateType::NotExistSection
                | PredicateType::NotExistRegSection
                | PredicateType::NotExistRegKey
                | PredicateType::NotExistVar
        );
        if !legacy || options.allow_legacy_branch_condition {
            let mut legacy_form = None;
            if legacy {
                if negate {
                    return Err(ParseError::DuplicateNot);
                }
                negate = true;
                legacy_form = Some(ty.name());
            }
            let (predicate, consumed) = parse_predicate(ty, args, c)?;
            let cond = BranchCondition { predicate, negate, legacy_form };
            return Ok((cond, consumed));
        }
    }

    parse_comparison(args, c, negate)
}

/// Ensure `args` holds `count` arguments after the predicate word at `c`.
///
/// The error counts every argument up to the embedded command, `Not` and
/// the predicate word included, and names legacy `NotExist*` words by their
/// positive form.
fn predicate_args<'a>(ty: PredicateType, args: &'a [String], c: usize, count: usize) -> Result<&'a [String], ParseError> {
    use PredicateType as T;

    let end = c + 1 + count;
    if args.len() < end {
        let reported = match ty {
            T::NotExistFile => T::ExistFile,
            T::NotExistDir => T::ExistDir,
            T::NotExistSection => T::ExistSection,
            T::NotExistRegSection => T::ExistRegSection,
            T::NotExistRegKey => T::ExistRegKey,
            T::NotExistVar => T::ExistVar,
            other => other,
        };
        return Err(ParseError::ConditionArity { predicate: reported.name().to_string(), min: end });
    }
    Ok(&args[c + 1..end])
}

fn parse_predicate(ty: PredicateType, args: &[String], c: usize) -> Result<(Predicate, usize), ParseError> {
    use PredicateType as T;

    let count = match ty {
        T::Online => 0,
        T::ExistFile | T::ExistDir | T::ExistVar | T::ExistMacro | T::Ping => 1,
        T::NotExistFile | T::NotExistDir | T::NotExistVar => 1,
        T::ExistSection | T::ExistRegSection | T::ExistRegSubKey | T::WimExistIndex => 2,
        T::NotExistSection | T::NotExistRegSection => 2,
        T::ExistRegKey | T::ExistRegValue | T::NotExistRegKey => 3,
        T::WimExistFile | T::WimExistDir | T::WimExistImageInfo => 3,
        T::ExistRegMulti => 4,
        T::Question => {
            // `Question,<Message>,<Timeout>,<Default>` when the timeout looks numeric
            if args.get(c + 2).is_some_and(|s| ends_with_digit(s)) {
                3
            } else {
                1
            }
        }
    };
    let a = predicate_args(ty, args, c, count)?;
    let s = |i: usize| a[i].clone();

    let predicate = match ty {
        T::ExistFile | T::NotExistFile => Predicate::ExistFile { path: s(0) },
        T::ExistDir | T::NotExistDir => Predicate::ExistDir { path: s(0) },
        T::ExistSection | T::NotExistSection => Predicate::ExistSection { file: s(0), section: s(1) },
        T::ExistRegSection | T::NotExistRegSection => Predicate::ExistRegSection { hive: s(0), key_path: s(1) },
        T::ExistRegSubKey => Predicate::ExistRegSubKey { hive: s(0), key_path: s(1) },
        T::ExistRegKey | T::NotExistRegKey => {
            Predicate::ExistRegKey { hive: s(0), key_path: s(1), value_name: s(2) }
        }
        T::ExistRegValue => Predicate::ExistRegValue { hive: s(0), key_path: s(1), value_name: s(2) },
        T::ExistRegMulti => {
            Predicate::ExistRegMulti { hive: s(0), key_path: s(1), value_name: s(2), search: s(3) }
        }
        T::ExistVar | T::NotExistVar => Predicate::ExistVar { var: s(0) },
        T::ExistMacro => Predicate::ExistMacro { name: s(0) },
        T::WimExistIndex => Predicate::WimExistIndex { wim: s(0), image_index: s(1) },
        T::WimExistFile => Predicate::WimExistFile { wim: s(0), image_index: s(1), path: s(2) },
        T::WimExistDir => Predicate::WimExistDir { wim: s(0), image_index: s(1), path: s(2) },
        T::WimExistImageInfo => Predicate::WimExistImageInfo { wim: s(0), image_index: s(1), key: s(2) },
        T::Ping => Predicate::Ping { host: s(0) },
        T::Online => Predicate::Online,
        T::Question => {
            let timed = (count == 3).then(|| TimedAnswer { timeout: s(1), default: s(2) });
            Predicate::Question { message: s(0), timed }
        }
    };
    Ok((predicate, c + 1 + count))
}

fn parse_comparison(args: &[String], c: usize, mut negate: bool) -> Result<(BranchCondition, usize), ParseError> {
    // <Lhs>,<Op>,<Rhs> followed by at least one more argument
    if c + 3 >= args.len() {
        return Err(ParseError::IncorrectCondition);
    }

    let op_token = &args[c + 1];
    let mut op = CompareOp::lookup(op_token).ok_or_else(|| ParseError::UnknownOperator(op_token.clone()))?;
    let mut legacy_form = None;
    if op == CompareOp::NotEqual {
        if negate {
            return Err(ParseError::DuplicateNot);
        }
        negate = true;
        op = CompareOp::Equal;
        legacy_form = Some("NotEqual");
    }

    let predicate = Predicate::Compare { op, lhs: args[c].clone(), rhs: args[c + 2].clone() };
    Ok((BranchCondition { predicate, negate, legacy_form }, c + 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split(',').map(|a| a.to_string()).collect()
    }

    fn parse(s: &str) -> Result<(BranchCondition, usize), ParseError> {
        parse_condition(&args(s), &ParserOptions::default())
    }

    #[test]
    fn test_compare_condition() {
        let (cond, consumed) = parse("%A%,Equal,1,Echo,Hi").unwrap();
        assert_eq!(consumed, 3);
        assert!(!cond.negate);
        match cond.predicate {
            Predicate::Compare { op, lhs, rhs } => {
                assert_eq!(op, CompareOp::Equal);
                assert_eq!(lhs, "%A%");
                assert_eq!(rhs, "1");
            }
            _ => panic!("Expected Compare"),
        }
    }

    #[test]
    fn test_symbolic_operators() {
        for (sym, op) in [
            ("==", CompareOp::Equal),
            ("===", CompareOp::EqualX),
            ("<", CompareOp::Smaller),
            (">", CompareOp::Bigger),
            ("<=", CompareOp::SmallerEqual),
            (">=", CompareOp::BiggerEqual),
        ] {
            let (cond, _) = parse(&format!("%A%,{},1,Echo,Hi", sym)).unwrap();
            assert_eq!(cond.predicate, Predicate::Compare { op, lhs: "%A%".into(), rhs: "1".into() });
        }
    }

    #[test]
    fn test_not_equal_negates_equal() {
        let (cond, consumed) = parse("%A%,!=,1,Echo,Hi").unwrap();
        assert!(cond.negate);
        assert_eq!(consumed, 3);
        assert!(matches!(cond.predicate, Predicate::Compare { op: CompareOp::Equal, .. }));
        assert!(cond.deprecation().is_some());

        assert_eq!(parse("Not,%A%,NotEqual,1,Echo,Hi").unwrap_err(), ParseError::DuplicateNot);
    }

    #[test]
    fn test_not_prefix() {
        let (cond, consumed) = parse("not,ExistDir,%Target%,Echo,Hi").unwrap();
        assert!(cond.negate);
        assert_eq!(consumed, 3);
        assert_eq!(cond.predicate, Predicate::ExistDir { path: "%Target%".into() });
    }

    #[test]
    fn test_predicate_arity() {
        let (_, consumed) = parse("ExistRegMulti,HKLM,Key,Value,Search,Echo,Hi").unwrap();
        assert_eq!(consumed, 5);
        let (_, consumed) = parse("Online,Echo,Hi").unwrap();
        assert_eq!(consumed, 1);
        let (_, consumed) = parse("WimExistImageInfo,a.wim,1,Name,Echo,Hi").unwrap();
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_predicate_missing_arguments() {
        match parse("ExistSection,a.ini").unwrap_err() {
            ParseError::ConditionArity { predicate, min } => {
                assert_eq!(predicate, "ExistSection");
                assert_eq!(min, 3);
            }
            other => panic!("Expected ConditionArity, got {:?}", other),
        }

        let err = parse("Not,ExistFile").unwrap_err();
        assert_eq!(err.to_string(), "BranchCondition [ExistFile] must have at least [3] arguments");

        let err = parse_condition(&args("NotExistRegKey,HKLM,Key"), &ParserOptions::legacy()).unwrap_err();
        assert_eq!(err.to_string(), "BranchCondition [ExistRegKey] must have at least [4] arguments");
    }

    #[test]
    fn test_question_arity_heuristic() {
        let (cond, consumed) = parse("Question,Continue?,10,True,Echo,Yes").unwrap();
        assert_eq!(consumed, 4);
        match cond.predicate {
            Predicate::Question { timed: Some(t), .. } => {
                assert_eq!(t.timeout, "10");
                assert_eq!(t.default, "True");
            }
            _ => panic!("Expected timed Question"),
        }

        let (cond, consumed) = parse("Question,Continue?,Echo,Yes").unwrap();
        assert_eq!(consumed, 2);
        assert!(matches!(cond.predicate, Predicate::Question { timed: None, .. }));
    }

    #[test]
    fn test_legacy_not_exist_requires_compat() {
        // Without the switch the word is read as a comparison operand
        assert_eq!(
            parse("NotExistFile,a.txt,Echo,Hi").unwrap_err(),
            ParseError::UnknownOperator("a.txt".to_string())
        );

        let legacy = ParserOptions { allow_legacy_branch_condition: true, ..ParserOptions::default() };
        let (cond, consumed) = parse_condition(&args("NotExistFile,a.txt,Echo,Hi"), &legacy).unwrap();
        assert!(cond.negate);
        assert_eq!(consumed, 2);
        assert_eq!(cond.predicate, Predicate::ExistFile { path: "a.txt".into() });
        assert!(cond.deprecation().unwrap().contains("NotExistFile"));

        assert_eq!(
            parse_condition(&args("Not,NotExistFile,a.txt,Echo,Hi"), &legacy).unwrap_err(),
            ParseError::DuplicateNot
        );
    }

    #[test]
    fn test_incorrect_conditions() {
        assert_eq!(parse_condition(&[], &ParserOptions::default()).unwrap_err(), ParseError::EmptyCondition);
        assert_eq!(parse("%A%,Equal,1").unwrap_err(), ParseError::IncorrectCondition);
        assert_eq!(parse("Not").unwrap_err(), ParseError::IncorrectCondition);
        assert_eq!(
            parse("%A%,Like,1,Echo,Hi").unwrap_err(),
            ParseError::UnknownOperator("Like".to_string())
        );
    }

    #[test]
    fn test_deprecated_predicates() {
        let (cond, _) = parse("ExistRegKey,HKLM,Key,Value,Echo,Hi").unwrap();
        assert!(cond.deprecation().unwrap().contains("ExistRegValue"));
        let (cond, _) = parse("ExistRegValue,HKLM,Key,Value,Echo,Hi").unwrap();
        assert!(cond.deprecation().is_none());
    }
}
