//! Command grammar table.
//!
//! [`parse_command`] resolves a kind token, checks the argument count and
//! optional trailing arguments for that kind, and builds the typed payload.
//! Unknown tokens become macro invocations. Each command family lives in
//! its own submodule; the helpers here are shared by all of them.

mod archive;
mod compound;
mod control;
mod file;
mod interface;
mod registry;
mod text;
mod wim;

use std::sync::Arc;

use crate::command::keyword::Keyword;
use crate::command::payload::MacroCall;
use crate::command::{Command, CommandKind, Payload};
use crate::config::ParserOptions;
use crate::error::{Arity, ParseError};
use crate::section::SectionRef;
use crate::variables;

pub use self::compound::convert_date_format;

/// Where a statement came from and which compatibility switches apply.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub options: &'a ParserOptions,
    pub section: &'a Arc<SectionRef>,
    pub raw: &'a str,
    pub line: usize,
}

impl Context<'_> {
    fn command(&self, parsed: Parsed) -> Command {
        let mut cmd = Command::new(self.raw, Arc::clone(self.section), self.line, parsed.payload);
        cmd.deprecated = parsed.deprecated;
        cmd
    }
}

/// Grammar output before it is stamped with source information.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub payload: Payload,
    pub deprecated: Option<String>,
}

impl Parsed {
    pub fn deprecated(payload: Payload, message: impl Into<String>) -> Self {
        Self { payload, deprecated: Some(message.into()) }
    }

    pub fn with_deprecation(mut self, message: Option<String>) -> Self {
        if message.is_some() {
            self.deprecated = message;
        }
        self
    }
}

impl From<Payload> for Parsed {
    fn from(payload: Payload) -> Self {
        Self { payload, deprecated: None }
    }
}

/// Resolve `token` to a kind the grammar handles.
///
/// Returns `None` when the token must be treated as a macro name: unknown
/// words, pseudo and batch kinds, and kinds gated off by a compatibility
/// switch.
pub fn resolve_kind(token: &str, options: &ParserOptions) -> Option<CommandKind> {
    let kind = CommandKind::lookup(token)?;
    if kind.is_pseudo() || kind.is_batch() {
        return None;
    }
    match kind {
        CommandKind::Visible if !options.allow_legacy_interface_command => None,
        CommandKind::PackParam if !options.allow_legacy_section_param_command => None,
        _ => Some(kind),
    }
}

/// Parse one statement into a command.
pub fn parse_command(token: &str, args: Vec<String>, ctx: &Context) -> Result<Command, ParseError> {
    let parsed = match resolve_kind(token, ctx.options) {
        Some(kind) => parse_kind(kind, &args, ctx)?,
        None => Parsed::from(Payload::Macro(MacroCall { name: token.to_string(), args })),
    };
    Ok(ctx.command(parsed))
}

/// Parse the command embedded at the front of `args` (`If`, `Else`,
/// `System,OnBuildExit`).
pub(crate) fn parse_embedded(args: &[String], ctx: &Context) -> Result<Command, ParseError> {
    let (token, rest) = args.split_first().ok_or_else(|| ParseError::invalid("Embedded command is missing"))?;
    parse_command(token, rest.to_vec(), ctx)
}

pub(crate) fn parse_kind(kind: CommandKind, args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    use CommandKind as K;

    match kind {
        K::FileCopy
        | K::FileDelete
        | K::FileRename
        | K::FileMove
        | K::FileCreateBlank
        | K::FileSize
        | K::FileVersion
        | K::DirCopy
        | K::DirDelete
        | K::DirMove
        | K::DirMake
        | K::DirSize
        | K::PathMove => file::parse(kind, args),

        K::RegHiveLoad
        | K::RegHiveUnload
        | K::RegRead
        | K::RegWrite
        | K::RegWriteEx
        | K::RegWriteLegacy
        | K::RegDelete
        | K::RegMulti
        | K::RegImport
        | K::RegExport
        | K::RegCopy => registry::parse(kind, args, ctx),

        K::TXTAddLine
        | K::TXTReplace
        | K::TXTDelLine
        | K::TXTDelSpaces
        | K::TXTDelEmptyLines
        | K::IniRead
        | K::IniWrite
        | K::IniDelete
        | K::IniReadSection
        | K::IniAddSection
        | K::IniDeleteSection
        | K::IniWriteTextLine
        | K::IniMerge
        | K::IniCompact => text::parse(kind, args),

        K::WimMount
        | K::WimUnmount
        | K::WimInfo
        | K::WimApply
        | K::WimExtract
        | K::WimExtractBulk
        | K::WimCapture
        | K::WimAppend
        | K::WimDelete
        | K::WimPathAdd
        | K::WimPathDelete
        | K::WimPathRename
        | K::WimOptimize
        | K::WimExport => wim::parse(kind, args),

        K::Compress
        | K::Decompress
        | K::Expand
        | K::CopyOrExpand
        | K::WebGet
        | K::WebGetIfNotExist
        | K::Hash
        | K::ExtractFile
        | K::ExtractAndRun
        | K::ExtractAllFiles
        | K::Encode => archive::parse(kind, args),

        K::Visible
        | K::ReadInterface
        | K::WriteInterface
        | K::Message
        | K::Echo
        | K::EchoFile
        | K::UserInput
        | K::AddInterface
        | K::Retrieve => interface::parse(kind, args, ctx),

        K::StrFormat | K::Math | K::List => compound::parse(kind, args),

        K::Run
        | K::RunEx
        | K::Exec
        | K::Loop
        | K::LoopEx
        | K::LoopLetter
        | K::LoopLetterEx
        | K::If
        | K::Else
        | K::Begin
        | K::End
        | K::Set
        | K::SetMacro
        | K::AddVariables
        | K::Exit
        | K::Halt
        | K::Wait
        | K::Beep
        | K::GetParam
        | K::PackParam
        | K::System
        | K::ShellExecute
        | K::ShellExecuteEx
        | K::ShellExecuteDelete
        | K::Debug => control::parse(kind, args, ctx),

        K::None
        | K::Error
        | K::Comment
        | K::Macro
        | K::TXTAddLineOp
        | K::TXTReplaceOp
        | K::TXTDelLineOp
        | K::IniReadOp
        | K::IniWriteOp
        | K::IniDeleteOp
        | K::IniReadSectionOp
        | K::IniAddSectionOp
        | K::IniDeleteSectionOp
        | K::IniWriteTextLineOp
        | K::VisibleOp
        | K::ReadInterfaceOp
        | K::WriteInterfaceOp
        | K::WimExtractOp
        | K::WimPathOp => Err(ParseError::invalid(format!("Command [{}] cannot be written in a script", kind))),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Fail unless `args` satisfies `arity`.
pub(crate) fn check_arity(command: impl std::fmt::Display, args: &[String], arity: Arity) -> Result<(), ParseError> {
    if arity.accepts(args.len()) {
        Ok(())
    } else {
        Err(ParseError::arity(command.to_string(), arity))
    }
}

/// `args[i]`, which must be an assignable variable.
pub(crate) fn var(args: &[String], i: usize) -> Result<String, ParseError> {
    let arg = &args[i];
    if variables::is_valid_variable(arg) {
        Ok(arg.clone())
    } else {
        Err(ParseError::InvalidVariable(arg.clone()))
    }
}

/// `args[i]`, which must be a variable or one of 8, 16, 32, 64.
pub(crate) fn bit_size(args: &[String], i: usize) -> Result<String, ParseError> {
    let arg = &args[i];
    if variables::is_valid_variable(arg) || matches!(arg.as_str(), "8" | "16" | "32" | "64") {
        Ok(arg.clone())
    } else {
        Err(ParseError::InvalidBitSize(arg.clone()))
    }
}

/// `args[i]` if present.
pub(crate) fn opt(args: &[String], i: usize) -> Option<String> {
    args.get(i).cloned()
}

/// Order-independent trailing flags and `Key=Value` arguments.
#[derive(Debug, Default)]
pub(crate) struct Trailing {
    flags: Vec<&'static str>,
    values: Vec<(&'static str, String)>,
}

impl Trailing {
    /// Scan `args` against the allowed `flags` and `keys`.
    ///
    /// Every argument must match exactly one of them, and each may appear
    /// at most once.
    pub fn scan(args: &[String], flags: &[&'static str], keys: &[&'static str]) -> Result<Self, ParseError> {
        let mut found = Trailing::default();
        for arg in args {
            if let Some((key, value)) = keys.iter().find_map(|k| split_key(arg, k).map(|v| (*k, v))) {
                if found.values.iter().any(|(k, _)| *k == key) {
                    return Err(ParseError::DuplicateKeyword(key.to_string()));
                }
                found.values.push((key, value.to_string()));
            } else if let Some(&flag) = flags.iter().find(|f| arg.eq_ignore_ascii_case(f)) {
                if found.flags.contains(&flag) {
                    return Err(ParseError::DuplicateFlag(flag.to_string()));
                }
                found.flags.push(flag);
            } else {
                return Err(ParseError::UnknownOption(arg.clone()));
            }
        }
        Ok(found)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| *f == name)
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
    }

    /// Keys found, in argument order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(k, _)| *k)
    }

    /// `Some(true)` for `on`, `Some(false)` for `off`; both is an error.
    pub fn tristate(&self, on: &'static str, off: &'static str) -> Result<Option<bool>, ParseError> {
        match (self.flag(on), self.flag(off)) {
            (true, true) => Err(ParseError::DuplicateFlag(format!("{}|{}", on, off))),
            (true, false) => Ok(Some(true)),
            (false, true) => Ok(Some(false)),
            (false, false) => Ok(None),
        }
    }
}

/// Value of `arg` if it reads `key=value`, key matched case-insensitively.
fn split_key<'a>(arg: &'a str, key: &str) -> Option<&'a str> {
    let head = arg.get(..key.len())?;
    let rest = &arg[key.len()..];
    if head.eq_ignore_ascii_case(key) {
        rest.strip_prefix('=')
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split(',').map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_trailing_scan() {
        let t = Trailing::scan(&args("nowarn,Split=a.swm,CHECK"), &["NOWARN", "CHECK"], &["Split"]).unwrap();
        assert!(t.flag("NOWARN"));
        assert!(t.flag("CHECK"));
        assert_eq!(t.value("Split").as_deref(), Some("a.swm"));
        assert_eq!(t.value("Other"), None);
    }

    #[test]
    fn test_trailing_duplicates() {
        assert_eq!(
            Trailing::scan(&args("NOWARN,nowarn"), &["NOWARN"], &[]).unwrap_err(),
            ParseError::DuplicateFlag("NOWARN".to_string())
        );
        assert_eq!(
            Trailing::scan(&args("Split=a,split=b"), &[], &["Split"]).unwrap_err(),
            ParseError::DuplicateKeyword("Split".to_string())
        );
    }

    #[test]
    fn test_trailing_unknown() {
        assert_eq!(
            Trailing::scan(&args("NOREC"), &["NOWARN"], &["Split"]).unwrap_err(),
            ParseError::UnknownOption("NOREC".to_string())
        );
        // A key without '=' is not a key argument
        assert!(Trailing::scan(&args("Split"), &[], &["Split"]).is_err());
    }

    #[test]
    fn test_tristate() {
        let t = Trailing::scan(&args("NOCHECK"), &["CHECK", "NOCHECK"], &[]).unwrap();
        assert_eq!(t.tristate("CHECK", "NOCHECK").unwrap(), Some(false));
        let t = Trailing::scan(&args("CHECK,NOCHECK"), &["CHECK", "NOCHECK"], &[]).unwrap();
        assert!(t.tristate("CHECK", "NOCHECK").is_err());
    }

    #[test]
    fn test_resolve_kind_fallbacks() {
        let options = ParserOptions::default();
        assert_eq!(resolve_kind("echo", &options), Some(CommandKind::Echo));
        assert_eq!(resolve_kind("MyMacro", &options), None);
        assert_eq!(resolve_kind("IniReadOp", &options), None);
        assert_eq!(resolve_kind("Comment", &options), None);
        assert_eq!(resolve_kind("Visible", &options), None);
        assert_eq!(resolve_kind("PackParam", &options), None);

        let legacy = ParserOptions::legacy();
        assert_eq!(resolve_kind("Visible", &legacy), Some(CommandKind::Visible));
        assert_eq!(resolve_kind("PackParam", &legacy), Some(CommandKind::PackParam));
    }

    #[test]
    fn test_var_and_bit_size() {
        let a = args("%Dest%,Dest,32,31");
        assert!(var(&a, 0).is_ok());
        assert_eq!(var(&a, 1).unwrap_err(), ParseError::InvalidVariable("Dest".to_string()));
        assert!(bit_size(&a, 2).is_ok());
        assert!(bit_size(&a, 0).is_ok());
        assert_eq!(bit_size(&a, 3).unwrap_err(), ParseError::InvalidBitSize("31".to_string()));
    }
}
