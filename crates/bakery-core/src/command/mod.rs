//! The command model.
//!
//! A [`Command`] is one statement of a section: its raw text, where it came
//! from, and a typed [`Payload`]. The [`CommandKind`] is derived from the
//! payload, so the two cannot disagree.

pub mod compound;
pub mod keyword;
mod kind;
pub mod payload;

use std::sync::Arc;

use serde::Serialize;

use crate::section::SectionRef;

pub use self::kind::CommandKind;
pub use self::payload::Payload;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    /// Source text, continuation lines joined with `\n`.
    pub raw: String,
    #[serde(skip)]
    pub section: Arc<SectionRef>,
    /// 1-based physical line of the first source line.
    pub line: usize,
    pub payload: Payload,
    /// Migration hint for commands kept only for old scripts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl Command {
    pub fn new(raw: impl Into<String>, section: Arc<SectionRef>, line: usize, payload: Payload) -> Self {
        Self { raw: raw.into(), section, line, payload, deprecated: None }
    }

    /// An `Error` command carrying `message`.
    pub fn error(raw: impl Into<String>, section: Arc<SectionRef>, line: usize, message: impl Into<String>) -> Self {
        let info = payload::ErrorInfo { message: message.into() };
        Self::new(raw, section, line, Payload::Error(info))
    }

    pub fn kind(&self) -> CommandKind {
        self.payload.kind()
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, Payload::Error(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.payload, Payload::Comment)
    }

    /// Message of an `Error` command.
    pub fn error_message(&self) -> Option<&str> {
        match &self.payload {
            Payload::Error(info) => Some(&info.message),
            _ => None,
        }
    }

    /// Resolved body of an `If` or `Else`.
    pub fn link(&self) -> Option<&[Command]> {
        match &self.payload {
            Payload::If(info) => Some(&info.link),
            Payload::Else(info) => Some(&info.link),
            _ => None,
        }
    }

    pub(crate) fn link_mut(&mut self) -> Option<&mut Vec<Command>> {
        match &mut self.payload {
            Payload::If(info) => Some(&mut info.link),
            Payload::Else(info) => Some(&mut info.link),
            _ => None,
        }
    }

    /// Original commands of a batched command.
    pub fn batched(&self) -> Option<&[Command]> {
        match &self.payload {
            Payload::TXTAddLineOp(b)
            | Payload::TXTReplaceOp(b)
            | Payload::TXTDelLineOp(b)
            | Payload::IniReadOp(b)
            | Payload::IniWriteOp(b)
            | Payload::IniDeleteOp(b)
            | Payload::IniReadSectionOp(b)
            | Payload::IniAddSectionOp(b)
            | Payload::IniDeleteSectionOp(b)
            | Payload::IniWriteTextLineOp(b)
            | Payload::VisibleOp(b)
            | Payload::ReadInterfaceOp(b)
            | Payload::WriteInterfaceOp(b)
            | Payload::WimExtractOp(b)
            | Payload::WimPathOp(b) => Some(&b.cmds),
            _ => None,
        }
    }
}

impl Payload {
    pub fn kind(&self) -> CommandKind {
        use CommandKind as K;

        match self {
            Payload::None => K::None,
            Payload::Comment => K::Comment,
            Payload::Error(_) => K::Error,
            Payload::Macro(_) => K::Macro,

            Payload::FileCopy(_) => K::FileCopy,
            Payload::FileDelete(_) => K::FileDelete,
            Payload::FileRename(_) => K::FileRename,
            Payload::FileMove(_) => K::FileMove,
            Payload::FileCreateBlank(_) => K::FileCreateBlank,
            Payload::FileSize(_) => K::FileSize,
            Payload::FileVersion(_) => K::FileVersion,
            Payload::DirCopy(_) => K::DirCopy,
            Payload::DirDelete(_) => K::DirDelete,
            Payload::DirMove(_) => K::DirMove,
            Payload::DirMake(_) => K::DirMake,
            Payload::DirSize(_) => K::DirSize,
            Payload::PathMove(_) => K::PathMove,

            Payload::RegHiveLoad(_) => K::RegHiveLoad,
            Payload::RegHiveUnload(_) => K::RegHiveUnload,
            Payload::RegRead(_) => K::RegRead,
            Payload::RegWrite(_) => K::RegWrite,
            Payload::RegWriteEx(_) => K::RegWriteEx,
            Payload::RegWriteLegacy(_) => K::RegWriteLegacy,
            Payload::RegDelete(_) => K::RegDelete,
            Payload::RegMulti(_) => K::RegMulti,
            Payload::RegImport(_) => K::RegImport,
            Payload::RegExport(_) => K::RegExport,
            Payload::RegCopy(_) => K::RegCopy,

            Payload::TXTAddLine(_) => K::TXTAddLine,
            Payload::TXTAddLineOp(_) => K::TXTAddLineOp,
            Payload::TXTReplace(_) => K::TXTReplace,
            Payload::TXTReplaceOp(_) => K::TXTReplaceOp,
            Payload::TXTDelLine(_) => K::TXTDelLine,
            Payload::TXTDelLineOp(_) => K::TXTDelLineOp,
            Payload::TXTDelSpaces(_) => K::TXTDelSpaces,
            Payload::TXTDelEmptyLines(_) => K::TXTDelEmptyLines,

            Payload::IniRead(_) => K::IniRead,
            Payload::IniReadOp(_) => K::IniReadOp,
            Payload::IniWrite(_) => K::IniWrite,
            Payload::IniWriteOp(_) => K::IniWriteOp,
            Payload::IniDelete(_) => K::IniDelete,
            Payload::IniDeleteOp(_) => K::IniDeleteOp,
            Payload::IniReadSection(_) => K::IniReadSection,
            Payload::IniReadSectionOp(_) => K::IniReadSectionOp,
            Payload::IniAddSection(_) => K::IniAddSection,
            Payload::IniAddSectionOp(_) => K::IniAddSectionOp,
            Payload::IniDeleteSection(_) => K::IniDeleteSection,
            Payload::IniDeleteSectionOp(_) => K::IniDeleteSectionOp,
            Payload::IniWriteTextLine(_) => K::IniWriteTextLine,
            Payload::IniWriteTextLineOp(_) => K::IniWriteTextLineOp,
            Payload::IniMerge(_) => K::IniMerge,
            Payload::IniCompact(_) => K::IniCompact,

            Payload::WimMount(_) => K::WimMount,
            Payload::WimUnmount(_) => K::WimUnmount,
            Payload::WimInfo(_) => K::WimInfo,
            Payload::WimApply(_) => K::WimApply,
            Payload::WimExtract(_) => K::WimExtract,
            Payload::WimExtractOp(_) => K::WimExtractOp,
            Payload::WimExtractBulk(_) => K::WimExtractBulk,
            Payload::WimCapture(_) => K::WimCapture,
            Payload::WimAppend(_) => K::WimAppend,
            Payload::WimDelete(_) => K::WimDelete,
            Payload::WimPathAdd(_) => K::WimPathAdd,
            Payload::WimPathDelete(_) => K::WimPathDelete,
            Payload::WimPathRename(_) => K::WimPathRename,
            Payload::WimPathOp(_) => K::WimPathOp,
            Payload::WimOptimize(_) => K::WimOptimize,
            Payload::WimExport(_) => K::WimExport,

            Payload::Compress(_) => K::Compress,
            Payload::Decompress(_) => K::Decompress,
            Payload::Expand(_) => K::Expand,
            Payload::CopyOrExpand(_) => K::CopyOrExpand,

            Payload::WebGet(_) => K::WebGet,
            Payload::WebGetIfNotExist(_) => K::WebGetIfNotExist,
            Payload::Hash(_) => K::Hash,

            Payload::ExtractFile(_) => K::ExtractFile,
            Payload::ExtractAndRun(_) => K::ExtractAndRun,
            Payload::ExtractAllFiles(_) => K::ExtractAllFiles,
            Payload::Encode(_) => K::Encode,

            Payload::Visible(_) => K::Visible,
            Payload::VisibleOp(_) => K::VisibleOp,
            Payload::ReadInterface(_) => K::ReadInterface,
            Payload::ReadInterfaceOp(_) => K::ReadInterfaceOp,
            Payload::WriteInterface(_) => K::WriteInterface,
            Payload::WriteInterfaceOp(_) => K::WriteInterfaceOp,
            Payload::Message(_) => K::Message,
            Payload::Echo(_) => K::Echo,
            Payload::EchoFile(_) => K::EchoFile,
            Payload::UserInput(_) => K::UserInput,
            Payload::AddInterface(_) => K::AddInterface,

            Payload::StrFormat(_) => K::StrFormat,
            Payload::Math(_) => K::Math,
            Payload::List(_) => K::List,

            Payload::Run(_) => K::Run,
            Payload::RunEx(_) => K::RunEx,
            Payload::Exec(_) => K::Exec,
            Payload::Loop(_) => K::Loop,
            Payload::LoopEx(_) => K::LoopEx,
            Payload::LoopLetter(_) => K::LoopLetter,
            Payload::LoopLetterEx(_) => K::LoopLetterEx,
            Payload::If(_) => K::If,
            Payload::Else(_) => K::Else,
            Payload::Begin => K::Begin,
            Payload::End => K::End,

            Payload::Set(_) => K::Set,
            Payload::SetMacro(_) => K::SetMacro,
            Payload::AddVariables(_) => K::AddVariables,
            Payload::Exit(_) => K::Exit,
            Payload::Halt(_) => K::Halt,
            Payload::Wait(_) => K::Wait,
            Payload::Beep(_) => K::Beep,
            Payload::GetParam(_) => K::GetParam,
            Payload::PackParam(_) => K::PackParam,

            Payload::System(_) => K::System,
            Payload::ShellExecute(_) => K::ShellExecute,
            Payload::ShellExecuteEx(_) => K::ShellExecuteEx,
            Payload::ShellExecuteDelete(_) => K::ShellExecuteDelete,

            Payload::Debug(_) => K::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::payload::{Batch, Echo};

    fn echo(text: &str, line: usize) -> Command {
        let payload = Payload::Echo(Echo { message: text.to_string(), warn: false });
        Command::new(format!("Echo,{}", text), Arc::new(SectionRef::detached()), line, payload)
    }

    #[test]
    fn test_kind_follows_payload() {
        assert_eq!(echo("A", 1).kind(), CommandKind::Echo);
        let err = Command::error("Bad", Arc::new(SectionRef::detached()), 2, "broken");
        assert_eq!(err.kind(), CommandKind::Error);
        assert_eq!(err.error_message(), Some("broken"));
        assert!(err.is_error());
    }

    #[test]
    fn test_batched_accessor() {
        let batch = Payload::IniWriteOp(Batch { cmds: vec![echo("A", 1), echo("B", 2)] });
        let cmd = Command::new("x", Arc::new(SectionRef::detached()), 1, batch);
        assert_eq!(cmd.kind(), CommandKind::IniWriteOp);
        assert_eq!(cmd.batched().map(|c| c.len()), Some(2));
        assert!(echo("A", 1).batched().is_none());
    }

    #[test]
    fn test_serialize_command() {
        let json = serde_json::to_value(echo("Hello", 3)).unwrap();
        assert_eq!(json["line"], 3);
        assert_eq!(json["payload"]["kind"], "Echo");
        assert_eq!(json["payload"]["args"]["message"], "Hello");
        assert!(json.get("deprecated").is_none());
    }
}
