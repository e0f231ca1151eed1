use crate::command::keyword::keyword_enum;

keyword_enum! {
    /// Tag identifying which grammar and payload a command uses.
    pub enum CommandKind: "CodeType" {
        // Pseudo kinds
        None,
        Error,
        Comment,

        // File
        FileCopy,
        FileDelete,
        FileRename,
        FileMove,
        FileCreateBlank,
        FileSize,
        FileVersion,
        DirCopy,
        DirDelete,
        DirMove,
        DirMake,
        DirSize,
        PathMove,

        // Registry
        RegHiveLoad,
        RegHiveUnload,
        RegRead,
        RegWrite,
        RegWriteEx,
        RegWriteLegacy,
        RegDelete,
        RegMulti,
        RegImport,
        RegExport,
        RegCopy,

        // Text
        TXTAddLine,
        TXTAddLineOp,
        TXTReplace,
        TXTReplaceOp,
        TXTDelLine,
        TXTDelLineOp,
        TXTDelSpaces,
        TXTDelEmptyLines,

        // Ini
        IniRead,
        IniReadOp,
        IniWrite,
        IniWriteOp,
        IniDelete,
        IniDeleteOp,
        IniReadSection,
        IniReadSectionOp,
        IniAddSection,
        IniAddSectionOp,
        IniDeleteSection,
        IniDeleteSectionOp,
        IniWriteTextLine,
        IniWriteTextLineOp,
        IniMerge,
        IniCompact,

        // Wim
        WimMount,
        WimUnmount,
        WimInfo,
        WimApply,
        WimExtract,
        WimExtractOp,
        WimExtractBulk,
        WimCapture,
        WimAppend,
        WimDelete,
        WimPathAdd,
        WimPathDelete,
        WimPathRename,
        WimPathOp,
        WimOptimize,
        WimExport,

        // Archive
        Compress,
        Decompress,
        Expand,
        CopyOrExpand,

        // Network
        WebGet,
        WebGetIfNotExist,

        // Hash
        Hash,

        // Script
        ExtractFile,
        ExtractAndRun,
        ExtractAllFiles,
        Encode,

        // Interface
        Visible,
        VisibleOp,
        ReadInterface,
        ReadInterfaceOp,
        WriteInterface,
        WriteInterfaceOp,
        Message,
        Echo,
        EchoFile,
        UserInput,
        AddInterface,
        Retrieve,

        // String, math, list
        StrFormat,
        Math,
        List,

        // Branch
        Run,
        RunEx,
        Exec,
        Loop,
        LoopEx,
        LoopLetter,
        LoopLetterEx,
        If,
        Else,
        Begin,
        End,

        // Control
        Set,
        SetMacro,
        AddVariables,
        Exit,
        Halt,
        Wait,
        Beep,
        GetParam,
        PackParam,

        // System
        System,
        ShellExecute,
        ShellExecuteEx,
        ShellExecuteDelete,

        // Debug
        Debug,

        // External macro
        Macro,
    }
}

impl CommandKind {
    /// Kinds kept only so old scripts still parse.
    pub fn is_deprecated(self) -> bool {
        matches!(
            self,
            CommandKind::WebGetIfNotExist
                | CommandKind::GetParam
                | CommandKind::PackParam
                | CommandKind::Retrieve
                | CommandKind::RegWriteLegacy
                | CommandKind::Visible
        )
    }

    /// Kinds synthesized by the optimizer, never by the grammar.
    pub fn is_batch(self) -> bool {
        matches!(
            self,
            CommandKind::TXTAddLineOp
                | CommandKind::TXTReplaceOp
                | CommandKind::TXTDelLineOp
                | CommandKind::IniReadOp
                | CommandKind::IniWriteOp
                | CommandKind::IniDeleteOp
                | CommandKind::IniReadSectionOp
                | CommandKind::IniAddSectionOp
                | CommandKind::IniDeleteSectionOp
                | CommandKind::IniWriteTextLineOp
                | CommandKind::VisibleOp
                | CommandKind::ReadInterfaceOp
                | CommandKind::WriteInterfaceOp
                | CommandKind::WimExtractOp
                | CommandKind::WimPathOp
        )
    }

    /// Kinds that never come from a source token directly.
    pub fn is_pseudo(self) -> bool {
        matches!(
            self,
            CommandKind::None | CommandKind::Error | CommandKind::Comment | CommandKind::Macro
        )
    }

    /// Batched kind a run of `self` commands is packed into.
    pub fn batch_kind(self) -> Option<CommandKind> {
        let kind = match self {
            CommandKind::TXTAddLine => CommandKind::TXTAddLineOp,
            CommandKind::TXTReplace => CommandKind::TXTReplaceOp,
            CommandKind::TXTDelLine => CommandKind::TXTDelLineOp,
            CommandKind::IniRead => CommandKind::IniReadOp,
            CommandKind::IniWrite => CommandKind::IniWriteOp,
            CommandKind::IniDelete => CommandKind::IniDeleteOp,
            CommandKind::IniReadSection => CommandKind::IniReadSectionOp,
            CommandKind::IniAddSection => CommandKind::IniAddSectionOp,
            CommandKind::IniDeleteSection => CommandKind::IniDeleteSectionOp,
            CommandKind::IniWriteTextLine => CommandKind::IniWriteTextLineOp,
            CommandKind::Visible => CommandKind::VisibleOp,
            CommandKind::ReadInterface => CommandKind::ReadInterfaceOp,
            CommandKind::WriteInterface => CommandKind::WriteInterfaceOp,
            CommandKind::WimExtract => CommandKind::WimExtractOp,
            CommandKind::WimPathAdd | CommandKind::WimPathDelete | CommandKind::WimPathRename => {
                CommandKind::WimPathOp
            }
            _ => return None,
        };
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::keyword::Keyword;

    #[test]
    fn test_lookup_kind() {
        assert_eq!(CommandKind::lookup("txtaddline"), Some(CommandKind::TXTAddLine));
        assert_eq!(CommandKind::lookup("FILECOPY"), Some(CommandKind::FileCopy));
        assert_eq!(CommandKind::lookup("NoSuchCommand"), None);
    }

    #[test]
    fn test_batch_kinds_are_closed_over_batch_kind() {
        for kind in CommandKind::ALL {
            if let Some(batch) = kind.batch_kind() {
                assert!(batch.is_batch(), "{} packs into non-batch {}", kind, batch);
            }
        }
        let batch_count = CommandKind::ALL.iter().filter(|k| k.is_batch()).count();
        assert_eq!(batch_count, 15);
    }

    #[test]
    fn test_deprecated_kinds() {
        assert!(CommandKind::Retrieve.is_deprecated());
        assert!(CommandKind::Visible.is_deprecated());
        assert!(!CommandKind::FileCopy.is_deprecated());
    }
}
