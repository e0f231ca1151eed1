//! Payloads of the command families that dispatch on a sub-kind token:
//! `StrFormat`, `Math`, `List`, `System`, `UserInput` and `Debug`.

use serde::Serialize;

use crate::command::keyword::keyword_enum;
use crate::command::Command;
use crate::condition::BranchCondition;

// ---------------------------------------------------------------------------
// StrFormat
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum StrFormatType: "StrFormatType" {
        IntToBytes | "Bytes",
        BytesToInt,
        Hex,
        Ceil,
        Floor,
        Round,
        Date,
        FileName,
        DirPath,
        Path,
        Ext,
        PathCombine,
        Inc,
        Dec,
        Mult,
        Div,
        Left,
        Right,
        Mid | "SubStr",
        Len,
        LTrim,
        RTrim,
        CTrim,
        NTrim,
        UCase,
        LCase,
        Pos,
        PosX,
        Replace,
        ReplaceX,
        ShortPath,
        LongPath,
        Split,
        PadLeft,
        PadRight,
    }
}

/// `StrFormat,<Type>,...`
///
/// Families sharing one argument layout carry the sub-kind in `op`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum StrFormat {
    IntToBytes { integer: String, dest_var: String },
    BytesToInt { human_readable: String, dest_var: String },
    Hex { integer: String, dest_var: String },
    /// `Ceil`, `Floor`, `Round`: the variable is rounded in place.
    CeilFloorRound { op: StrFormatType, size_var: String, unit: String },
    /// `format` is already converted to the executor's pattern syntax.
    Date { dest_var: String, format: String },
    /// `FileName`, `DirPath`, `Path`, `Ext`.
    PathPart { op: StrFormatType, file_path: String, dest_var: String },
    PathCombine { dir_path: String, file_name: String, dest_var: String },
    /// `Inc`, `Dec`, `Mult`, `Div`: the variable is updated in place.
    Arithmetic { op: StrFormatType, dest_var: String, operand: String },
    /// `Left`, `Right`.
    LeftRight { op: StrFormatType, src: String, count: String, dest_var: String },
    Mid { src: String, start: String, length: String, dest_var: String },
    Len { src: String, dest_var: String },
    /// `LTrim`, `RTrim`, `CTrim`.
    Trim { op: StrFormatType, src: String, to_trim: String, dest_var: String },
    NTrim { src: String, dest_var: String },
    /// `UCase`, `LCase`.
    Case { op: StrFormatType, src: String, dest_var: String },
    /// `Pos`, `PosX`.
    Pos { op: StrFormatType, src: String, sub_str: String, dest_var: String },
    /// `Replace`, `ReplaceX`.
    Replace { op: StrFormatType, src: String, to_be_replaced: String, replace_with: String, dest_var: String },
    /// `ShortPath`, `LongPath`.
    ShortLongPath { op: StrFormatType, src: String, dest_var: String },
    Split { src: String, delimiter: String, index: String, dest_var: String },
    /// `PadLeft`, `PadRight`.
    Pad { op: StrFormatType, src: String, count: String, pad_char: String, dest_var: String },
}

impl StrFormat {
    pub fn format_type(&self) -> StrFormatType {
        match self {
            StrFormat::IntToBytes { .. } => StrFormatType::IntToBytes,
            StrFormat::BytesToInt { .. } => StrFormatType::BytesToInt,
            StrFormat::Hex { .. } => StrFormatType::Hex,
            StrFormat::Date { .. } => StrFormatType::Date,
            StrFormat::PathCombine { .. } => StrFormatType::PathCombine,
            StrFormat::Mid { .. } => StrFormatType::Mid,
            StrFormat::Len { .. } => StrFormatType::Len,
            StrFormat::NTrim { .. } => StrFormatType::NTrim,
            StrFormat::Split { .. } => StrFormatType::Split,
            StrFormat::CeilFloorRound { op, .. }
            | StrFormat::PathPart { op, .. }
            | StrFormat::Arithmetic { op, .. }
            | StrFormat::LeftRight { op, .. }
            | StrFormat::Trim { op, .. }
            | StrFormat::Case { op, .. }
            | StrFormat::Pos { op, .. }
            | StrFormat::Replace { op, .. }
            | StrFormat::ShortLongPath { op, .. }
            | StrFormat::Pad { op, .. } => *op,
        }
    }

    /// Variable the sub-command assigns.
    pub fn dest_var(&self) -> &str {
        match self {
            StrFormat::CeilFloorRound { size_var, .. } => size_var,
            StrFormat::IntToBytes { dest_var, .. }
            | StrFormat::BytesToInt { dest_var, .. }
            | StrFormat::Hex { dest_var, .. }
            | StrFormat::Date { dest_var, .. }
            | StrFormat::PathPart { dest_var, .. }
            | StrFormat::PathCombine { dest_var, .. }
            | StrFormat::Arithmetic { dest_var, .. }
            | StrFormat::LeftRight { dest_var, .. }
            | StrFormat::Mid { dest_var, .. }
            | StrFormat::Len { dest_var, .. }
            | StrFormat::Trim { dest_var, .. }
            | StrFormat::NTrim { dest_var, .. }
            | StrFormat::Case { dest_var, .. }
            | StrFormat::Pos { dest_var, .. }
            | StrFormat::Replace { dest_var, .. }
            | StrFormat::ShortLongPath { dest_var, .. }
            | StrFormat::Split { dest_var, .. }
            | StrFormat::Pad { dest_var, .. } => dest_var,
        }
    }
}

// ---------------------------------------------------------------------------
// Math
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum MathType: "MathType" {
        Add,
        Sub,
        Mul,
        Div,
        IntDiv,
        Neg,
        ToSign,
        ToUnsign,
        BoolAnd,
        BoolOr,
        BoolXor,
        BoolNot,
        BitAnd,
        BitOr,
        BitXor,
        BitNot,
        BitShift,
        Ceil,
        Floor,
        Round,
        Abs,
        Pow,
        Hex,
        Dec,
        Rand,
    }
}

/// `Math,<Type>,...`
///
/// Bit sizes are either a variable or one of 8, 16, 32 and 64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Math {
    /// `Add`, `Sub`, `Mul`, `Div`.
    Arithmetic { op: MathType, dest_var: String, src1: String, src2: String },
    IntDiv { quotient_var: String, remainder_var: String, src1: String, src2: String },
    Neg { dest_var: String, src: String },
    /// `ToSign`, `ToUnsign`.
    IntegerSignedness { op: MathType, dest_var: String, src: String, bit_size: String },
    /// `BoolAnd`, `BoolOr`, `BoolXor`.
    BoolLogic { op: MathType, dest_var: String, src1: String, src2: String },
    BoolNot { dest_var: String, src: String },
    /// `BitAnd`, `BitOr`, `BitXor`.
    BitLogic { op: MathType, dest_var: String, src1: String, src2: String },
    BitNot { dest_var: String, src: String, bit_size: String },
    BitShift { dest_var: String, src: String, direction: String, shift: String, bit_size: String, unsigned: bool },
    /// `Ceil`, `Floor`, `Round`.
    CeilFloorRound { op: MathType, dest_var: String, src: String, unit: String },
    Abs { dest_var: String, src: String },
    Pow { dest_var: String, base: String, power: String },
    /// `Hex`, `Dec`.
    HexDec { op: MathType, dest_var: String, src: String, bit_size: String },
    Rand { dest_var: String, min: Option<String>, max: Option<String> },
}

impl Math {
    /// Variables the sub-command assigns.
    pub fn dest_vars(&self) -> Vec<&str> {
        match self {
            Math::IntDiv { quotient_var, remainder_var, .. } => vec![quotient_var.as_str(), remainder_var.as_str()],
            Math::Arithmetic { dest_var, .. }
            | Math::Neg { dest_var, .. }
            | Math::IntegerSignedness { dest_var, .. }
            | Math::BoolLogic { dest_var, .. }
            | Math::BoolNot { dest_var, .. }
            | Math::BitLogic { dest_var, .. }
            | Math::BitNot { dest_var, .. }
            | Math::BitShift { dest_var, .. }
            | Math::CeilFloorRound { dest_var, .. }
            | Math::Abs { dest_var, .. }
            | Math::Pow { dest_var, .. }
            | Math::HexDec { dest_var, .. }
            | Math::Rand { dest_var, .. } => vec![dest_var.as_str()],
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum ListType: "ListType" {
        Get,
        Set,
        Append,
        Insert,
        Remove,
        RemoveX,
        RemoveAt,
        Count,
        Pos,
        PosX,
        LastPos,
        LastPosX,
        Sort,
        SortX,
        SortN,
        SortNX,
    }
}

/// `List,<Type>,<ListVar>,...[,Delim=<Str>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub list_var: String,
    pub op: ListOp,
    pub delim: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ListOp {
    Get { index: String, dest_var: String },
    Set { index: String, item: String },
    Append { item: String },
    Insert { index: String, item: String },
    /// `Remove`, `RemoveX`.
    Remove { op: ListType, item: String },
    RemoveAt { index: String },
    Count { dest_var: String },
    /// `Pos`, `PosX`, `LastPos`, `LastPosX`.
    Pos { op: ListType, item: String, dest_var: String },
    /// `Sort`, `SortX`, `SortN`, `SortNX`.
    Sort { op: ListType, order: String },
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum SystemType: "SystemType" {
        Cursor,
        ErrorOff,
        GetEnv,
        GetFreeDrive,
        GetFreeSpace,
        IsAdmin,
        OnBuildExit,
        OnScriptExit,
        RefreshInterface,
        RefreshAllScripts,
        RescanScripts,
        LoadNewScript,
        RefreshScript,
        SaveLog,
        SetLocal,
        EndLocal,
        // Deprecated
        HasUAC,
        FileRedirect,
        RegRedirect,
        RebuildVars,
    }
}

/// `System,<Type>,...`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum System {
    Cursor { state: String },
    ErrorOff { lines: Option<String> },
    GetEnv { env_var: String, dest_var: String },
    GetFreeDrive { dest_var: String },
    GetFreeSpace { path: String, dest_var: String },
    IsAdmin { dest_var: String },
    OnBuildExit { command: Box<Command> },
    OnScriptExit { command: Box<Command> },
    RefreshInterface,
    RefreshAllScripts,
    RescanScripts,
    LoadNewScript { src_file: String, dest_tree_dir: String, preserve: bool, no_warn: bool, no_rec: bool },
    RefreshScript { file_path: String, no_rec: bool },
    SaveLog { dest_path: String, log_format: Option<String> },
    SetLocal,
    EndLocal,
    HasUAC { dest_var: String },
    FileRedirect,
    RegRedirect,
    RebuildVars,
}

impl System {
    /// Command run when the build or script exits, if any.
    pub fn embedded(&self) -> Option<&Command> {
        match self {
            System::OnBuildExit { command } | System::OnScriptExit { command } => Some(&**command),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// UserInput and Debug
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum UserInputType: "UserInputType" {
        DirPath,
        FilePath,
    }
}

/// `UserInput,<DirPath|FilePath>,<InitPath>,<DestVar>,[Title=],[Filter=]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum UserInput {
    DirPath { init_path: String, dest_var: String, title: Option<String> },
    FilePath { init_path: String, dest_var: String, title: Option<String>, filter: Option<String> },
}

keyword_enum! {
    pub enum DebugType: "DebugType" {
        Breakpoint,
    }
}

/// `Debug,Breakpoint,[BranchCondition]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DebugInfo {
    Breakpoint { condition: Option<BranchCondition> },
}
