//! Typed payloads, one variant per command kind.

use serde::Serialize;

use crate::command::compound::{DebugInfo, List, Math, StrFormat, System, UserInput};
use crate::command::keyword::keyword_enum;
use crate::command::Command;
use crate::condition::BranchCondition;

/// Kind-specific arguments of a [`Command`].
///
/// The command kind is derived from the variant, so a payload can never
/// disagree with its tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "args")]
pub enum Payload {
    None,
    Comment,
    Error(ErrorInfo),
    Macro(MacroCall),

    // File
    FileCopy(FileCopy),
    FileDelete(FileDelete),
    FileRename(SrcDest),
    FileMove(SrcDest),
    FileCreateBlank(FileCreateBlank),
    FileSize(PathToVar),
    FileVersion(PathToVar),
    DirCopy(SrcDest),
    DirDelete(PathOnly),
    DirMove(SrcDest),
    DirMake(PathOnly),
    DirSize(PathToVar),
    PathMove(SrcDest),

    // Registry
    RegHiveLoad(RegHiveLoad),
    RegHiveUnload(RegHiveUnload),
    RegRead(RegRead),
    RegWrite(RegWrite),
    RegWriteEx(RegWrite),
    RegWriteLegacy(RegWriteLegacy),
    RegDelete(RegDelete),
    RegMulti(RegMulti),
    RegImport(RegImport),
    RegExport(RegExport),
    RegCopy(RegCopy),

    // Text
    TXTAddLine(TxtAddLine),
    TXTAddLineOp(Batch),
    TXTReplace(TxtReplace),
    TXTReplaceOp(Batch),
    TXTDelLine(TxtDelLine),
    TXTDelLineOp(Batch),
    TXTDelSpaces(FileOnly),
    TXTDelEmptyLines(FileOnly),

    // Ini
    IniRead(IniRead),
    IniReadOp(Batch),
    IniWrite(IniWrite),
    IniWriteOp(Batch),
    IniDelete(IniDelete),
    IniDeleteOp(Batch),
    IniReadSection(IniReadSection),
    IniReadSectionOp(Batch),
    IniAddSection(IniSection),
    IniAddSectionOp(Batch),
    IniDeleteSection(IniSection),
    IniDeleteSectionOp(Batch),
    IniWriteTextLine(IniWriteTextLine),
    IniWriteTextLineOp(Batch),
    IniMerge(SrcDest),
    IniCompact(FileOnly),

    // Wim
    WimMount(WimMount),
    WimUnmount(WimUnmount),
    WimInfo(WimInfo),
    WimApply(WimApply),
    WimExtract(WimExtract),
    WimExtractOp(Batch),
    WimExtractBulk(WimExtractBulk),
    WimCapture(WimCapture),
    WimAppend(WimAppend),
    WimDelete(WimDelete),
    WimPathAdd(WimPathAdd),
    WimPathDelete(WimPathDelete),
    WimPathRename(WimPathRename),
    WimPathOp(Batch),
    WimOptimize(WimOptimize),
    WimExport(WimExport),

    // Archive
    Compress(Compress),
    Decompress(Decompress),
    Expand(Expand),
    CopyOrExpand(CopyOrExpand),

    // Network
    WebGet(WebGet),
    WebGetIfNotExist(WebGet),

    // Hash
    Hash(Hash),

    // Script
    ExtractFile(ExtractFile),
    ExtractAndRun(ExtractAndRun),
    ExtractAllFiles(ExtractAllFiles),
    Encode(Encode),

    // Interface
    Visible(Visible),
    VisibleOp(Batch),
    ReadInterface(ReadInterface),
    ReadInterfaceOp(Batch),
    WriteInterface(WriteInterface),
    WriteInterfaceOp(Batch),
    Message(Message),
    Echo(Echo),
    EchoFile(EchoFile),
    UserInput(UserInput),
    AddInterface(AddInterface),

    // String, math, list
    StrFormat(StrFormat),
    Math(Math),
    List(List),

    // Branch
    Run(Run),
    RunEx(Run),
    Exec(Run),
    Loop(Loop),
    LoopEx(Loop),
    LoopLetter(Loop),
    LoopLetterEx(Loop),
    If(If),
    Else(Else),
    Begin,
    End,

    // Control
    Set(SetVariable),
    SetMacro(SetVariable),
    AddVariables(AddVariables),
    Exit(Exit),
    Halt(Halt),
    Wait(Wait),
    Beep(Beep),
    GetParam(GetParam),
    PackParam(PackParam),

    // System
    System(System),
    ShellExecute(ShellExecute),
    ShellExecuteEx(ShellExecute),
    ShellExecuteDelete(ShellExecute),

    // Debug
    Debug(DebugInfo),
}

// ---------------------------------------------------------------------------
// Pseudo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// Invocation of a macro defined elsewhere in the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroCall {
    pub name: String,
    pub args: Vec<String>,
}

/// Commands merged by the optimizer, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub cmds: Vec<Command>,
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrcDest {
    pub src: String,
    pub dest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathOnly {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOnly {
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathToVar {
    pub path: String,
    pub dest_var: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCopy {
    pub src: String,
    pub dest: String,
    pub preserve: bool,
    pub no_warn: bool,
    pub no_rec: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDelete {
    pub path: String,
    pub no_warn: bool,
    pub no_rec: bool,
}

keyword_enum! {
    #[allow(clippy::upper_case_acronyms)]
    pub enum TextEncoding: "Encoding" {
        UTF8,
        UTF16 | "UTF16LE",
        UTF16BE,
        ANSI,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCreateBlank {
    pub path: String,
    pub preserve: bool,
    pub no_warn: bool,
    pub encoding: Option<TextEncoding>,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum Hive: "HKey" {
        ClassesRoot | "HKCR" | "HKEY_CLASSES_ROOT",
        CurrentUser | "HKCU" | "HKEY_CURRENT_USER",
        LocalMachine | "HKLM" | "HKEY_LOCAL_MACHINE",
        Users | "HKU" | "HKEY_USERS",
        CurrentConfig | "HKCC" | "HKEY_CURRENT_CONFIG",
    }
}

/// Root key of a registry command; unresolved roots are left to the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RegRoot {
    Known(Hive),
    Unresolved(String),
}

/// Registry value kind, by its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegValueType {
    None,
    String,
    ExpandString,
    Binary,
    DWord,
    MultiString,
    QWord,
    /// Any other code, only accepted by `RegWriteEx`.
    Unknown(u32),
}

impl RegValueType {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => RegValueType::None,
            1 => RegValueType::String,
            2 => RegValueType::ExpandString,
            3 => RegValueType::Binary,
            4 => RegValueType::DWord,
            7 => RegValueType::MultiString,
            11 => RegValueType::QWord,
            other => RegValueType::Unknown(other),
        }
    }
}

/// Data written by `RegWrite`, shaped by the value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RegData {
    Empty,
    Single(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegHiveLoad {
    pub key_path: String,
    pub hive_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegHiveUnload {
    pub key_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegRead {
    pub root: RegRoot,
    pub key_path: String,
    pub value_name: String,
    pub dest_var: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegWrite {
    pub hive: Hive,
    pub value_type: RegValueType,
    pub key_path: String,
    pub value_name: Option<String>,
    pub data: RegData,
    pub no_warn: bool,
}

/// Free-form `RegWrite` whose hive and type are only known at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegWriteLegacy {
    pub hive: String,
    pub value_type: String,
    pub key_path: String,
    pub value_name: Option<String>,
    pub data: Option<Vec<String>>,
    pub no_warn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegDelete {
    pub root: RegRoot,
    pub key_path: String,
    pub value_name: Option<String>,
}

keyword_enum! {
    pub enum RegMultiType: "RegMultiType" {
        Append,
        Prepend,
        Before,
        Behind,
        Place,
        Delete,
        Index,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegMulti {
    pub root: RegRoot,
    pub key_path: String,
    pub value_name: String,
    pub action: RegMultiType,
    pub arg1: String,
    pub arg2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegImport {
    pub reg_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegExport {
    pub root: RegRoot,
    pub key_path: String,
    pub reg_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegCopy {
    pub src_root: RegRoot,
    pub src_key_path: String,
    pub dest_root: RegRoot,
    pub dest_key_path: String,
    pub wildcard: bool,
}

// ---------------------------------------------------------------------------
// Text and ini
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxtAddLine {
    pub file: String,
    pub line: String,
    /// `Prepend`, `Append` or a variable resolved at run time.
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxtReplace {
    pub file: String,
    pub old_str: String,
    pub new_str: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxtDelLine {
    pub file: String,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IniRead {
    pub file: String,
    pub section: String,
    pub key: String,
    pub dest_var: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IniWrite {
    pub file: String,
    pub section: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IniDelete {
    pub file: String,
    pub section: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IniReadSection {
    pub file: String,
    pub section: String,
    pub dest_var: String,
    pub delim: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IniSection {
    pub file: String,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IniWriteTextLine {
    pub file: String,
    pub section: String,
    pub line: String,
    pub append: bool,
}

// ---------------------------------------------------------------------------
// Wim
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum WimMountMode: "MountOption" {
        ReadOnly,
        ReadWrite,
    }
}

keyword_enum! {
    pub enum WimUnmountMode: "UnmountOption" {
        Discard,
        Commit,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimMount {
    pub src_wim: String,
    pub image_index: String,
    pub mount_dir: String,
    pub mode: WimMountMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimUnmount {
    pub mount_dir: String,
    pub mode: WimUnmountMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimInfo {
    pub src_wim: String,
    pub image_index: String,
    pub key: String,
    pub dest_var: String,
    pub no_err: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimApply {
    pub src_wim: String,
    pub image_index: String,
    pub dest_dir: String,
    pub split: Option<String>,
    pub check: bool,
    pub no_acl: bool,
    pub no_attrib: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimExtract {
    pub src_wim: String,
    pub image_index: String,
    pub extract_path: String,
    pub dest_dir: String,
    pub split: Option<String>,
    pub check: bool,
    pub no_acl: bool,
    pub no_attrib: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimExtractBulk {
    pub src_wim: String,
    pub image_index: String,
    pub list_file: String,
    pub dest_dir: String,
    pub split: Option<String>,
    pub check: bool,
    pub no_acl: bool,
    pub no_attrib: bool,
    pub no_err: bool,
    pub no_warn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimCapture {
    pub src_dir: String,
    pub dest_wim: String,
    pub compress: String,
    pub image_name: Option<String>,
    pub image_desc: Option<String>,
    pub wim_flags: Option<String>,
    pub boot: bool,
    pub check: bool,
    pub no_acl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimAppend {
    pub src_dir: String,
    pub dest_wim: String,
    pub image_name: Option<String>,
    pub image_desc: Option<String>,
    pub wim_flags: Option<String>,
    pub delta_index: Option<String>,
    pub boot: bool,
    pub check: bool,
    pub no_acl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimDelete {
    pub src_wim: String,
    pub image_index: String,
    pub check: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimPathAdd {
    pub wim_file: String,
    pub image_index: String,
    pub src_path: String,
    pub dest_path: String,
    pub check: bool,
    pub no_acl: bool,
    pub preserve: bool,
    pub rebuild: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimPathDelete {
    pub wim_file: String,
    pub image_index: String,
    pub path: String,
    pub check: bool,
    pub rebuild: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimPathRename {
    pub wim_file: String,
    pub image_index: String,
    pub src_path: String,
    pub dest_path: String,
    pub check: bool,
    pub rebuild: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimOptimize {
    pub wim_file: String,
    pub recompress: Option<String>,
    /// `Some(true)` for CHECK, `Some(false)` for NOCHECK.
    pub check: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WimExport {
    pub src_wim: String,
    pub image_index: String,
    pub dest_wim: String,
    pub image_name: Option<String>,
    pub image_desc: Option<String>,
    pub split: Option<String>,
    pub recompress: Option<String>,
    pub boot: bool,
    pub check: Option<bool>,
}

// ---------------------------------------------------------------------------
// Archive, network, hash, script
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum ArchiveFormat: "ArchiveFormat" {
        Zip,
        SevenZip | "7z",
    }
}

keyword_enum! {
    pub enum CompressLevel: "CompressLevel" {
        Store,
        Fastest,
        Normal,
        Best,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compress {
    pub format: ArchiveFormat,
    pub src: String,
    pub dest: String,
    pub level: Option<CompressLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decompress {
    pub src: String,
    pub dest_dir: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expand {
    pub src_cab: String,
    pub dest_dir: String,
    pub single_file: Option<String>,
    pub preserve: bool,
    pub no_warn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyOrExpand {
    pub src: String,
    pub dest: String,
    pub preserve: bool,
    pub no_warn: bool,
}

keyword_enum! {
    #[allow(clippy::upper_case_acronyms)]
    pub enum HashType: "HashType" {
        MD5,
        SHA1,
        SHA256,
        SHA384,
        SHA512,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashDigest {
    pub hash_type: HashType,
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebGet {
    pub url: String,
    pub dest: String,
    pub hash: Option<HashDigest>,
    pub timeout: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub no_err: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hash {
    pub hash_type: String,
    pub file_path: String,
    pub dest_var: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractFile {
    pub script_file: String,
    pub dir_name: String,
    pub file_name: String,
    pub dest_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractAndRun {
    pub script_file: String,
    pub dir_name: String,
    pub file_name: String,
    pub params: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractAllFiles {
    pub script_file: String,
    pub dir_name: String,
    pub dest_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encode {
    pub script_file: String,
    pub dir_name: String,
    pub file_path: String,
    pub compression: Option<String>,
}

// ---------------------------------------------------------------------------
// Interface
// ---------------------------------------------------------------------------

keyword_enum! {
    pub enum InterfaceElement: "InterfaceElement" {
        Text,
        Visible,
        PosX,
        PosY,
        Width,
        Height,
        Value,
        ToolTip,
        FontSize,
        FontWeight,
        FontStyle,
        NumberMin,
        NumberMax,
        NumberTick,
        Url,
        Resource,
        Items,
        SectionName,
        HideProgress,
    }
}

keyword_enum! {
    pub enum MessageAction: "MessageAction" {
        Information | "Info",
        Confirmation | "Confirm",
        Error,
        Warning | "Warn",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visible {
    /// Interface key with surrounding `%` removed.
    pub key: String,
    /// `True`, `False` or a variable.
    pub visibility: String,
    pub permanent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadInterface {
    pub element: InterfaceElement,
    pub script_file: String,
    pub section: String,
    pub key: String,
    pub dest_var: String,
    pub delim: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteInterface {
    pub element: InterfaceElement,
    pub script_file: String,
    pub section: String,
    pub key: String,
    pub value: String,
    pub delim: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
    pub action: MessageAction,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Echo {
    pub message: String,
    pub warn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoFile {
    pub src_file: String,
    pub warn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddInterface {
    pub script_file: String,
    pub section: String,
    pub prefix: String,
}

// ---------------------------------------------------------------------------
// Branch
// ---------------------------------------------------------------------------

/// `Run`, `Exec` and `RunEx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub script_file: String,
    pub section: String,
    pub in_params: Vec<String>,
    /// Only `RunEx` can bind out parameters.
    pub out_params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Loop {
    Break,
    Range(LoopRange),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopRange {
    pub script_file: String,
    pub section: String,
    pub start: String,
    pub end: String,
    pub in_params: Vec<String>,
    pub out_params: Vec<String>,
}

/// `If,<Condition>,<Command>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct If {
    pub condition: BranchCondition,
    pub embedded: Box<Command>,
    /// Body resolved by the block folder.
    pub link: Vec<Command>,
    /// Whether `link` already holds the resolved body.
    pub link_parsed: bool,
}

/// `Else,<Command>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Else {
    pub embedded: Box<Command>,
    pub link: Vec<Command>,
    pub link_parsed: bool,
}

// ---------------------------------------------------------------------------
// Control and system
// ---------------------------------------------------------------------------

/// `Set` and `SetMacro`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetVariable {
    pub key: String,
    pub value: String,
    pub global: bool,
    pub permanent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddVariables {
    pub script_file: String,
    pub section: String,
    pub global: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exit {
    pub message: Option<String>,
    pub no_warn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Halt {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wait {
    pub seconds: String,
}

keyword_enum! {
    pub enum BeepType: "BeepType" {
        Ok | "OK",
        Error,
        Asterisk,
        Confirmation,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Beep {
    pub beep_type: BeepType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetParam {
    pub index: String,
    pub dest_var: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackParam {
    pub start_index: String,
    pub dest_var: String,
    pub count_var: Option<String>,
}

/// `ShellExecute`, `ShellExecuteEx` and `ShellExecuteDelete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellExecute {
    pub action: String,
    pub file_path: String,
    pub params: Option<String>,
    pub work_dir: Option<String>,
    pub exit_out_var: Option<String>,
}
