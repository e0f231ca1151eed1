//! Archive, download, hash and embedded-file commands.

use crate::command::keyword::Keyword;
use crate::command::payload::{
    ArchiveFormat, Compress, CompressLevel, CopyOrExpand, Decompress, Encode, Expand, ExtractAllFiles,
    ExtractAndRun, ExtractFile, Hash, HashDigest, HashType, WebGet,
};
use crate::command::{CommandKind, Payload};
use crate::error::{Arity, ParseError};
use crate::grammar::{check_arity, opt, var, Parsed, Trailing};

const HASH_KEYS: &[&str] = &["MD5", "SHA1", "SHA256", "SHA384", "SHA512"];

pub(super) fn parse(kind: CommandKind, args: &[String]) -> Result<Parsed, ParseError> {
    match kind {
        // Compress,<Format>,<SrcPath>,<DestArchive>,[CompressLevel]
        CommandKind::Compress => {
            check_arity(kind, args, Arity::Range(3, 4))?;
            let format = ArchiveFormat::lookup(&args[0])
                .ok_or_else(|| ParseError::invalid(format!("Cannot compress to [{}] file format", args[0])))?;
            let level = match args.get(3) {
                Some(token) => Some(CompressLevel::lookup(token).ok_or_else(|| ParseError::UnknownKeyword {
                    label: CompressLevel::LABEL,
                    token: token.clone(),
                })?),
                None => None,
            };
            Ok(Payload::Compress(Compress { format, src: args[1].clone(), dest: args[2].clone(), level }).into())
        }
        // Decompress,<SrcArchive>,<DestDir>,[Password=<Str>]
        CommandKind::Decompress => {
            check_arity(kind, args, Arity::Range(2, 3))?;
            let t = Trailing::scan(&args[2..], &[], &["Password"])?;
            Ok(Payload::Decompress(Decompress {
                src: args[0].clone(),
                dest_dir: args[1].clone(),
                password: t.value("Password"),
            })
            .into())
        }
        // Expand,<SrcCab>,<DestDir>,[SingleFile],[PRESERVE],[NOWARN]
        CommandKind::Expand => {
            check_arity(kind, args, Arity::Range(2, 5))?;
            let is_flag = |a: &String| a.eq_ignore_ascii_case("PRESERVE") || a.eq_ignore_ascii_case("NOWARN");
            let (single_file, rest) = match args.get(2) {
                Some(a) if !is_flag(a) => (Some(a.clone()), &args[3..]),
                _ => (None, &args[2..]),
            };
            let t = Trailing::scan(rest, &["PRESERVE", "NOWARN"], &[])?;
            Ok(Payload::Expand(Expand {
                src_cab: args[0].clone(),
                dest_dir: args[1].clone(),
                single_file,
                preserve: t.flag("PRESERVE"),
                no_warn: t.flag("NOWARN"),
            })
            .into())
        }
        // CopyOrExpand,<SrcFile>,<DestPath>,[PRESERVE],[NOWARN]
        CommandKind::CopyOrExpand => {
            check_arity(kind, args, Arity::Range(2, 4))?;
            let t = Trailing::scan(&args[2..], &["PRESERVE", "NOWARN"], &[])?;
            Ok(Payload::CopyOrExpand(CopyOrExpand {
                src: args[0].clone(),
                dest: args[1].clone(),
                preserve: t.flag("PRESERVE"),
                no_warn: t.flag("NOWARN"),
            })
            .into())
        }
        CommandKind::WebGet | CommandKind::WebGetIfNotExist => parse_web_get(kind, args),
        // Hash,<HashType>,<FilePath>,<DestVar>
        CommandKind::Hash => {
            check_arity(kind, args, Arity::Exact(3))?;
            Ok(Payload::Hash(Hash { hash_type: args[0].clone(), file_path: args[1].clone(), dest_var: var(args, 2)? })
                .into())
        }
        // ExtractFile,<ScriptFile>,<DirName>,<FileName>,<DestDir>
        CommandKind::ExtractFile => {
            check_arity(kind, args, Arity::Exact(4))?;
            Ok(Payload::ExtractFile(ExtractFile {
                script_file: args[0].clone(),
                dir_name: args[1].clone(),
                file_name: args[2].clone(),
                dest_dir: args[3].clone(),
            })
            .into())
        }
        // ExtractAndRun,<ScriptFile>,<DirName>,<FileName>,[Params]
        CommandKind::ExtractAndRun => {
            check_arity(kind, args, Arity::Range(3, 4))?;
            Ok(Payload::ExtractAndRun(ExtractAndRun {
                script_file: args[0].clone(),
                dir_name: args[1].clone(),
                file_name: args[2].clone(),
                params: opt(args, 3),
            })
            .into())
        }
        // ExtractAllFiles,<ScriptFile>,<DirName>,<DestDir>
        CommandKind::ExtractAllFiles => {
            check_arity(kind, args, Arity::Exact(3))?;
            Ok(Payload::ExtractAllFiles(ExtractAllFiles {
                script_file: args[0].clone(),
                dir_name: args[1].clone(),
                dest_dir: args[2].clone(),
            })
            .into())
        }
        // Encode,<ScriptFile>,<DirName>,<FilePath>,[Compression]
        CommandKind::Encode => {
            check_arity(kind, args, Arity::Range(3, 4))?;
            Ok(Payload::Encode(Encode {
                script_file: args[0].clone(),
                dir_name: args[1].clone(),
                file_path: args[2].clone(),
                compression: opt(args, 3),
            })
            .into())
        }
        _ => Err(ParseError::invalid(format!("Command [{}] is not an archive command", kind))),
    }
}

/// `WebGet,<URL>,<DestPath>,[<HashType>=<Digest>],[TimeOut=],[Referer=],[UserAgent=],[NOERR]`
///
/// At most one hash key may be given.
fn parse_web_get(kind: CommandKind, args: &[String]) -> Result<Parsed, ParseError> {
    check_arity(kind, args, Arity::Range(2, 5))?;

    let keys = ["MD5", "SHA1", "SHA256", "SHA384", "SHA512", "TimeOut", "Referer", "UserAgent"];
    let t = Trailing::scan(&args[2..], &["NOERR"], &keys)?;

    let mut hash_keys = t.keys().filter(|k| HASH_KEYS.contains(k));
    let hash = match (hash_keys.next(), hash_keys.next()) {
        (_, Some(second)) => return Err(ParseError::DuplicateKeyword(second.to_string())),
        (Some(key), None) => {
            let hash_type = HashType::lookup(key).ok_or_else(|| ParseError::UnknownKeyword {
                label: HashType::LABEL,
                token: key.to_string(),
            })?;
            t.value(key).map(|digest| HashDigest { hash_type, digest })
        }
        (None, None) => None,
    };

    let info = WebGet {
        url: args[0].clone(),
        dest: args[1].clone(),
        hash,
        timeout: t.value("TimeOut"),
        referer: t.value("Referer"),
        user_agent: t.value("UserAgent"),
        no_err: t.flag("NOERR"),
    };
    Ok(match kind {
        CommandKind::WebGetIfNotExist => Parsed::deprecated(
            Payload::WebGetIfNotExist(info),
            "Command [WebGetIfNotExist] is deprecated, use [WebGet] with a hash instead",
        ),
        _ => Payload::WebGet(info).into(),
    })
}
