//! Wim image commands.
//!
//! Image indexes stay strings; they are commonly variables.

use crate::command::keyword::parse_keyword;
use crate::command::payload::{
    WimAppend, WimApply, WimCapture, WimDelete, WimExport, WimExtract, WimExtractBulk, WimInfo, WimMount,
    WimMountMode, WimOptimize, WimPathAdd, WimPathDelete, WimPathRename, WimUnmount, WimUnmountMode,
};
use crate::command::{CommandKind, Payload};
use crate::error::{Arity, ParseError};
use crate::grammar::{check_arity, var, Parsed, Trailing};

const IMAGE_FLAGS: &[&str] = &["CHECK", "NOACL", "NOATTRIB"];

pub(super) fn parse(kind: CommandKind, args: &[String]) -> Result<Parsed, ParseError> {
    match kind {
        // WimMount,<SrcWim>,<ImageIndex>,<MountDir>,<READONLY|READWRITE>
        CommandKind::WimMount => {
            check_arity(kind, args, Arity::Exact(4))?;
            Ok(Payload::WimMount(WimMount {
                src_wim: args[0].clone(),
                image_index: args[1].clone(),
                mount_dir: args[2].clone(),
                mode: parse_keyword::<WimMountMode>(&args[3])?,
            })
            .into())
        }
        // WimUnmount,<MountDir>,<DISCARD|COMMIT>
        CommandKind::WimUnmount => {
            check_arity(kind, args, Arity::Exact(2))?;
            Ok(Payload::WimUnmount(WimUnmount {
                mount_dir: args[0].clone(),
                mode: parse_keyword::<WimUnmountMode>(&args[1])?,
            })
            .into())
        }
        // WimInfo,<SrcWim>,<ImageIndex>,<Key>,<DestVar>,[NOERR]
        CommandKind::WimInfo => {
            check_arity(kind, args, Arity::Range(4, 5))?;
            let t = Trailing::scan(&args[4..], &["NOERR"], &[])?;
            Ok(Payload::WimInfo(WimInfo {
                src_wim: args[0].clone(),
                image_index: args[1].clone(),
                key: args[2].clone(),
                dest_var: var(args, 3)?,
                no_err: t.flag("NOERR"),
            })
            .into())
        }
        // WimApply,<SrcWim>,<ImageIndex>,<DestDir>,[Split=<Pattern>],[CHECK],[NOACL],[NOATTRIB]
        CommandKind::WimApply => {
            check_arity(kind, args, Arity::Range(3, 7))?;
            let t = Trailing::scan(&args[3..], IMAGE_FLAGS, &["Split"])?;
            Ok(Payload::WimApply(WimApply {
                src_wim: args[0].clone(),
                image_index: args[1].clone(),
                dest_dir: args[2].clone(),
                split: t.value("Split"),
                check: t.flag("CHECK"),
                no_acl: t.flag("NOACL"),
                no_attrib: t.flag("NOATTRIB"),
            })
            .into())
        }
        // WimExtract,<SrcWim>,<ImageIndex>,<ExtractPath>,<DestDir>,[Split=<Pattern>],[CHECK],[NOACL],[NOATTRIB]
        CommandKind::WimExtract => {
            check_arity(kind, args, Arity::Range(4, 7))?;
            let t = Trailing::scan(&args[4..], IMAGE_FLAGS, &["Split"])?;
            Ok(Payload::WimExtract(WimExtract {
                src_wim: args[0].clone(),
                image_index: args[1].clone(),
                extract_path: args[2].clone(),
                dest_dir: args[3].clone(),
                split: t.value("Split"),
                check: t.flag("CHECK"),
                no_acl: t.flag("NOACL"),
                no_attrib: t.flag("NOATTRIB"),
            })
            .into())
        }
        // WimExtractBulk,<SrcWim>,<ImageIndex>,<ListFile>,<DestDir>,[Split=<Pattern>],[CHECK],[NOACL],[NOATTRIB],[NOERR],[NOWARN]
        CommandKind::WimExtractBulk => {
            check_arity(kind, args, Arity::Range(4, 10))?;
            let t = Trailing::scan(&args[4..], &["CHECK", "NOACL", "NOATTRIB", "NOERR", "NOWARN"], &["Split"])?;
            Ok(Payload::WimExtractBulk(WimExtractBulk {
                src_wim: args[0].clone(),
                image_index: args[1].clone(),
                list_file: args[2].clone(),
                dest_dir: args[3].clone(),
                split: t.value("Split"),
                check: t.flag("CHECK"),
                no_acl: t.flag("NOACL"),
                no_attrib: t.flag("NOATTRIB"),
                no_err: t.flag("NOERR"),
                no_warn: t.flag("NOWARN"),
            })
            .into())
        }
        // WimCapture,<SrcDir>,<DestWim>,<Compress>,[ImageName=],[ImageDesc=],[Flags=],[BOOT],[CHECK],[NOACL]
        CommandKind::WimCapture => {
            check_arity(kind, args, Arity::Range(3, 9))?;
            let t = Trailing::scan(&args[3..], &["BOOT", "CHECK", "NOACL"], &["ImageName", "ImageDesc", "Flags"])?;
            Ok(Payload::WimCapture(WimCapture {
                src_dir: args[0].clone(),
                dest_wim: args[1].clone(),
                compress: args[2].clone(),
                image_name: t.value("ImageName"),
                image_desc: t.value("ImageDesc"),
                wim_flags: t.value("Flags"),
                boot: t.flag("BOOT"),
                check: t.flag("CHECK"),
                no_acl: t.flag("NOACL"),
            })
            .into())
        }
        // WimAppend,<SrcDir>,<DestWim>,[ImageName=],[ImageDesc=],[Flags=],[DeltaIndex=],[BOOT],[CHECK],[NOACL]
        CommandKind::WimAppend => {
            check_arity(kind, args, Arity::Range(2, 9))?;
            let t = Trailing::scan(
                &args[2..],
                &["BOOT", "CHECK", "NOACL"],
                &["ImageName", "ImageDesc", "Flags", "DeltaIndex"],
            )?;
            Ok(Payload::WimAppend(WimAppend {
                src_dir: args[0].clone(),
                dest_wim: args[1].clone(),
                image_name: t.value("ImageName"),
                image_desc: t.value("ImageDesc"),
                wim_flags: t.value("Flags"),
                delta_index: t.value("DeltaIndex"),
                boot: t.flag("BOOT"),
                check: t.flag("CHECK"),
                no_acl: t.flag("NOACL"),
            })
            .into())
        }
        // WimDelete,<SrcWim>,<ImageIndex>,[CHECK]
        CommandKind::WimDelete => {
            check_arity(kind, args, Arity::Range(2, 3))?;
            let t = Trailing::scan(&args[2..], &["CHECK"], &[])?;
            Ok(Payload::WimDelete(WimDelete {
                src_wim: args[0].clone(),
                image_index: args[1].clone(),
                check: t.flag("CHECK"),
            })
            .into())
        }
        // WimPathAdd,<WimFile>,<ImageIndex>,<SrcPath>,<DestPath>,[CHECK],[NOACL],[PRESERVE],[REBUILD]
        CommandKind::WimPathAdd => {
            check_arity(kind, args, Arity::Range(4, 8))?;
            let t = Trailing::scan(&args[4..], &["CHECK", "NOACL", "PRESERVE", "REBUILD"], &[])?;
            Ok(Payload::WimPathAdd(WimPathAdd {
                wim_file: args[0].clone(),
                image_index: args[1].clone(),
                src_path: args[2].clone(),
                dest_path: args[3].clone(),
                check: t.flag("CHECK"),
                no_acl: t.flag("NOACL"),
                preserve: t.flag("PRESERVE"),
                rebuild: t.flag("REBUILD"),
            })
            .into())
        }
        // WimPathDelete,<WimFile>,<ImageIndex>,<Path>,[CHECK],[REBUILD]
        CommandKind::WimPathDelete => {
            check_arity(kind, args, Arity::Range(3, 5))?;
            let t = Trailing::scan(&args[3..], &["CHECK", "REBUILD"], &[])?;
            Ok(Payload::WimPathDelete(WimPathDelete {
                wim_file: args[0].clone(),
                image_index: args[1].clone(),
                path: args[2].clone(),
                check: t.flag("CHECK"),
                rebuild: t.flag("REBUILD"),
            })
            .into())
        }
        // WimPathRename,<WimFile>,<ImageIndex>,<SrcPath>,<DestPath>,[CHECK],[REBUILD]
        CommandKind::WimPathRename => {
            check_arity(kind, args, Arity::Range(4, 6))?;
            let t = Trailing::scan(&args[4..], &["CHECK", "REBUILD"], &[])?;
            Ok(Payload::WimPathRename(WimPathRename {
                wim_file: args[0].clone(),
                image_index: args[1].clone(),
                src_path: args[2].clone(),
                dest_path: args[3].clone(),
                check: t.flag("CHECK"),
                rebuild: t.flag("REBUILD"),
            })
            .into())
        }
        // WimOptimize,<WimFile>,[Recomp=<Type>],[CHECK|NOCHECK]
        CommandKind::WimOptimize => {
            check_arity(kind, args, Arity::Range(1, 3))?;
            let t = Trailing::scan(&args[1..], &["CHECK", "NOCHECK"], &["Recomp"])?;
            Ok(Payload::WimOptimize(WimOptimize {
                wim_file: args[0].clone(),
                recompress: t.value("Recomp"),
                check: t.tristate("CHECK", "NOCHECK")?,
            })
            .into())
        }
        // WimExport,<SrcWim>,<ImageIndex>,<DestWim>,[ImageName=],[ImageDesc=],[Split=],[Recomp=],[BOOT],[CHECK|NOCHECK]
        CommandKind::WimExport => {
            check_arity(kind, args, Arity::Range(3, 9))?;
            let t = Trailing::scan(
                &args[3..],
                &["BOOT", "CHECK", "NOCHECK"],
                &["ImageName", "ImageDesc", "Split", "Recomp"],
            )?;
            Ok(Payload::WimExport(WimExport {
                src_wim: args[0].clone(),
                image_index: args[1].clone(),
                dest_wim: args[2].clone(),
                image_name: t.value("ImageName"),
                image_desc: t.value("ImageDesc"),
                split: t.value("Split"),
                recompress: t.value("Recomp"),
                boot: t.flag("BOOT"),
                check: t.tristate("CHECK", "NOCHECK")?,
            })
            .into())
        }
        _ => Err(ParseError::invalid(format!("Command [{}] is not a wim command", kind))),
    }
}
