//! Code optimizer.
//!
//! Adjacent commands that open the same file (or the same wim image) are
//! packed into one batched command so the executor touches the resource
//! once. Three passes run per block:
//!
//! 1. grouping: maximal runs of compatible commands, comments skipped;
//! 2. hazard splitting: a run is cut before any command that reads a
//!    variable written earlier in the same run;
//! 3. packing: every sub-run of two or more commands becomes one batch.
//!
//! Every folded link list is optimized the same way through a worklist.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::command::payload::Batch;
use crate::command::{Command, CommandKind, Payload};
use crate::fold::{block_at, child_paths};
use crate::variables;

/// A run of commands `begin..end` to pack into `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OptRange {
    begin: usize,
    /// Exclusive; `end - 1` is always a packed command, never a comment.
    end: usize,
    kind: CommandKind,
}

/// Optimize a folded tree.
///
/// Already batched commands are never regrouped, so running this twice
/// gives the same tree as running it once.
pub fn optimize(commands: Vec<Command>) -> Vec<Command> {
    let mut root = optimize_block(commands);

    let mut pending = child_paths(&root, &[]);
    while let Some(path) = pending.pop() {
        let Some(link) = block_at(&mut root, &path) else {
            continue;
        };
        let optimized = optimize_block(std::mem::take(link));
        *link = optimized;
        pending.extend(child_paths(link, &path));
    }
    root
}

fn optimize_block(commands: Vec<Command>) -> Vec<Command> {
    let ranges: Vec<OptRange> = group(&commands)
        .into_iter()
        .flat_map(|range| split_hazards(&commands, range))
        .collect();
    if ranges.is_empty() {
        return commands;
    }
    pack(commands, &ranges)
}

// ---------------------------------------------------------------------------
// Pass 1: grouping
// ---------------------------------------------------------------------------

fn group(commands: &[Command]) -> Vec<OptRange> {
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < commands.len() {
        let anchor = &commands[i];
        let Some(kind) = anchor.kind().batch_kind() else {
            i += 1;
            continue;
        };

        let mut last = i;
        let mut members = 1;
        for (j, cmd) in commands.iter().enumerate().skip(i + 1) {
            if cmd.is_comment() {
                continue;
            }
            if cmd.kind().batch_kind() != Some(kind) || !compatible(&anchor.payload, &cmd.payload) {
                break;
            }
            last = j;
            members += 1;
        }

        if members >= 2 {
            ranges.push(OptRange { begin: i, end: last + 1, kind });
        }
        i = last + 1;
    }
    ranges
}

fn same(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Whether `cmd` may join a run started by `anchor`.
///
/// Only the anchor is compared, so a mixed `WimPath*` run is checked
/// against its first member.
fn compatible(anchor: &Payload, cmd: &Payload) -> bool {
    use Payload as P;

    match (anchor, cmd) {
        (P::TXTAddLine(a), P::TXTAddLine(b)) => same(&a.file, &b.file) && same(&a.mode, &b.mode),
        (P::TXTReplace(a), P::TXTReplace(b)) => same(&a.file, &b.file),
        (P::TXTDelLine(a), P::TXTDelLine(b)) => same(&a.file, &b.file),
        (P::IniRead(a), P::IniRead(b)) => same(&a.file, &b.file),
        (P::IniWrite(a), P::IniWrite(b)) => same(&a.file, &b.file),
        (P::IniDelete(a), P::IniDelete(b)) => same(&a.file, &b.file),
        (P::IniReadSection(a), P::IniReadSection(b)) => same(&a.file, &b.file),
        (P::IniAddSection(a), P::IniAddSection(b)) | (P::IniDeleteSection(a), P::IniDeleteSection(b)) => {
            same(&a.file, &b.file)
        }
        (P::IniWriteTextLine(a), P::IniWriteTextLine(b)) => same(&a.file, &b.file) && a.append == b.append,
        (P::Visible(_), P::Visible(_)) => true,
        (P::ReadInterface(a), P::ReadInterface(b)) => {
            same(&a.script_file, &b.script_file) && same(&a.section, &b.section)
        }
        (P::WriteInterface(a), P::WriteInterface(b)) => {
            same(&a.script_file, &b.script_file) && same(&a.section, &b.section)
        }
        (P::WimExtract(a), P::WimExtract(b)) => {
            let split = match (&a.split, &b.split) {
                (None, None) => true,
                (Some(x), Some(y)) => same(x, y),
                _ => false,
            };
            same(&a.src_wim, &b.src_wim)
                && same(&a.image_index, &b.image_index)
                && same(&a.dest_dir, &b.dest_dir)
                && split
                && a.check == b.check
                && a.no_acl == b.no_acl
                && a.no_attrib == b.no_attrib
        }
        _ => match (wim_path_target(anchor), wim_path_target(cmd)) {
            (Some(a), Some(b)) => same(a.0, b.0) && same(a.1, b.1) && a.2 == b.2 && a.3 == b.3,
            _ => false,
        },
    }
}

/// `(wim, index, check, rebuild)` of a `WimPath*` command.
fn wim_path_target(payload: &Payload) -> Option<(&str, &str, bool, bool)> {
    match payload {
        Payload::WimPathAdd(p) => Some((p.wim_file.as_str(), p.image_index.as_str(), p.check, p.rebuild)),
        Payload::WimPathDelete(p) => Some((p.wim_file.as_str(), p.image_index.as_str(), p.check, p.rebuild)),
        Payload::WimPathRename(p) => Some((p.wim_file.as_str(), p.image_index.as_str(), p.check, p.rebuild)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Pass 2: hazard splitting
// ---------------------------------------------------------------------------

/// Variables a command reads and the variables it assigns.
fn access(payload: &Payload) -> (HashSet<String>, Vec<String>) {
    let (reads, write): (Vec<&String>, Option<&String>) = match payload {
        Payload::TXTAddLine(p) => (vec![&p.file, &p.line, &p.mode], None),
        Payload::TXTReplace(p) => (vec![&p.file, &p.old_str, &p.new_str], None),
        Payload::TXTDelLine(p) => (vec![&p.file, &p.keyword], None),
        Payload::IniRead(p) => {
            let mut reads = vec![&p.file, &p.section, &p.key];
            reads.extend(p.default.as_ref());
            (reads, Some(&p.dest_var))
        }
        Payload::IniWrite(p) => (vec![&p.file, &p.section, &p.key, &p.value], None),
        Payload::IniDelete(p) => (vec![&p.file, &p.section, &p.key], None),
        Payload::IniReadSection(p) => {
            let mut reads = vec![&p.file, &p.section];
            reads.extend(p.delim.as_ref());
            (reads, Some(&p.dest_var))
        }
        Payload::IniAddSection(p) | Payload::IniDeleteSection(p) => (vec![&p.file, &p.section], None),
        Payload::IniWriteTextLine(p) => (vec![&p.file, &p.section, &p.line], None),
        Payload::Visible(p) => (vec![&p.key, &p.visibility], None),
        Payload::ReadInterface(p) => {
            let mut reads = vec![&p.script_file, &p.section, &p.key];
            reads.extend(p.delim.as_ref());
            (reads, Some(&p.dest_var))
        }
        Payload::WriteInterface(p) => {
            let mut reads = vec![&p.script_file, &p.section, &p.key, &p.value];
            reads.extend(p.delim.as_ref());
            (reads, None)
        }
        Payload::WimExtract(p) => {
            let mut reads = vec![&p.src_wim, &p.image_index, &p.extract_path, &p.dest_dir];
            reads.extend(p.split.as_ref());
            (reads, None)
        }
        Payload::WimPathAdd(p) => (vec![&p.wim_file, &p.image_index, &p.src_path, &p.dest_path], None),
        Payload::WimPathDelete(p) => (vec![&p.wim_file, &p.image_index, &p.path], None),
        Payload::WimPathRename(p) => (vec![&p.wim_file, &p.image_index, &p.src_path, &p.dest_path], None),
        _ => (Vec::new(), None),
    };

    let reads = reads.into_iter().flat_map(|arg| variables::referenced_variables(arg)).collect();
    let writes = write.and_then(|var| variables::variable_key(var)).into_iter().collect();
    (reads, writes)
}

/// Cut `range` before every command that reads a variable written by an
/// earlier command of the same sub-run. Sub-runs shorter than two are
/// dropped.
fn split_hazards(commands: &[Command], range: OptRange) -> Vec<OptRange> {
    let mut out = Vec::new();
    let mut written: HashSet<String> = HashSet::new();
    let mut start = range.begin;
    let mut last = range.begin;
    let mut members = 0;

    let close = |start: usize, last: usize, members: usize, out: &mut Vec<OptRange>| {
        if members >= 2 {
            out.push(OptRange { begin: start, end: last + 1, kind: range.kind });
        }
    };

    for (idx, cmd) in commands.iter().enumerate().take(range.end).skip(range.begin) {
        if cmd.is_comment() {
            continue;
        }
        let (reads, writes) = access(&cmd.payload);
        if members > 0 && !reads.is_disjoint(&written) {
            close(start, last, members, &mut out);
            start = idx;
            members = 0;
            written.clear();
        }
        written.extend(writes);
        members += 1;
        last = idx;
    }
    close(start, last, members, &mut out);
    out
}

// ---------------------------------------------------------------------------
// Pass 3: packing
// ---------------------------------------------------------------------------

/// Replace every range with one batched command. `ranges` must be sorted
/// and disjoint.
fn pack(commands: Vec<Command>, ranges: &[OptRange]) -> Vec<Command> {
    let mut out = Vec::with_capacity(commands.len());
    let mut ranges = ranges.iter().peekable();
    let mut iter = commands.into_iter().enumerate();

    while let Some((i, cmd)) = iter.next() {
        let Some(range) = ranges.next_if(|r| r.begin == i) else {
            out.push(cmd);
            continue;
        };

        let mut members = vec![cmd];
        for _ in i + 1..range.end {
            match iter.next() {
                Some((_, c)) if !c.is_comment() => members.push(c),
                _ => {}
            }
        }
        out.extend(pack_run(range.kind, members));
    }
    out
}

/// One batched command stamped with the first member's section and line.
fn pack_run(kind: CommandKind, members: Vec<Command>) -> Vec<Command> {
    let Some(first) = members.first() else {
        return members;
    };
    let raw = members.iter().map(|c| c.raw.as_str()).collect::<Vec<_>>().join("\n");
    let section = Arc::clone(&first.section);
    let line = first.line;
    let count = members.len();

    let batch = Batch { cmds: members };
    let payload = match kind {
        CommandKind::TXTAddLineOp => Payload::TXTAddLineOp(batch),
        CommandKind::TXTReplaceOp => Payload::TXTReplaceOp(batch),
        CommandKind::TXTDelLineOp => Payload::TXTDelLineOp(batch),
        CommandKind::IniReadOp => Payload::IniReadOp(batch),
        CommandKind::IniWriteOp => Payload::IniWriteOp(batch),
        CommandKind::IniDeleteOp => Payload::IniDeleteOp(batch),
        CommandKind::IniReadSectionOp => Payload::IniReadSectionOp(batch),
        CommandKind::IniAddSectionOp => Payload::IniAddSectionOp(batch),
        CommandKind::IniDeleteSectionOp => Payload::IniDeleteSectionOp(batch),
        CommandKind::IniWriteTextLineOp => Payload::IniWriteTextLineOp(batch),
        CommandKind::VisibleOp => Payload::VisibleOp(batch),
        CommandKind::ReadInterfaceOp => Payload::ReadInterfaceOp(batch),
        CommandKind::WriteInterfaceOp => Payload::WriteInterfaceOp(batch),
        CommandKind::WimExtractOp => Payload::WimExtractOp(batch),
        CommandKind::WimPathOp => Payload::WimPathOp(batch),
        _ => return batch.cmds,
    };

    debug!(kind = %kind, commands = count, line, "run packed");
    vec![Command::new(raw, section, line, payload)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserOptions;
    use crate::fold::fold;
    use crate::parser::CodeParser;
    use crate::section::SectionRef;

    fn commands_with(lines: &[&str], options: ParserOptions) -> Vec<Command> {
        let parser = CodeParser::new(Arc::new(SectionRef::detached()), options);
        lines.iter().map(|l| parser.parse_statement(l)).collect()
    }

    fn commands(lines: &[&str]) -> Vec<Command> {
        commands_with(lines, ParserOptions::default())
    }

    fn kinds(cmds: &[Command]) -> Vec<CommandKind> {
        cmds.iter().map(|c| c.kind()).collect()
    }

    #[test]
    fn test_packs_same_file() {
        let out = optimize(commands(&["IniWrite,a.ini,S,K1,V1", "IniWrite,A.INI,S,K2,V2", "Echo,Done"]));
        assert_eq!(kinds(&out), vec![CommandKind::IniWriteOp, CommandKind::Echo]);

        let packed = out[0].batched().unwrap();
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0].raw, "IniWrite,a.ini,S,K1,V1");
        assert_eq!(packed[1].raw, "IniWrite,A.INI,S,K2,V2");
        assert_eq!(out[0].raw, "IniWrite,a.ini,S,K1,V1\nIniWrite,A.INI,S,K2,V2");
        assert_eq!(out[0].line, packed[0].line);
    }

    #[test]
    fn test_different_files_stay_apart() {
        let out = optimize(commands(&["IniWrite,a.ini,S,K,V", "IniWrite,b.ini,S,K,V"]));
        assert_eq!(kinds(&out), vec![CommandKind::IniWrite, CommandKind::IniWrite]);
    }

    #[test]
    fn test_txt_add_line_mode_must_match() {
        let out = optimize(commands(&[
            "TXTAddLine,a.txt,L1,Append",
            "TXTAddLine,a.txt,L2,Append",
            "TXTAddLine,a.txt,L0,Prepend",
        ]));
        assert_eq!(kinds(&out), vec![CommandKind::TXTAddLineOp, CommandKind::TXTAddLine]);
    }

    #[test]
    fn test_read_after_write_splits_run() {
        let out = optimize(commands(&["IniRead,a.ini,S,K,%V%", "IniRead,a.ini,S,%V%,%W%"]));
        assert_eq!(kinds(&out), vec![CommandKind::IniRead, CommandKind::IniRead]);
    }

    #[test]
    fn test_hazard_splits_at_exact_boundary() {
        let out = optimize(commands(&[
            "IniRead,a.ini,S,K1,%A%",
            "IniRead,a.ini,S,K2,%B%",
            "IniRead,a.ini,S,%A%,%C%",
            "IniRead,a.ini,S,K4,%D%",
        ]));
        assert_eq!(kinds(&out), vec![CommandKind::IniReadOp, CommandKind::IniReadOp]);
        assert_eq!(out[0].batched().unwrap().len(), 2);
        assert_eq!(out[1].batched().unwrap()[0].raw, "IniRead,a.ini,S,%A%,%C%");
    }

    #[test]
    fn test_comments_inside_run_are_dropped() {
        let out = optimize(commands(&["IniDelete,a.ini,S,K1", "// gap", "IniDelete,a.ini,S,K2", "// after"]));
        assert_eq!(kinds(&out), vec![CommandKind::IniDeleteOp, CommandKind::Comment]);
        assert_eq!(out[0].batched().unwrap().len(), 2);
    }

    #[test]
    fn test_wim_path_family() {
        let out = optimize(commands(&[
            "WimPathAdd,a.wim,1,C:\\x,\\x",
            "WimPathDelete,A.wim,1,\\y",
            "WimPathRename,a.wim,1,\\z,\\w",
        ]));
        assert_eq!(kinds(&out), vec![CommandKind::WimPathOp]);
        assert_eq!(out[0].batched().unwrap().len(), 3);
    }

    #[test]
    fn test_visible_always_packs() {
        let out = optimize(commands_with(&["Visible,%pA%,True", "Visible,%pB%,False"], ParserOptions::legacy()));
        assert_eq!(kinds(&out), vec![CommandKind::VisibleOp]);
    }

    #[test]
    fn test_link_lists_are_optimized() {
        let folded = fold(commands(&[
            "If,%A%,Equal,1,Begin",
            "IniWrite,a.ini,S,K1,V1",
            "IniWrite,a.ini,S,K2,V2",
            "End",
        ]))
        .unwrap();
        let out = optimize(folded);
        assert_eq!(kinds(out[0].link().unwrap()), vec![CommandKind::IniWriteOp]);
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let once = optimize(commands(&[
            "IniWrite,a.ini,S,K1,V1",
            "IniWrite,a.ini,S,K2,V2",
            "IniRead,a.ini,S,K1,%A%",
            "Echo,%A%",
        ]));
        let twice = optimize(once.clone());
        assert_eq!(once, twice);
    }
}
