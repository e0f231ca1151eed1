//! Block folder.
//!
//! Turns a flat command list containing `If`/`Else`/`Begin`/`End` into a
//! tree: each `If` and `Else` owns its body in its link list, and the
//! `Begin`/`End` markers disappear. Blocks are folded through a worklist of
//! index paths, so nesting depth never grows the call stack.
//!
//! ```text
//! If,%A%,Equal,1,Begin          If  (link: Echo,X / If ...)
//!   Echo,X                        Echo,X
//!   If,%B%,Equal,2,Echo,Y   =>    If  (link: Echo,Y)
//! End                           Else (link: Echo,Z)
//! Else,Echo,Z
//! ```

use std::collections::VecDeque;

use tracing::trace;

use crate::command::{Command, CommandKind, Payload};
use crate::error::FoldError;

/// Fold a flat command list into a tree.
///
/// Fails on the first structural error; a partially folded tree is never
/// returned.
pub fn fold(commands: Vec<Command>) -> Result<Vec<Command>, FoldError> {
    let mut root = fold_block(commands)?;

    let mut pending = child_paths(&root, &[]);
    while let Some(path) = pending.pop() {
        let Some(link) = block_at(&mut root, &path) else {
            continue;
        };
        let folded = fold_block(std::mem::take(link))?;
        *link = folded;
        pending.extend(child_paths(link, &path));
    }
    Ok(root)
}

/// Fold one block without descending into the link lists it produces.
fn fold_block(commands: Vec<Command>) -> Result<Vec<Command>, FoldError> {
    let mut queue: VecDeque<Command> = commands.into();
    let mut out = Vec::with_capacity(queue.len());
    let mut else_allowed = false;

    while let Some(mut cmd) = queue.pop_front() {
        match cmd.kind() {
            CommandKind::If => {
                resolve_if(&mut cmd, &mut queue)?;
                out.push(cmd);
                else_allowed = true;
            }
            CommandKind::Else => {
                if !else_allowed {
                    return Err(FoldError::OrphanElse { raw: cmd.raw.clone(), line: cmd.line });
                }
                // `Else,If,...` and `Else,Begin` leave the chain open
                else_allowed = resolve_else(&mut cmd, &mut queue)?;
                out.push(cmd);
            }
            // Stray markers are dropped without touching the Else state
            CommandKind::Begin | CommandKind::End => {}
            CommandKind::Comment => out.push(cmd),
            _ => {
                else_allowed = false;
                out.push(cmd);
            }
        }
    }
    Ok(out)
}

/// Fill the link list of an `If`, consuming a `Begin` ... `End` body from
/// `queue` when the embedded command opens one.
fn resolve_if(cmd: &mut Command, queue: &mut VecDeque<Command>) -> Result<(), FoldError> {
    let (raw, line) = (cmd.raw.clone(), cmd.line);
    let Payload::If(info) = &mut cmd.payload else {
        return Ok(());
    };
    if info.link_parsed {
        return Ok(());
    }

    info.link = match info.embedded.kind() {
        CommandKind::If => {
            let mut nested = (*info.embedded).clone();
            resolve_if(&mut nested, queue)?;
            vec![nested]
        }
        CommandKind::Begin => take_block(queue, &raw, line)?,
        kind @ (CommandKind::Else | CommandKind::End | CommandKind::Comment) => {
            return Err(FoldError::InvalidEmbedded { kind, parent: CommandKind::If, raw, line });
        }
        _ => vec![(*info.embedded).clone()],
    };
    info.link_parsed = true;
    Ok(())
}

/// Same as [`resolve_if`] for an `Else`. Returns whether another `Else`
/// may follow.
fn resolve_else(cmd: &mut Command, queue: &mut VecDeque<Command>) -> Result<bool, FoldError> {
    let (raw, line) = (cmd.raw.clone(), cmd.line);
    let Payload::Else(info) = &mut cmd.payload else {
        return Ok(false);
    };
    if info.link_parsed {
        return Ok(false);
    }

    let mut rearmed = true;
    info.link = match info.embedded.kind() {
        CommandKind::If => {
            let mut nested = (*info.embedded).clone();
            resolve_if(&mut nested, queue)?;
            vec![nested]
        }
        CommandKind::Begin => take_block(queue, &raw, line)?,
        kind @ (CommandKind::Else | CommandKind::End | CommandKind::Comment) => {
            return Err(FoldError::InvalidEmbedded { kind, parent: CommandKind::Else, raw, line });
        }
        _ => {
            rearmed = false;
            vec![(*info.embedded).clone()]
        }
    };
    info.link_parsed = true;
    Ok(rearmed)
}

/// Remove the commands up to the `End` matching an already consumed
/// `Begin` and return them; the `End` itself is dropped.
fn take_block(queue: &mut VecDeque<Command>, raw: &str, line: usize) -> Result<Vec<Command>, FoldError> {
    let mut depth = 1usize;
    let mut end = None;
    for (i, cmd) in queue.iter().enumerate() {
        if opens_block(cmd) {
            depth += 1;
        } else if cmd.kind() == CommandKind::End {
            depth -= 1;
            if depth == 0 {
                end = Some(i);
                break;
            }
        }
    }

    let end = end.ok_or_else(|| FoldError::UnmatchedBegin { raw: raw.to_string(), line })?;
    let body: Vec<Command> = queue.drain(..end).collect();
    queue.pop_front();
    trace!(line, commands = body.len(), "block matched");
    Ok(body)
}

/// Whether an `If`/`Else` (possibly through a chain of nested `If`s) opens
/// a `Begin` body.
fn opens_block(cmd: &Command) -> bool {
    let mut embedded = match &cmd.payload {
        Payload::If(info) if !info.link_parsed => &info.embedded,
        Payload::Else(info) if !info.link_parsed => &info.embedded,
        _ => return false,
    };
    loop {
        match &embedded.payload {
            Payload::Begin => return true,
            Payload::If(info) => embedded = &info.embedded,
            _ => return false,
        }
    }
}

/// Paths of every link list directly inside `block`.
pub(crate) fn child_paths(block: &[Command], prefix: &[usize]) -> Vec<Vec<usize>> {
    block
        .iter()
        .enumerate()
        .filter(|(_, cmd)| cmd.link().is_some_and(|link| !link.is_empty()))
        .map(|(i, _)| {
            let mut path = prefix.to_vec();
            path.push(i);
            path
        })
        .collect()
}

pub(crate) fn block_at<'a>(root: &'a mut Vec<Command>, path: &[usize]) -> Option<&'a mut Vec<Command>> {
    let mut block = root;
    for &i in path {
        block = block.get_mut(i)?.link_mut()?;
    }
    Some(block)
}

/// Every command of the tree, link lists included, depth first.
pub fn walk(commands: &[Command]) -> Vec<&Command> {
    let mut out = Vec::new();
    let mut stack: Vec<&Command> = commands.iter().rev().collect();
    while let Some(cmd) = stack.pop() {
        out.push(cmd);
        if let Some(link) = cmd.link() {
            stack.extend(link.iter().rev());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ParserOptions;
    use crate::parser::CodeParser;
    use crate::section::SectionRef;

    fn commands(lines: &[&str]) -> Vec<Command> {
        let parser = CodeParser::new(Arc::new(SectionRef::detached()), ParserOptions::default());
        lines.iter().map(|l| parser.parse_statement(l)).collect()
    }

    fn kinds(cmds: &[Command]) -> Vec<CommandKind> {
        cmds.iter().map(|c| c.kind()).collect()
    }

    #[test]
    fn test_single_line_if_else() {
        let folded = fold(commands(&["If,%A%,Equal,1,Echo,Hi", "Else,Echo,Bye"])).unwrap();
        assert_eq!(kinds(&folded), vec![CommandKind::If, CommandKind::Else]);
        assert_eq!(kinds(folded[0].link().unwrap()), vec![CommandKind::Echo]);
        assert_eq!(kinds(folded[1].link().unwrap()), vec![CommandKind::Echo]);
    }

    #[test]
    fn test_multi_line_nested() {
        let folded = fold(commands(&[
            "If,%A%,Equal,1,Begin",
            "If,%B%,Equal,2,Begin",
            "Echo,Inner",
            "End",
            "End",
            "Echo,After",
        ]))
        .unwrap();

        assert_eq!(kinds(&folded), vec![CommandKind::If, CommandKind::Echo]);
        let outer = folded[0].link().unwrap();
        assert_eq!(kinds(outer), vec![CommandKind::If]);
        assert_eq!(kinds(outer[0].link().unwrap()), vec![CommandKind::Echo]);

        let markers = walk(&folded)
            .iter()
            .filter(|c| matches!(c.kind(), CommandKind::Begin | CommandKind::End))
            .count();
        assert_eq!(markers, 0);
    }

    #[test]
    fn test_nested_if_chain() {
        let folded = fold(commands(&["If,%A%,Equal,1,If,%B%,Equal,2,Begin", "Echo,X", "End"])).unwrap();
        assert_eq!(folded.len(), 1);
        let inner = &folded[0].link().unwrap()[0];
        assert_eq!(inner.kind(), CommandKind::If);
        assert_eq!(kinds(inner.link().unwrap()), vec![CommandKind::Echo]);
    }

    #[test]
    fn test_else_if_chain() {
        let folded = fold(commands(&[
            "If,%A%,Equal,1,Echo,One",
            "Else,If,%A%,Equal,2,Echo,Two",
            "Else,Echo,Other",
        ]))
        .unwrap();
        assert_eq!(kinds(&folded), vec![CommandKind::If, CommandKind::Else, CommandKind::Else]);
    }

    #[test]
    fn test_comment_keeps_else_allowed() {
        let folded = fold(commands(&["If,%A%,Equal,1,Echo,Hi", "// note", "Else,Echo,Bye"])).unwrap();
        assert_eq!(kinds(&folded), vec![CommandKind::If, CommandKind::Comment, CommandKind::Else]);
    }

    #[test]
    fn test_else_block_with_nested_begin() {
        let folded = fold(commands(&[
            "If,%A%,Equal,1,Echo,Hi",
            "Else,Begin",
            "If,%B%,Equal,2,Begin",
            "Echo,X",
            "End",
            "Echo,Y",
            "End",
        ]))
        .unwrap();
        assert_eq!(kinds(&folded), vec![CommandKind::If, CommandKind::Else]);
        assert_eq!(kinds(folded[1].link().unwrap()), vec![CommandKind::If, CommandKind::Echo]);
    }

    #[test]
    fn test_else_after_else_block() {
        let folded = fold(commands(&[
            "If,%A%,Equal,1,Echo,One",
            "Else,Begin",
            "Echo,Two",
            "End",
            "Else,Echo,Three",
        ]))
        .unwrap();
        assert_eq!(kinds(&folded), vec![CommandKind::If, CommandKind::Else, CommandKind::Else]);
        assert_eq!(kinds(folded[1].link().unwrap()), vec![CommandKind::Echo]);
        assert_eq!(kinds(folded[2].link().unwrap()), vec![CommandKind::Echo]);

        // a single-line Else closes the chain
        let err = fold(commands(&["If,%A%,Equal,1,Echo,One", "Else,Echo,Two", "Else,Echo,Three"])).unwrap_err();
        assert!(matches!(err, FoldError::OrphanElse { .. }));
    }

    #[test]
    fn test_unmatched_begin() {
        let err = fold(commands(&["Echo,A", "If,%A%,Equal,1,Begin", "Echo,X"])).unwrap_err();
        assert_eq!(err.to_string(), "[Begin] must be matched with [End]");
        assert_eq!(err.raw(), "If,%A%,Equal,1,Begin");
    }

    #[test]
    fn test_orphan_else() {
        let err = fold(commands(&["Echo,A", "Else,Echo,B"])).unwrap_err();
        assert!(matches!(err, FoldError::OrphanElse { .. }));

        let err = fold(commands(&["If,%A%,Equal,1,Echo,Hi", "Echo,Between", "Else,Echo,B"])).unwrap_err();
        assert!(matches!(err, FoldError::OrphanElse { .. }));
    }

    #[test]
    fn test_invalid_embedded() {
        let err = fold(commands(&["If,%A%,Equal,1,End"])).unwrap_err();
        assert_eq!(err.to_string(), "End cannot be used with [If]");

        let err = fold(commands(&["If,%A%,Equal,1,Echo,Hi", "Else,Else,Echo,B"])).unwrap_err();
        assert_eq!(err.to_string(), "Else cannot be used with [Else]");
    }

    #[test]
    fn test_stray_markers_are_dropped() {
        let folded = fold(commands(&["Begin", "Echo,A", "End"])).unwrap();
        assert_eq!(kinds(&folded), vec![CommandKind::Echo]);
    }

    #[test]
    fn test_walk_visits_links() {
        let folded = fold(commands(&["If,%A%,Equal,1,Begin", "Echo,X", "Echo,Y", "End"])).unwrap();
        assert_eq!(walk(&folded).len(), 3);
    }
}
