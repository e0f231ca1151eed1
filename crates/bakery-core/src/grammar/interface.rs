//! Interface, message and user input commands.
//!
//! `Retrieve` is an old catch-all that is rewritten into the command it
//! stands for.

use crate::command::compound::{UserInput, UserInputType};
use crate::command::keyword::{parse_keyword, Keyword};
use crate::command::payload::{
    AddInterface, Echo, EchoFile, InterfaceElement, Message, MessageAction, ReadInterface, Visible, WriteInterface,
};
use crate::command::{CommandKind, Payload};
use crate::error::{Arity, ParseError};
use crate::grammar::{check_arity, opt, parse_kind, var, Context, Parsed, Trailing};
use crate::variables;

pub(super) fn parse(kind: CommandKind, args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    match kind {
        // Visible,<%InterfaceKey%>,<Visibility>,[PERMANENT]
        CommandKind::Visible => {
            check_arity(kind, args, Arity::Range(2, 3))?;
            let visibility = &args[1];
            let fixed = visibility.eq_ignore_ascii_case("True") || visibility.eq_ignore_ascii_case("False");
            if !fixed && !variables::is_valid_variable(visibility) {
                return Err(ParseError::invalid("Visibility must be one of True, False, or variable key."));
            }
            let t = Trailing::scan(&args[2..], &["PERMANENT"], &[])?;
            let info = Visible {
                key: variables::trim_percent(&args[0]).to_string(),
                visibility: visibility.clone(),
                permanent: t.flag("PERMANENT"),
            };
            Ok(Parsed::deprecated(
                Payload::Visible(info),
                "Command [Visible] is deprecated, use [WriteInterface,Visible] instead",
            ))
        }
        // ReadInterface,<Element>,<ScriptFile>,<Section>,<Key>,<DestVar>,[Delim=<Str>]
        CommandKind::ReadInterface => {
            check_arity(kind, args, Arity::Range(5, 6))?;
            let element = parse_keyword::<InterfaceElement>(&args[0])?;
            let delim = items_delim(element, &args[5..])?;
            Ok(Payload::ReadInterface(ReadInterface {
                element,
                script_file: args[1].clone(),
                section: args[2].clone(),
                key: args[3].clone(),
                dest_var: var(args, 4)?,
                delim,
            })
            .into())
        }
        // WriteInterface,<Element>,<ScriptFile>,<Section>,<Key>,<Value>,[Delim=<Str>]
        CommandKind::WriteInterface => {
            check_arity(kind, args, Arity::Range(5, 6))?;
            let element = parse_keyword::<InterfaceElement>(&args[0])?;
            let delim = items_delim(element, &args[5..])?;
            Ok(Payload::WriteInterface(WriteInterface {
                element,
                script_file: args[1].clone(),
                section: args[2].clone(),
                key: args[3].clone(),
                value: args[4].clone(),
                delim,
            })
            .into())
        }
        // Message,<Message>,[Action],[Timeout]
        CommandKind::Message => {
            check_arity(kind, args, Arity::Range(1, 3))?;
            let action = match args.get(1) {
                Some(token) => MessageAction::lookup(token).ok_or_else(|| {
                    ParseError::invalid(format!(
                        "Second argument [{}] must be one of 'Information', 'Confirmation', 'Error' and 'Warning'",
                        token
                    ))
                })?,
                None => MessageAction::Information,
            };
            Ok(Payload::Message(Message { message: args[0].clone(), action, timeout: opt(args, 2) }).into())
        }
        // Echo,<Message>,[WARN]
        CommandKind::Echo => {
            check_arity(kind, args, Arity::Range(1, 2))?;
            let t = Trailing::scan(&args[1..], &["WARN"], &[])?;
            Ok(Payload::Echo(Echo { message: args[0].clone(), warn: t.flag("WARN") }).into())
        }
        // EchoFile,<SrcFile>,[WARN]
        CommandKind::EchoFile => {
            check_arity(kind, args, Arity::Range(1, 2))?;
            let t = Trailing::scan(&args[1..], &["WARN"], &[])?;
            Ok(Payload::EchoFile(EchoFile { src_file: args[0].clone(), warn: t.flag("WARN") }).into())
        }
        CommandKind::UserInput => parse_user_input(args),
        // AddInterface,<ScriptFile>,<Section>,<Prefix>
        CommandKind::AddInterface => {
            check_arity(kind, args, Arity::Exact(3))?;
            Ok(Payload::AddInterface(AddInterface {
                script_file: args[0].clone(),
                section: args[1].clone(),
                prefix: args[2].clone(),
            })
            .into())
        }
        CommandKind::Retrieve => parse_retrieve(args, ctx),
        _ => Err(ParseError::invalid(format!("Command [{}] is not an interface command", kind))),
    }
}

/// `Delim=` is only meaningful for list elements.
fn items_delim(element: InterfaceElement, rest: &[String]) -> Result<Option<String>, ParseError> {
    let t = Trailing::scan(rest, &[], &["Delim"])?;
    let delim = t.value("Delim");
    if delim.is_some() && element != InterfaceElement::Items {
        return Err(ParseError::invalid("Argument [Delim] can be only used with [Items]"));
    }
    Ok(delim)
}

/// `UserInput,<DirPath|FilePath>,<InitPath>,<DestVar>,[Title=<Str>],[Filter=<Str>]`
fn parse_user_input(args: &[String]) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::UserInput, args, Arity::Range(3, 5))?;
    let input_type = parse_keyword::<UserInputType>(&args[0])?;
    let args = &args[1..];

    let t = Trailing::scan(&args[2..], &[], &["Title", "Filter"])?;
    let init_path = args[0].clone();
    let dest_var = var(args, 1)?;
    let title = t.value("Title");

    let input = match input_type {
        UserInputType::DirPath => {
            if t.value("Filter").is_some() {
                return Err(ParseError::invalid("Argument <Filter> can only be used for file selection"));
            }
            UserInput::DirPath { init_path, dest_var, title }
        }
        UserInputType::FilePath => UserInput::FilePath { init_path, dest_var, title, filter: t.value("Filter") },
    };
    Ok(Payload::UserInput(input).into())
}

/// `Retrieve,<Type>,<Arg>,<DestVar>`, rewritten into its modern form.
fn parse_retrieve(args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::Retrieve, args, Arity::Exact(3))?;
    let sub = &args[0];

    let with_type = |t: &str| -> Vec<String> {
        let mut v = vec![t.to_string()];
        v.extend_from_slice(&args[1..]);
        v
    };
    let (kind, new_args) = if sub.eq_ignore_ascii_case("Dir") {
        (CommandKind::UserInput, with_type("DirPath"))
    } else if sub.eq_ignore_ascii_case("File") {
        (CommandKind::UserInput, with_type("FilePath"))
    } else if sub.eq_ignore_ascii_case("FileSize") {
        (CommandKind::FileSize, args[1..].to_vec())
    } else if sub.eq_ignore_ascii_case("FileVersion") {
        (CommandKind::FileVersion, args[1..].to_vec())
    } else if sub.eq_ignore_ascii_case("FolderSize") {
        (CommandKind::DirSize, args[1..].to_vec())
    } else if sub.eq_ignore_ascii_case("MD5") {
        (CommandKind::Hash, args.to_vec())
    } else {
        return Err(ParseError::invalid(format!("Invalid command [Retrieve,{}]", sub)));
    };

    let parsed = parse_kind(kind, &new_args, ctx)?;
    let message = format!("Command [Retrieve,{}] is deprecated, use [{}] instead", sub, kind);
    Ok(parsed.with_deprecation(Some(message)))
}
