//! Branch, control flow, system and debug commands.

use crate::command::compound::{DebugInfo, DebugType, System, SystemType};
use crate::command::keyword::parse_keyword;
use crate::command::payload::{
    AddVariables, Beep, BeepType, Else, Exit, GetParam, Halt, If, Loop, LoopRange, PackParam, Run, SetVariable,
    ShellExecute, Wait,
};
use crate::command::{CommandKind, Payload};
use crate::condition::parse_condition;
use crate::error::{Arity, ParseError};
use crate::grammar::{check_arity, opt, parse_embedded, split_key, var, Context, Parsed, Trailing};
use crate::variables::{self, VarKeyType};

pub(super) fn parse(kind: CommandKind, args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    match kind {
        // Run,<ScriptFile>,<Section>,[Params...]
        CommandKind::Run | CommandKind::Exec => {
            check_arity(kind, args, Arity::AtLeast(2))?;
            let info = Run {
                script_file: args[0].clone(),
                section: args[1].clone(),
                in_params: args[2..].to_vec(),
                out_params: Vec::new(),
            };
            Ok(match kind {
                CommandKind::Run => Payload::Run(info),
                _ => Payload::Exec(info),
            }
            .into())
        }
        // RunEx,<ScriptFile>,<Section>,[In=<Value>...],[Out=<%Var%>...]
        CommandKind::RunEx => {
            check_arity(kind, args, Arity::AtLeast(2))?;
            let (in_params, out_params) = in_out_params(kind, &args[2..])?;
            Ok(Payload::RunEx(Run { script_file: args[0].clone(), section: args[1].clone(), in_params, out_params })
                .into())
        }
        CommandKind::Loop | CommandKind::LoopLetter | CommandKind::LoopEx | CommandKind::LoopLetterEx => {
            parse_loop(kind, args)
        }
        CommandKind::If => parse_if(args, ctx),
        // Else,<Command>
        CommandKind::Else => {
            let embedded = parse_embedded(args, ctx)?;
            Ok(Payload::Else(Else { embedded: Box::new(embedded), link: Vec::new(), link_parsed: false }).into())
        }
        CommandKind::Begin => Ok(Payload::Begin.into()),
        CommandKind::End => Ok(Payload::End.into()),
        // Set,<VarName>,<Value>,[GLOBAL],[PERMANENT]
        CommandKind::Set | CommandKind::SetMacro => {
            check_arity(kind, args, Arity::Range(2, 3))?;
            let t = Trailing::scan(&args[2..], &["GLOBAL", "PERMANENT"], &[])?;
            let info = SetVariable {
                key: args[0].clone(),
                value: args[1].clone(),
                global: t.flag("GLOBAL"),
                permanent: t.flag("PERMANENT"),
            };
            Ok(match kind {
                CommandKind::Set => Payload::Set(info),
                _ => Payload::SetMacro(info),
            }
            .into())
        }
        // AddVariables,<ScriptFile>,<Section>,[GLOBAL]
        CommandKind::AddVariables => {
            check_arity(kind, args, Arity::Range(2, 3))?;
            let t = Trailing::scan(&args[2..], &["GLOBAL"], &[])?;
            Ok(Payload::AddVariables(AddVariables {
                script_file: args[0].clone(),
                section: args[1].clone(),
                global: t.flag("GLOBAL"),
            })
            .into())
        }
        // Exit,[Message],[NOWARN]
        CommandKind::Exit => {
            check_arity(kind, args, Arity::Range(0, 2))?;
            let no_warn = args.get(1).is_some_and(|a| a.eq_ignore_ascii_case("NOWARN"));
            Ok(Payload::Exit(Exit { message: opt(args, 0), no_warn }).into())
        }
        // Halt,[Message]
        CommandKind::Halt => {
            check_arity(kind, args, Arity::Range(0, 1))?;
            Ok(Payload::Halt(Halt { message: opt(args, 0) }).into())
        }
        CommandKind::Wait => {
            check_arity(kind, args, Arity::Exact(1))?;
            Ok(Payload::Wait(Wait { seconds: args[0].clone() }).into())
        }
        CommandKind::Beep => {
            check_arity(kind, args, Arity::Exact(1))?;
            Ok(Payload::Beep(Beep { beep_type: parse_keyword::<BeepType>(&args[0])? }).into())
        }
        // GetParam,<Index>,<%DestVar%>
        CommandKind::GetParam => {
            check_arity(kind, args, Arity::Exact(2))?;
            let info = GetParam { index: args[0].clone(), dest_var: param_dest(&args[1])? };
            Ok(Parsed::deprecated(
                Payload::GetParam(info),
                "Command [GetParam] is deprecated, use section parameters (#1 ~ #9) instead",
            ))
        }
        // PackParam,<StartIndex>,<%DestVar%>,[%CountVar%]
        CommandKind::PackParam => {
            check_arity(kind, args, Arity::Range(2, 3))?;
            let info = PackParam {
                start_index: args[0].clone(),
                dest_var: param_dest(&args[1])?,
                count_var: args.get(2).map(|a| param_dest(a)).transpose()?,
            };
            Ok(Parsed::deprecated(
                Payload::PackParam(info),
                "Command [PackParam] is deprecated, use section parameters (#1 ~ #9) instead",
            ))
        }
        CommandKind::System => parse_system(args, ctx),
        // ShellExecute,<Action>,<FilePath>,[Params],[WorkDir],[%ExitOutVar%]
        CommandKind::ShellExecute | CommandKind::ShellExecuteEx | CommandKind::ShellExecuteDelete => {
            let max = if kind == CommandKind::ShellExecuteEx { 4 } else { 5 };
            check_arity(kind, args, Arity::Range(2, max))?;
            let info = ShellExecute {
                action: args[0].clone(),
                file_path: args[1].clone(),
                params: opt(args, 2),
                work_dir: opt(args, 3),
                exit_out_var: opt(args, 4),
            };
            Ok(match kind {
                CommandKind::ShellExecute => Payload::ShellExecute(info),
                CommandKind::ShellExecuteEx => Payload::ShellExecuteEx(info),
                _ => Payload::ShellExecuteDelete(info),
            }
            .into())
        }
        CommandKind::Debug => parse_debug(args, ctx),
        _ => Err(ParseError::invalid(format!("Command [{}] is not a control command", kind))),
    }
}

/// Split `In=`/`Out=` parameters; out parameters must be `%Var%`.
fn in_out_params(kind: CommandKind, args: &[String]) -> Result<(Vec<String>, Vec<String>), ParseError> {
    let mut in_params = Vec::new();
    let mut out_params = Vec::new();
    for arg in args {
        if let Some(value) = split_key(arg, "In") {
            in_params.push(value.to_string());
        } else if let Some(value) = split_key(arg, "Out") {
            if variables::detect_type(value) != VarKeyType::Variable {
                return Err(ParseError::invalid(format!(
                    "Out parameter [{}] must be a normal variable enclosed in % characters",
                    value
                )));
            }
            out_params.push(value.to_string());
        } else {
            return Err(ParseError::invalid(format!("Parameter of [{}] must start with [In=] or [Out=]", kind)));
        }
    }
    Ok((in_params, out_params))
}

/// Destination of `GetParam`/`PackParam`, which cannot be a section parameter.
fn param_dest(arg: &str) -> Result<String, ParseError> {
    match variables::detect_type(arg) {
        VarKeyType::Variable => Ok(arg.to_string()),
        VarKeyType::SectionInParams => {
            Err(ParseError::invalid(format!("Section parameter [{}] cannot be used in GetParam", arg)))
        }
        _ => Err(ParseError::InvalidVariable(arg.to_string())),
    }
}

/// `Loop,BREAK` or `Loop,<ScriptFile>,<Section>,<Start>,<End>,[Params...]`
fn parse_loop(kind: CommandKind, args: &[String]) -> Result<Parsed, ParseError> {
    let info = if args.len() == 1 {
        if !args[0].eq_ignore_ascii_case("BREAK") {
            return Err(ParseError::invalid(format!("Invalid form of Command [{}]", kind)));
        }
        Loop::Break
    } else {
        check_arity(kind, args, Arity::AtLeast(4))?;
        let (in_params, out_params) = match kind {
            CommandKind::LoopEx | CommandKind::LoopLetterEx => in_out_params(kind, &args[4..])?,
            _ => (args[4..].to_vec(), Vec::new()),
        };
        Loop::Range(LoopRange {
            script_file: args[0].clone(),
            section: args[1].clone(),
            start: args[2].clone(),
            end: args[3].clone(),
            in_params,
            out_params,
        })
    };
    Ok(match kind {
        CommandKind::Loop => Payload::Loop(info),
        CommandKind::LoopEx => Payload::LoopEx(info),
        CommandKind::LoopLetter => Payload::LoopLetter(info),
        _ => Payload::LoopLetterEx(info),
    }
    .into())
}

/// `If,<Condition>,<Command>`
fn parse_if(args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    if args.len() < 2 {
        return Err(ParseError::invalid("[If] must have form of [If],<Condition>,<Command>"));
    }
    let (condition, skip) = parse_condition(args, ctx.options)?;
    let deprecation = condition.deprecation();
    let embedded = parse_embedded(&args[skip..], ctx)?;
    let info = If { condition, embedded: Box::new(embedded), link: Vec::new(), link_parsed: false };
    Ok(Parsed::from(Payload::If(info)).with_deprecation(deprecation))
}

fn parse_system(args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::System, args, Arity::AtLeast(1))?;
    let sub = parse_keyword::<SystemType>(&args[0])?;
    let a = &args[1..];
    let arity = |n: Arity| check_arity(format!("System,{}", sub), a, n);

    use SystemType as T;
    let info = match sub {
        T::Cursor => {
            arity(Arity::Exact(1))?;
            System::Cursor { state: a[0].clone() }
        }
        T::ErrorOff => {
            arity(Arity::Range(0, 1))?;
            System::ErrorOff { lines: opt(a, 0) }
        }
        T::GetEnv => {
            arity(Arity::Exact(2))?;
            System::GetEnv { env_var: a[0].clone(), dest_var: var(a, 1)? }
        }
        T::GetFreeDrive => {
            arity(Arity::Exact(1))?;
            System::GetFreeDrive { dest_var: var(a, 0)? }
        }
        T::GetFreeSpace => {
            arity(Arity::Exact(2))?;
            System::GetFreeSpace { path: a[0].clone(), dest_var: var(a, 1)? }
        }
        T::IsAdmin => {
            arity(Arity::Exact(1))?;
            System::IsAdmin { dest_var: var(a, 0)? }
        }
        // System,OnBuildExit,<Command>
        T::OnBuildExit | T::OnScriptExit => {
            arity(Arity::AtLeast(1))?;
            let command = Box::new(parse_embedded(a, ctx)?);
            match sub {
                T::OnBuildExit => System::OnBuildExit { command },
                _ => System::OnScriptExit { command },
            }
        }
        T::RefreshInterface | T::RefreshAllScripts | T::RescanScripts | T::SetLocal | T::EndLocal => {
            arity(Arity::Exact(0))?;
            match sub {
                T::RefreshInterface => System::RefreshInterface,
                T::RefreshAllScripts => System::RefreshAllScripts,
                T::RescanScripts => System::RescanScripts,
                T::SetLocal => System::SetLocal,
                _ => System::EndLocal,
            }
        }
        // System,LoadNewScript,<SrcFilePath>,<DestTreeDir>,[PRESERVE],[NOWARN],[NOREC]
        T::LoadNewScript => {
            arity(Arity::Range(2, 5))?;
            let t = Trailing::scan(&a[2..], &["PRESERVE", "NOWARN", "NOREC"], &[])?;
            System::LoadNewScript {
                src_file: a[0].clone(),
                dest_tree_dir: a[1].clone(),
                preserve: t.flag("PRESERVE"),
                no_warn: t.flag("NOWARN"),
                no_rec: t.flag("NOREC"),
            }
        }
        T::RefreshScript => {
            arity(Arity::Range(1, 2))?;
            let t = Trailing::scan(&a[1..], &["NOREC"], &[])?;
            System::RefreshScript { file_path: a[0].clone(), no_rec: t.flag("NOREC") }
        }
        T::SaveLog => {
            arity(Arity::Range(1, 2))?;
            System::SaveLog { dest_path: a[0].clone(), log_format: opt(a, 1) }
        }
        T::HasUAC => {
            arity(Arity::Exact(1))?;
            let info = System::HasUAC { dest_var: var(a, 0)? };
            return Ok(Parsed::deprecated(Payload::System(info), "Command [System,HasUAC] is deprecated"));
        }
        // Accepted for old scripts, no effect.
        T::FileRedirect | T::RegRedirect | T::RebuildVars => {
            let info = match sub {
                T::FileRedirect => System::FileRedirect,
                T::RegRedirect => System::RegRedirect,
                _ => System::RebuildVars,
            };
            return Ok(Parsed::deprecated(
                Payload::System(info),
                format!("Command [System,{}] is deprecated and ignored", sub),
            ));
        }
    };
    Ok(Payload::System(info).into())
}

/// `Debug,Breakpoint,[BranchCondition]`
fn parse_debug(args: &[String], ctx: &Context) -> Result<Parsed, ParseError> {
    check_arity(CommandKind::Debug, args, Arity::AtLeast(1))?;
    let info = match parse_keyword::<DebugType>(&args[0])? {
        DebugType::Breakpoint => {
            let rest = &args[1..];
            let condition = if rest.is_empty() {
                None
            } else {
                let (condition, skip) = parse_condition(rest, ctx.options)?;
                if skip != rest.len() {
                    return Err(ParseError::invalid(
                        "Command [Debug,Breakpoint] cannot have additional arguments after [BranchCondition]",
                    ));
                }
                Some(condition)
            };
            DebugInfo::Breakpoint { condition }
        }
    };
    Ok(Payload::Debug(info).into())
}
