//! Command-line front end for PEBakery-style scripts.
//!
//! Parses scripts into their folded, optimized command trees and checks
//! whole scripts for syntax errors without running them.
//!
//! # Usage
//!
//! ```bash
//! # Print the command tree of every code section
//! bakery parse Setup.script
//!
//! # A single section, as JSON, without batching
//! bakery parse Setup.script --section Process --json --no-optimize
//!
//! # Check every script under a directory
//! bakery check "Projects/**/*.script"
//!
//! # Accept constructs only old scripts use
//! bakery check Legacy.script --legacy
//!
//! # Show or create ~/.bakery/config.json
//! bakery config show
//! bakery config init
//!
//! # Shell completions
//! bakery completions zsh > _bakery
//! ```

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bakery_core::checker::{CheckReport, CheckResult, SyntaxChecker};
use bakery_core::config::{BakeryConfig, ParserOptions};
use bakery_core::error::ScriptError;
use bakery_core::parser::{parse_section, LogState};
use bakery_core::section::Script;
use clap::{CommandFactory, Parser, Subcommand};
use tokio::task::JoinSet;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::render::Renderer;

/// Parser and syntax checker for PEBakery-style scripts.
#[derive(Parser)]
#[command(name = "bakery")]
#[command(about = "Parse and check PEBakery-style automation scripts")]
#[command(version)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true, env = "BAKERY_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a script and print its command tree
    Parse {
        /// Path to the .script file
        script: PathBuf,
        /// Only parse this section
        #[arg(short, long)]
        section: Option<String>,
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
        /// Skip batching of same-resource commands
        #[arg(long)]
        no_optimize: bool,
        /// Enable every legacy compatibility switch
        #[arg(long, env = "BAKERY_LEGACY")]
        legacy: bool,
    },

    /// Check scripts for syntax errors, following calls from [Process]
    Check {
        /// Script paths or glob patterns
        #[arg(required = true)]
        patterns: Vec<String>,
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
        /// Enable every legacy compatibility switch
        #[arg(long, env = "BAKERY_LEGACY")]
        legacy: bool,
    },

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn init_tracing(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let target = log_file.and_then(|path| Some((path.parent()?, path.file_name()?)));

    match target {
        Some((dir, name)) => {
            let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
            let file_appender = tracing_appender::rolling::never(dir, name);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file_appender)
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[derive(Debug)]
enum CliError {
    /// Parse errors or failed checks.
    Findings(String),
    /// A script could not be read.
    Io(String),
    Config(String),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Findings(_) => ExitCode::from(1),
            CliError::Io(_) => ExitCode::from(2),
            CliError::Config(_) => ExitCode::from(3),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Findings(msg) => write!(f, "{}", msg),
            CliError::Io(msg) => write!(f, "I/O error: {}", msg),
            CliError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl From<ScriptError> for CliError {
    fn from(e: ScriptError) -> Self {
        CliError::Io(e.to_string())
    }
}

/// Options from the config file, overridden by command-line switches.
fn parser_options(legacy: bool, no_optimize: bool) -> ParserOptions {
    let configured = BakeryConfig::load().parser;
    let mut options = if legacy {
        ParserOptions { optimize_code: configured.optimize_code, ..ParserOptions::legacy() }
    } else {
        configured
    };
    if no_optimize {
        options.optimize_code = false;
    }
    options
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Parse { script, section, json, no_optimize, legacy } => {
            parse_script(&script, section.as_deref(), json, parser_options(legacy, no_optimize))
        }
        Command::Check { patterns, json, legacy } => {
            check_scripts(&patterns, json, parser_options(legacy, false)).await
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let config = BakeryConfig::load();
                let json = serde_json::to_string_pretty(&config).map_err(|e| CliError::Config(e.to_string()))?;
                println!("{}", json);
                Ok(())
            }
            ConfigAction::Init { force } => {
                let path = BakeryConfig::path();
                if path.exists() && !force {
                    return Err(CliError::Config(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }
                BakeryConfig::default().save().map_err(|e| CliError::Config(e.to_string()))?;
                println!("Wrote {}", path.display());
                Ok(())
            }
        },
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "bakery", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn parse_script(path: &Path, section: Option<&str>, json: bool, options: ParserOptions) -> Result<(), CliError> {
    let script = Script::load(path)?;
    let sections = match section {
        Some(name) => {
            let found = script
                .section(name)
                .ok_or_else(|| ScriptError::SectionNotFound(name.to_string()))?;
            vec![found]
        }
        None => script.code_sections().collect(),
    };

    let mut errors = 0;
    let mut parsed = Vec::with_capacity(sections.len());
    for section in sections {
        let output = parse_section(section, options);
        errors += output.logs.iter().filter(|l| l.state == LogState::Error).count();
        parsed.push((section.name(), output));
    }
    info!(path = %path.display(), sections = parsed.len(), errors, "script parsed");

    if json {
        let sections: Vec<serde_json::Value> = parsed
            .iter()
            .map(|(name, output)| {
                serde_json::json!({ "name": name, "commands": output.commands, "logs": output.logs })
            })
            .collect();
        let value = serde_json::json!({ "path": path, "sections": sections });
        let text = serde_json::to_string_pretty(&value).map_err(|e| CliError::Io(e.to_string()))?;
        println!("{}", text);
    } else {
        for (name, output) in &parsed {
            println!("{}", Renderer::section(name, output));
        }
    }

    if errors > 0 {
        Err(CliError::Findings(format!("{} error(s) in {}", errors, path.display())))
    } else {
        Ok(())
    }
}

/// Literal paths pass through; patterns expand to their matches.
fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches: Vec<PathBuf> = glob::glob(pattern).into_iter().flatten().filter_map(Result::ok).collect();
        if matches.is_empty() {
            paths.push(PathBuf::from(pattern));
        } else {
            paths.extend(matches);
        }
    }
    paths.sort();
    paths.dedup();
    paths
}

async fn check_scripts(patterns: &[String], json: bool, options: ParserOptions) -> Result<(), CliError> {
    let paths = expand_patterns(patterns);
    debug!(scripts = paths.len(), "checking scripts");

    let mut set = JoinSet::new();
    for path in paths {
        set.spawn_blocking(move || -> Result<CheckReport, ScriptError> {
            let script = Script::load(&path)?;
            Ok(SyntaxChecker::new(&script, options).validate())
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = set.join_next().await {
        let report = joined.map_err(|e| CliError::Io(e.to_string()))??;
        reports.push(report);
    }
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    if json {
        let value = serde_json::json!({ "checked_at": now, "reports": reports });
        let text = serde_json::to_string_pretty(&value).map_err(|e| CliError::Io(e.to_string()))?;
        println!("{}", text);
    } else {
        println!("Checked {} script(s) at {}", reports.len(), now);
        for report in &reports {
            print!("{}", Renderer::report(report));
        }
    }

    let failed = reports.iter().filter(|r| r.result == CheckResult::Error).count();
    if failed > 0 {
        Err(CliError::Findings(format!("{} of {} script(s) failed the check", failed, reports.len())))
    } else {
        Ok(())
    }
}
