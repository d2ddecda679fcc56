// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! `flowkeep` operator CLI: offline font checks, ledger export from a local
//! store and admin passcode bootstrap.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use clap::{error::ErrorKind, ArgAction, Parser, Subcommand, ValueEnum};
use flowkeep_core::{ErrorCode, ExitCode, MachineError};
use flowkeep_fontcheck::{FontCheckError, MissingFilePolicy};
use flowkeep_store::StoreError;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

pub const CRATE_NAME: &str = "flowkeep-cli";

#[derive(Parser)]
#[command(name = "flowkeep")]
#[command(about = "Flowkeep event ledger operations CLI")]
#[command(after_help = "Environment:\n  RUST_LOG   Log filter override (logs go to stderr)")]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether text renders in Kiwi Maru using the character lists.
    CheckFont {
        #[arg(long)]
        supported: PathBuf,
        #[arg(long)]
        unsupported: PathBuf,
        #[arg(long, value_enum, default_value_t = OnMissingCli::Fallback)]
        on_missing: OnMissingCli,
        text: String,
    },
    /// Write a project's ledger as an xlsx workbook.
    Export {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        project: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Set the admin passcode in a local store.
    InitAdmin {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        passcode: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnMissingCli {
    Fallback,
    Error,
}

impl From<OnMissingCli> for MissingFilePolicy {
    fn from(value: OnMissingCli) -> Self {
        match value {
            OnMissingCli::Fallback => Self::Fallback,
            OnMissingCli::Error => Self::Error,
        }
    }
}

#[derive(Clone, Copy)]
struct LogFlags {
    quiet: bool,
    verbose: u8,
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    json: bool,
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    pub(crate) fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            exit_code: code.exit_code(),
            machine: MachineError::new(code, message),
        }
    }

    fn usage(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new(ErrorCode::InvalidInput, message),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::Internal, message)
    }

    pub(crate) fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.machine = self.machine.with_detail(key, value);
        self
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::from_code(err.code.as_error_code(), err.message.clone())
            .with_detail("store_code", err.code.as_str())
    }
}

impl From<FontCheckError> for CliError {
    fn from(err: FontCheckError) -> Self {
        let code = match &err {
            FontCheckError::InvalidInput => ErrorCode::InvalidInput,
            FontCheckError::ListUnavailable { .. } => ErrorCode::NotConfigured,
            _ => ErrorCode::Internal,
        };
        Self::from_code(code, err.to_string())
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"Internal\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}

pub(crate) fn emit_ok(output_mode: OutputMode, payload: &Value) -> Result<(), CliError> {
    let rendered = if output_mode.json {
        serde_json::to_string(payload)
    } else {
        serde_json::to_string_pretty(payload)
    };
    println!("{}", rendered.map_err(|e| CliError::internal(e.to_string()))?);
    Ok(())
}

fn init_logging(flags: LogFlags) {
    let default_level = if flags.verbose > 1 {
        "trace"
    } else if flags.verbose == 1 {
        "debug"
    } else if flags.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError::usage("invalid command line arguments")
                    .with_detail("error", &err.to_string()));
            }
        },
    };
    init_logging(LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
    });
    let output_mode = OutputMode { json: cli.json };
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(format!("failed to start runtime: {e}")))?;
    runtime.block_on(async move {
        match command {
            Commands::CheckFont {
                supported,
                unsupported,
                on_missing,
                text,
            } => {
                commands::check_font(supported, unsupported, on_missing.into(), &text, output_mode)
                    .await
            }
            Commands::Export {
                store,
                project,
                out,
            } => commands::export(store, &project, out, output_mode).await,
            Commands::InitAdmin { store, passcode } => {
                commands::init_admin(store, &passcode, output_mode).await
            }
        }
    })
}
