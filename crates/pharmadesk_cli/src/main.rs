//! Command-line front end for the notes core.
//!
//! # Responsibility
//! - Resolve the acting user and storage location from flags/environment.
//! - Translate subcommands into `NoteService` calls and print JSON results.
//! - Map service error kinds to stable process exit codes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use pharmadesk_core::db::open_db;
use pharmadesk_core::{
    default_log_level, init_logging, ErrorKind, NewNote, NoteColor, NoteId, NotePatch,
    NoteService, NoteServiceError, Priority, SqliteNoteRepository, UserId,
};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "pharmadesk.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "pharmadesk")]
#[command(version, about = "Personal sticky notes for the pharmacy back office")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "PHARMADESK_DB", default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "PHARMADESK_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "PHARMADESK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Identity acting on the notes
    #[arg(long = "as", value_name = "USER", env = "PHARMADESK_USER")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List your notes, pinned first
    #[command(alias = "ls")]
    List,

    /// Create a note
    Create {
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_parser = parse_color)]
        color: Option<NoteColor>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Show one of your notes
    Show { id: NoteId },

    /// Change only the given fields of a note
    Update {
        id: NoteId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_parser = parse_color)]
        color: Option<NoteColor>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
        #[arg(long)]
        pinned: Option<bool>,
    },

    /// Delete a note permanently
    #[command(alias = "rm")]
    Delete { id: NoteId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let requester = UserId::new(cli.user).context("invalid --as user")?;
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
    info!("event=cli_command module=cli status=start command={}", command_name(&cli.command));

    match cli.command {
        Command::List => print_json(&service.list_notes(&requester)?),
        Command::Create {
            title,
            content,
            color,
            priority,
        } => {
            let draft = NewNote {
                title,
                content,
                color,
                priority,
            };
            print_json(&service.create_note(&requester, draft)?)
        }
        Command::Show { id } => print_json(&service.get_note(&requester, id)?),
        Command::Update {
            id,
            title,
            content,
            color,
            priority,
            pinned,
        } => {
            let patch = NotePatch {
                title,
                content,
                color,
                priority,
                is_pinned: pinned,
            };
            print_json(&service.update_note(&requester, id, patch)?)
        }
        Command::Delete { id } => {
            service.delete_note(&requester, id)?;
            print_json(&serde_json::json!({ "message": "note deleted", "id": id }))
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Create { .. } => "create",
        Command::Show { .. } => "show",
        Command::Update { .. } => "update",
        Command::Delete { .. } => "delete",
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<NoteServiceError>().map(NoteServiceError::kind) {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Unauthorized) => 4,
        Some(ErrorKind::Persistence) | None => 1,
    }
}

fn parse_color(value: &str) -> Result<NoteColor, String> {
    value.parse().map_err(|err: pharmadesk_core::NoteValidationError| err.to_string())
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    value.parse().map_err(|err: pharmadesk_core::NoteValidationError| err.to_string())
}
