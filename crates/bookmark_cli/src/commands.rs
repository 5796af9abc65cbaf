//! Command definitions and dispatch.
//!
//! Every bookmark and profile command takes the caller id through `--user`;
//! the CLI stands in for an already-authenticated transport.

use bookmark_core::db::{clean_db, open_db, DbError};
use bookmark_core::{
    BookmarkPatch, BookmarkService, BookmarkServiceError, NewBookmark, RepoError,
    SqliteBookmarkRepository, SqliteUserRepository, UserId, UserPatch, UserService,
    UserServiceError,
};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Owner-scoped bookmark store.
#[derive(Debug, Parser)]
#[command(name = "bookmarks", version)]
pub struct Cli {
    /// SQLite database file. Overrides BOOKMARK_DB_PATH.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error). Overrides BOOKMARK_LOG_LEVEL.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Overrides BOOKMARK_LOG_DIR.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the caller's bookmarks
    List(Caller),
    /// Show one bookmark
    Get {
        #[command(flatten)]
        caller: Caller,
        id: i64,
    },
    /// Create a bookmark
    Add {
        #[command(flatten)]
        caller: Caller,
        #[arg(long)]
        title: String,
        #[arg(long)]
        link: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change some fields of a bookmark
    Edit {
        #[command(flatten)]
        caller: Caller,
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a bookmark
    Rm {
        #[command(flatten)]
        caller: Caller,
        id: i64,
    },
    /// Profile commands
    #[command(subcommand)]
    User(UserCommand),
    /// Delete every user and bookmark
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a profile and print its id
    Register { email: String },
    /// Show the caller's profile
    Me(Caller),
    /// Change some fields of the caller's profile
    Edit {
        #[command(flatten)]
        caller: Caller,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
}

/// Trusted caller identity.
#[derive(Debug, Args)]
pub struct Caller {
    /// Numeric id of the authenticated user
    #[arg(long = "user")]
    pub user_id: UserId,
}

/// CLI failure carrying the status a transport layer would answer with.
#[derive(Debug)]
pub struct CliError {
    pub status: u16,
    pub message: String,
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "status={} error={}", self.status, self.message)
    }
}

impl From<BookmarkServiceError> for CliError {
    fn from(value: BookmarkServiceError) -> Self {
        Self {
            status: value.http_status(),
            message: value.to_string(),
        }
    }
}

impl From<UserServiceError> for CliError {
    fn from(value: UserServiceError) -> Self {
        Self {
            status: value.http_status(),
            message: value.to_string(),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        BookmarkServiceError::from(value).into()
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self {
            status: 500,
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self {
            status: 500,
            message: value.to_string(),
        }
    }
}

/// Runs one command against the database at `db_path` and returns the
/// JSON rendering of its result.
pub fn execute(command: Command, db_path: &Path) -> Result<String, CliError> {
    let mut conn = open_db(db_path)?;

    match command {
        Command::Reset => {
            clean_db(&mut conn)?;
            render(&serde_json::json!({ "reset": true }))
        }
        Command::User(user_command) => run_user_command(&conn, user_command),
        Command::List(caller) => render(&bookmarks(&conn)?.list_bookmarks(caller.user_id)?),
        Command::Get { caller, id } => {
            render(&bookmarks(&conn)?.get_bookmark(caller.user_id, id)?)
        }
        Command::Add {
            caller,
            title,
            link,
            description,
        } => {
            let data = NewBookmark {
                title,
                link,
                description,
            };
            render(&bookmarks(&conn)?.create_bookmark(caller.user_id, &data)?)
        }
        Command::Edit {
            caller,
            id,
            title,
            link,
            description,
        } => {
            let patch = BookmarkPatch {
                title,
                description,
                link,
            };
            render(&bookmarks(&conn)?.edit_bookmark_by_id(caller.user_id, id, &patch)?)
        }
        Command::Rm { caller, id } => {
            render(&bookmarks(&conn)?.delete_bookmark_by_id(caller.user_id, id)?)
        }
    }
}

fn bookmarks(conn: &Connection) -> Result<BookmarkService<SqliteBookmarkRepository<'_>>, CliError> {
    Ok(BookmarkService::new(SqliteBookmarkRepository::try_new(conn)?))
}

fn run_user_command(conn: &Connection, command: UserCommand) -> Result<String, CliError> {
    let service = UserService::new(SqliteUserRepository::try_new(conn)?);
    match command {
        UserCommand::Register { email } => render(&service.register_user(&email)?),
        UserCommand::Me(caller) => render(&service.get_me(caller.user_id)?),
        UserCommand::Edit {
            caller,
            email,
            first_name,
            last_name,
        } => {
            let patch = UserPatch {
                email,
                first_name,
                last_name,
            };
            render(&service.edit_user(caller.user_id, &patch)?)
        }
    }
}

fn render(value: &impl Serialize) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
