//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in the submodules.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::model::UserHandle;
use crate::output::OutputOptions;
use crate::service::TaskService;
use crate::store::FileTaskStore;
use crate::users::UserRegistry;

mod config_cmd;
mod task;
mod user;

/// todo - personal task manager
///
/// Register once, then add, complete, delete, search, filter and sort your
/// own tasks. Every user sees only their own tasks.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding .todo.toml, users.json and todos.json
    #[arg(long, global = true, env = "TODO_HOME")]
    pub home: Option<PathBuf>,

    /// Username to act as
    #[arg(short, long, global = true, env = "TODO_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(short, long, global = true, env = "TODO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register the --user/--password pair as a new user
    Register,

    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: LOW, MEDIUM or HIGH
        #[arg(long, default_value = "MEDIUM")]
        priority: String,

        /// Due date: "yyyy-MM-dd HH:mm" or "yyyy-MM-dd"
        #[arg(long)]
        due: String,
    },

    /// List all tasks
    List {
        /// Sort field: priority, dueAt or createdAt (default from config)
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show one task
    Show {
        /// Task ID
        id: u64,
    },

    /// Mark a task completed
    Done {
        /// Task ID
        id: u64,

        /// Mark it not completed instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u64,
    },

    /// Case-insensitive search in titles and descriptions
    Search {
        /// Text to look for
        keyword: String,
    },

    /// Filter tasks; all given criteria must match
    Filter {
        /// Completion state (true/false)
        #[arg(long)]
        completed: Option<bool>,

        /// Priority: LOW, MEDIUM or HIGH
        #[arg(long)]
        priority: Option<String>,

        /// Start of the due range, inclusive
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// End of the due range, inclusive
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Configuration file management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default .todo.toml into the data directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let session = Session {
            home: self.home,
            user: self.user,
            password: self.password,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        };

        match self.command {
            Commands::Register => user::run_register(&session),
            Commands::Add {
                title,
                description,
                priority,
                due,
            } => task::run_add(
                &session,
                task::AddOptions {
                    title,
                    description,
                    priority,
                    due,
                },
            ),
            Commands::List { sort } => task::run_list(&session, sort.as_deref()),
            Commands::Show { id } => task::run_show(&session, id),
            Commands::Done { id, undo } => task::run_done(&session, id, !undo),
            Commands::Delete { id } => task::run_delete(&session, id),
            Commands::Search { keyword } => task::run_search(&session, &keyword),
            Commands::Filter {
                completed,
                priority,
                from,
                to,
            } => task::run_filter(
                &session,
                task::FilterOptions {
                    completed,
                    priority,
                    from,
                    to,
                },
            ),
            Commands::Config(ConfigCommands::Show) => config_cmd::run_show(&session),
            Commands::Config(ConfigCommands::Init { force }) => {
                config_cmd::run_init(&session, force)
            }
        }
    }
}

/// Global flags shared by every command
pub(crate) struct Session {
    pub home: Option<PathBuf>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub output: OutputOptions,
}

impl Session {
    pub fn home(&self) -> PathBuf {
        config::resolve_home(self.home.as_deref())
    }

    pub fn credentials(&self) -> Result<(&str, &str)> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("--user (or TODO_USER) is required".to_string()))?;
        let password = self.password.as_deref().ok_or_else(|| {
            Error::InvalidArgument("--password (or TODO_PASSWORD) is required".to_string())
        })?;
        Ok((user, password))
    }
}

/// Everything a command needs once the data directory is known
pub(crate) struct Context {
    pub home: PathBuf,
    pub config: Config,
    pub users: UserRegistry,
    pub tasks: TaskService<FileTaskStore>,
}

impl Context {
    pub fn load(home: &Path) -> Result<Self> {
        let config = Config::load_from_dir(home)?;
        let timeout = config.storage.lock_timeout_ms;
        let users = UserRegistry::with_lock_timeout(config.users_path(home), timeout);
        let store = FileTaskStore::with_lock_timeout(config.tasks_path(home), timeout);
        tracing::debug!(home = %home.display(), "loaded context");
        Ok(Self {
            home: home.to_path_buf(),
            config,
            users,
            tasks: TaskService::new(store),
        })
    }

    /// Authenticate the session's credentials
    pub fn login(&self, session: &Session) -> Result<UserHandle> {
        let (username, password) = session.credentials()?;
        self.users
            .authenticate(username, password)?
            .ok_or_else(|| Error::AuthFailed(username.to_string()))
    }
}
