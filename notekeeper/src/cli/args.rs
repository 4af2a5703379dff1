// src/cli/args.rs
use crate::application::Route;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API root URL, overrides the config file
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Session file, overrides the config file
    #[arg(long, value_name = "PATH", global = true)]
    pub session_file: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Remove the stored session token
    Logout,

    /// Show whether a session token is stored
    Status,

    /// Ask the server who the stored token belongs to
    Whoami,

    /// List notes
    List {
        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one note
    Show {
        #[arg(value_name = "NOTE_ID")]
        id: String,

        /// Output note as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a note
    New {
        #[arg(short, long)]
        title: String,
        #[arg(long)]
        content: String,
    },

    /// Change the title and/or content of a note
    Edit {
        #[arg(value_name = "NOTE_ID")]
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        id: String,
    },

    /// Navigate to a route path (e.g. /home, /edit-note/42) and show the view
    Open {
        #[arg(value_name = "PATH", default_value = "/")]
        path: String,
    },
}

impl Command {
    /// Name for logs; never includes argument values.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Signup { .. } => "signup",
            Command::Logout => "logout",
            Command::Status => "status",
            Command::Whoami => "whoami",
            Command::List { .. } => "list",
            Command::Show { .. } => "show",
            Command::New { .. } => "new",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::Open { .. } => "open",
        }
    }

    /// The view a command acts through. Commands without one touch only
    /// the local session or the token endpoint.
    pub fn route(&self) -> Option<Route> {
        match self {
            Command::Login { .. } => Some(Route::Login),
            Command::Signup { .. } => Some(Route::Signup),
            Command::List { .. } | Command::Show { .. } | Command::Delete { .. } => Some(Route::Home),
            Command::New { .. } => Some(Route::NewNote),
            Command::Edit { id, .. } => Some(Route::EditNote(id.clone())),
            Command::Logout | Command::Status | Command::Whoami | Command::Open { .. } => None,
        }
    }
}
