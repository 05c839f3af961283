//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Project-scoped issue tracker (`SQLite`)
#[derive(Parser, Debug)]
#[command(name = "spd", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (auto-discover .spindle/ if not set)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Acting username for the audit trail
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a spindle workspace
    Init {
        /// Overwrite an existing workspace
        #[arg(long)]
        force: bool,
    },

    /// Manage registered users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage projects and membership
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Create a new issue
    Create(CreateArgs),

    /// Update an issue
    Update(UpdateArgs),

    /// List a project's issues in board order
    List(ListArgs),

    /// Show issue details
    Show {
        /// Issue references (id or KEY-N)
        refs: Vec<String>,
    },

    /// Reorder issues on the board
    Reorder(ReorderArgs),

    /// Show an issue's change history
    History {
        /// Issue reference (id or KEY-N)
        issue: String,
    },

    /// Manage comments
    #[command(alias = "comments")]
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user
    Add(UserAddArgs),
    /// Show a user
    Show {
        /// Username
        username: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct UserAddArgs {
    /// Username (1-50 chars, letters/digits/._-)
    pub username: String,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Create(ProjectCreateArgs),
    /// Show a project with its members
    Show {
        /// Project key (e.g. PROJ)
        key: String,
    },
    /// Add a member to a project
    #[command(name = "add-member")]
    AddMember {
        /// Project key
        key: String,
        /// Username to add
        username: String,
    },
    /// Delete a project and everything in it (owner only)
    Delete {
        /// Project key
        key: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProjectCreateArgs {
    /// Project name
    pub name: String,

    /// Short unique key (e.g. PROJ)
    #[arg(long, short = 'k')]
    pub key: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Project key (e.g. PROJ)
    pub project: String,

    /// Issue title
    pub title: String,

    /// Issue type (bug, task, story)
    #[arg(long = "type", short = 't')]
    pub type_: Option<String>,

    /// Priority (low, medium, high, critical)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Status (todo, `in_progress`, review, done)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Assign to user
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Issue reference (id or KEY-N)
    pub issue: String,

    /// Update title
    #[arg(long)]
    pub title: Option<String>,

    /// Update description (empty string clears)
    #[arg(long, visible_alias = "body")]
    pub description: Option<String>,

    /// Change issue type
    #[arg(long = "type", short = 't')]
    pub type_: Option<String>,

    /// Change priority
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Change status
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Assign to user (empty string clears)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Project key (e.g. PROJ)
    pub project: String,
}

#[derive(Args, Debug, Default)]
pub struct ReorderArgs {
    /// Reorder items, `REF=POSITION` pairs (e.g. `PROJ-3=0 PROJ-1=1`)
    pub items: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Add a comment to an issue
    Add {
        /// Issue reference (id or KEY-N)
        issue: String,
        /// Comment text
        text: Vec<String>,
    },
    /// List an issue's comments
    List {
        /// Issue reference (id or KEY-N)
        issue: String,
    },
}
