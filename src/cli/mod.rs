//! CLI module - operator commands for Potluck
//!
//! Every command acts with [`crate::domain::AccessContext::Operator`]: admin
//! rights without a user identity.

mod commands;

use clap::{Args, Parser, Subcommand};

/// Potluck - recipe sharing content engine
#[derive(Parser)]
#[command(name = "potluck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file and database
    #[command(alias = "--init")]
    Init,

    /// Browse the feed with the same filters the site uses
    #[command(alias = "ls")]
    Feed(FeedArgs),

    /// Show recipes waiting for moderation
    #[command(alias = "queue")]
    Pending {
        #[arg(default_value_t = 1)]
        page: u64,
    },

    /// Publish a pending recipe
    Activate {
        /// Recipe ID
        id: i32,
    },

    /// Publish every pending recipe
    ActivateAll,

    /// Delete a recipe with its ingredients, tags, ratings and likes
    #[command(alias = "rm")]
    Remove {
        /// Recipe ID
        id: i32,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Rebuild every rating average from the rating rows
    Recompute,

    /// Create an account
    AddUser {
        email: String,
        name: String,
        #[arg(long)]
        password: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
}

/// Filters are passed through as text and parsed like query-string values,
/// so malformed numbers are ignored rather than rejected.
#[derive(Args, Default)]
pub struct FeedArgs {
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub difficulty: Option<String>,
    /// Maximum preparation time in minutes
    #[arg(long)]
    pub max_prep: Option<String>,
    /// Free text over title, category and ingredients
    #[arg(long, short)]
    pub query: Option<String>,
    /// Only recipes by this user ID
    #[arg(long)]
    pub author: Option<String>,
    /// published, all or pending
    #[arg(long)]
    pub scope: Option<String>,
    #[arg(long)]
    pub page: Option<String>,
    #[arg(long)]
    pub page_size: Option<String>,
}

pub use commands::*;
