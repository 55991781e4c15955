//! Command-line interface for the Holywins admin backend.

mod commands;

use clap::{Parser, Subcommand};

/// Holywins - admin backend for the Holywins event site
#[derive(Parser)]
#[command(name = "holywins")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List the most recent user accounts
    #[command(alias = "ls")]
    Users,

    /// Set a new password for an account without the old one
    ResetPassword {
        /// Account to reset
        #[arg(long, default_value = "admin")]
        username: String,
        /// New password (at least 6 characters)
        #[arg(long)]
        password: String,
    },
}

pub use commands::*;
