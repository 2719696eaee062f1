//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::camera::PermissionStatus;

/// Run command arguments.
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Script of intents to execute (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Answer camera permission requests with "denied"
    #[arg(long)]
    pub deny_permission: bool,

    /// Continue after a step fails instead of stopping
    #[arg(short, long)]
    pub keep_going: bool,

    /// Output format for the final photo list
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl RunCommand {
    /// Permission answer the scripted camera should give.
    #[must_use]
    pub fn permission(&self) -> PermissionStatus {
        if self.deny_permission {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
