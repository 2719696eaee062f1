//! Command-line interface for snapbook.
//!
//! This module provides the CLI structure, the session script format and
//! the runner that feeds a script through a [`PhotoApp`].

mod commands;
pub mod script;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;

pub use commands::{ConfigCommand, OutputFormat, RunCommand};
pub use script::{parse_script, Step};

use crate::app::{AppView, PhotoApp};
use crate::camera::Camera;
use crate::error::Result;

/// snapbook - capture, review and label photos
///
/// Drives a photo capture session from a script of intents against a
/// scripted camera and prints the resulting photo list.
#[derive(Debug, Parser)]
#[command(name = "snapbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a capture session script
    Run(RunCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Feed `steps` through `app`, writing notices and `show` output to `out`.
///
/// Notices are printed as `! <message>`. A failing step stops the run
/// unless `keep_going` is set, in which case it is logged and skipped.
///
/// # Errors
///
/// Returns the first step error (without `keep_going`) or any write error.
pub async fn run_steps<C: Camera>(
    app: &mut PhotoApp<C>,
    steps: Vec<Step>,
    keep_going: bool,
    out: &mut impl Write,
) -> Result<()> {
    for (n, step) in steps.into_iter().enumerate() {
        match step {
            Step::Show => write_list(&app.view(), out)?,
            Step::Intent(intent) => {
                if let Err(e) = app.handle(intent.clone()).await {
                    if !keep_going {
                        return Err(e);
                    }
                    warn!(step = n + 1, ?intent, error = %e, "Step failed, continuing");
                }
            }
        }
        for notice in app.take_notices() {
            writeln!(out, "! {notice}")?;
        }
    }
    Ok(())
}

/// Write the photo list in plain text.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_list(view: &AppView, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Photos")?;
    if view.photos.is_empty() {
        writeln!(out, "  (none yet)")?;
    }
    for row in &view.photos {
        writeln!(out, "  {}  <{}>", row.title, row.uri)?;
    }
    Ok(())
}

/// Write the whole view as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(view: &AppView, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, view)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Screen;
    use crate::camera::ScriptedCamera;
    use crate::config::Config;
    use clap::CommandFactory;

    fn app(camera: ScriptedCamera) -> PhotoApp<ScriptedCamera> {
        PhotoApp::new(camera, &Config::default())
    }

    async fn run(
        app: &mut PhotoApp<ScriptedCamera>,
        script: &str,
        keep_going: bool,
    ) -> (Result<()>, String) {
        let steps = parse_script(script).unwrap();
        let mut out = Vec::new();
        let result = run_steps(app, steps, keep_going, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "snapbook");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_script() {
        let cli = Cli::try_parse_from(["snapbook", "run", "--script", "shots.txt"]).unwrap();
        match cli.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.script, Some(PathBuf::from("shots.txt")));
                assert!(!cmd.deny_permission);
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            Command::Config(_) => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "snapbook",
            "run",
            "--deny-permission",
            "--keep-going",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Run(cmd) = cli.command else {
            panic!("expected run");
        };
        assert!(cmd.deny_permission);
        assert!(cmd.keep_going);
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["snapbook", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["snapbook", "-vv", "-c", "/tmp/c.toml", "config", "path"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[tokio::test]
    async fn test_run_script_end_to_end() {
        let mut app = app(ScriptedCamera::granting());
        let script = "start\ntake\nretake\ntake\nsave\nlabel Sunset\ndone\nshow\n";
        let (result, out) = run(&mut app, script, false).await;

        result.unwrap();
        assert!(out.contains("1.  Sunset  <file:///snapbook/IMG_0002.jpg>"));
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.view().screen, Screen::List);
    }

    #[tokio::test]
    async fn test_run_prints_notice_on_denial() {
        let mut app = app(ScriptedCamera::denying());
        let (result, out) = run(&mut app, "start\nshow", false).await;

        result.unwrap();
        assert!(out.contains("! Access denied"));
        assert!(out.contains("(none yet)"));
    }

    #[tokio::test]
    async fn test_run_stops_on_error() {
        let mut app = app(ScriptedCamera::granting());
        let (result, _) = run(&mut app, "take\nstart", false).await;

        assert!(result.unwrap_err().is_invalid_transition());
        assert_eq!(app.view().screen, Screen::List);
    }

    #[tokio::test]
    async fn test_run_keep_going() {
        crate::logging::init_test_logging();
        let mut app = app(ScriptedCamera::granting());
        let (result, _) = run(&mut app, "take\nstart", true).await;

        result.unwrap();
        assert_eq!(app.view().screen, Screen::Camera);
    }

    #[test]
    fn test_write_json() {
        let app = app(ScriptedCamera::granting());
        let mut out = Vec::new();
        write_json(&app.view(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["screen"], "list");
        assert_eq!(value["photos"].as_array().unwrap().len(), 0);
    }
}
