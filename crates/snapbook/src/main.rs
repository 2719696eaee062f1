//! `snapbook` - CLI for the snapbook capture core
//!
//! This binary runs capture session scripts against a scripted camera and
//! inspects configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::info;

use snapbook::cli::{self, Cli, Command, ConfigCommand, OutputFormat, RunCommand};
use snapbook::{init_logging, Config, PhotoApp, ScriptedCamera};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Run(run_cmd) => handle_run(&config, run_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_run(config: &Config, cmd: RunCommand) -> anyhow::Result<()> {
    let source = match &cmd.script {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut source = String::new();
            tokio::io::stdin()
                .read_to_string(&mut source)
                .await
                .context("reading script from stdin")?;
            source
        }
    };
    let steps = cli::parse_script(&source)?;

    let camera = ScriptedCamera::with_permission(cmd.permission())
        .with_uri_prefix(config.camera.uri_prefix.clone());
    let mut app = PhotoApp::new(camera, config);
    info!(steps = steps.len(), "Running capture session");

    let mut stdout = std::io::stdout().lock();
    cli::run_steps(&mut app, steps, cmd.keep_going, &mut stdout).await?;

    match cmd.format {
        OutputFormat::Plain => cli::write_list(&app.view(), &mut stdout)?,
        OutputFormat::Json => cli::write_json(&app.view(), &mut stdout)?,
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Labels]");
                println!("  Policy:             {:?}", config.labels.policy);
                println!("  Max length:         {}", config.labels.max_length);
                println!();
                println!("[Camera]");
                println!(
                    "  Permission timeout: {}",
                    describe_timeout(config.camera.permission_timeout_ms)
                );
                println!(
                    "  Capture timeout:    {}",
                    describe_timeout(config.camera.capture_timeout_ms)
                );
                println!("  URI prefix:         {}", config.camera.uri_prefix);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn describe_timeout(ms: u64) -> String {
    if ms == 0 {
        "none".to_string()
    } else {
        format!("{ms} ms")
    }
}
