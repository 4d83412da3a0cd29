//! # Gemini Studio
//!
//! Terminal chat and prompt composer for Gemini models.
//!
//! ## Modes
//! - Interactive chat (TUI) when run without arguments
//! - Single prompt with `-p` / `--prompt`
//! - `compose`: structured prompt from a template and fields
//! - `models`, `templates`, `config`, `completions`

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands, ConfigSubcommand, TemplatesSubcommand};

fn load_config_or_exit(model: Option<String>) -> core::config::Config {
    match core::config::load() {
        Ok(config) => config.with_model(model),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);
    log::debug!("{} {} starting", core::app::NAME, core::app::VERSION);

    match &args.command {
        Some(Commands::Config { subcommand }) => {
            match subcommand {
                Some(ConfigSubcommand::SetApiKey { api_key }) => {
                    core::cli::run_config_set_api_key(api_key.clone())
                }
                None => core::cli::run_config(),
            }
            return Ok(());
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Args::command();
            cli::generate(*shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Templates { subcommand, query }) => {
            match subcommand {
                Some(TemplatesSubcommand::Show { name }) => core::cli::run_template_show(name),
                None => core::cli::run_templates(query.as_deref()),
            }
            return Ok(());
        }
        Some(Commands::Compose(compose)) if compose.dry_run => {
            return run::run_compose(&args, compose, None).await;
        }
        _ => {}
    }

    // Everything below talks to the API: the credential is required.
    let config = load_config_or_exit(args.model.clone());
    log::debug!("{:?}", config);

    match &args.command {
        Some(Commands::Compose(compose)) => run::run_compose(&args, compose, Some(&config)).await,
        Some(Commands::Models { probe, query }) => {
            core::cli::run_models(&config, *probe, query.as_deref()).await;
            Ok(())
        }
        _ => match &args.prompt {
            Some(prompt) => run::run_single_prompt(&args, prompt, &config).await,
            None => run::launch_tui(config).await,
        },
    }
}
