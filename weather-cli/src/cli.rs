use anyhow::Context;
use cityweather_core::{Config, Phase, WeatherCoordinator, client_from_config};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key and endpoint.
    Configure,

    /// Show current weather for a city and exit.
    Show {
        /// City name, passed to the API as typed.
        city: String,

        /// Print the report as JSON instead of a card.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities repeatedly; `:q` or Ctrl-D quits.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => show(city, json).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn coordinator_from_env() -> anyhow::Result<WeatherCoordinator> {
    let cfg = Config::load_with_env()?;
    let api_key = cfg.api_key()?;
    let client = client_from_config(&cfg)?;
    Ok(WeatherCoordinator::new(client, api_key))
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let base_url = Text::new("API base URL:")
        .with_default(cfg.base_url())
        .prompt()
        .context("Failed to read base URL")?;

    // Blank answers clear the field so the built-in key and default URL apply.
    cfg.api_key = non_blank(&api_key);
    cfg.base_url = non_blank(&base_url);
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: String, json: bool) -> anyhow::Result<()> {
    let coordinator = coordinator_from_env()?;
    coordinator.set_city(city);
    coordinator.fetch().finished().await;

    let state = coordinator.state();
    match &state.phase {
        Phase::Success(report) if json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
        Phase::Error(err) => Err(err.clone().into()),
        _ => {
            println!("{}", render(&state));
            Ok(())
        }
    }
}

async fn interactive() -> anyhow::Result<()> {
    let coordinator = coordinator_from_env()?;
    let mut rx = coordinator.subscribe();

    println!("{}", render(&coordinator.state()));

    while let Some(city) = prompt_city().await? {
        coordinator.set_city(city);
        let handle = coordinator.fetch();

        let mut shown: Option<Phase> = None;
        loop {
            let state = rx.borrow_and_update().clone();
            if shown.as_ref() != Some(&state.phase) {
                println!("{}", render(&state));
                shown = Some(state.phase.clone());
            }
            if !state.is_loading() || rx.changed().await.is_err() {
                break;
            }
        }

        handle.finished().await;
    }

    Ok(())
}

/// `None` when the user asks to quit.
async fn prompt_city() -> anyhow::Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| Text::new("City:").prompt()).await?;

    match answer {
        Ok(line) if line.trim() == ":q" => Ok(None),
        Ok(line) => Ok(Some(line)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read city"),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_configure_answers_are_not_saved() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(" KEY "), Some("KEY".to_string()));
    }
}
