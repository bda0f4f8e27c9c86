pub mod api_client;
mod commands;
pub mod error;
mod utils;

#[cfg(test)]
mod test_server;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

#[derive(Parser)]
#[command(name = "pcat")]
#[command(author, version, about = "Prompt catalogue CLI", long_about = None)]
pub struct Cli {
    /// Override the API URL (default: PCAT_API_URL env or http://localhost:5312)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Value sent in the Auth-Token header
    #[arg(long, global = true, env = "PCAT_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk download and upload of the whole catalogue
    Prompts {
        #[command(subcommand)]
        command: PromptCommands,
    },
    /// Theme commands
    Themes {
        #[command(subcommand)]
        command: ThemeCommands,
    },
    /// Use case commands
    UseCases {
        #[command(subcommand)]
        command: UseCaseCommands,
    },
}

#[derive(Subcommand)]
enum PromptCommands {
    /// Download every prompt as a JSON array
    Pull {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the catalogue with the prompts in a JSON file
    Push {
        /// JSON array of prompt rows, as written by `pull`
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// List themes in display order
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum UseCaseCommands {
    /// List the use cases of a theme in display order
    List {
        /// Theme uuid
        theme_uuid: String,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let api_client = api_client::ApiClient::new(cli.api_url, cli.auth_token);

    let output = match cli.command {
        Some(Commands::Prompts { command }) => match command {
            PromptCommands::Pull { output } => {
                commands::prompts::pull(&api_client, output.as_deref()).await?
            }
            PromptCommands::Push { file } => commands::prompts::push(&api_client, &file).await?,
        },
        Some(Commands::Themes { command }) => match command {
            ThemeCommands::List { format } => {
                commands::themes::list_themes(&api_client, &format).await?
            }
        },
        Some(Commands::UseCases { command }) => match command {
            UseCaseCommands::List { theme_uuid, format } => {
                commands::use_cases::list_use_cases(&api_client, &theme_uuid, &format).await?
            }
        },
        None => {
            // Show help when no command provided
            let _ = Cli::parse_from(["pcat", "--help"]);
            return Ok(());
        }
    };

    println!("{}", output);
    Ok(())
}
