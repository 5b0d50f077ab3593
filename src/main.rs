use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "pulse")]
#[command(version)]
#[command(about = "Presence registry and live SVG status badges", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the heartbeat and badge HTTP server
    Serve(ServeArgs),
    /// Generate or inspect publisher tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Generate a new secret token
    New,
    /// Print the public id of a secret token
    Id {
        /// Secret token (sk_live_...)
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Token { action } => match action {
            TokenAction::New => {
                commands::token::new();
                Ok(())
            },
            TokenAction::Id { token } => commands::token::id(&token),
        },
    }
}
