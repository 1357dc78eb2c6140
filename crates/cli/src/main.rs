//! Store inventory CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run inventory database migrations
//! inv-cli migrate
//!
//! # Seed stores and products from a YAML catalog
//! inv-cli seed --file crates/cli/catalog.example.yaml
//!
//! # Register an API client and print its tokens
//! inv-cli user authorize -u client@example.com -p 'Jm$_&1388' -r GODE561231GR8
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "inv-cli")]
#[command(author, version, about = "Store inventory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed stores and products from a YAML catalog
    Seed {
        /// Path to the catalog file
        #[arg(short, long)]
        file: String,
    },
    /// Manage API users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Store client credentials and print an access and a refresh token
    Authorize {
        /// User name (email address)
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Client RFC
        #[arg(short, long)]
        rfc: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => {
            let result = commands::seed::catalog(&file).await?;
            if !result.errors.is_empty() {
                return Err(format!("{} catalog entries not stored", result.errors.len()).into());
            }
        }
        Commands::User { action } => match action {
            UserAction::Authorize {
                username,
                password,
                rfc,
            } => {
                let tokens = commands::user::authorize(&username, &password, &rfc).await?;

                #[allow(clippy::print_stdout)]
                {
                    println!("access_token: {}", tokens.access_token);
                    println!("refresh_token: {}", tokens.refresh_token);
                }
            }
        },
    }
    Ok(())
}
