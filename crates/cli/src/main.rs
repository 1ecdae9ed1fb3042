//! Vitrina CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run user store migrations
//! vitrina migrate
//!
//! # Create an account directly (prints its token)
//! vitrina user create -u alice -e alice@example.com -p 'correct horse'
//!
//! # Check whether a username is taken
//! vitrina user check alice
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create an account and issue its token
//! - `user check` - Report username availability

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage storefront accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Username (letters, digits and @.+-_)
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long, env = "VITRINA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Check whether a username is still available
    Check {
        /// Username to look up
        username: String,
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
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
            } => {
                commands::user::create(&username, &email, &password).await?;
            }
            UserAction::Check { username } => {
                commands::user::check(&username).await?;
            }
        },
    }
    Ok(())
}
