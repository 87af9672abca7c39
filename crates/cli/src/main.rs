//! Mashtal CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mashtal-cli migrate
//!
//! # Create an admin account
//! mashtal-cli admin create -n "Admin Name" -p +201000000000
//!
//! # Seed the catalog with shipping zones and sample plants
//! mashtal-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin accounts
//! - `seed` - Seed shipping zones and sample catalog data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mashtal-cli")]
#[command(author, version, about = "Mashtal CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed shipping zones and sample catalog data
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin phone number (login identifier)
        #[arg(short, long)]
        phone: String,

        /// Admin password; prompted for via stdin when omitted
        #[arg(long)]
        password: Option<String>,
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
        Commands::Admin { action } => match action {
            AdminAction::Create {
                name,
                phone,
                password,
            } => {
                commands::admin::create(&name, &phone, password.as_deref()).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
