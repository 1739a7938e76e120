//! Campus Events CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! campus-cli migrate
//!
//! # Seed demo accounts and events (after migrating)
//! campus-cli seed
//!
//! # Create an account with any role
//! campus-cli user create -e admin@example.com -n "Admin Name" -r admin -c 9876543212 -p secret123
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed demo data
//! - `user create` - Create accounts, including admins

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use campus_events_core::Role;

mod commands;

#[derive(Parser)]
#[command(name = "campus-cli")]
#[command(author, version, about = "Campus Events CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed demo accounts and events
    Seed,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`student`, `faculty`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: Role,

        /// Phone or other contact detail
        #[arg(short, long)]
        contact: String,

        /// Password (at least 8 characters)
        #[arg(short, long, env = "CAMPUS_NEW_USER_PASSWORD")]
        password: String,

        /// Academic department
        #[arg(short, long)]
        department: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::demo().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                contact,
                password,
                department,
            } => {
                commands::user::create(commands::user::NewAccount {
                    email,
                    password,
                    name,
                    role,
                    contact,
                    department,
                })
                .await?;
            }
        },
    }
    Ok(())
}
