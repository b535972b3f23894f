use clap::{Parser, Subcommand};
use dialoguer::Password;
use dotenvy::dotenv;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use hamlet::cli::add_user;
use hamlet::config::BootConfig;

#[derive(Parser)]
#[command(name = "hamlet-cli")]
#[command(about = "Hamlet CLI - Administrative tools for a Hamlet host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user account
    Add {
        /// Username for the new account
        username: String,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = BootConfig::from_env();
    let options: SqliteConnectOptions = config
        .database_url
        .parse()
        .expect("HAMLET_DATABASE_URL is not a valid SQLite connection string");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Add { username, password } => {
                handle_user_add(&pool, username, password).await
            }
        },
    }
}

async fn handle_user_add(pool: &SqlitePool, username: String, password: Option<String>) {
    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match add_user(pool, &username, &password).await {
        Ok(_) => {
            println!("\n✅ User created successfully!");
            println!("   Username: {}", username);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating user: {}", e);
            std::process::exit(1);
        }
    }
}
