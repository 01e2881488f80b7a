use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError, NewUser, Role};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod secret;

#[derive(Parser, Debug)]
#[command(name = "agrimarket_admin")]
#[command(about = "Admin utilities for AgriMarket (bootstrap admins, verify accounts)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./agrimarket.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a verified admin account. The password is prompted for.
    CreateAdmin(CreateAdminArgs),
    /// Mark an account as KYC-verified without a submission.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct CreateAdminArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long, default_value = "Administrator")]
    full_name: String,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Email or username.
    login: String,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::CreateAdmin(args),
        }) => {
            let password = secret::new_password()?;

            let cmd = NewUser::new(
                &args.email,
                &args.username,
                password,
                args.full_name,
                Role::Admin,
            );
            let user = match engine.register(cmd).await {
                Ok(user) => user,
                Err(EngineError::ExistingKey(msg)) => {
                    eprintln!("{msg}: {} / {}", args.email, args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };
            let user = engine.verify_user(user.id).await?;

            println!("created admin: {} ({})", user.username, user.id);
        }
        Command::User(User {
            command: UserCommand::Verify(args),
        }) => {
            let user = match engine.find_user(&args.login).await {
                Ok(user) => user,
                Err(EngineError::KeyNotFound(_)) => {
                    eprintln!("user not found: {}", args.login);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };
            let user = engine.verify_user(user.id).await?;

            println!("verified {} ({}), role {}", user.username, user.id, user.role);
        }
    }

    Ok(())
}
