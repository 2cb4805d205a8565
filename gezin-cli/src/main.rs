mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gezin_core::auth::{AuthSession, SessionStorage, StaticAuthenticator};
use gezin_core::{AppData, GezinConfig, GezinError, RemoteStore};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::utils::tui::create_spinner;

/// Application state as the commands see it.
pub type App = AppData<Box<dyn RemoteStore>>;

#[derive(Parser)]
#[command(name = "gezin")]
#[command(about = "Organize your household: family, calendar, shopping, meals, sleepovers and tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with the household account
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show the session and check that the backend answers
    Status {
        /// How many more times to try reaching the backend
        #[arg(long, default_value_t = 3)]
        retries: u32,
    },
    /// Family members
    #[command(subcommand)]
    Family(commands::family::FamilyCommand),
    /// Calendar events
    #[command(subcommand)]
    Calendar(commands::calendar::CalendarCommand),
    /// Shopping list, categories and shops
    #[command(subcommand)]
    Shopping(commands::shopping::ShoppingCommand),
    /// Meal planning
    #[command(subcommand)]
    Meals(commands::meals::MealsCommand),
    /// Sleepovers
    #[command(subcommand)]
    Sleepovers(commands::sleepovers::SleepoversCommand),
    /// Household tasks
    #[command(subcommand)]
    Tasks(commands::tasks::TasksCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GEZIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GezinConfig::load()?;

    match cli.command {
        Commands::Login { username } => commands::login::run(&config, username),
        Commands::Logout => commands::logout::run(&config),
        Commands::Status { retries } => commands::status::run(&config, retries).await,
        Commands::Family(cmd) => commands::family::run(&mut open_app(&config).await?, cmd).await,
        Commands::Calendar(cmd) => {
            commands::calendar::run(&mut open_app(&config).await?, cmd).await
        }
        Commands::Shopping(cmd) => {
            commands::shopping::run(&mut open_app(&config).await?, cmd).await
        }
        Commands::Meals(cmd) => commands::meals::run(&mut open_app(&config).await?, cmd).await,
        Commands::Sleepovers(cmd) => {
            commands::sleepovers::run(&mut open_app(&config).await?, cmd).await
        }
        Commands::Tasks(cmd) => commands::tasks::run(&mut open_app(&config).await?, cmd).await,
    }
}

pub fn session(config: &GezinConfig) -> Result<AuthSession<StaticAuthenticator>> {
    let storage = SessionStorage::default_location()?;
    Ok(AuthSession::restore(
        StaticAuthenticator::from_config(config),
        storage,
    )?)
}

fn require_session(config: &GezinConfig) -> Result<()> {
    if !session(config)?.is_authenticated() {
        return Err(GezinError::NotAuthenticated.into());
    }
    Ok(())
}

/// Gate on the session, connect to the configured store and load everything.
async fn open_app(config: &GezinConfig) -> Result<App> {
    require_session(config)?;
    tracing::debug!(backend = ?config.backend, "connecting");

    let store = gezin_core::connect(config)?;
    let mut app = AppData::new(store).with_policy(config.load_policy);

    let spinner = create_spinner("Loading".to_string());
    let result = app.load_all().await;
    spinner.finish_and_clear();

    let report = result?;
    for (collection, error) in &report.failed {
        eprintln!(
            "{} {}",
            format!("Could not load {collection}:").yellow(),
            error.to_string().dimmed()
        );
    }

    Ok(app)
}
