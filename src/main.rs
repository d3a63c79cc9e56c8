mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use chronos::app::App;
use chronos::config::{default_config_path, ChronosConfig};
use cli::reminders::ReminderFields;

#[derive(Parser)]
#[command(name = "chronos", version, about = "Time-based reminders with local alarms and notifications")]
struct Cli {
    /// Config file (defaults to ~/.chronos/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in as a user
    Login {
        user: Option<String>,
    },
    /// Sign out
    Logout {
        /// Also clear every local preference, including the scheduled-ID ledger
        #[arg(long)]
        clear_preferences: bool,
    },
    /// Print the signed-in user
    Whoami,
    /// Create a reminder
    Add {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        when: When,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Replace a reminder's fields; unspecified fields are kept
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        when: When,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long, conflicts_with = "clear_image")]
        image_url: Option<String>,
        #[arg(long)]
        clear_notes: bool,
        #[arg(long)]
        clear_image: bool,
    },
    /// Delete a reminder and cancel its alarm
    Delete {
        id: String,
    },
    /// List the signed-in user's reminders
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the scheduled-ID ledger and pending alarms
    Ledger,
    /// Fetch an AI-written greeting
    Greet {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Fire alarms as they come due
    Run,
    /// Export the signed-in user's reminders as JSON
    Export,
    /// Import reminders from an export file
    Import {
        file: PathBuf,
    },
    /// Check database health and ledger drift
    Doctor,
}

#[derive(Args)]
struct When {
    /// Trigger time: RFC 3339 or local "YYYY-MM-DD HH:MM"
    #[arg(long, conflicts_with = "in")]
    at: Option<String>,
    /// Trigger offset from now: 90s, 15m, 2h, 1d
    #[arg(long = "in")]
    r#in: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = ChronosConfig::load_from(&config_path)?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !config_path.exists() {
        tracing::info!(path = %config_path.display(), "no config file, using defaults");
    }

    match cli.command {
        Command::Greet { prompt } => cli::greet::greet(&config.greeting, &prompt.join(" ")).await?,
        Command::Doctor => cli::doctor::doctor(config)?,
        command => dispatch(App::open(config)?, command).await?,
    }

    Ok(())
}

/// Run a command that works against the opened database.
async fn dispatch(app: App, command: Command) -> Result<()> {
    match command {
        Command::Login { user } => cli::session::login(&app, user.as_deref())?,
        Command::Logout { clear_preferences } => cli::session::logout(&app, clear_preferences)?,
        Command::Whoami => cli::session::whoami(&app)?,
        Command::Add {
            title,
            when,
            notes,
            image_url,
        } => cli::reminders::add(
            &app,
            ReminderFields {
                title: Some(title),
                at: when.at,
                r#in: when.r#in,
                notes,
                image_url,
                ..Default::default()
            },
        )?,
        Command::Edit {
            id,
            title,
            when,
            notes,
            image_url,
            clear_notes,
            clear_image,
        } => cli::reminders::edit(
            &app,
            &id,
            ReminderFields {
                title,
                at: when.at,
                r#in: when.r#in,
                notes,
                image_url,
                clear_notes,
                clear_image,
            },
        )?,
        Command::Delete { id } => cli::reminders::delete(&app, &id)?,
        Command::List { json } => cli::reminders::list(&app, json)?,
        Command::Ledger => cli::reminders::ledger(&app)?,
        Command::Run => cli::run::run(&app).await?,
        Command::Export => cli::export::export(&app)?,
        Command::Import { file } => cli::export::import(&app, &file)?,
        Command::Greet { .. } | Command::Doctor => {
            unreachable!("greet and doctor run without opening the app")
        }
    }

    Ok(())
}
