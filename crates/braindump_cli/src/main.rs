//! Command-line front-end for the brain-dump core.
//!
//! # Responsibility
//! - Parse commands and dispatch them to `commands::*`.
//! - Map any failure to a non-zero exit status.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

const AFTER_HELP: &str = "\
EXAMPLES:
    Dump a thought and review the suggested category:
        $ braindump capture call the dentist before friday

    Capture and save without the review prompt:
        $ braindump capture --yes shipped the onboarding flow

    Pending tasks with a gentle nudge:
        $ braindump tasks --nudge

    Library, oldest first, tasks only:
        $ braindump library --type task --sort date-asc

ENVIRONMENT:
    GEMINI_API_KEY        API key for categorization and nudges
    BRAINDUMP_DB_PATH     Database file location
    BRAINDUMP_LOG_DIR     Rolling log directory";

#[derive(Parser)]
#[command(name = "braindump")]
#[command(version)]
#[command(about = "Capture scattered thoughts and let them sort themselves")]
#[command(after_help = AFTER_HELP)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding settings and environment
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a thought, categorize it and save it
    Capture {
        /// Text to capture; read from stdin when omitted
        text: Vec<String>,

        /// Save the suggested categorization without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Filter and sort every captured item
    Library(LibraryArgs),

    /// Show pending tasks (home view)
    Tasks {
        /// Ask the model for a gentle nudge about pending tasks
        #[arg(long)]
        nudge: bool,
    },

    /// Show wins and completed tasks
    Wins,

    /// Toggle an item between pending and completed
    Toggle {
        /// Item id
        id: String,
    },

    /// Permanently delete an item
    Delete {
        /// Item id
        id: String,
    },

    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
}

#[derive(Args)]
pub struct LibraryArgs {
    /// task | idea | win | note | all
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// all | pending | completed
    #[arg(long)]
    pub status: Option<String>,

    /// Case-insensitive match on title, content and tags
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// date-desc | date-asc | alphabetical | priority
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the profile and preferences
    Show,

    /// Update profile fields and preferences
    Set(ProfileSetArgs),
}

#[derive(Args, Default)]
pub struct ProfileSetArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Avatar image URL
    #[arg(long)]
    pub avatar: Option<String>,

    /// default | earthy | ocean | midnight
    #[arg(long)]
    pub palette: Option<String>,

    /// Enable or disable notifications
    #[arg(long)]
    pub notifications: Option<bool>,

    /// low | medium | high
    #[arg(long)]
    pub nudge_frequency: Option<String>,

    /// Personal context used to tailor categorization and nudges
    #[arg(long)]
    pub ai_context: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match commands::Session::open(cli.config.as_deref(), cli.db) {
        Ok(mut session) => match cli.command {
            Commands::Capture { text, yes } => commands::capture::run(&mut session, text, yes).await,
            Commands::Library(args) => commands::library::run(&session, &args),
            Commands::Tasks { nudge } => commands::library::tasks(&session, nudge).await,
            Commands::Wins => {
                commands::library::wins(&session);
                Ok(())
            }
            Commands::Toggle { id } => commands::library::toggle(&mut session, &id),
            Commands::Delete { id } => commands::library::delete(&mut session, &id),
            Commands::Profile { action } => {
                commands::profile::run(&mut session, action.unwrap_or(ProfileAction::Show))
            }
        },
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
