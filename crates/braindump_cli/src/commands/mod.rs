//! Command implementations and the shared session they run in.
//!
//! # Invariants
//! - Every command opens exactly one `AppContext`; writes are persisted by
//!   the context's snapshot listener before the command returns.
//! - Logging failures never abort a command.

use braindump_core::config::Settings;
use braindump_core::{
    init_logging, AppContext, CaptureError, ConfigError, GeminiClient, RepoError, StoreError,
    TextModel,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod capture;
pub mod library;
pub mod profile;
mod render;

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Repo(RepoError),
    Store(StoreError),
    Capture(CaptureError),
    Io(std::io::Error),
    /// Invalid command-line value.
    Usage(String),
    /// Model client could not be constructed.
    Model(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "storage: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Capture(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Usage(message) => write!(f, "{message}"),
            Self::Model(message) => write!(f, "model client: {message}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Capture(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Usage(_) | Self::Model(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CaptureError> for CliError {
    fn from(value: CaptureError) -> Self {
        Self::Capture(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub type CliResult<T = ()> = Result<T, CliError>;

/// Loaded settings plus the opened app context.
pub struct Session {
    pub settings: Settings,
    pub context: AppContext,
}

impl Session {
    pub fn open(config: Option<&Path>, db: Option<PathBuf>) -> CliResult<Self> {
        let mut settings = Settings::load(config)?;
        if let Some(db) = db {
            settings.storage.db_path = Some(db);
        }

        if let Err(err) = init_logging(settings.log_level(), &settings.log_dir()) {
            eprintln!("warning: logging disabled: {err}");
        }

        let db_path = settings.db_path();
        let context = AppContext::open_at(&db_path)?;
        info!(
            "event=cli_session module=cli status=ok db_path={} items={}",
            db_path.display(),
            context.items().len()
        );
        Ok(Self { settings, context })
    }

    pub fn model(&self) -> CliResult<Arc<dyn TextModel>> {
        let client =
            GeminiClient::new(&self.settings.ai).map_err(|err| CliError::Model(err.to_string()))?;
        if !client.is_configured() {
            eprintln!("warning: no API key configured; set GEMINI_API_KEY");
        }
        Ok(Arc::new(client))
    }
}
