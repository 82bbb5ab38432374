use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scraping error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AppError {
    /// Short tag used by `log_error!` to classify the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Scraper(_) => "scraper",
            AppError::Extraction(_) => "extraction",
            AppError::Io(_) => "io",
            AppError::Csv(_) => "csv",
            AppError::Serde(_) => "serde",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Structural problems with a standings or fixtures page. All of these abort
/// the parse of the page they were found in.
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Required element not found: {0}")]
    MissingElement(&'static str),

    #[error("Link {href:?} has no {param} query parameter")]
    MissingLinkParam { param: &'static str, href: String },

    #[error("Invalid date {0:?}, expected e.g. \"Thursday 06 Nov 2014\"")]
    InvalidDate(String),

    #[error("Invalid kickoff time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid number in {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid score {text:?} for game {game_id}")]
    InvalidScore { game_id: u32, text: String },

    #[error("Teams must be loaded from the standings page before parsing fixtures")]
    TeamsNotLoaded,

    #[error("Selector error: {0}")]
    SelectorError(String),
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Fixtures page {0} has no standings page for the same season")]
    FixturesWithoutStandings(PathBuf),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid row in {file}: {message}")]
    InvalidReference { file: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
