//! Extracts seasons, teams and games of a league from the standings and
//! fixtures pages of its league-management site, and exports them as CSV.

pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod overrides;
pub mod scraper;
pub mod season;
pub mod utils;
pub mod values;

pub use config::Config;
pub use error::{AppError, Result};
pub use overrides::{ScoreOverride, ScoreOverrides};
pub use scraper::{ParseEnv, SeasonParse};
pub use season::{Game, GameDay, Season, Team};
pub use values::{GameOutcome, ScoreStatus, SeasonStage};
