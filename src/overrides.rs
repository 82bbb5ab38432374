//! Manually corrected game results, keyed by the site's game id.
//!
//! The league site sometimes shows no score or a wrong one. Corrections are
//! kept in `score_overrides.csv` and win over anything read from a page.

use crate::error::Result;
use crate::log_warn;
use crate::utils::read_csv_rows;
use crate::values::{ScoreStatus, SeasonStage};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;

pub const SCORE_OVERRIDES_FILE: &str = "score_overrides.csv";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreOverride {
    pub game_id: u32,
    /// Site team id; `None` keeps the team linked on the page.
    #[serde(default, deserialize_with = "zero_as_none")]
    pub home_team_id: Option<u32>,
    pub home_team_score: u32,
    #[serde(default, deserialize_with = "zero_as_none")]
    pub away_team_id: Option<u32>,
    pub away_team_score: u32,
    pub score_status: ScoreStatus,
    #[serde(default)]
    pub score_status_comments: Option<String>,
    #[serde(default)]
    pub season_stage: Option<SeasonStage>,
}

fn zero_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.filter(|id| *id != 0))
}

/// Read-only lookup from game id to its correction. Game ids are treated as
/// unique across seasons, so one entry applies wherever the id shows up.
#[derive(Debug, Clone, Default)]
pub struct ScoreOverrides {
    by_game: HashMap<u32, ScoreOverride>,
}

impl ScoreOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a correction; a later entry for the same game replaces the
    /// earlier one.
    pub fn insert(&mut self, entry: ScoreOverride) -> Option<ScoreOverride> {
        let replaced = self.by_game.insert(entry.game_id, entry);
        if let Some(previous) = &replaced {
            log_warn!(
                game_id = previous.game_id,
                "[overrides] Duplicate score override, keeping the last one"
            );
        }
        replaced
    }

    pub fn get(&self, game_id: u32) -> Option<&ScoreOverride> {
        self.by_game.get(&game_id)
    }

    pub fn len(&self) -> usize {
        self.by_game.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_game.is_empty()
    }

    /// Loads `score_overrides.csv` style data; a missing file gives an empty
    /// registry.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let rows: Vec<ScoreOverride> = read_csv_rows(path, SCORE_OVERRIDES_FILE)?;
        Ok(rows.into_iter().collect())
    }
}

impl FromIterator<ScoreOverride> for ScoreOverrides {
    fn from_iter<I: IntoIterator<Item = ScoreOverride>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for entry in iter {
            overrides.insert(entry);
        }
        overrides
    }
}
