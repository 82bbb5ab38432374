//! In-memory record of one season as read from the league site's pages.

use crate::values::{GameOutcome, ScoreStatus, SeasonStage};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Team ids are the zero-padded season id joined with the site's team id,
/// e.g. `0114.57`, because the site reuses team ids across seasons.
pub fn season_team_id(season_id: u32, site_team_id: u32) -> String {
    format!("{:0>4}.{}", season_id, site_team_id)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub site_id: u32,
    pub position: usize,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub drawn: u32,
    pub forfeit_for: u32,
    pub forfeit_against: u32,
    pub score_for: u32,
    pub score_against: u32,
    pub score_difference: i32,
    pub bonus_points: i32,
    pub points: i32,
    pub finals_rank: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: u32,
    pub starts_at: NaiveDateTime,
    pub season_stage: SeasonStage,
    pub venue: String,
    pub home_team_id: String,
    pub home_team_score: Option<u32>,
    pub home_team_outcome: Option<GameOutcome>,
    pub home_team_points: Option<u32>,
    pub away_team_id: String,
    pub away_team_score: Option<u32>,
    pub away_team_outcome: Option<GameOutcome>,
    pub away_team_points: Option<u32>,
    pub score_status: ScoreStatus,
    pub score_status_comments: Option<String>,
}

impl Game {
    /// A game known only from its schedule entry: no score, no outcome.
    pub fn scheduled(
        id: u32,
        starts_at: NaiveDateTime,
        venue: String,
        home_team_id: String,
        away_team_id: String,
    ) -> Self {
        Self {
            id,
            starts_at,
            season_stage: SeasonStage::Regular,
            venue,
            home_team_id,
            home_team_score: None,
            home_team_outcome: None,
            home_team_points: None,
            away_team_id,
            away_team_score: None,
            away_team_outcome: None,
            away_team_points: None,
            score_status: ScoreStatus::Undecided,
            score_status_comments: None,
        }
    }

    /// Sets scores and, when both are known, the outcomes and ladder points
    /// for the current stage.
    pub fn record_scores(&mut self, home: Option<u32>, away: Option<u32>) {
        self.home_team_score = home;
        self.away_team_score = away;

        let outcomes = match (home, away) {
            (Some(home), Some(away)) => Some(GameOutcome::from_scores(home, away)),
            _ => None,
        };
        self.home_team_outcome = outcomes.map(|(home, _)| home);
        self.away_team_outcome = outcomes.map(|(_, away)| away);
        self.home_team_points = self
            .home_team_outcome
            .and_then(|o| o.points_for(self.season_stage));
        self.away_team_points = self
            .away_team_outcome
            .and_then(|o| o.points_for(self.season_stage));
    }

    pub fn is_decided(&self) -> bool {
        self.home_team_outcome.is_some() && self.away_team_outcome.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDay {
    pub date: NaiveDate,
    /// Position of the week on the standings page; `None` for days only the
    /// fixtures page knows about.
    pub week_number: Option<usize>,
    pub games: Vec<Game>,
}

impl GameDay {
    pub fn contains_game(&self, game_id: u32) -> bool {
        self.games.iter().any(|g| g.id == game_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Season {
    pub season_id: Option<u32>,
    pub season_name: Option<String>,
    pub league_id: Option<u32>,
    pub division_id: Option<u32>,
    pub game_days: Vec<GameDay>,
    pub teams: BTreeMap<String, Team>,
}

impl Season {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team_id(&self, site_team_id: u32) -> Option<String> {
        self.season_id
            .map(|season_id| season_team_id(season_id, site_team_id))
    }

    pub fn game_day_mut(&mut self, date: NaiveDate) -> Option<&mut GameDay> {
        self.game_days.iter_mut().find(|gd| gd.date == date)
    }

    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.game_days.iter().flat_map(|gd| gd.games.iter())
    }

    /// First and last game day dates, regardless of the order they were
    /// read in.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.game_days.iter().map(|gd| gd.date).min()?;
        let last = self.game_days.iter().map(|gd| gd.date).max()?;
        Some((first, last))
    }
}
