//! Rows of the exported tables. Column order follows the field order.

use crate::season::{season_team_id, Game};
use crate::values::{GameOutcome, SeasonStage};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

/// A table written by `write_extraction`.
pub trait ExportRow: Serialize {
    const FILE_NAME: &'static str;
    const FIELDS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FranchiseDto {
    pub id: u32,
    pub name: String,
}

impl ExportRow for FranchiseDto {
    const FILE_NAME: &'static str = "gmfranchises.csv";
    const FIELDS: &'static [&'static str] = &["id", "name"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonDto {
    pub id: u32,
    pub league_id: Option<u32>,
    pub division_id: Option<u32>,
    pub name: Option<String>,
    pub sequence_number: Option<usize>,
    pub first_week_date: Option<NaiveDate>,
    pub last_week_date: Option<NaiveDate>,
}

impl ExportRow for SeasonDto {
    const FILE_NAME: &'static str = "gmseasons.csv";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "league_id",
        "division_id",
        "name",
        "sequence_number",
        "first_week_date",
        "last_week_date",
    ];
}

/// A row of `franchise_seasons.csv`: which franchise a team belonged to in a
/// season, under which name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FranchiseSeasonRow {
    pub season_id: u32,
    pub team_id: u32,
    pub franchise_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDto {
    pub team_id: u32,
    pub season_id: u32,
    pub franchise_id: u32,
    pub name: String,
    pub id: String,
}

impl From<FranchiseSeasonRow> for TeamDto {
    fn from(row: FranchiseSeasonRow) -> Self {
        Self {
            id: season_team_id(row.season_id, row.team_id),
            team_id: row.team_id,
            season_id: row.season_id,
            franchise_id: row.franchise_id,
            name: row.name,
        }
    }
}

impl ExportRow for TeamDto {
    const FILE_NAME: &'static str = "gmteams.csv";
    const FIELDS: &'static [&'static str] = &["team_id", "season_id", "franchise_id", "name", "id"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeasonDto {
    pub id: String,
}

impl ExportRow for TeamSeasonDto {
    const FILE_NAME: &'static str = "gmteamseasons.csv";
    const FIELDS: &'static [&'static str] = &["id"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameDto {
    pub id: u32,
    #[serde(serialize_with = "serialize_datetime")]
    pub scheduled_time: NaiveDateTime,
    pub season_id: u32,
    pub season_stage: SeasonStage,
    pub home_team_id: String,
    pub home_team_pts: Option<u32>,
    pub home_team_outcome: Option<GameOutcome>,
    pub away_team_id: String,
    pub away_team_pts: Option<u32>,
    pub away_team_outcome: Option<GameOutcome>,
}

impl GameDto {
    /// The "pts" columns hold the game score.
    pub fn from_game(game: &Game, season_id: u32) -> Self {
        Self {
            id: game.id,
            scheduled_time: game.starts_at,
            season_id,
            season_stage: game.season_stage,
            home_team_id: game.home_team_id.clone(),
            home_team_pts: game.home_team_score,
            home_team_outcome: game.home_team_outcome,
            away_team_id: game.away_team_id.clone(),
            away_team_pts: game.away_team_score,
            away_team_outcome: game.away_team_outcome,
        }
    }
}

impl ExportRow for GameDto {
    const FILE_NAME: &'static str = "gmgames.csv";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "scheduled_time",
        "season_id",
        "season_stage",
        "home_team_id",
        "home_team_pts",
        "home_team_outcome",
        "away_team_id",
        "away_team_pts",
        "away_team_outcome",
    ];
}

fn serialize_datetime<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format("%Y-%m-%d %H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_line<T: Serialize>(row: &T) -> String {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(Vec::new());
        writer.serialize(row).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    fn field_count<T: Serialize>(row: &T) -> usize {
        csv_line(row).trim_end().split("\",\"").count()
    }

    #[test]
    fn game_rows_use_codes_and_blank_nulls() {
        let starts_at = NaiveDate::from_ymd_opt(2019, 3, 7)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        let mut game = Game::scheduled(
            1001,
            starts_at,
            "Court 1".into(),
            "0114.57".into(),
            "0114.58".into(),
        );
        game.record_scores(Some(20), Some(0));

        let line = csv_line(&GameDto::from_game(&game, 114));
        assert_eq!(
            line.trim_end(),
            r#""1001","2019-03-07 19:30:00","114","regular","0114.57","20","FF","0114.58","0","FA""#
        );

        let unplayed = Game::scheduled(
            1002,
            starts_at,
            "Court 2".into(),
            "0114.59".into(),
            "0114.60".into(),
        );
        let line = csv_line(&GameDto::from_game(&unplayed, 114));
        assert!(line.trim_end().ends_with(r#""0114.59","","","0114.60","","""#));
    }

    #[test]
    fn team_rows_carry_the_composite_id() {
        let team = TeamDto::from(FranchiseSeasonRow {
            season_id: 114,
            team_id: 57,
            franchise_id: 3,
            name: "Unicorns".into(),
        });
        assert_eq!(team.id, "0114.57");
    }

    #[test]
    fn declared_fields_match_the_rows() {
        let season = SeasonDto {
            id: 1,
            league_id: Some(2),
            division_id: None,
            name: Some("Spring".into()),
            sequence_number: Some(1),
            first_week_date: NaiveDate::from_ymd_opt(2019, 3, 7),
            last_week_date: None,
        };
        assert_eq!(field_count(&season), SeasonDto::FIELDS.len());

        let team = TeamDto::from(FranchiseSeasonRow {
            season_id: 1,
            team_id: 2,
            franchise_id: 3,
            name: "x".into(),
        });
        assert_eq!(field_count(&team), TeamDto::FIELDS.len());

        let franchise = FranchiseDto { id: 1, name: "x".into() };
        assert_eq!(field_count(&franchise), FranchiseDto::FIELDS.len());

        let team_season = TeamSeasonDto { id: "0001.2".into() };
        assert_eq!(field_count(&team_season), TeamSeasonDto::FIELDS.len());
    }
}
