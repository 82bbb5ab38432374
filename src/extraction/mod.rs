//! Runs the season parser over a directory of saved pages and turns the
//! results, together with the reference CSVs, into export tables.
//!
//! Expected input files:
//!   franchises.csv, franchise_seasons.csv, score_overrides.csv (all optional)
//!   season-<SEASONID>-standings.html
//!   season-<SEASONID>-fixtures.html (optional)

pub mod dtos;

use crate::config::Config;
use crate::error::{ExtractionError, Result, ScraperError};
use crate::overrides::{ScoreOverrides, SCORE_OVERRIDES_FILE};
use crate::scraper::{ParseEnv, SeasonParse};
use crate::season::Season;
use crate::utils::{ensure_directory_exists, find_season_files, read_csv_rows, PageKind};
use crate::{log_info, log_warn};
use dtos::{
    ExportRow, FranchiseDto, FranchiseSeasonRow, GameDto, SeasonDto, TeamDto, TeamSeasonDto,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub const FRANCHISES_FILE: &str = "franchises.csv";
pub const FRANCHISE_SEASONS_FILE: &str = "franchise_seasons.csv";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub franchises: Vec<FranchiseDto>,
    pub seasons: Vec<SeasonDto>,
    pub teams: Vec<TeamDto>,
    pub team_seasons: Vec<TeamSeasonDto>,
    pub games: Vec<GameDto>,
}

#[derive(Debug, Default)]
struct SeasonPages {
    standings: Option<PathBuf>,
    fixtures: Option<PathBuf>,
}

/// Parses every season found in `input_dir`, standings page first.
/// Seasons are independent of each other and are parsed in parallel.
pub fn parse_seasons(input_dir: &Path, env: &ParseEnv) -> Result<Vec<Season>> {
    let mut pages: BTreeMap<u32, SeasonPages> = BTreeMap::new();
    for file in find_season_files(input_dir)? {
        let entry = pages.entry(file.season_id).or_default();
        match file.kind {
            PageKind::Standings => entry.standings = Some(file.path),
            PageKind::Fixtures => entry.fixtures = Some(file.path),
        }
    }

    let pages: Vec<(u32, SeasonPages)> = pages.into_iter().collect();
    pages
        .into_par_iter()
        .map(|(file_season_id, pages)| parse_season(file_season_id, pages, env))
        .collect()
}

fn parse_season(file_season_id: u32, pages: SeasonPages, env: &ParseEnv) -> Result<Season> {
    let Some(standings) = pages.standings else {
        let fixtures = pages.fixtures.unwrap_or_default();
        return Err(ExtractionError::FixturesWithoutStandings(fixtures).into());
    };

    let mut parse = SeasonParse::new(env)?;
    log_info!("[extraction] Parsing {:?}", standings);
    parse.parse_standings_file(&standings)?;
    if let Some(fixtures) = &pages.fixtures {
        log_info!("[extraction] Parsing {:?}", fixtures);
        parse.parse_fixtures_file(fixtures)?;
    }

    let season = parse.into_season();
    if season.season_id != Some(file_season_id) {
        log_warn!(
            "[extraction] {:?} is named for season {} but holds season {:?}",
            standings,
            file_season_id,
            season.season_id
        );
    }
    Ok(season)
}

pub fn create_extraction(input_dir: &Path, config: &Config) -> Result<Extraction> {
    ensure_directory_exists(input_dir)?;

    let score_overrides = ScoreOverrides::from_csv_path(&input_dir.join(SCORE_OVERRIDES_FILE))?;
    log_info!(
        "[extraction] {} score overrides loaded",
        score_overrides.len()
    );

    let mut extraction = Extraction {
        franchises: read_csv_rows(&input_dir.join(FRANCHISES_FILE), FRANCHISES_FILE)?,
        ..Default::default()
    };
    let franchise_seasons: Vec<FranchiseSeasonRow> =
        read_csv_rows(&input_dir.join(FRANCHISE_SEASONS_FILE), FRANCHISE_SEASONS_FILE)?;
    extraction.teams = franchise_seasons.into_iter().map(TeamDto::from).collect();

    let env = ParseEnv::from_config(config, score_overrides);
    let seasons = parse_seasons(input_dir, &env)?;
    warn_about_shared_game_ids(&seasons);

    for season in &seasons {
        let season_id = season
            .season_id
            .ok_or(ScraperError::MissingElement("season link"))?;
        let dates = season.date_range();

        extraction.seasons.push(SeasonDto {
            id: season_id,
            league_id: season.league_id,
            division_id: season.division_id,
            name: season.season_name.clone(),
            sequence_number: None,
            first_week_date: dates.map(|(first, _)| first),
            last_week_date: dates.map(|(_, last)| last),
        });

        extraction.team_seasons.extend(
            season
                .teams
                .keys()
                .map(|id| TeamSeasonDto { id: id.clone() }),
        );

        extraction
            .games
            .extend(season.games().map(|game| GameDto::from_game(game, season_id)));
    }

    assign_sequence_numbers(&mut extraction.seasons);
    Ok(extraction)
}

/// Numbers seasons 1.. by their first game day. Seasons without any game
/// day go last.
fn assign_sequence_numbers(seasons: &mut [SeasonDto]) {
    seasons.sort_by_key(|s| (s.first_week_date.is_none(), s.first_week_date));
    for (index, season) in seasons.iter_mut().enumerate() {
        season.sequence_number = Some(index + 1);
    }
}

/// Score overrides and duplicate detection key on the game id alone, so a
/// game id showing up in two seasons is worth knowing about.
fn warn_about_shared_game_ids(seasons: &[Season]) {
    let mut seen: HashMap<u32, Option<u32>> = HashMap::new();
    for season in seasons {
        for game in season.games() {
            if let Some(other) = seen.insert(game.id, season.season_id) {
                if other != season.season_id {
                    log_warn!(
                        "[extraction] Game id {} appears in seasons {:?} and {:?}",
                        game.id,
                        other,
                        season.season_id
                    );
                }
            }
        }
    }
}

fn write_rows<T: ExportRow>(rows: &[T], output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(T::FILE_NAME);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_path(&path)?;

    writer.write_record(T::FIELDS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log_info!("[extraction] {} rows written to {:?}", rows.len(), path);
    Ok(path)
}

/// Writes all five tables, header row included even when a table is empty.
pub fn write_extraction(extraction: &Extraction, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    Ok(vec![
        write_rows(&extraction.franchises, output_dir)?,
        write_rows(&extraction.seasons, output_dir)?,
        write_rows(&extraction.teams, output_dir)?,
        write_rows(&extraction.team_seasons, output_dir)?,
        write_rows(&extraction.games, output_dir)?,
    ])
}

pub fn extract_all(input_dir: &Path, output_dir: &Path, config: &Config) -> Result<Extraction> {
    let extraction = create_extraction(input_dir, config)?;
    write_extraction(&extraction, output_dir)?;
    Ok(extraction)
}
