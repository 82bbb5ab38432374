use super::markup::{
    column, first, link_param, link_param_number, parse_kickoff, parse_number, parse_score,
    season_name_from_title, text_of, Markup, BYE, STANDINGS_COLUMNS,
};
use super::ParseEnv;
use crate::error::{Result, ScraperError};
use crate::season::{season_team_id, Game, GameDay, Season, Team};
use crate::values::{ScoreStatus, SeasonStage};
use crate::{log_debug, log_info, log_warn};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

pub struct StandingsScraper<'a> {
    document: &'a Html,
    markup: &'a Markup,
}

impl<'a> StandingsScraper<'a> {
    pub(crate) fn new(document: &'a Html, markup: &'a Markup) -> Self {
        Self { document, markup }
    }

    /// Reads season identity, the standings table and the weekly schedule
    /// into `season`. Teams and game days are rebuilt from scratch; the
    /// season, league and division ids are only read the first time.
    pub fn parse_into(&self, season: &mut Season, env: &ParseEnv) -> Result<()> {
        season.season_name = Some(self.season_name()?);

        if season.season_id.is_none() {
            self.identify_season(season)?;
        }
        let season_id = season
            .season_id
            .ok_or(ScraperError::MissingElement("season link"))?;

        season.teams = self.teams(season_id)?;
        season.game_days.clear();

        let mut stage = SeasonStage::Regular;
        for (week_number, table) in self.document.select(&self.markup.week_table).enumerate() {
            let date = self.markup.week_date(table)?;
            let mut games = Vec::new();

            for row in table.select(&self.markup.game_row) {
                if let Some(game) = self.game(row, date, season_id, &mut stage, env)? {
                    assign_finals_ranks(&mut season.teams, &game);
                    games.push(game);
                }
            }

            season.game_days.push(GameDay {
                date,
                week_number: Some(week_number),
                games,
            });
        }

        log_info!(
            "[standings] Season {} ({}): {} teams, {} game days",
            season_id,
            season.season_name.as_deref().unwrap_or_default(),
            season.teams.len(),
            season.game_days.len()
        );
        Ok(())
    }

    fn season_name(&self) -> Result<String> {
        let title = self
            .document
            .select(&self.markup.title)
            .next()
            .ok_or(ScraperError::MissingElement("title"))?;
        season_name_from_title(&text_of(title))
            .ok_or_else(|| ScraperError::MissingElement("season name in title").into())
    }

    /// Season, division and league ids from the fixtures link in the first
    /// `<h3>`.
    fn identify_season(&self, season: &mut Season) -> Result<()> {
        let link = self
            .document
            .select(&self.markup.heading)
            .next()
            .and_then(|heading| first(heading, &self.markup.link))
            .ok_or(ScraperError::MissingElement("season link"))?;

        let season_id = link_param_number(link, "SeasonId")?;
        let league_id = link_param_number(link, "LeagueId")?;
        let division_id = match link_param(link, "DivisionId") {
            Some(value) => Some(parse_number::<u32>(&value, "DivisionId")?).filter(|id| *id != 0),
            None => None,
        };

        season.season_id = Some(season_id);
        season.league_id = Some(league_id);
        season.division_id = division_id;
        Ok(())
    }

    fn teams(&self, season_id: u32) -> Result<BTreeMap<String, Team>> {
        let table = self
            .document
            .select(&self.markup.standings_table)
            .next()
            .ok_or(ScraperError::MissingElement("standings table"))?;

        let mut teams = BTreeMap::new();
        let rows = table
            .select(&self.markup.row)
            .filter(|row| self.markup.is_team_row(*row));

        for (index, row) in rows.enumerate() {
            let team = self.team(row, season_id, index + 1)?;
            teams.insert(team.id.clone(), team);
        }
        Ok(teams)
    }

    fn team(&self, row: ElementRef, season_id: u32, position: usize) -> Result<Team> {
        let link = first(row, &self.markup.team_cell)
            .and_then(|cell| first(cell, &self.markup.link))
            .ok_or(ScraperError::MissingElement("team link"))?;
        let site_id = link_param_number(link, "TeamId")?;

        let cells: Vec<ElementRef> = row.select(&self.markup.cell).collect();
        if cells.len() < STANDINGS_COLUMNS.len() {
            return Err(ScraperError::MissingElement("standings cell").into());
        }
        let number = |index: usize| -> Result<i32> {
            parse_number(&text_of(cells[index]), STANDINGS_COLUMNS[index])
        };
        let count = |index: usize| -> Result<u32> {
            parse_number(&text_of(cells[index]), STANDINGS_COLUMNS[index])
        };

        // Teams without points have a bare cell instead of a link.
        let points = match first(cells[column::POINTS], &self.markup.link) {
            Some(link) => parse_number(&text_of(link), STANDINGS_COLUMNS[column::POINTS])?,
            None => 0,
        };

        Ok(Team {
            id: season_team_id(season_id, site_id),
            name: text_of(cells[column::TEAM]),
            site_id,
            position,
            played: count(column::PLAYED)?,
            won: count(column::WON)?,
            lost: count(column::LOST)?,
            drawn: count(column::DRAWN)?,
            forfeit_for: count(column::FORFEIT_FOR)?,
            forfeit_against: count(column::FORFEIT_AGAINST)?,
            score_for: count(column::SCORE_FOR)?,
            score_against: count(column::SCORE_AGAINST)?,
            score_difference: number(column::SCORE_DIFFERENCE)?,
            bonus_points: number(column::BONUS_POINTS)?,
            points,
            finals_rank: None,
        })
    }

    /// One schedule row. `stage` carries the most recent stage title across
    /// rows and weeks.
    fn game(
        &self,
        row: ElementRef,
        date: NaiveDate,
        season_id: u32,
        stage: &mut SeasonStage,
        env: &ParseEnv,
    ) -> Result<Option<Game>> {
        if let Some(title) = first(row, &self.markup.stage_title) {
            if let Some(decoded) = SeasonStage::decode_site_label(&text_of(title)) {
                *stage = decoded;
            }
        }
        let mut game_stage = *stage;

        let Some(kickoff_cell) = first(row, &self.markup.kickoff) else {
            return Ok(None);
        };
        let kickoff_text = text_of(kickoff_cell);
        if kickoff_text == BYE {
            return Ok(None);
        }
        let Some(score_cell) = first(row, &self.markup.score) else {
            return Ok(None);
        };

        let starts_at = date.and_time(parse_kickoff(&kickoff_text)?);
        let game_id = self.markup.game_id(score_cell)?;

        let mut home_site_id = None;
        let mut away_site_id = None;
        let scores;
        let score_status;
        let mut comments = None;

        match env.score_overrides.get(game_id) {
            Some(entry) => {
                log_debug!("[standings] Using score override for game {}", game_id);
                home_site_id = entry.home_team_id;
                away_site_id = entry.away_team_id;
                scores = (Some(entry.home_team_score), Some(entry.away_team_score));
                score_status = entry.score_status;
                comments = entry.score_status_comments.clone();
                if let Some(stage_override) = entry.season_stage {
                    game_stage = stage_override;
                }
            }
            None => match first(score_cell, &self.markup.score_box) {
                Some(score_box) => {
                    let (home, away) = parse_score(&text_of(score_box), game_id)?;
                    scores = (Some(home), Some(away));
                    score_status = ScoreStatus::WinnerAndScoreOk;
                }
                None => {
                    log_warn!(
                        "[standings] Game {} on {} has no score and no score override",
                        game_id,
                        starts_at
                    );
                    scores = (None, None);
                    score_status = ScoreStatus::Unknown;
                    comments = Some("Unresolved".to_string());
                }
            },
        }

        let home_site_id = match home_site_id {
            Some(id) => id,
            None => self.team_link_id(row, &self.markup.home_team, "home team link")?,
        };
        let away_site_id = match away_site_id {
            Some(id) => id,
            None => self.team_link_id(row, &self.markup.away_team, "away team link")?,
        };

        let venue = first(row, &self.markup.venue)
            .map(text_of)
            .unwrap_or_default();

        let mut game = Game::scheduled(
            game_id,
            starts_at,
            venue,
            season_team_id(season_id, home_site_id),
            season_team_id(season_id, away_site_id),
        );
        game.season_stage = game_stage;
        game.score_status = score_status;
        game.score_status_comments = comments;
        game.record_scores(scores.0, scores.1);
        game.season_stage = env.stage_remaps.apply(season_id, game_stage);

        Ok(Some(game))
    }

    fn team_link_id(
        &self,
        row: ElementRef,
        cell: &Selector,
        what: &'static str,
    ) -> Result<u32> {
        let cell = first(row, cell).ok_or(ScraperError::MissingElement(what))?;
        self.markup
            .team_link_id(cell)?
            .ok_or_else(|| ScraperError::MissingElement(what).into())
    }
}

/// Hands out final ranks for a decided finals game. Later games overwrite
/// ranks set by earlier ones.
fn assign_finals_ranks(teams: &mut BTreeMap<String, Team>, game: &Game) {
    let Some(placing) = game.season_stage.finals_placing() else {
        return;
    };
    let Some(home_outcome) = game.home_team_outcome else {
        return;
    };

    let (winner, loser) = if home_outcome.was_won() {
        (&game.home_team_id, &game.away_team_id)
    } else if home_outcome.was_lost() {
        (&game.away_team_id, &game.home_team_id)
    } else {
        return;
    };

    for (team_id, rank) in [(winner, placing.winner), (loser, placing.loser)] {
        let Some(rank) = rank else {
            continue;
        };
        match teams.get_mut(team_id) {
            Some(team) => team.finals_rank = Some(rank),
            None => log_warn!(
                "[standings] Game {} ranks unknown team {} as {}",
                game.id,
                team_id,
                rank
            ),
        }
    }
}
