use super::markup::{first, parse_kickoff, text_of, Markup, BYE};
use crate::error::{Result, ScraperError};
use crate::season::{season_team_id, Game, GameDay, Season};
use crate::{log_info, log_warn};
use chrono::NaiveDate;
use scraper::{ElementRef, Html};

pub struct FixturesScraper<'a> {
    document: &'a Html,
    markup: &'a Markup,
}

impl<'a> FixturesScraper<'a> {
    pub(crate) fn new(document: &'a Html, markup: &'a Markup) -> Self {
        Self { document, markup }
    }

    /// Adds games the standings page did not list. A game already present on
    /// the same date is kept as the standings page has it.
    pub fn parse_into(&self, season: &mut Season) -> Result<()> {
        if season.teams.is_empty() {
            return Err(ScraperError::TeamsNotLoaded.into());
        }
        let season_id = season.season_id.ok_or(ScraperError::TeamsNotLoaded)?;

        let mut added = 0;
        for table in self.document.select(&self.markup.week_table) {
            let date = self.markup.week_date(table)?;
            let known_day = season.game_day_mut(date).is_some();
            let mut new_games: Vec<Game> = Vec::new();

            for row in table.select(&self.markup.game_row) {
                let Some(game) = self.game(row, date, season_id)? else {
                    continue;
                };

                let duplicate = match season.game_day_mut(date) {
                    Some(day) => day.contains_game(game.id),
                    None => new_games.iter().any(|g| g.id == game.id),
                };
                if duplicate {
                    log_warn!(
                        "[fixtures] Discarding game {} ({}), it is already on the {} game day",
                        game.id,
                        game.starts_at,
                        date
                    );
                    continue;
                }

                added += 1;
                match season.game_day_mut(date) {
                    Some(day) => day.games.push(game),
                    None => new_games.push(game),
                }
            }

            if !known_day {
                season.game_days.push(GameDay {
                    date,
                    week_number: None,
                    games: new_games,
                });
            }
        }

        log_info!(
            "[fixtures] Season {}: {} games added from the fixtures page",
            season_id,
            added
        );
        Ok(())
    }

    fn game(&self, row: ElementRef, date: NaiveDate, season_id: u32) -> Result<Option<Game>> {
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

        let home_site_id = match first(row, &self.markup.home_team) {
            Some(cell) => self.markup.team_link_id(cell)?,
            None => None,
        };
        let away_site_id = match first(row, &self.markup.away_team) {
            Some(cell) => self.markup.team_link_id(cell)?,
            None => None,
        };
        let (Some(home_site_id), Some(away_site_id)) = (home_site_id, away_site_id) else {
            return Ok(None);
        };

        let starts_at = date.and_time(parse_kickoff(&kickoff_text)?);
        let game_id = self.markup.game_id(score_cell)?;
        let venue = first(row, &self.markup.venue)
            .map(text_of)
            .unwrap_or_default();

        Ok(Some(Game::scheduled(
            game_id,
            starts_at,
            venue,
            season_team_id(season_id, home_site_id),
            season_team_id(season_id, away_site_id),
        )))
    }
}
