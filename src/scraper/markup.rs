//! Where things live on the league site's standings and fixtures pages.
//!
//! Both pages are generated by the same site and share the weekly schedule
//! tables. If the markup changes, this is the file to update.

use crate::error::{Result, ScraperError};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::str::FromStr;

/// Title segments are separated by " - "; the season name is the fifth.
const TITLE_SEPARATOR: &str = " - ";
const TITLE_SEASON_SEGMENT: usize = 4;

/// e.g. "Thursday 06 Nov 2014"
const WEEK_DATE_FORMAT: &str = "%A %d %b %Y";
const KICKOFF_FORMAT: &str = "%H:%M";

pub const BYE: &str = "Bye";
pub const FIXTURE_ID_ATTR: &str = "data-fixture-id";

/// Cells of a standings table row, in page order.
pub const STANDINGS_COLUMNS: [&str; 13] = [
    "position",
    "team",
    "played",
    "won",
    "lost",
    "drawn",
    "forfeit_for",
    "forfeit_against",
    "score_for",
    "score_against",
    "score_difference",
    "bonus_points",
    "points",
];

pub mod column {
    pub const TEAM: usize = 1;
    pub const PLAYED: usize = 2;
    pub const WON: usize = 3;
    pub const LOST: usize = 4;
    pub const DRAWN: usize = 5;
    pub const FORFEIT_FOR: usize = 6;
    pub const FORFEIT_AGAINST: usize = 7;
    pub const SCORE_FOR: usize = 8;
    pub const SCORE_AGAINST: usize = 9;
    pub const SCORE_DIFFERENCE: usize = 10;
    pub const BONUS_POINTS: usize = 11;
    pub const POINTS: usize = 12;
}

pub struct Markup {
    pub title: Selector,
    pub heading: Selector,
    pub link: Selector,
    pub row: Selector,
    pub cell: Selector,

    pub standings_table: Selector,
    pub team_cell: Selector,
    pub team_row_class: Regex,

    pub week_table: Selector,
    pub week_header: Selector,
    pub game_row: Selector,
    pub stage_title: Selector,
    pub kickoff: Selector,
    pub score: Selector,
    pub fixture_id: Selector,
    pub score_box: Selector,
    pub venue: Selector,
    pub home_team: Selector,
    pub away_team: Selector,
}

impl Markup {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: selector("title")?,
            heading: selector("h3")?,
            link: selector("a")?,
            row: selector("tr")?,
            cell: selector("td")?,

            standings_table: selector("table.STTable")?,
            team_cell: selector("td.STTeamCell")?,
            team_row_class: Regex::new("^STRow")
                .map_err(|e| ScraperError::SelectorError(e.to_string()))?,

            week_table: selector("table.FTable")?,
            week_header: selector("tr.FHeader")?,
            game_row: selector("tr.FRow")?,
            stage_title: selector("td.FTitle")?,
            kickoff: selector("td.FDate")?,
            score: selector("td.FScore")?,
            fixture_id: selector("[data-fixture-id]")?,
            score_box: selector("div")?,
            venue: selector("td.FPlayingArea")?,
            home_team: selector("td.FHomeTeam")?,
            away_team: selector("td.FAwayTeam")?,
        })
    }

    pub fn is_team_row(&self, row: ElementRef) -> bool {
        row.value()
            .classes()
            .any(|class| self.team_row_class.is_match(class))
    }

    /// Date printed in the header row of a weekly schedule table.
    pub fn week_date(&self, week_table: ElementRef) -> Result<NaiveDate> {
        let header = first(week_table, &self.week_header)
            .and_then(|row| first(row, &self.cell))
            .ok_or(ScraperError::MissingElement("week header"))?;
        parse_week_date(&text_of(header))
    }

    /// Site team id from the link in a home/away team cell.
    pub fn team_link_id(&self, team_cell: ElementRef) -> Result<Option<u32>> {
        match first(team_cell, &self.link) {
            Some(link) => Ok(Some(link_param_number(link, "TeamId")?)),
            None => Ok(None),
        }
    }

    pub fn game_id(&self, score_cell: ElementRef) -> Result<u32> {
        let id_holder = first(score_cell, &self.fixture_id)
            .ok_or(ScraperError::MissingElement("fixture id"))?;
        let raw = id_holder.value().attr(FIXTURE_ID_ATTR).unwrap_or_default();
        parse_number(raw.trim(), "fixture id")
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::SelectorError(format!("{}: {}", css, e)).into())
}

pub fn first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

pub fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn season_name_from_title(title: &str) -> Option<String> {
    title
        .trim()
        .split(TITLE_SEPARATOR)
        .nth(TITLE_SEASON_SEGMENT)
        .map(|name| name.trim().to_string())
}

pub fn parse_week_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), WEEK_DATE_FORMAT)
        .map_err(|_| ScraperError::InvalidDate(text.to_string()).into())
}

pub fn parse_kickoff(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), KICKOFF_FORMAT)
        .map_err(|_| ScraperError::InvalidTime(text.to_string()).into())
}

pub fn parse_number<T: FromStr>(text: &str, field: &'static str) -> Result<T> {
    text.trim().parse().map_err(|_| {
        ScraperError::InvalidNumber {
            field,
            value: text.to_string(),
        }
        .into()
    })
}

/// Home and away score from text such as "12 - 7".
pub fn parse_score(text: &str, game_id: u32) -> Result<(u32, u32)> {
    let invalid = || ScraperError::InvalidScore {
        game_id,
        text: text.to_string(),
    };
    let (home, away) = text.split_once('-').ok_or_else(invalid)?;
    let home = home.trim().parse().map_err(|_| invalid())?;
    let away = away.trim().parse().map_err(|_| invalid())?;
    Ok((home, away))
}

/// Value of a query parameter in a link's href, if present and non-empty.
pub fn link_param(link: ElementRef, param: &str) -> Option<String> {
    let href = link.value().attr("href")?;
    let query = href.split_once('?').map_or(href, |(_, query)| query);
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key.eq_ignore_ascii_case(param))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn link_param_number(link: ElementRef, param: &'static str) -> Result<u32> {
    let value = link_param(link, param).ok_or_else(|| ScraperError::MissingLinkParam {
        param,
        href: link.value().attr("href").unwrap_or_default().to_string(),
    })?;
    parse_number(&value, param)
}
