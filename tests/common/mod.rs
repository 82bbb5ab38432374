#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use league_scraper::{Game, Season};
use std::fs;
use std::path::{Path, PathBuf};

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn page(name: &str) -> String {
    fs::read_to_string(data_dir().join(name)).unwrap()
}

pub fn standings_114() -> String {
    page("season-114-standings.html")
}

pub fn fixtures_114() -> String {
    page("season-114-fixtures.html")
}

pub fn standings_105() -> String {
    page("season-105-standings.html")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, minute, 0).unwrap()
}

pub fn game(season: &Season, id: u32) -> &Game {
    season
        .games()
        .find(|g| g.id == id)
        .unwrap_or_else(|| panic!("game {} not found", id))
}

pub fn game_ids(season: &Season, day: NaiveDate) -> Vec<u32> {
    season
        .game_days
        .iter()
        .find(|gd| gd.date == day)
        .map(|gd| gd.games.iter().map(|g| g.id).collect())
        .unwrap_or_default()
}
