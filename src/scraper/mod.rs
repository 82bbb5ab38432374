mod fixtures;
pub mod markup;
mod standings;

pub use fixtures::FixturesScraper;
pub use markup::Markup;
pub use standings::StandingsScraper;

use crate::config::{Config, StageRemapTable};
use crate::error::Result;
use crate::overrides::ScoreOverrides;
use crate::season::Season;
use scraper::Html;
use std::path::Path;

pub struct Scraper {
    document: Html,
}

impl Scraper {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn standings<'a>(&'a self, markup: &'a Markup) -> StandingsScraper<'a> {
        StandingsScraper::new(&self.document, markup)
    }

    pub fn fixtures<'a>(&'a self, markup: &'a Markup) -> FixturesScraper<'a> {
        FixturesScraper::new(&self.document, markup)
    }
}

/// Read-only inputs shared by every season's parse.
#[derive(Debug, Clone)]
pub struct ParseEnv {
    pub score_overrides: ScoreOverrides,
    pub stage_remaps: StageRemapTable,
}

impl ParseEnv {
    pub fn new(score_overrides: ScoreOverrides, stage_remaps: StageRemapTable) -> Self {
        Self {
            score_overrides,
            stage_remaps,
        }
    }

    pub fn from_config(config: &Config, score_overrides: ScoreOverrides) -> Self {
        Self::new(score_overrides, config.stage_remap_table())
    }
}

impl Default for ParseEnv {
    fn default() -> Self {
        Self::from_config(&Config::default(), ScoreOverrides::new())
    }
}

/// Builds one season from its standings page and, optionally, its fixtures
/// page. The standings page has to come first: it is the only source of the
/// season identity and the team list.
pub struct SeasonParse<'env> {
    env: &'env ParseEnv,
    markup: Markup,
    season: Season,
}

impl<'env> SeasonParse<'env> {
    pub fn new(env: &'env ParseEnv) -> Result<Self> {
        Ok(Self {
            env,
            markup: Markup::new()?,
            season: Season::new(),
        })
    }

    pub fn parse_standings_page(&mut self, html: &str) -> Result<()> {
        Scraper::new(html)
            .standings(&self.markup)
            .parse_into(&mut self.season, self.env)
    }

    pub fn parse_fixtures_page(&mut self, html: &str) -> Result<()> {
        Scraper::new(html)
            .fixtures(&self.markup)
            .parse_into(&mut self.season)
    }

    pub fn parse_standings_file(&mut self, path: &Path) -> Result<()> {
        let html = std::fs::read_to_string(path)?;
        self.parse_standings_page(&html)
    }

    pub fn parse_fixtures_file(&mut self, path: &Path) -> Result<()> {
        let html = std::fs::read_to_string(path)?;
        self.parse_fixtures_page(&html)
    }

    pub fn season(&self) -> &Season {
        &self.season
    }

    pub fn into_season(self) -> Season {
        self.season
    }
}
