use anyhow::Context;
use clap::{Parser, Subcommand};
use league_scraper::config::Config;
use league_scraper::extraction::extract_all;
use league_scraper::logging::{init_logging, parse_log_level, LoggerConfig};
use league_scraper::utils::save_json;
use league_scraper::{log_error, log_info, ParseEnv, Result, ScoreOverrides, SeasonParse};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::rolling::Rotation;

#[derive(Parser)]
#[command(name = "league-scraper")]
#[command(about = "Extract seasons, teams and games from saved league standings and fixtures pages", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every season in the input directory into CSV tables
    ExtractAll {
        /// Directory with season-<ID>-standings.html, season-<ID>-fixtures.html and reference CSVs
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// Directory the gm*.csv tables are written to
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Parse one standings page and print the season record as JSON
    ParseStandings {
        /// Saved standings page
        standings: PathBuf,
        /// Saved fixtures page of the same season
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Score overrides CSV
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// Write the JSON to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        parse_log_level(&config.logging.level)?
    };
    init_logging(LoggerConfig {
        directory: config
            .logging
            .file_enabled
            .then(|| config.logging.directory.clone()),
        file_name: config.logging.filename.clone(),
        rotation: Rotation::DAILY,
        level,
    })?;

    let result = match cli.command {
        Commands::ExtractAll {
            input_dir,
            output_dir,
        } => {
            let input_dir = input_dir.unwrap_or_else(|| config.input_dir.clone());
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            run_extract_all(&input_dir, &output_dir, &config)
        }
        Commands::ParseStandings {
            standings,
            fixtures,
            overrides,
            output,
        } => run_parse_standings(
            &standings,
            fixtures.as_deref(),
            overrides.as_deref(),
            output.as_deref(),
            &config,
        ),
    };

    if let Err(err) = &result {
        log_error!(err => "[main] Command failed");
    }
    Ok(result?)
}

fn run_extract_all(input_dir: &Path, output_dir: &Path, config: &Config) -> Result<()> {
    log_info!(
        "[main] Extracting from {:?} into {:?}",
        input_dir,
        output_dir
    );
    let extraction = extract_all(input_dir, output_dir, config)?;
    log_info!(
        "[main] Extracted {} seasons, {} games",
        extraction.seasons.len(),
        extraction.games.len()
    );
    Ok(())
}

fn run_parse_standings(
    standings: &Path,
    fixtures: Option<&Path>,
    overrides: Option<&Path>,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let score_overrides = match overrides {
        Some(path) => ScoreOverrides::from_csv_path(path)?,
        None => ScoreOverrides::new(),
    };
    let env = ParseEnv::from_config(config, score_overrides);

    let mut parse = SeasonParse::new(&env)?;
    parse.parse_standings_file(standings)?;
    if let Some(fixtures) = fixtures {
        parse.parse_fixtures_file(fixtures)?;
    }

    match output {
        Some(path) => {
            save_json(parse.season(), path)?;
            log_info!("[main] Saved season record to {:?}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(parse.season())?),
    }
    Ok(())
}
