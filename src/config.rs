use crate::error::{ConfigError, Result};
use crate::values::SeasonStage;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
    #[serde(default)]
    pub file_enabled: bool,
}

/// One league-specific stage relabelling: in `season_id`, games the site
/// marks as `from` are really `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StageRemap {
    pub season_id: u32,
    pub from: SeasonStage,
    pub to: SeasonStage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_dir")]
    pub input_dir: PathBuf,

    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub logging: LogConfig,

    #[serde(default = "default_stage_remaps")]
    pub stage_remaps: Vec<StageRemap>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
            file_enabled: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: default_dir(),
            output_dir: default_dir(),
            logging: LogConfig::default(),
            stage_remaps: default_stage_remaps(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        let config = Self::from_toml(&content)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `from_file`, but a missing file means the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Stage relabellings grouped by season for lookup during parsing.
    pub fn stage_remap_table(&self) -> StageRemapTable {
        StageRemapTable::from_remaps(&self.stage_remaps)
    }

    fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("input_dir".to_string()).into());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("output_dir".to_string()).into());
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        if self.logging.file_enabled && self.logging.directory.is_empty() {
            return Err(ConfigError::InvalidValue(
                "logging.directory cannot be empty when file logging is enabled".to_string(),
            )
            .into());
        }

        let mut seen = HashMap::new();
        for remap in &self.stage_remaps {
            if remap.from.is_regular() || remap.to.is_regular() {
                return Err(ConfigError::InvalidValue(format!(
                    "stage remap for season {} must map between finals stages",
                    remap.season_id
                ))
                .into());
            }
            if let Some(to) = seen.insert((remap.season_id, remap.from), remap.to) {
                if to != remap.to {
                    return Err(ConfigError::InvalidValue(format!(
                        "season {} remaps {} twice",
                        remap.season_id, remap.from
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }
}

/// Per-season stage relabelling, applied after a game's stage is known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageRemapTable {
    seasons: HashMap<u32, HashMap<SeasonStage, SeasonStage>>,
}

impl StageRemapTable {
    pub fn from_remaps(remaps: &[StageRemap]) -> Self {
        let mut seasons: HashMap<u32, HashMap<SeasonStage, SeasonStage>> = HashMap::new();
        for remap in remaps {
            seasons
                .entry(remap.season_id)
                .or_default()
                .insert(remap.from, remap.to);
        }
        Self { seasons }
    }

    pub fn apply(&self, season_id: u32, stage: SeasonStage) -> SeasonStage {
        self.seasons
            .get(&season_id)
            .and_then(|stages| stages.get(&stage))
            .copied()
            .unwrap_or(stage)
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_stage_remaps() -> Vec<StageRemap> {
    use SeasonStage::*;
    vec![
        StageRemap {
            season_id: 105,
            from: Semifinal1,
            to: Final7th,
        },
        StageRemap {
            season_id: 105,
            from: Semifinal2,
            to: Final5th,
        },
        StageRemap {
            season_id: 105,
            from: Semifinal5th1,
            to: Final3rd,
        },
        StageRemap {
            season_id: 108,
            from: Semifinal2,
            to: Final5th,
        },
        StageRemap {
            season_id: 108,
            from: Semifinal5th1,
            to: Final3rd,
        },
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "league-scraper.log".to_string()
}
