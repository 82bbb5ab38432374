use crate::error::{ExtractionError, Result};
pub use crate::{log_debug, log_info};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Which page of the league site a saved HTML file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PageKind {
    Standings,
    Fixtures,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonFile {
    pub season_id: u32,
    pub kind: PageKind,
    pub path: PathBuf,
}

fn season_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^season-(\d+)-(standings|fixtures)\.html$").expect("valid season file regex")
    })
}

/// Reads `season-<id>-<standings|fixtures>.html` file names.
pub fn parse_season_file_name(name: &str) -> Option<(u32, PageKind)> {
    let caps = season_file_regex().captures(name)?;
    let season_id = caps[1].parse().ok()?;
    let kind = match &caps[2] {
        "standings" => PageKind::Standings,
        _ => PageKind::Fixtures,
    };
    Some((season_id, kind))
}

pub fn ensure_directory_exists(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(ExtractionError::MissingDirectory(dir.to_path_buf()).into());
    }
    Ok(())
}

/// Saved season pages in `dir`, ordered by season id with each season's
/// standings page ahead of its fixtures page.
pub fn find_season_files(dir: &Path) -> Result<Vec<SeasonFile>> {
    ensure_directory_exists(dir)?;

    let pattern = format!("{}/*.html", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files = Vec::new();
    for entry in glob::glob(&pattern).map_err(ExtractionError::from)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log_debug!("[utils] Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let parsed = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_season_file_name);
        match parsed {
            Some((season_id, kind)) => files.push(SeasonFile {
                season_id,
                kind,
                path,
            }),
            None => log_debug!("[utils] Skipping {:?}", path),
        }
    }

    files.sort_by(|a, b| (a.season_id, a.kind).cmp(&(b.season_id, b.kind)));
    Ok(files)
}

/// Deserializes every row of a reference CSV. A missing file yields no rows.
pub fn read_csv_rows<T: DeserializeOwned>(path: &Path, file: &'static str) -> Result<Vec<T>> {
    if !path.exists() {
        log_info!("[utils] No {} found, skipping", file);
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        let row = record.map_err(|e| ExtractionError::InvalidReference {
            file,
            message: format!("row {}: {}", index + 1, e),
        })?;
        rows.push(row);
    }
    log_info!("[utils] Loaded {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

pub fn save_json(data: &impl Serialize, path: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    let json_string = serde_json::to_string_pretty(data)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}
