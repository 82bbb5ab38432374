mod common;

use common::*;
use league_scraper::error::ExtractionError;
use league_scraper::extraction::{create_extraction, extract_all};
use league_scraper::{AppError, Config};
use std::fs;
use std::path::Path;

const FRANCHISES: &str = "\
id,name
1,Unicorns
2,Dragons
";

const FRANCHISE_SEASONS: &str = "\
season_id,team_id,franchise_id,name
105,57,1,Unicorns FC
114,57,1,Unicorns
114,58,2,Dragons
";

const SCORE_OVERRIDES: &str = "\
game_id,home_team_id,home_team_score,away_team_id,away_team_score,score_status,score_status_comments,season_stage
1004,,8,,6,2,Reported by captain,
";

fn input_dir(with_reference_data: bool) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "season-105-standings.html",
        "season-114-standings.html",
        "season-114-fixtures.html",
    ] {
        fs::copy(data_dir().join(name), dir.path().join(name)).unwrap();
    }
    fs::write(dir.path().join("notes.txt"), "not a season page").unwrap();

    if with_reference_data {
        fs::write(dir.path().join("franchises.csv"), FRANCHISES).unwrap();
        fs::write(dir.path().join("franchise_seasons.csv"), FRANCHISE_SEASONS).unwrap();
        fs::write(dir.path().join("score_overrides.csv"), SCORE_OVERRIDES).unwrap();
    }
    dir
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn seasons_are_numbered_by_first_game_day() {
    let input = input_dir(true);
    let extraction = create_extraction(input.path(), &Config::default()).unwrap();

    let seasons: Vec<_> = extraction
        .seasons
        .iter()
        .map(|s| (s.id, s.sequence_number, s.first_week_date, s.last_week_date))
        .collect();
    assert_eq!(
        seasons,
        vec![
            (105, Some(1), Some(date(2018, 1, 11)), Some(date(2018, 1, 18))),
            (114, Some(2), Some(date(2019, 3, 7)), Some(date(2019, 4, 4))),
        ]
    );
    assert_eq!(extraction.games.len(), 12);
    assert_eq!(extraction.team_seasons.len(), 6);
    assert_eq!(extraction.franchises.len(), 2);
    assert_eq!(extraction.teams.len(), 3);
}

#[test]
fn extract_all_writes_every_table() {
    let input = input_dir(true);
    let output = tempfile::tempdir().unwrap();
    let output_dir = output.path().join("export");

    extract_all(input.path(), &output_dir, &Config::default()).unwrap();

    let seasons = lines(&output_dir.join("gmseasons.csv"));
    assert_eq!(
        seasons,
        vec![
            r#""id","league_id","division_id","name","sequence_number","first_week_date","last_week_date""#,
            r#""105","505","","Autumn 2018","1","2018-01-11","2018-01-18""#,
            r#""114","505","3568","Spring 2019","2","2019-03-07","2019-04-04""#,
        ]
    );

    let teams = lines(&output_dir.join("gmteams.csv"));
    assert_eq!(teams[0], r#""team_id","season_id","franchise_id","name","id""#);
    assert_eq!(teams[2], r#""57","114","1","Unicorns","0114.57""#);

    let team_seasons = lines(&output_dir.join("gmteamseasons.csv"));
    assert_eq!(team_seasons.len(), 7);
    assert_eq!(team_seasons[1], r#""0105.57""#);

    let franchises = lines(&output_dir.join("gmfranchises.csv"));
    assert_eq!(franchises, vec![r#""id","name""#, r#""1","Unicorns""#, r#""2","Dragons""#]);

    let games = lines(&output_dir.join("gmgames.csv"));
    assert_eq!(games.len(), 13);
    assert!(games.contains(
        &r#""902","2018-01-18 19:00:00","105","final7th","0105.58","11","W","0105.57","4","L""#
            .to_string()
    ));
    assert!(games.contains(
        &r#""1004","2019-03-14 19:30:00","114","regular","0114.58","8","W","0114.60","6","L""#
            .to_string()
    ));
    assert!(games.contains(
        &r#""1010","2019-04-04 18:30:00","114","regular","0114.57","","","0114.58","","""#
            .to_string()
    ));
}

#[test]
fn missing_reference_files_still_give_headed_tables() {
    let input = input_dir(false);
    let output = tempfile::tempdir().unwrap();

    let extraction = extract_all(input.path(), output.path(), &Config::default()).unwrap();
    assert!(extraction.franchises.is_empty());
    assert!(extraction.teams.is_empty());

    assert_eq!(
        lines(&output.path().join("gmfranchises.csv")),
        vec![r#""id","name""#]
    );
    assert_eq!(lines(&output.path().join("gmteams.csv")).len(), 1);

    let games = lines(&output.path().join("gmgames.csv"));
    let unresolved = r#""1004","2019-03-14 19:30:00","114","regular","0114.58","","","0114.60""#;
    assert!(games.iter().any(|line| line.starts_with(unresolved)));
}

#[test]
fn fixtures_page_without_standings_is_an_error() {
    let input = tempfile::tempdir().unwrap();
    fs::copy(
        data_dir().join("season-114-fixtures.html"),
        input.path().join("season-114-fixtures.html"),
    )
    .unwrap();

    let err = create_extraction(input.path(), &Config::default()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Extraction(ExtractionError::FixturesWithoutStandings(_))
    ));
}

#[test]
fn missing_input_directory_is_an_error() {
    let input = tempfile::tempdir().unwrap();
    let missing = input.path().join("nowhere");

    let err = create_extraction(&missing, &Config::default()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Extraction(ExtractionError::MissingDirectory(_))
    ));
}

#[test]
fn malformed_reference_rows_are_reported() {
    let input = input_dir(false);
    fs::write(input.path().join("franchises.csv"), "id,name\nabc,Unicorns\n").unwrap();

    let err = create_extraction(input.path(), &Config::default()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Extraction(ExtractionError::InvalidReference { file: "franchises.csv", .. })
    ));
}

#[test]
fn game_id_shared_across_seasons_is_kept_in_both() {
    let input = input_dir(false);
    let clashing =
        standings_105().replace(r#"data-fixture-id="901""#, r#"data-fixture-id="1001""#);
    fs::write(input.path().join("season-105-standings.html"), clashing).unwrap();

    let extraction = create_extraction(input.path(), &Config::default()).unwrap();
    let seasons_of_1001: Vec<_> = extraction
        .games
        .iter()
        .filter(|g| g.id == 1001)
        .map(|g| g.season_id)
        .collect();
    assert_eq!(seasons_of_1001, vec![105, 114]);
}
