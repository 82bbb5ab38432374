//! Closed value sets shared by the parsers and the export: season stages,
//! game outcomes and score-confidence statuses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStage {
    Regular,
    Final1st,
    Final3rd,
    Final5th,
    Final7th,
    Semifinal1,
    Semifinal2,
    Semifinal5th1,
    Semifinal5th2,
}

/// Stage labels as printed in the title cells of the league site's schedule.
const SITE_STAGE_LABELS: &[(&str, SeasonStage)] = &[
    ("Semi Final 1", SeasonStage::Semifinal1),
    ("Semi Final 2", SeasonStage::Semifinal2),
    ("Semi Final 3", SeasonStage::Semifinal5th1),
    ("Semi Final 4", SeasonStage::Semifinal5th2),
    ("Final", SeasonStage::Final1st),
    ("Finals", SeasonStage::Final1st),
    ("Grand Final", SeasonStage::Final1st),
    ("3rd/4th playoff", SeasonStage::Final3rd),
    ("3rd Place Playoff", SeasonStage::Final3rd),
    ("3rd Place Final", SeasonStage::Final3rd),
    ("Third Place Final", SeasonStage::Final3rd),
    ("Fifth Place Playoff", SeasonStage::Final5th),
    ("5th Place Playoff", SeasonStage::Final5th),
    ("5th/6th playoff", SeasonStage::Final5th),
    ("5th Place Final", SeasonStage::Final5th),
    ("7th Place Final", SeasonStage::Final7th),
    ("7th/8th playoff", SeasonStage::Final7th),
    ("7th Place Play Offs", SeasonStage::Final7th),
];

/// Ranks handed out by a deciding finals game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalsPlacing {
    pub winner: Option<u8>,
    pub loser: Option<u8>,
}

impl SeasonStage {
    pub const ALL: [SeasonStage; 9] = [
        SeasonStage::Regular,
        SeasonStage::Final1st,
        SeasonStage::Final3rd,
        SeasonStage::Final5th,
        SeasonStage::Final7th,
        SeasonStage::Semifinal1,
        SeasonStage::Semifinal2,
        SeasonStage::Semifinal5th1,
        SeasonStage::Semifinal5th2,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            SeasonStage::Regular => "regular",
            SeasonStage::Final1st => "final1st",
            SeasonStage::Final3rd => "final3rd",
            SeasonStage::Final5th => "final5th",
            SeasonStage::Final7th => "final7th",
            SeasonStage::Semifinal1 => "semifinal1",
            SeasonStage::Semifinal2 => "semifinal2",
            SeasonStage::Semifinal5th1 => "semifinal5th1",
            SeasonStage::Semifinal5th2 => "semifinal5th2",
        }
    }

    /// Maps a stage title from the site to a stage. `None` means the label is
    /// not a stage marker and the current stage stays as it is.
    pub fn decode_site_label(label: &str) -> Option<Self> {
        SITE_STAGE_LABELS
            .iter()
            .find(|(text, _)| *text == label)
            .map(|(_, stage)| *stage)
    }

    pub fn is_regular(&self) -> bool {
        *self == SeasonStage::Regular
    }

    pub fn is_finals(&self) -> bool {
        !self.is_regular()
    }

    /// Final ranks decided by a game in this stage.
    ///
    /// Losing the first 5th place semifinal means finishing last in a seven
    /// team league, so only the loser gets a rank there.
    pub fn finals_placing(&self) -> Option<FinalsPlacing> {
        let (winner, loser) = match self {
            SeasonStage::Final1st => (Some(1), Some(2)),
            SeasonStage::Final3rd => (Some(3), Some(4)),
            SeasonStage::Final5th => (Some(5), Some(6)),
            SeasonStage::Final7th => (Some(7), Some(8)),
            SeasonStage::Semifinal5th1 => (None, Some(7)),
            _ => return None,
        };
        Some(FinalsPlacing { winner, loser })
    }
}

impl fmt::Display for SeasonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SeasonStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeasonStage::ALL
            .iter()
            .copied()
            .find(|stage| stage.code() == s)
            .ok_or_else(|| format!("unknown season stage: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    #[serde(rename = "W")]
    Won,
    #[serde(rename = "L")]
    Lost,
    #[serde(rename = "D")]
    Drawn,
    #[serde(rename = "FF")]
    ForfeitFor,
    #[serde(rename = "FA")]
    ForfeitAgainst,
    #[serde(rename = "M")]
    Missing,
}

/// The score the site records for a forfeited game.
const FORFEIT_SCORE: (u32, u32) = (20, 0);

impl GameOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            GameOutcome::Won => "W",
            GameOutcome::Lost => "L",
            GameOutcome::Drawn => "D",
            GameOutcome::ForfeitFor => "FF",
            GameOutcome::ForfeitAgainst => "FA",
            GameOutcome::Missing => "M",
        }
    }

    /// Home and away outcomes for a final score.
    pub fn from_scores(home: u32, away: u32) -> (GameOutcome, GameOutcome) {
        if (home, away) == FORFEIT_SCORE {
            (GameOutcome::ForfeitFor, GameOutcome::ForfeitAgainst)
        } else if (away, home) == FORFEIT_SCORE {
            (GameOutcome::ForfeitAgainst, GameOutcome::ForfeitFor)
        } else if home == away {
            (GameOutcome::Drawn, GameOutcome::Drawn)
        } else if home > away {
            (GameOutcome::Won, GameOutcome::Lost)
        } else {
            (GameOutcome::Lost, GameOutcome::Won)
        }
    }

    /// Ladder points for an outcome. Finals games are worth nothing and a
    /// missing result has no points value at all.
    pub fn points_for(&self, stage: SeasonStage) -> Option<u32> {
        if stage.is_finals() {
            return Some(0);
        }
        match self {
            GameOutcome::Won | GameOutcome::ForfeitFor => Some(3),
            GameOutcome::Drawn => Some(2),
            GameOutcome::Lost | GameOutcome::ForfeitAgainst => Some(1),
            GameOutcome::Missing => None,
        }
    }

    pub fn was_won(&self) -> bool {
        matches!(self, GameOutcome::Won | GameOutcome::ForfeitFor)
    }

    pub fn was_lost(&self) -> bool {
        matches!(self, GameOutcome::Lost | GameOutcome::ForfeitAgainst)
    }

    pub fn was_drawn(&self) -> bool {
        *self == GameOutcome::Drawn
    }

    /// Forfeit-insensitive view of the outcome.
    pub fn normalize(&self) -> GameOutcome {
        if self.was_won() {
            GameOutcome::Won
        } else if self.was_lost() {
            GameOutcome::Lost
        } else {
            *self
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How much a recorded score can be trusted. Stored and exported as its
/// numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ScoreStatus {
    Undecided = 0,
    WinnerAndScoreOk = 1,
    WinnerOkScoreProbable = 2,
    WinnerOkScoreFake = 3,
    WinnerProbableScoreFake = 4,
    Unknown = 5,
}

impl From<ScoreStatus> for u8 {
    fn from(status: ScoreStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for ScoreStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ScoreStatus::Undecided),
            1 => Ok(ScoreStatus::WinnerAndScoreOk),
            2 => Ok(ScoreStatus::WinnerOkScoreProbable),
            3 => Ok(ScoreStatus::WinnerOkScoreFake),
            4 => Ok(ScoreStatus::WinnerProbableScoreFake),
            5 => Ok(ScoreStatus::Unknown),
            _ => Err(format!("unknown score status code: {}", code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forfeit_scores_are_detected_both_ways() {
        assert_eq!(
            GameOutcome::from_scores(20, 0),
            (GameOutcome::ForfeitFor, GameOutcome::ForfeitAgainst)
        );
        assert_eq!(
            GameOutcome::from_scores(0, 20),
            (GameOutcome::ForfeitAgainst, GameOutcome::ForfeitFor)
        );
        // Only the exact 20-0 pair is a forfeit.
        assert_eq!(
            GameOutcome::from_scores(21, 0),
            (GameOutcome::Won, GameOutcome::Lost)
        );
    }

    #[test]
    fn equal_scores_are_a_draw() {
        for x in [0, 7, 20, 45] {
            assert_eq!(
                GameOutcome::from_scores(x, x),
                (GameOutcome::Drawn, GameOutcome::Drawn)
            );
        }
    }

    #[test]
    fn higher_score_wins() {
        assert_eq!(
            GameOutcome::from_scores(12, 7),
            (GameOutcome::Won, GameOutcome::Lost)
        );
        assert_eq!(
            GameOutcome::from_scores(3, 15),
            (GameOutcome::Lost, GameOutcome::Won)
        );
    }

    #[test]
    fn regular_season_points() {
        let regular = SeasonStage::Regular;
        assert_eq!(GameOutcome::Won.points_for(regular), Some(3));
        assert_eq!(GameOutcome::Drawn.points_for(regular), Some(2));
        assert_eq!(GameOutcome::Lost.points_for(regular), Some(1));
        assert_eq!(GameOutcome::ForfeitFor.points_for(regular), Some(3));
        assert_eq!(GameOutcome::ForfeitAgainst.points_for(regular), Some(1));
        assert_eq!(GameOutcome::Missing.points_for(regular), None);
    }

    #[test]
    fn finals_games_are_worth_nothing() {
        let outcomes = [
            GameOutcome::Won,
            GameOutcome::Lost,
            GameOutcome::Drawn,
            GameOutcome::ForfeitFor,
            GameOutcome::ForfeitAgainst,
            GameOutcome::Missing,
        ];
        for stage in SeasonStage::ALL.iter().filter(|s| s.is_finals()) {
            for outcome in outcomes {
                assert_eq!(outcome.points_for(*stage), Some(0), "{} {}", stage, outcome);
            }
        }
    }

    #[test]
    fn normalize_ignores_forfeits() {
        assert_eq!(GameOutcome::ForfeitFor.normalize(), GameOutcome::Won);
        assert_eq!(GameOutcome::ForfeitAgainst.normalize(), GameOutcome::Lost);
        assert_eq!(GameOutcome::Drawn.normalize(), GameOutcome::Drawn);
        assert_eq!(GameOutcome::Missing.normalize(), GameOutcome::Missing);
        assert!(GameOutcome::ForfeitFor.was_won());
        assert!(GameOutcome::ForfeitAgainst.was_lost());
        assert!(!GameOutcome::Drawn.was_won());
    }

    #[test]
    fn site_labels_decode_to_stages() {
        assert_eq!(
            SeasonStage::decode_site_label("Grand Final"),
            Some(SeasonStage::Final1st)
        );
        assert_eq!(
            SeasonStage::decode_site_label("3rd/4th playoff"),
            Some(SeasonStage::Final3rd)
        );
        assert_eq!(
            SeasonStage::decode_site_label("Semi Final 3"),
            Some(SeasonStage::Semifinal5th1)
        );
        assert_eq!(SeasonStage::decode_site_label("Round 4"), None);
        assert_eq!(SeasonStage::decode_site_label("grand final"), None);
    }

    #[test]
    fn stage_codes_round_trip_through_from_str() {
        for stage in SeasonStage::ALL {
            assert_eq!(stage.code().parse::<SeasonStage>(), Ok(stage));
        }
        assert!("quarterfinal".parse::<SeasonStage>().is_err());
    }

    #[test]
    fn finals_placings() {
        let grand_final = SeasonStage::Final1st.finals_placing().unwrap();
        assert_eq!(grand_final.winner, Some(1));
        assert_eq!(grand_final.loser, Some(2));

        let fifth_semi = SeasonStage::Semifinal5th1.finals_placing().unwrap();
        assert_eq!(fifth_semi.winner, None);
        assert_eq!(fifth_semi.loser, Some(7));

        assert!(SeasonStage::Semifinal1.finals_placing().is_none());
        assert!(SeasonStage::Regular.finals_placing().is_none());
    }

    #[test]
    fn score_status_codes() {
        assert_eq!(ScoreStatus::try_from(5), Ok(ScoreStatus::Unknown));
        assert_eq!(u8::from(ScoreStatus::WinnerOkScoreProbable), 2);
        assert!(ScoreStatus::try_from(6).is_err());
    }
}
