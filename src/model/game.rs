use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry-assigned game identifier. Never reused for the lifetime of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of an active game. Updates produce a new record, the stored one is never edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub start_time: DateTime<Utc>,
}

impl Game {
    /// A freshly started game at 0-0.
    pub fn new(id: GameId, home_team: &str, away_team: &str, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score: 0,
            away_score: 0,
            start_time,
        }
    }

    /// Copy of this game carrying new scores; id, teams and start time are kept.
    pub fn with_scores(&self, home_score: u32, away_score: u32) -> Self {
        Self {
            home_score,
            away_score,
            ..self.clone()
        }
    }

    pub fn total_score(&self) -> u64 {
        u64::from(self.home_score) + u64::from(self.away_score)
    }

    /// True when `team` plays on either side, ignoring case.
    pub fn involves(&self, team: &str) -> bool {
        let team = team_key(team);
        team_key(&self.home_team) == team || team_key(&self.away_team) == team
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} - {} {} (started {})",
            self.id,
            self.home_team,
            self.home_score,
            self.away_score,
            self.away_team,
            self.start_time.to_rfc3339()
        )
    }
}

/// Case-folded form of a team name used for uniqueness checks.
///
/// Each char is folded on its own (simple uppercase, then lowercase), so names only match when
/// they have the same length and agree char by char ignoring case. Whitespace is significant:
/// `"Mexico "` and `"Mexico"` are different teams.
pub(crate) fn team_key(team: &str) -> String {
    team.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    // multi-char uppercase mappings (e.g. 'ß' -> "SS") have no simple form; keep the char
    let upper = match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    };
    // only 'İ' lowercases to more than one char, and its simple form is the leading 'i'
    upper.to_lowercase().next().unwrap_or(upper)
}
