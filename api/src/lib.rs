pub mod client;
pub mod firestore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the Firestore wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct League {
    pub id: String,
    pub name: String,
    pub season: String, // display label, e.g. "2025/26"
    pub kind: LeagueKind,
    pub division: u8,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueKind {
    #[default]
    Mens,
    Womens,
    Youth,
}

impl LeagueKind {
    pub fn label(&self) -> &'static str {
        match self {
            LeagueKind::Mens => "Men's",
            LeagueKind::Womens => "Women's",
            LeagueKind::Youth => "Youth",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,       // "Harborough Town FC"
    pub short_name: String, // "Harborough"
    /// Object-storage path for the crest asset. None = no crest uploaded;
    /// view models fall back to initials.
    pub crest_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Postponed,
    Cancelled,
}

impl FixtureStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FixtureStatus::Scheduled => "Scheduled",
            FixtureStatus::Live => "Live",
            FixtureStatus::Completed => "Full Time",
            FixtureStatus::Postponed => "Postponed",
            FixtureStatus::Cancelled => "Cancelled",
        }
    }

    /// Statuses that may legitimately carry a score.
    pub fn has_score(&self) -> bool {
        matches!(self, FixtureStatus::Live | FixtureStatus::Completed)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixture {
    pub id: String,
    pub league_id: String,
    pub home: Team,
    pub away: Team,
    /// None when the stored timestamp is missing or unparseable.
    pub kickoff: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub status: FixtureStatus,
    pub score: Option<(u8, u8)>, // (home_goals, away_goals)
}

impl Fixture {
    pub fn is_live(&self) -> bool {
        self.status == FixtureStatus::Live
    }

    /// Winning team of a completed fixture. None for draws, live games and
    /// anything not yet played.
    pub fn winner(&self) -> Option<&Team> {
        if self.status != FixtureStatus::Completed {
            return None;
        }
        let (home_goals, away_goals) = self.score?;
        match home_goals.cmp(&away_goals) {
            std::cmp::Ordering::Greater => Some(&self.home),
            std::cmp::Ordering::Less => Some(&self.away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standing {
    pub league_id: String,
    pub team: Team,
    pub played: u16,
    pub won: u16,
    pub drawn: u16,
    pub lost: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub goal_difference: i16,
    pub points: u16,
    pub position: u16,
}

impl Standing {
    /// Share of played games won, as a percentage. 0.0 before the first game.
    pub fn win_percentage(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        f64::from(self.won) / f64::from(self.played) * 100.0
    }
}
