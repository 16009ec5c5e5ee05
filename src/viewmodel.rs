use chrono::{DateTime, Utc};
use league_api::{Fixture, FixtureStatus, League, Standing};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Pure record → display-shape adapters. No I/O, no mutation.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FixtureCard {
    pub id: String,
    pub home: String,
    pub away: String,
    pub home_initials: String,
    pub away_initials: String,
    pub home_crest: Option<String>,
    pub away_crest: Option<String>,
    pub kickoff: String,
    pub venue: Option<String>,
    pub score: String,
    pub status: &'static str,
    pub status_color: &'static str,
}

pub fn fixture_card(fixture: &Fixture) -> FixtureCard {
    FixtureCard {
        id: fixture.id.clone(),
        home: fixture.home.short_name.clone(),
        away: fixture.away.short_name.clone(),
        home_initials: initials(&fixture.home.name),
        away_initials: initials(&fixture.away.name),
        home_crest: fixture.home.crest_path.clone(),
        away_crest: fixture.away.crest_path.clone(),
        kickoff: kickoff_label(fixture.kickoff),
        venue: fixture.venue.clone(),
        score: score_line(fixture),
        status: fixture.status.label(),
        status_color: status_color(fixture.status),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub position: u16,
    pub team: String,
    pub initials: String,
    pub played: u16,
    pub won: u16,
    pub drawn: u16,
    pub lost: u16,
    pub goal_difference: String,
    pub points: u16,
    pub win_pct: String,
}

pub fn table_row(standing: &Standing) -> TableRow {
    TableRow {
        position: standing.position,
        team: standing.team.name.clone(),
        initials: initials(&standing.team.name),
        played: standing.played,
        won: standing.won,
        drawn: standing.drawn,
        lost: standing.lost,
        goal_difference: signed(standing.goal_difference),
        points: standing.points,
        win_pct: format!("{:.1}%", standing.win_percentage()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueRow {
    pub id: String,
    pub name: String,
    pub season: String,
    pub kind: &'static str,
    pub division: u8,
}

pub fn league_row(league: &League) -> LeagueRow {
    LeagueRow {
        id: league.id.clone(),
        name: league.name.clone(),
        season: league.season.clone(),
        kind: league.kind.label(),
        division: league.division,
    }
}

/// Crest fallback: initials from the leading words, skipping club suffixes.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter(|word| !matches!(*word, "FC" | "AFC" | "CF"))
        .filter_map(|word| word.chars().next())
        .filter(|c| c.is_alphanumeric())
        .take(2)
        .collect();
    if letters.is_empty() {
        "?".to_owned()
    } else {
        letters.to_uppercase()
    }
}

pub fn status_color(status: FixtureStatus) -> &'static str {
    match status {
        FixtureStatus::Scheduled => "#64748B",
        FixtureStatus::Live => "#16A34A",
        FixtureStatus::Completed => "#2563EB",
        FixtureStatus::Postponed => "#D97706",
        FixtureStatus::Cancelled => "#DC2626",
    }
}

fn kickoff_label(kickoff: Option<DateTime<Utc>>) -> String {
    kickoff
        .map(|dt| dt.format("%a %d %b, %H:%M").to_string())
        .unwrap_or_else(|| "TBC".to_owned())
}

fn score_line(fixture: &Fixture) -> String {
    match fixture.score {
        Some((home, away)) => format!("{home}-{away}"),
        None => "vs".to_owned(),
    }
}

fn signed(n: i16) -> String {
    if n > 0 { format!("+{n}") } else { n.to_string() }
}
