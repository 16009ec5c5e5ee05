use chrono::{DateTime, Utc};
use league_api::{Fixture, FixtureStatus, Standing, Team};
use log::warn;
use std::collections::HashMap;

/// Which half of the schedule a screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    Upcoming,
    Results,
}

/// Fixtures bucketed under one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    pub key: String,   // "2025-03"
    pub label: String, // "March 2025"
    pub fixtures: Vec<Fixture>,
}

/// Filter, sort and bucket a flat fixture list for display.
///
/// Upcoming keeps scheduled fixtures kicking off after `now`, ascending;
/// Results keeps completed fixtures, descending. Group order and the order
/// inside each group follow the mode. Fixtures without a usable kickoff
/// date are logged and skipped.
pub fn group_by_month(
    fixtures: &[Fixture],
    mode: ScheduleMode,
    now: DateTime<Utc>,
) -> Vec<MonthGroup> {
    let mut kept: Vec<&Fixture> = Vec::new();
    for fixture in fixtures {
        let status_ok = match mode {
            ScheduleMode::Upcoming => fixture.status == FixtureStatus::Scheduled,
            ScheduleMode::Results => fixture.status == FixtureStatus::Completed,
        };
        if !status_ok {
            continue;
        }
        let Some(kickoff) = fixture.kickoff else {
            warn!("fixture {} has no usable kickoff date, skipping", fixture.id);
            continue;
        };
        if mode == ScheduleMode::Upcoming && kickoff <= now {
            continue;
        }
        kept.push(fixture);
    }

    match mode {
        ScheduleMode::Upcoming => kept.sort_by_key(|f| f.kickoff),
        ScheduleMode::Results => kept.sort_by_key(|f| std::cmp::Reverse(f.kickoff)),
    }

    // Sorted input means months are contiguous; fold into groups in order.
    let mut groups: Vec<MonthGroup> = Vec::new();
    for fixture in kept {
        let Some(kickoff) = fixture.kickoff else { continue };
        let key = kickoff.format("%Y-%m").to_string();
        if groups.last().map_or(true, |group| group.key != key) {
            groups.push(MonthGroup {
                key,
                label: kickoff.format("%B %Y").to_string(),
                fixtures: Vec::new(),
            });
        }
        if let Some(group) = groups.last_mut() {
            group.fixtures.push(fixture.clone());
        }
    }
    groups
}

/// Undo the grouping, preserving order.
pub fn flatten(groups: Vec<MonthGroup>) -> Vec<Fixture> {
    groups.into_iter().flat_map(|g| g.fixtures).collect()
}

/// Build a league table from completed fixtures: three points for a win,
/// one for a draw. Sorted by points, goal difference, goals for, then name;
/// positions assigned from 1.
pub fn derive_table(league_id: &str, fixtures: &[Fixture]) -> Vec<Standing> {
    let mut table: HashMap<String, Standing> = HashMap::new();
    for fixture in fixtures {
        if fixture.status != FixtureStatus::Completed {
            continue;
        }
        let Some((home_goals, away_goals)) = fixture.score else {
            continue;
        };
        record(&mut table, league_id, &fixture.home, home_goals, away_goals);
        record(&mut table, league_id, &fixture.away, away_goals, home_goals);
    }

    let mut standings: Vec<Standing> = table.into_values().collect();
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then(a.team.name.cmp(&b.team.name))
    });
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.position = index as u16 + 1;
    }
    standings
}

fn record(
    table: &mut HashMap<String, Standing>,
    league_id: &str,
    team: &Team,
    scored: u8,
    conceded: u8,
) {
    let entry = table.entry(team.id.clone()).or_insert_with(|| Standing {
        league_id: league_id.to_owned(),
        team: team.clone(),
        ..Default::default()
    });
    entry.played += 1;
    entry.goals_for += u16::from(scored);
    entry.goals_against += u16::from(conceded);
    match scored.cmp(&conceded) {
        std::cmp::Ordering::Greater => entry.won += 1,
        std::cmp::Ordering::Equal => entry.drawn += 1,
        std::cmp::Ordering::Less => entry.lost += 1,
    }
    entry.points = 3 * entry.won + entry.drawn;
    entry.goal_difference = entry.goals_for as i16 - entry.goals_against as i16;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn team(id: &str, name: &str) -> Team {
        Team {
            id: id.into(),
            name: name.into(),
            short_name: name.into(),
            crest_path: None,
        }
    }

    fn fx(
        id: &str,
        kickoff: Option<&str>,
        status: FixtureStatus,
        home: &str,
        away: &str,
        score: Option<(u8, u8)>,
    ) -> Fixture {
        Fixture {
            id: id.into(),
            league_id: "prem".into(),
            home: team(home, home),
            away: team(away, away),
            kickoff: kickoff.map(|s| {
                DateTime::parse_from_rfc3339(s)
                    .expect("test kickoff should parse")
                    .with_timezone(&Utc)
            }),
            venue: None,
            status,
            score,
        }
    }

    fn mid_february() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn upcoming_keeps_only_future_scheduled_fixtures_ascending() {
        let fixtures = vec![
            fx("apr", Some("2025-04-05T15:00:00Z"), FixtureStatus::Scheduled, "a", "b", None),
            fx("mar", Some("2025-03-01T15:00:00Z"), FixtureStatus::Scheduled, "c", "d", None),
            fx("feb", Some("2025-02-01T15:00:00Z"), FixtureStatus::Completed, "a", "c", Some((2, 1))),
            fx("past", Some("2025-02-10T15:00:00Z"), FixtureStatus::Scheduled, "b", "d", None),
            fx("live", Some("2025-03-08T15:00:00Z"), FixtureStatus::Live, "a", "d", Some((1, 0))),
        ];
        let groups = group_by_month(&fixtures, ScheduleMode::Upcoming, mid_february());
        let flat = flatten(groups);
        let ids: Vec<&str> = flat.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["mar", "apr"]);
    }

    #[test]
    fn results_keeps_only_completed_fixtures_descending() {
        let fixtures = vec![
            fx("jan", Some("2025-01-04T15:00:00Z"), FixtureStatus::Completed, "a", "b", Some((0, 0))),
            fx("feb", Some("2025-02-01T15:00:00Z"), FixtureStatus::Completed, "c", "d", Some((2, 1))),
            fx("mar", Some("2025-03-01T15:00:00Z"), FixtureStatus::Scheduled, "a", "c", None),
        ];
        let groups = group_by_month(&fixtures, ScheduleMode::Results, mid_february());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "2025-02");
        assert_eq!(groups[0].label, "February 2025");
        assert_eq!(groups[1].key, "2025-01");
        let ids: Vec<String> = flatten(groups).into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["feb", "jan"]);
    }

    #[test]
    fn fixtures_in_the_same_month_share_a_group() {
        let fixtures = vec![
            fx("m1", Some("2025-03-01T15:00:00Z"), FixtureStatus::Scheduled, "a", "b", None),
            fx("m2", Some("2025-03-22T15:00:00Z"), FixtureStatus::Scheduled, "c", "d", None),
        ];
        let groups = group_by_month(&fixtures, ScheduleMode::Upcoming, mid_february());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].fixtures.len(), 2);
        assert_eq!(groups[0].fixtures[0].id, "m1");
    }

    #[test]
    fn grouping_is_idempotent_under_flatten() {
        let fixtures = vec![
            fx("a", Some("2025-03-01T15:00:00Z"), FixtureStatus::Scheduled, "a", "b", None),
            fx("b", Some("2025-04-12T15:00:00Z"), FixtureStatus::Scheduled, "c", "d", None),
            fx("c", Some("2025-03-22T15:00:00Z"), FixtureStatus::Scheduled, "a", "d", None),
        ];
        let now = mid_february();
        let once = group_by_month(&fixtures, ScheduleMode::Upcoming, now);
        let twice = group_by_month(&flatten(once.clone()), ScheduleMode::Upcoming, now);
        assert_eq!(once, twice);
    }

    #[test]
    fn fixtures_without_dates_are_skipped() {
        let fixtures = vec![
            fx("dated", Some("2025-03-01T15:00:00Z"), FixtureStatus::Scheduled, "a", "b", None),
            fx("undated", None, FixtureStatus::Scheduled, "c", "d", None),
        ];
        let groups = group_by_month(&fixtures, ScheduleMode::Upcoming, mid_february());
        let ids: Vec<String> = flatten(groups).into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["dated"]);
    }

    #[test]
    fn derived_standings_satisfy_the_points_and_goal_difference_laws() {
        let fixtures = vec![
            fx("1", Some("2025-01-04T15:00:00Z"), FixtureStatus::Completed, "ham", "rot", Some((2, 1))),
            fx("2", Some("2025-01-11T15:00:00Z"), FixtureStatus::Completed, "rot", "des", Some((1, 1))),
            fx("3", Some("2025-01-18T15:00:00Z"), FixtureStatus::Completed, "des", "ham", Some((0, 3))),
            fx("4", Some("2025-02-01T15:00:00Z"), FixtureStatus::Scheduled, "ham", "des", None),
        ];
        let table = derive_table("prem", &fixtures);
        assert_eq!(table.len(), 3);
        for standing in &table {
            assert_eq!(standing.points, 3 * standing.won + standing.drawn);
            assert_eq!(
                standing.goal_difference,
                standing.goals_for as i16 - standing.goals_against as i16
            );
            assert_eq!(standing.played, standing.won + standing.drawn + standing.lost);
        }
        // ham won both games: 6 points, top of the table.
        assert_eq!(table[0].team.id, "ham");
        assert_eq!(table[0].points, 6);
        assert_eq!(table[0].position, 1);
        assert_eq!(table[0].goal_difference, 4);
    }

    #[test]
    fn equal_points_break_on_goal_difference() {
        let fixtures = vec![
            fx("1", Some("2025-01-04T15:00:00Z"), FixtureStatus::Completed, "a", "b", Some((4, 0))),
            fx("2", Some("2025-01-11T15:00:00Z"), FixtureStatus::Completed, "b", "a", Some((1, 0))),
        ];
        let table = derive_table("prem", &fixtures);
        assert_eq!(table[0].team.id, "a", "a has the better goal difference");
        assert_eq!(table[0].points, table[1].points);
        assert_eq!(table[0].position, 1);
        assert_eq!(table[1].position, 2);
    }

    #[test]
    fn example_scenario_from_mixed_statuses() {
        // One scheduled March fixture, one completed February fixture.
        let fixtures = vec![
            fx("mar", Some("2025-03-01T15:00:00Z"), FixtureStatus::Scheduled, "ham", "rot", None),
            fx("feb", Some("2025-02-01T15:00:00Z"), FixtureStatus::Completed, "ham", "rot", Some((2, 1))),
        ];
        let now = mid_february();

        let upcoming = flatten(group_by_month(&fixtures, ScheduleMode::Upcoming, now));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, "mar");

        let results = flatten(group_by_month(&fixtures, ScheduleMode::Results, now));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "feb");
        assert_eq!(results[0].winner().map(|t| t.id.as_str()), Some("ham"));
    }
}
