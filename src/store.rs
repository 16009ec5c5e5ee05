use crate::aggregate::{self, MonthGroup, ScheduleMode};
use crate::cache::{FixtureQuery, QueryCache};
use chrono::Utc;
use league_api::client::{ApiResult, LeagueApi};
use league_api::{Fixture, FixtureStatus, League, Standing};
use log::debug;
use std::time::Duration;

/// Cache policy injected into the store.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(300), capacity: 32 }
    }
}

/// Owns the remote accessor and the per-session memoization caches.
///
/// Every read goes cache → accessor on miss → aggregation; callers apply
/// view models at the edge.
pub struct LeagueStore {
    api: LeagueApi,
    fixtures: QueryCache<FixtureQuery, Vec<Fixture>>,
    standings: QueryCache<String, Vec<Standing>>,
    leagues: QueryCache<(), Vec<League>>,
}

impl LeagueStore {
    pub fn new(api: LeagueApi, policy: CachePolicy) -> Self {
        Self {
            api,
            fixtures: QueryCache::new(policy.ttl, policy.capacity),
            standings: QueryCache::new(policy.ttl, policy.capacity),
            leagues: QueryCache::new(policy.ttl, 1),
        }
    }

    pub async fn leagues(&mut self) -> ApiResult<Vec<League>> {
        if let Some(cached) = self.leagues.get(&()) {
            debug!("league list served from cache");
            return Ok(cached.clone());
        }
        let leagues = self.api.fetch_leagues().await?;
        self.leagues.insert((), leagues.clone());
        Ok(leagues)
    }

    pub async fn fixtures(
        &mut self,
        league_id: &str,
        status: Option<FixtureStatus>,
        limit: Option<u32>,
    ) -> ApiResult<Vec<Fixture>> {
        let key = FixtureQuery { league_id: league_id.to_owned(), status, limit };
        if let Some(cached) = self.fixtures.get(&key) {
            debug!("fixtures for {league_id} served from cache");
            return Ok(cached.clone());
        }
        let fixtures = self.api.fetch_fixtures(league_id, status, limit).await?;
        self.fixtures.insert(key, fixtures.clone());
        Ok(fixtures)
    }

    pub async fn standings(&mut self, league_id: &str) -> ApiResult<Vec<Standing>> {
        if let Some(cached) = self.standings.get(league_id) {
            debug!("standings for {league_id} served from cache");
            return Ok(cached.clone());
        }
        let standings = self.api.fetch_standings(league_id).await?;
        self.standings.insert(league_id.to_owned(), standings.clone());
        Ok(standings)
    }

    /// Month-grouped schedule. The status filter is pushed down to the query
    /// so upcoming and results lists cache independently.
    pub async fn schedule(
        &mut self,
        league_id: &str,
        mode: ScheduleMode,
        limit: Option<u32>,
    ) -> ApiResult<Vec<MonthGroup>> {
        let status = match mode {
            ScheduleMode::Upcoming => FixtureStatus::Scheduled,
            ScheduleMode::Results => FixtureStatus::Completed,
        };
        let fixtures = self.fixtures(league_id, Some(status), limit).await?;
        Ok(aggregate::group_by_month(&fixtures, mode, Utc::now()))
    }

    /// League table derived client-side from completed fixtures.
    pub async fn derived_table(&mut self, league_id: &str) -> ApiResult<Vec<Standing>> {
        let fixtures = self
            .fixtures(league_id, Some(FixtureStatus::Completed), None)
            .await?;
        Ok(aggregate::derive_table(league_id, &fixtures))
    }

    /// Live scores always bypass the memoization cache.
    pub async fn live_fixtures(&mut self, league_id: &str) -> ApiResult<Vec<Fixture>> {
        self.api
            .fetch_fixtures(league_id, Some(FixtureStatus::Live), None)
            .await
    }

    /// Drop every cached list; the next reads hit the remote store.
    pub fn invalidate(&mut self) {
        self.fixtures.clear();
        self.standings.clear();
        self.leagues.clear();
    }
}
