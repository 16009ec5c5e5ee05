use crate::firestore::{Direction, Document, QueryRequest, QueryRow, StructuredQuery, Value};
use crate::{Fixture, FixtureStatus, League, LeagueKind, Standing, Team};
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";

const LEAGUES: &str = "leagues";
const STANDINGS: &str = "standings";
const FIXTURES: &str = "fixtures";

/// Remote data accessor backed by the association's Firestore project.
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    documents_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl LeagueApi {
    pub fn new(project_id: &str) -> Self {
        Self::with_documents_url(format!(
            "{FIRESTORE_HOST}/projects/{project_id}/databases/(default)/documents"
        ))
    }

    /// Point the client at an explicit documents root — emulators and tests.
    pub fn with_documents_url(documents_url: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("matchday/0.1 (league data client)")
                .build()
                .unwrap_or_default(),
            documents_url,
            timeout: Duration::from_secs(10),
        }
    }

    /// Fetch the active leagues, lowest division first.
    pub async fn fetch_leagues(&self) -> ApiResult<Vec<League>> {
        let query = StructuredQuery::collection(LEAGUES)
            .where_eq("active", Value::boolean(true))
            .order_by("division", Direction::Ascending);
        let docs = self.run_query(query).await?;
        Ok(docs.iter().map(map_league).collect())
    }

    /// Fetch the league table, ordered by position.
    pub async fn fetch_standings(&self, league_id: &str) -> ApiResult<Vec<Standing>> {
        let query = StructuredQuery::collection(STANDINGS)
            .where_eq("leagueId", Value::string(league_id))
            .order_by("position", Direction::Ascending);
        let docs = self.run_query(query).await?;
        Ok(docs.iter().map(map_standing).collect())
    }

    /// Fetch fixtures for a league, ordered by kickoff date ascending.
    /// An optional status filter and limit narrow the query server-side.
    pub async fn fetch_fixtures(
        &self,
        league_id: &str,
        status: Option<FixtureStatus>,
        limit: Option<u32>,
    ) -> ApiResult<Vec<Fixture>> {
        let mut query = StructuredQuery::collection(FIXTURES)
            .where_eq("leagueId", Value::string(league_id));
        if let Some(status) = status {
            query = query.where_eq("status", Value::string(status_value(status)));
        }
        query = query.order_by("date", Direction::Ascending);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let docs = self.run_query(query).await?;
        Ok(docs.iter().map(map_fixture).collect())
    }

    /// Fetch a single fixture by document id.
    pub async fn fetch_fixture(&self, fixture_id: &str) -> ApiResult<Fixture> {
        let doc = self.fetch_document(FIXTURES, fixture_id).await?;
        Ok(map_fixture(&doc))
    }

    async fn run_query(&self, query: StructuredQuery) -> ApiResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url);
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&QueryRequest { structured_query: query })
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.clone()))?;

        let rows: Vec<QueryRow> = response
            .json()
            .await
            .map_err(|e| ApiError::Parsing(e, url))?;
        Ok(rows.into_iter().filter_map(|row| row.document).collect())
    }

    async fn fetch_document(&self, collection: &str, id: &str) -> ApiResult<Document> {
        let url = format!("{}/{collection}/{id}", self.documents_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("{collection}/{id}")));
        }
        let response = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.clone()))?;
        response.json().await.map_err(|e| ApiError::Parsing(e, url))
    }
}

// ---------------------------------------------------------------------------
// Mapping: Firestore documents → clean domain types
// ---------------------------------------------------------------------------

fn map_league(doc: &Document) -> League {
    League {
        id: doc.doc_id().to_owned(),
        name: doc.str_field("name").unwrap_or_default().to_owned(),
        season: doc.str_field("season").unwrap_or_default().to_owned(),
        kind: parse_kind(doc.str_field("type").unwrap_or_default()),
        division: doc
            .int_field("division")
            .and_then(|n| u8::try_from(n).ok())
            .unwrap_or_default(),
        active: doc.bool_field("active").unwrap_or_default(),
    }
}

fn map_standing(doc: &Document) -> Standing {
    let count = |key: &str| -> u16 {
        doc.int_field(key)
            .and_then(|n| u16::try_from(n).ok())
            .unwrap_or_default()
    };

    let goals_for = count("goalsFor");
    let goals_against = count("goalsAgainst");
    // Denormalised on the server; recompute when the field is absent.
    let goal_difference = doc
        .int_field("goalDifference")
        .and_then(|n| i16::try_from(n).ok())
        .unwrap_or(goals_for as i16 - goals_against as i16);

    Standing {
        league_id: doc.str_field("leagueId").unwrap_or_default().to_owned(),
        team: doc.map_field("team").map(map_team).unwrap_or_default(),
        played: count("played"),
        won: count("won"),
        drawn: count("drawn"),
        lost: count("lost"),
        goals_for,
        goals_against,
        goal_difference,
        points: count("points"),
        position: count("position"),
    }
}

fn map_fixture(doc: &Document) -> Fixture {
    let status = parse_status(doc.str_field("status").unwrap_or_default());

    // Scores only exist on live and completed fixtures, whatever stray
    // fields the document carries.
    let score = if status.has_score() {
        let goals = |key: &str| {
            doc.int_field(key).and_then(|n| u8::try_from(n).ok())
        };
        goals("homeScore").zip(goals("awayScore"))
    } else {
        None
    };

    Fixture {
        id: doc.doc_id().to_owned(),
        league_id: doc.str_field("leagueId").unwrap_or_default().to_owned(),
        home: doc.map_field("home").map(map_team).unwrap_or_default(),
        away: doc.map_field("away").map(map_team).unwrap_or_default(),
        kickoff: doc.timestamp_field("date"),
        venue: doc.str_field("venue").map(str::to_owned),
        status,
        score,
    }
}

fn map_team(fields: &HashMap<String, Value>) -> Team {
    let str_of = |key: &str| -> String {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let name = str_of("name");
    let short_name = fields
        .get("shortName")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| name.clone());
    Team {
        id: str_of("id"),
        name,
        short_name,
        crest_path: fields
            .get("crestPath")
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}

fn parse_status(s: &str) -> FixtureStatus {
    match s {
        "live" | "in_play" => FixtureStatus::Live,
        "completed" | "full_time" => FixtureStatus::Completed,
        "postponed" => FixtureStatus::Postponed,
        "cancelled" => FixtureStatus::Cancelled,
        _ => FixtureStatus::Scheduled,
    }
}

fn status_value(status: FixtureStatus) -> &'static str {
    match status {
        FixtureStatus::Scheduled => "scheduled",
        FixtureStatus::Live => "live",
        FixtureStatus::Completed => "completed",
        FixtureStatus::Postponed => "postponed",
        FixtureStatus::Cancelled => "cancelled",
    }
}

fn parse_kind(s: &str) -> LeagueKind {
    match s {
        "womens" => LeagueKind::Womens,
        "youth" => LeagueKind::Youth,
        _ => LeagueKind::Mens,
    }
}
