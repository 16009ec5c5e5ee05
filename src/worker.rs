use crate::aggregate::{MonthGroup, ScheduleMode};
use crate::store::LeagueStore;
use league_api::client::ApiError;
use league_api::{Fixture, League, Standing};
use log::{debug, error};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum DataRequest {
    LoadLeagues,
    LoadSchedule { league_id: String, mode: ScheduleMode },
    LoadTable { league_id: String },
    LoadDerivedTable { league_id: String },
    RefreshLive { league_id: String },
}

#[derive(Debug)]
pub enum DataResponse {
    Leagues(Vec<League>),
    Schedule {
        league_id: String,
        mode: ScheduleMode,
        months: Vec<MonthGroup>,
    },
    Table {
        league_id: String,
        standings: Vec<Standing>,
    },
    LiveUpdated {
        league_id: String,
        fixtures: Vec<Fixture>,
    },
    Error { message: String },
}

/// Drains data requests serially against the store. The store (and its
/// caches) has a single owner, so no locking is involved; requests for
/// different leagues carry no ordering guarantee beyond queue order.
pub struct DataWorker {
    store: LeagueStore,
    requests: mpsc::Receiver<DataRequest>,
    responses: mpsc::Sender<DataResponse>,
}

impl DataWorker {
    pub fn new(
        store: LeagueStore,
        requests: mpsc::Receiver<DataRequest>,
        responses: mpsc::Sender<DataResponse>,
    ) -> Self {
        Self { store, requests, responses }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            debug!("data request: {request:?}");
            let response = self
                .handle(request)
                .await
                .unwrap_or_else(|err| DataResponse::Error { message: err.to_string() });

            if let Err(e) = self.responses.send(response).await {
                error!("failed to send data response: {e}");
                break;
            }
        }
    }

    async fn handle(&mut self, request: DataRequest) -> Result<DataResponse, ApiError> {
        match request {
            DataRequest::LoadLeagues => {
                let leagues = self.store.leagues().await?;
                Ok(DataResponse::Leagues(leagues))
            }
            DataRequest::LoadSchedule { league_id, mode } => {
                let months = self.store.schedule(&league_id, mode, None).await?;
                Ok(DataResponse::Schedule { league_id, mode, months })
            }
            DataRequest::LoadTable { league_id } => {
                let standings = self.store.standings(&league_id).await?;
                Ok(DataResponse::Table { league_id, standings })
            }
            DataRequest::LoadDerivedTable { league_id } => {
                let standings = self.store.derived_table(&league_id).await?;
                Ok(DataResponse::Table { league_id, standings })
            }
            DataRequest::RefreshLive { league_id } => {
                let fixtures = self.store.live_fixtures(&league_id).await?;
                Ok(DataResponse::LiveUpdated { league_id, fixtures })
            }
        }
    }
}
