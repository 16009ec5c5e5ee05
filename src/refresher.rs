use crate::worker::DataRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Periodic live-score refresh for one league while watch mode is active.
/// Only sends RefreshLive; schedules and tables load on demand.
pub struct PeriodicRefresher {
    requests: mpsc::Sender<DataRequest>,
    league_id: String,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(requests: mpsc::Sender<DataRequest>, league_id: String, period: Duration) -> Self {
        Self { requests, league_id, period }
    }

    pub async fn run(self) {
        let mut ticker = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let request = DataRequest::RefreshLive { league_id: self.league_id.clone() };
            if self.requests.send(request).await.is_err() {
                break;
            }
        }
    }
}
