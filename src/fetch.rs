use std::fmt;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lifecycle of a single remote request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, FetchState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchState::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// A spawned request with observable state. Dropping the handle aborts the
/// request in flight, so a dismissed screen never applies its response.
#[derive(Debug)]
pub struct Fetch<T> {
    rx: watch::Receiver<FetchState<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Fetch<T> {
    pub fn spawn<F, E>(request: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display,
    {
        let (tx, rx) = watch::channel(FetchState::Loading);
        let task = tokio::spawn(async move {
            let state = match request.await {
                Ok(value) => FetchState::Success(value),
                Err(err) => FetchState::Error(err.to_string()),
            };
            let _ = tx.send(state);
        });
        Self { rx, task }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.rx.borrow().clone()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Wait for the terminal state. A cancelled request resolves to the last
    /// state it reached.
    pub async fn resolved(mut self) -> FetchState<T> {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if !current.is_loading() {
                return current;
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}

impl<T> Drop for Fetch<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
