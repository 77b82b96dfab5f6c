//! Access to the expense tracker backend.
//!
//! Two traits split the work. `Remote` issues a single request and hands back the raw status and
//! body text; `Tracker` is the typed surface the rest of the crate uses, implemented once over any
//! `Remote` so that the HTTP client and the in-memory test backend share the same response
//! handling.

mod http;
mod test_remote;
mod tracker;

pub use http::HttpRemote;
pub use test_remote::{Request, TestRemote};

use crate::model::{Aggregate, Amount, BudgetStatus, Draft, Id, Kind, Transaction};
use crate::{Config, Result};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use tracker::TrackerImpl;

pub(crate) const STATS: &str = "/api/stats";
pub(crate) const BUDGET: &str = "/api/budget";
pub(crate) const BUDGET_STATUS: &str = "/api/budget/status";
pub(crate) const ALERTS: &str = "/api/alerts";

const TEST_MODE_ENV: &str = "EXPENSE_TRACKER_TEST_MODE";

/// The raw outcome of one request: the status code and the body, read exactly once as text.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Reply {
    pub(crate) status: u16,
    pub(crate) text: String,
}

impl Reply {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Issues one request against the backend. Implementations must not retry or cache.
#[async_trait::async_trait]
pub trait Remote: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Reply>;
}

/// The typed operations offered by the backend.
///
/// Non-success statuses come back as a `RemoteError` inside the `anyhow::Error`.
#[async_trait::async_trait]
pub trait Tracker: Send + Sync {
    /// The full collection of `kind`, in the order the backend returns it.
    async fn list(&self, kind: Kind) -> Result<Vec<Transaction>>;

    /// Stores a new record. The saved record is returned when the backend echoes one back; a
    /// success reply with any other body still counts as saved and yields `None`.
    async fn create(&self, kind: Kind, draft: &Draft) -> Result<Option<Transaction>>;

    /// Replaces the record with `id`. The reply body is read the same way as for `create`.
    async fn update(&self, kind: Kind, id: &Id, draft: &Draft) -> Result<Option<Transaction>>;

    async fn delete(&self, kind: Kind, id: &Id) -> Result<()>;

    /// The backend's expense aggregate, if it has one.
    async fn stats(&self) -> Result<Option<Aggregate>>;

    async fn set_budget(&self, amount: Amount) -> Result<()>;

    async fn budget_status(&self) -> Result<Option<BudgetStatus>>;

    async fn alerts(&self) -> Result<Vec<String>>;
}

/// Whether we talk to a real backend over HTTP or to the in-memory one.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    /// When `EXPENSE_TRACKER_TEST_MODE` is set and non-empty the mode is `Mode::Test`, otherwise
    /// it is `Mode::Http`. This allows the program to be run top-to-bottom without a backend.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the `Remote` selected by `mode`.
pub fn remote(config: &Config, mode: Mode) -> Result<Arc<dyn Remote>> {
    Ok(match mode {
        Mode::Http => {
            let remote = HttpRemote::new(config.base_url().clone())?;
            debug!("Using the backend at {}", remote.base_url());
            Arc::new(remote)
        }
        Mode::Test => {
            debug!("Using the in-memory test backend");
            Arc::new(TestRemote::default())
        }
    })
}

/// Wraps a `Remote` into a `Tracker`.
pub fn tracker(remote: Arc<dyn Remote>) -> Arc<dyn Tracker> {
    Arc::new(TrackerImpl::new(remote))
}
