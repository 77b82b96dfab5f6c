//! Implements the `Tracker` trait on top of any `Remote`.

use crate::api::{Remote, Reply, Tracker, ALERTS, BUDGET, BUDGET_STATUS, STATS};
use crate::error::RemoteError;
use crate::model::{Aggregate, Amount, BudgetStatus, Draft, Id, Kind, Transaction};
use crate::Result;
use anyhow::Context;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const NO_CONTENT: u16 = 204;
const FALLBACK_MESSAGE: &str = "Error";

/// Implements the `Tracker` trait using a dynamically-dispatched `remote` to send its requests.
pub(super) struct TrackerImpl {
    remote: Arc<dyn Remote>,
}

impl TrackerImpl {
    pub(super) fn new(remote: Arc<dyn Remote>) -> Self {
        Self { remote }
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Option<Value>> {
        debug!("{method} {path}");
        let reply = self.remote.send(method.clone(), path, body).await?;
        trace!("{method} {path} -> {} {}", reply.status, reply.text);
        Ok(interpret(reply)?)
    }

    async fn call_as<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.call(method, path, body).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .with_context(|| format!("Unexpected response shape from {path}")),
        }
    }

    /// Sends a write. Once the backend has answered with a success status the record is stored,
    /// so a body that does not describe a transaction is logged and dropped rather than reported
    /// as a failure.
    async fn write(&self, method: Method, path: &str, draft: &Draft) -> Result<Option<Transaction>> {
        let body = serde_json::to_value(draft).context("Unable to serialize the draft")?;
        match self.call(method.clone(), path, Some(body)).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match serde_json::from_value(value) {
                Ok(saved) => Ok(Some(saved)),
                Err(e) => {
                    warn!("{method} {path} succeeded but its reply is not a record: {e}");
                    Ok(None)
                }
            },
        }
    }
}

#[async_trait::async_trait]
impl Tracker for TrackerImpl {
    async fn list(&self, kind: Kind) -> Result<Vec<Transaction>> {
        Ok(self
            .call_as(Method::GET, kind.path(), None)
            .await?
            .unwrap_or_default())
    }

    async fn create(&self, kind: Kind, draft: &Draft) -> Result<Option<Transaction>> {
        self.write(Method::POST, kind.path(), draft).await
    }

    async fn update(&self, kind: Kind, id: &Id, draft: &Draft) -> Result<Option<Transaction>> {
        self.write(Method::PUT, &kind.item_path(id), draft).await
    }

    async fn delete(&self, kind: Kind, id: &Id) -> Result<()> {
        self.call(Method::DELETE, &kind.item_path(id), None).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<Option<Aggregate>> {
        let envelope: Option<StatsEnvelope> = self.call_as(Method::GET, STATS, None).await?;
        Ok(envelope.and_then(|e| e.stats))
    }

    async fn set_budget(&self, amount: Amount) -> Result<()> {
        self.call(Method::POST, BUDGET, Some(json!({ "amount": amount })))
            .await?;
        Ok(())
    }

    async fn budget_status(&self) -> Result<Option<BudgetStatus>> {
        self.call_as(Method::GET, BUDGET_STATUS, None).await
    }

    async fn alerts(&self) -> Result<Vec<String>> {
        Ok(self
            .call_as(Method::GET, ALERTS, None)
            .await?
            .unwrap_or_default())
    }
}

/// The `/api/stats` response wraps the aggregate in a `stats` field.
#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    stats: Option<Aggregate>,
}

/// Normalizes a reply. The body is parsed as JSON when it is non-empty; a body that is not valid
/// JSON counts as absent. A non-success status becomes a `RemoteError`, and a success yields the
/// parsed body, or `None` for no-content.
pub(crate) fn interpret(reply: Reply) -> std::result::Result<Option<Value>, RemoteError> {
    let data = if reply.text.is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(&reply.text).ok()
    };

    if !(200..300).contains(&reply.status) {
        let message = error_message(data.as_ref(), &reply.text);
        return Err(RemoteError::new(reply.status, message));
    }

    if reply.status == NO_CONTENT {
        return Ok(None);
    }
    Ok(data)
}

/// Picks `detail`, then `message`, then the raw text, then a fixed fallback. Empty or `false`-ish
/// field values are skipped the same way an absent field is.
fn error_message(data: Option<&Value>, raw: &str) -> String {
    let field = data.and_then(|d| {
        d.get("detail")
            .filter(|v| !v.is_null())
            .or_else(|| d.get("message").filter(|v| !v.is_null()))
    });
    match field {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(value) if is_truthy(value) => value.to_string(),
        _ if !raw.is_empty() => raw.to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
