//! The monthly budget and the spending alerts.

use crate::api::Tracker;
use crate::model::{Amount, BudgetStatus};
use crate::notice::ErrorDisplay;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

const NO_BUDGET: &str = "Sin presupuesto";
const NO_ALERTS: &str = "Sin alertas";

/// What the budget panel presents.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct BudgetState {
    status: Option<BudgetStatus>,
    alerts: Vec<String>,
    input: String,
}

impl BudgetState {
    pub fn status(&self) -> Option<&BudgetStatus> {
        self.status.as_ref()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// The budget amount as the user typed it.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// One line describing the budget status.
    pub fn describe(&self) -> String {
        match &self.status {
            Some(status) => status.to_string(),
            None => NO_BUDGET.to_string(),
        }
    }

    /// One line per alert, or a single line saying there are none.
    pub fn describe_alerts(&self) -> Vec<String> {
        if self.alerts.is_empty() {
            vec![NO_ALERTS.to_string()]
        } else {
            self.alerts.iter().map(|alert| format!("• {alert}")).collect()
        }
    }
}

/// Sets the monthly budget and loads the budget status and alerts.
pub struct BudgetPanel {
    tracker: Arc<dyn Tracker>,
    errors: ErrorDisplay,
    state: watch::Sender<BudgetState>,
}

impl BudgetPanel {
    pub fn new(tracker: Arc<dyn Tracker>, errors: ErrorDisplay) -> Self {
        let (state, _) = watch::channel(BudgetState::default());
        Self {
            tracker,
            errors,
            state,
        }
    }

    pub fn state(&self) -> BudgetState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BudgetState> {
        self.state.subscribe()
    }

    pub fn set_input(&self, input: impl Into<String>) {
        let input = input.into();
        self.state.send_modify(|state| state.input = input);
    }

    /// Fetches the budget status and the alerts together. Nothing is stored unless both succeed.
    pub async fn load(&self) {
        let result = tokio::try_join!(self.tracker.budget_status(), self.tracker.alerts());
        match result {
            Ok((status, alerts)) => self.state.send_modify(|state| {
                state.status = status;
                state.alerts = alerts;
            }),
            Err(e) => {
                warn!("Unable to load the budget: {e:#}");
                self.errors.set_error(&e);
            }
        }
    }

    /// Saves the typed budget, then clears the input and reloads the status and alerts.
    pub async fn save(&self) {
        self.errors.clear();
        let input = self.state.borrow().input.clone();
        let amount = match Amount::from_str(&input) {
            Ok(amount) => amount,
            Err(e) => {
                self.errors.set(e.to_string());
                return;
            }
        };
        match self.tracker.set_budget(amount).await {
            Ok(()) => {
                info!("Budget set to {amount}");
                self.state.send_modify(|state| state.input.clear());
                self.load().await;
            }
            Err(e) => {
                warn!("Unable to set the budget: {e:#}");
                self.errors.set_error(&e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{self, Reply, TestRemote};
    use crate::model::Transaction;
    use reqwest::Method;

    fn panel(remote: &Arc<TestRemote>) -> BudgetPanel {
        BudgetPanel::new(api::tracker(remote.clone()), ErrorDisplay::new())
    }

    fn remote() -> Arc<TestRemote> {
        Arc::new(
            TestRemote::new(
                vec![Transaction::new(None, "2024-01-05", "Comida", 40000, None)],
                Vec::new(),
            )
            .with_month("2024-01"),
        )
    }

    #[tokio::test]
    async fn test_no_budget() {
        let remote = remote();
        let panel = panel(&remote);
        panel.load().await;
        let state = panel.state();
        assert_eq!(state.describe(), "Sin presupuesto");
        assert_eq!(state.describe_alerts(), vec!["Sin alertas".to_string()]);
    }

    #[tokio::test]
    async fn test_save_reloads_status() {
        let remote = remote();
        let panel = panel(&remote);
        panel.set_input("100000");
        panel.save().await;
        let state = panel.state();
        assert_eq!(state.input(), "");
        assert_eq!(
            state.describe(),
            "ok — gastado $40.000,00 / $100.000,00 (disp. $60.000,00) | Mes: 2024-01"
        );
        assert!(!panel.errors.is_set());
    }

    #[tokio::test]
    async fn test_exceeded_budget_raises_alert() {
        let remote = remote();
        let panel = panel(&remote);
        panel.set_input("1000");
        panel.save().await;
        let state = panel.state();
        assert_eq!(state.status().unwrap().status(), "excedido");
        assert_eq!(state.alerts().len(), 1);
        assert!(state.describe_alerts()[0].starts_with("• Presupuesto superado"));
    }

    #[tokio::test]
    async fn test_bad_input_sends_nothing() {
        let remote = remote();
        let panel = panel(&remote);
        panel.set_input("mucho");
        panel.save().await;
        assert_eq!(
            panel.errors.get().as_deref(),
            Some("'mucho' is not a valid amount")
        );
        assert_eq!(panel.state().input(), "mucho");
        assert!(remote.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_input() {
        let remote = remote();
        let panel = panel(&remote);
        remote.respond_once(
            Method::POST,
            api::BUDGET,
            Reply::new(422, r#"{"message":"budget must be positive"}"#),
        );
        panel.set_input("-5");
        panel.save().await;
        assert_eq!(panel.errors.get().as_deref(), Some("budget must be positive"));
        assert_eq!(panel.state().input(), "-5");
    }
}
