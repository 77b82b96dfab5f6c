//! Composes the controllers and the budget panel around one backend and one error display.

use crate::api::{self, Remote, Tracker};
use crate::budget::BudgetPanel;
use crate::controller::{Controller, Expenses, Incomes};
use crate::notice::ErrorDisplay;
use std::sync::Arc;
use tracing::debug;

/// The whole client: both ledgers and the budget panel, sharing one error display.
pub struct App {
    errors: ErrorDisplay,
    expenses: Controller<Expenses>,
    incomes: Controller<Incomes>,
    budget: BudgetPanel,
}

impl App {
    /// Creates the app over `remote`. Nothing is fetched until `mount` or a reload is called.
    pub fn new(remote: Arc<dyn Remote>) -> Self {
        let tracker: Arc<dyn Tracker> = api::tracker(remote);
        let errors = ErrorDisplay::new();
        Self {
            expenses: Controller::new(tracker.clone(), errors.clone()),
            incomes: Controller::new(tracker.clone(), errors.clone()),
            budget: BudgetPanel::new(tracker, errors.clone()),
            errors,
        }
    }

    /// The initial load: expenses with their stats, and incomes in the background. An incomes
    /// failure is only logged.
    pub async fn mount(&self) {
        debug!("Mounting");
        tokio::join!(self.expenses.reload(), self.incomes.reload());
    }

    pub fn errors(&self) -> &ErrorDisplay {
        &self.errors
    }

    pub fn expenses(&self) -> &Controller<Expenses> {
        &self.expenses
    }

    pub fn incomes(&self) -> &Controller<Incomes> {
        &self.incomes
    }

    pub fn budget(&self) -> &BudgetPanel {
        &self.budget
    }
}
