//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::TestRemote;
use crate::model::Transaction;
use crate::App;
use std::sync::Arc;

/// Test environment holding an in-memory backend and an `App` wired to it.
pub struct TestEnv {
    remote: Arc<TestRemote>,
    app: App,
}

impl TestEnv {
    /// An environment over the default seed data.
    pub fn new() -> Self {
        Self::with_remote(TestRemote::default())
    }

    /// An environment whose backend holds exactly `expenses` and `incomes`.
    pub fn with_data(expenses: Vec<Transaction>, incomes: Vec<Transaction>) -> Self {
        Self::with_remote(TestRemote::new(expenses, incomes))
    }

    pub fn with_remote(remote: TestRemote) -> Self {
        let remote = Arc::new(remote);
        let app = App::new(remote.clone());
        Self { remote, app }
    }

    pub fn remote(&self) -> &TestRemote {
        &self.remote
    }

    pub fn app(&self) -> &App {
        &self.app
    }
}

/// A persisted record with no description.
pub fn tx(id: i64, date: &str, category: &str, amount: i64) -> Transaction {
    Transaction::new(Some(id), date, category, amount, None)
}
