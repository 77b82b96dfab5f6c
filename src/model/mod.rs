//! Types that represent the core data model, such as `Transaction` and `Aggregate`.
mod aggregate;
mod amount;
mod budget_status;
mod id;
mod transaction;

pub use aggregate::Aggregate;
pub use amount::{Amount, AmountError};
pub use budget_status::BudgetStatus;
pub use id::Id;
use serde::{Deserialize, Serialize};
pub use transaction::{Draft, Transaction};

/// The two kinds of transactions the tracker keeps, each in its own collection.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Expenses,
    Incomes,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

impl Kind {
    /// The collection endpoint, e.g. `/api/expenses`.
    pub fn path(&self) -> &'static str {
        match self {
            Kind::Expenses => "/api/expenses",
            Kind::Incomes => "/api/incomes",
        }
    }

    /// The endpoint of a single persisted record.
    pub fn item_path(&self, id: &Id) -> String {
        format!("{}/{id}", self.path())
    }

    /// Singular noun used in log lines and command output.
    pub fn noun(&self) -> &'static str {
        match self {
            Kind::Expenses => "expense",
            Kind::Incomes => "income",
        }
    }
}
