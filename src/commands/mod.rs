//! Command handlers for the expense-tracker CLI.
//!
//! Each handler drives the `App` the same way an interactive front end would and then reads the
//! shared error display: a message there turns into a command failure.

mod budget;
mod delete;
mod list;
mod save;
mod stats;

use crate::controller::{Controller, Ledger};
use crate::notice::ErrorDisplay;
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use budget::{alerts, budget_set, budget_status};
pub use delete::delete;
pub use list::list;
pub use save::{add, edit};
pub use stats::stats;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Fails with the message in `errors`, if there is one.
fn check(errors: &ErrorDisplay) -> Result<()> {
    match errors.get() {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

/// Reloads the collection of `controller`, failing when that did not work. A secondary ledger
/// only logs its load errors, so the failure is reported here instead.
async fn load<L: Ledger>(controller: &Controller<L>) -> Result<()> {
    if !controller.reload().await {
        check(controller.errors())?;
        bail!("Unable to load {}", L::KIND);
    }
    Ok(())
}
