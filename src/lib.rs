//! A client for an expense tracker backend.
//!
//! The crate keeps the expense and income collections in sync with the backend, derives filtered
//! views and totals locally, and reports the monthly budget status. `App` ties the pieces
//! together; the `commands` module drives it from the command line.

pub mod api;
mod app;
pub mod args;
pub mod budget;
pub mod commands;
mod config;
pub mod controller;
mod error;
pub mod filter;
pub mod model;
pub mod notice;
pub mod stats;
mod utils;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use app::App;
pub use config::Config;
pub use error::{Error, RemoteError, Result};
pub use model::{Aggregate, Amount, BudgetStatus, Draft, Id, Kind, Transaction};
