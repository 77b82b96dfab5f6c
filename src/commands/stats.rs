//! The `stats` command.

use crate::commands::{load, Out};
use crate::model::Aggregate;
use crate::{App, Result};

/// Shows the expense aggregate. The backend's figures are used when it has them, otherwise they
/// are computed from the expenses.
pub async fn stats(app: &App) -> Result<Out<Aggregate>> {
    load(app.expenses()).await?;
    let stats = app.expenses().state().stats();
    Ok(Out::new(stats.to_string(), stats))
}
