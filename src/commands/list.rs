//! The `list` command.

use crate::args::ListArgs;
use crate::commands::{load, Out};
use crate::controller::{Controller, Ledger};
use crate::model::{Kind, Transaction};
use crate::{App, Result};

const EMPTY: &str = "No hay registros.";

/// Lists a collection, narrowed by the filters given in `args`.
///
/// The exact-date or month filter runs first, then the category filter. The category filter
/// narrows by the month only, so combining it with `--date` totals the whole category.
pub async fn list(app: &App, args: &ListArgs) -> Result<Out<Vec<Transaction>>> {
    match args.kind() {
        Kind::Expenses => list_ledger(app.expenses(), args).await,
        Kind::Incomes => list_ledger(app.incomes(), args).await,
    }
}

async fn list_ledger<L: Ledger>(
    controller: &Controller<L>,
    args: &ListArgs,
) -> Result<Out<Vec<Transaction>>> {
    load(controller).await?;

    if let Some(date) = args.date() {
        controller.set_filter_date(date);
        controller.filter_by_date();
    }
    if let Some(month) = args.month() {
        controller.set_filter_month(month);
        controller.filter_by_month();
    }
    if let Some(category) = args.category() {
        controller.set_filter_category(category);
        controller.filter_by_category();
    }

    let state = controller.state();
    let filters = state.filters();
    let mut lines = Vec::new();
    if !filters.message().is_empty() {
        lines.push(filters.message().to_string());
    }
    if filters.view().is_empty() {
        lines.push(EMPTY.to_string());
    }
    lines.extend(filters.view().iter().map(render));
    Ok(Out::new(lines.join("\n"), filters.view().to_vec()))
}

/// One line per record, e.g. `#3 | 2024-01-05 | Comida | $50.000,00 | Almuerzo`.
pub(super) fn render(tx: &Transaction) -> String {
    let id = tx.id().map(|id| id.to_string()).unwrap_or_default();
    let mut line = format!("#{id} | {} | {} | {}", tx.date(), tx.category(), tx.amount());
    if let Some(description) = tx.description() {
        line.push_str(" | ");
        line.push_str(description);
    }
    line
}
