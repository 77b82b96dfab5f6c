//! Derives filtered views of a collection, and the message that describes them, without a round
//! trip to the backend.
//!
//! The functions here are pure. `Filters` holds the filter inputs, the current view and the
//! message for one collection and applies their outcomes.

use crate::model::{Amount, Transaction};
use serde::Serialize;

const DATE_PROMPT: &str = "Ingresa una fecha para filtrar.";
const MONTH_PROMPT: &str = "Ingresa un mes YYYY-MM.";
const CATEGORY_PROMPT: &str = "Ingresa una categoria.";

/// Which filter inputs the caller must reset after an outcome is applied.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Clears {
    pub date: bool,
    pub month: bool,
    pub category: bool,
}

impl Clears {
    pub const NONE: Clears = Clears {
        date: false,
        month: false,
        category: false,
    };
}

/// The result of running a filter.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    /// A required input was empty. The view stays as it was and the message guides the user.
    Prompt(String),
    /// The filter ran.
    Applied {
        items: Vec<Transaction>,
        message: String,
        clears: Clears,
    },
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Prompt(message) => message,
            Outcome::Applied { message, .. } => message,
        }
    }
}

/// Selects the items whose date equals `date` exactly.
pub fn by_date(items: &[Transaction], date: &str) -> Outcome {
    if date.is_empty() {
        return Outcome::Prompt(DATE_PROMPT.to_string());
    }
    let items: Vec<_> = items.iter().filter(|tx| tx.date == date).cloned().collect();
    Outcome::Applied {
        message: format!("Filtrado por fecha {date}: {} resultado(s).", items.len()),
        items,
        clears: Clears {
            month: true,
            category: true,
            ..Clears::NONE
        },
    }
}

/// Selects the items whose date starts with `month`, e.g. `2024-01`.
pub fn by_month(items: &[Transaction], month: &str) -> Outcome {
    if month.is_empty() {
        return Outcome::Prompt(MONTH_PROMPT.to_string());
    }
    let items: Vec<_> = in_month(items, month).cloned().collect();
    Outcome::Applied {
        message: format!("Filtrado por mes {month}: {} resultado(s).", items.len()),
        items,
        clears: Clears {
            date: true,
            ..Clears::NONE
        },
    }
}

/// Selects the items whose category matches `category`, ignoring case and surrounding
/// whitespace, and reports their total.
///
/// When `month` is non-empty the source is first narrowed to that month. The exact-date input is
/// never taken into account, even when a date filter produced the current view.
pub fn by_category(items: &[Transaction], category: &str, month: &str) -> Outcome {
    let category = category.trim();
    if category.is_empty() {
        return Outcome::Prompt(CATEGORY_PROMPT.to_string());
    }
    let wanted = category.to_lowercase();
    let items: Vec<_> = in_month(items, month)
        .filter(|tx| tx.category.trim().to_lowercase() == wanted)
        .cloned()
        .collect();
    let total: Amount = items.iter().map(|tx| tx.amount).sum();
    let scope = if month.is_empty() {
        String::new()
    } else {
        format!(" ({month})")
    };
    Outcome::Applied {
        message: format!("Total en {category}{scope}: {total}"),
        items,
        clears: Clears::NONE,
    }
}

fn in_month<'a>(items: &'a [Transaction], month: &'a str) -> impl Iterator<Item = &'a Transaction> {
    items.iter().filter(move |tx| tx.date.starts_with(month))
}

/// The filter inputs, the filtered view and the message for one collection.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct Filters {
    date: String,
    month: String,
    category: String,
    view: Vec<Transaction>,
    message: String,
}

impl Filters {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The currently presented subset of the collection.
    pub fn view(&self) -> &[Transaction] {
        &self.view
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn set_month(&mut self, month: impl Into<String>) {
        self.month = month.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn filter_by_date(&mut self, items: &[Transaction]) {
        let outcome = by_date(items, &self.date);
        self.apply(outcome);
    }

    pub fn filter_by_month(&mut self, items: &[Transaction]) {
        let outcome = by_month(items, &self.month);
        self.apply(outcome);
    }

    pub fn filter_by_category(&mut self, items: &[Transaction]) {
        let outcome = by_category(items, &self.category, &self.month);
        self.apply(outcome);
    }

    /// Takes the message from `outcome`, and its items and input resets when it was applied.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Prompt(message) => self.message = message,
            Outcome::Applied {
                items,
                message,
                clears,
            } => {
                if clears.date {
                    self.date.clear();
                }
                if clears.month {
                    self.month.clear();
                }
                if clears.category {
                    self.category.clear();
                }
                self.view = items;
                self.message = message;
            }
        }
    }

    /// Shows the full collection and clears every input and the message.
    pub fn reset(&mut self, items: &[Transaction]) {
        *self = Filters {
            view: items.to_vec(),
            ..Filters::default()
        };
    }

    /// Shows the full collection, leaving the inputs and the message alone.
    pub fn show_all(&mut self, items: &[Transaction]) {
        self.view = items.to_vec();
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
    }
}
