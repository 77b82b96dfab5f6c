use crate::model::{Amount, AmountError, Draft, Transaction};
use serde::Serialize;
use std::str::FromStr;

/// The fields of the create/edit form, as the user typed them.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct FormState {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl FormState {
    /// A fresh form: `today`, `category`, a zero amount and no description.
    pub fn new(today: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            date: today.into(),
            category: category.into(),
            amount: "0".to_string(),
            description: String::new(),
        }
    }

    /// Pre-fills the form from a persisted record. A missing date becomes `today`.
    pub fn from_transaction(tx: &Transaction, today: &str) -> Self {
        let date = if tx.date().is_empty() {
            today
        } else {
            tx.date()
        };
        Self {
            date: date.to_string(),
            category: tx.category().to_string(),
            amount: tx.amount().value().normalize().to_string(),
            description: tx.description().unwrap_or_default().to_string(),
        }
    }

    /// Builds the request payload. The category and description are trimmed, a blank description
    /// is sent as `null` and a blank amount as zero.
    pub fn to_draft(&self) -> Result<Draft, AmountError> {
        let amount = Amount::from_str(&self.amount)?;
        let description = self.description.trim();
        Ok(Draft::new(
            self.date.clone(),
            self.category.trim(),
            amount,
            (!description.is_empty()).then(|| description.to_string()),
        ))
    }
}
