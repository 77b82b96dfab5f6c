use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The backend's evaluation of this month's spending against the configured budget.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BudgetStatus {
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) spent: Amount,
    #[serde(default)]
    pub(crate) budget: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) remaining: Option<Amount>,
    #[serde(default)]
    pub(crate) month: String,
}

impl BudgetStatus {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn spent(&self) -> Amount {
        self.spent
    }

    pub fn budget(&self) -> Amount {
        self.budget
    }

    pub fn remaining(&self) -> Option<Amount> {
        self.remaining
    }

    pub fn month(&self) -> &str {
        &self.month
    }
}

impl Display for BudgetStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} — gastado {} / {}",
            self.status, self.spent, self.budget
        )?;
        if let Some(remaining) = self.remaining {
            write!(f, " (disp. {remaining})")?;
        }
        write!(f, " | Mes: {}", self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_with_remaining() {
        let status: BudgetStatus = serde_json::from_value(json!({
            "status": "ok", "spent": 40000, "budget": 100000, "remaining": 60000,
            "month": "2024-01"
        }))
        .unwrap();
        assert_eq!(
            status.to_string(),
            "ok — gastado $40.000,00 / $100.000,00 (disp. $60.000,00) | Mes: 2024-01"
        );
    }

    #[test]
    fn test_display_without_remaining() {
        let status: BudgetStatus = serde_json::from_value(json!({
            "status": "excedido", "spent": 120, "budget": 100, "month": "2024-02"
        }))
        .unwrap();
        assert_eq!(status.remaining(), None);
        assert_eq!(
            status.to_string(),
            "excedido — gastado $120,00 / $100,00 | Mes: 2024-02"
        );
    }
}
