//! The `budget` and `alerts` commands.

use crate::commands::{check, Out};
use crate::model::BudgetStatus;
use crate::{App, Result};

/// Sets the monthly budget and shows the resulting status.
pub async fn budget_set(app: &App, amount: &str) -> Result<Out<Option<BudgetStatus>>> {
    let panel = app.budget();
    panel.set_input(amount);
    panel.save().await;
    check(app.errors())?;
    let state = panel.state();
    Ok(Out::new(state.describe(), state.status().cloned()))
}

/// Shows this month's spending against the budget.
pub async fn budget_status(app: &App) -> Result<Out<Option<BudgetStatus>>> {
    let panel = app.budget();
    panel.load().await;
    check(app.errors())?;
    let state = panel.state();
    Ok(Out::new(state.describe(), state.status().cloned()))
}

/// Shows the spending alerts.
pub async fn alerts(app: &App) -> Result<Out<Vec<String>>> {
    let panel = app.budget();
    panel.load().await;
    check(app.errors())?;
    let state = panel.state();
    Ok(Out::new(
        state.describe_alerts().join("\n"),
        state.alerts().to_vec(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestRemote;
    use crate::test::{tx, TestEnv};

    fn env() -> TestEnv {
        TestEnv::with_remote(
            TestRemote::new(vec![tx(1, "2024-01-05", "Comida", 40000)], Vec::new())
                .with_month("2024-01"),
        )
    }

    #[tokio::test]
    async fn test_status_without_budget() {
        let env = env();
        let out = budget_status(env.app()).await.unwrap();
        assert_eq!(out.message(), "Sin presupuesto");
        assert_eq!(out.structure(), Some(&None));
    }

    #[tokio::test]
    async fn test_set_then_status() {
        let env = env();
        let out = budget_set(env.app(), "30000").await.unwrap();
        assert!(out.message().starts_with("excedido — gastado $40.000,00 / $30.000,00"));

        let out = alerts(env.app()).await.unwrap();
        assert!(out.message().starts_with("• Presupuesto superado"));
        assert_eq!(out.structure().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_bad_amount() {
        let env = env();
        let e = budget_set(env.app(), "lots").await.unwrap_err();
        assert_eq!(e.to_string(), "'lots' is not a valid amount");
    }

    #[tokio::test]
    async fn test_no_alerts() {
        let env = env();
        let out = alerts(env.app()).await.unwrap();
        assert_eq!(out.message(), "Sin alertas");
    }
}
