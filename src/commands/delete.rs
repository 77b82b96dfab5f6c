//! The `delete` command.

use crate::args::DeleteArgs;
use crate::commands::{check, Out};
use crate::controller::{Controller, Ledger};
use crate::model::{Id, Kind};
use crate::{App, Result};

/// Deletes one expense or income by id.
pub async fn delete(app: &App, args: &DeleteArgs) -> Result<Out<Id>> {
    match args.kind() {
        Kind::Expenses => delete_from(app.expenses(), args.id()).await,
        Kind::Incomes => delete_from(app.incomes(), args.id()).await,
    }
}

async fn delete_from<L: Ledger>(controller: &Controller<L>, id: &Id) -> Result<Out<Id>> {
    controller.delete(id).await;
    check(controller.errors())?;
    let remaining = controller.state().items().len();
    Ok(Out::new(
        format!("Deleted {} {id}, {remaining} left", L::KIND.noun()),
        id.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{tx, TestEnv};

    #[tokio::test]
    async fn test_delete() {
        let env = TestEnv::with_data(
            vec![tx(1, "2024-01-05", "Comida", 1), tx(2, "2024-01-06", "Comida", 2)],
            Vec::new(),
        );
        let out = delete(env.app(), &DeleteArgs::new(Kind::Expenses, Id::from(2)))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted expense 2, 1 left");
        assert_eq!(out.structure(), Some(&Id::from(2)));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let env = TestEnv::with_data(Vec::new(), Vec::new());
        let e = delete(env.app(), &DeleteArgs::new(Kind::Incomes, Id::from(5)))
            .await
            .unwrap_err();
        assert_eq!(e.to_string(), "Income not found");
    }
}
