//! The `add` and `edit` commands.

use crate::args::{AddArgs, EditArgs, FieldArgs};
use crate::commands::{check, list, load, Out};
use crate::controller::{Controller, FormState, Ledger};
use crate::model::{Kind, Transaction};
use crate::{App, Result};
use anyhow::bail;

/// Records a new expense or income. Fields that are not given keep the form defaults.
pub async fn add(app: &App, args: &AddArgs) -> Result<Out<Option<Transaction>>> {
    match args.kind() {
        Kind::Expenses => add_to(app.expenses(), args).await,
        Kind::Incomes => add_to(app.incomes(), args).await,
    }
}

/// Changes an existing expense or income. Fields that are not given keep their stored value.
pub async fn edit(app: &App, args: &EditArgs) -> Result<Out<Option<Transaction>>> {
    match args.kind() {
        Kind::Expenses => edit_in(app.expenses(), args).await,
        Kind::Incomes => edit_in(app.incomes(), args).await,
    }
}

async fn add_to<L: Ledger>(
    controller: &Controller<L>,
    args: &AddArgs,
) -> Result<Out<Option<Transaction>>> {
    controller.cancel_edit();
    controller.edit_form(|form| {
        form.amount = args.amount().to_string();
        fill(form, args.fields());
    });
    submit(controller).await
}

async fn edit_in<L: Ledger>(
    controller: &Controller<L>,
    args: &EditArgs,
) -> Result<Out<Option<Transaction>>> {
    load(controller).await?;
    let state = controller.state();
    let Some(existing) = state.items().iter().find(|tx| tx.id() == Some(args.id())) else {
        bail!("There is no {} with id {}", L::KIND.noun(), args.id());
    };
    controller.begin_edit(existing);
    controller.edit_form(|form| {
        if let Some(amount) = args.amount() {
            form.amount = amount.to_string();
        }
        fill(form, args.fields());
    });
    submit(controller).await
}

fn fill(form: &mut FormState, fields: &FieldArgs) {
    if let Some(date) = fields.date() {
        form.date = date.to_string();
    }
    if let Some(category) = fields.category() {
        form.category = category.to_string();
    }
    if let Some(description) = fields.description() {
        form.description = description.to_string();
    }
}

async fn submit<L: Ledger>(controller: &Controller<L>) -> Result<Out<Option<Transaction>>> {
    let saved = controller.submit().await;
    check(controller.errors())?;
    let message = match &saved {
        Some(tx) => format!("Saved {}: {}", L::KIND.noun(), list::render(tx)),
        None => format!("Saved {}", L::KIND.noun()),
    };
    Ok(Out::new(message, saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Reply;
    use crate::model::Id;
    use crate::test::{tx, TestEnv};
    use crate::Amount;
    use reqwest::Method;

    fn fields(date: Option<&str>, category: Option<&str>, description: Option<&str>) -> FieldArgs {
        FieldArgs::new(
            date.map(String::from),
            category.map(String::from),
            description.map(String::from),
        )
    }

    #[tokio::test]
    async fn test_add_uses_defaults() {
        let env = TestEnv::with_data(Vec::new(), Vec::new());
        let args = AddArgs::new(Kind::Incomes, "2500000", fields(None, None, None));
        let out = add(env.app(), &args).await.unwrap();
        let saved = out.structure().unwrap().clone().unwrap();
        assert_eq!(saved.category(), "Ingreso");
        assert_eq!(saved.date(), env.app().incomes().today());
        assert_eq!(saved.amount(), Amount::from(2500000));
        assert!(out.message().starts_with("Saved income: #1"));
    }

    #[tokio::test]
    async fn test_add_with_unexpected_reply() {
        let env = TestEnv::with_data(Vec::new(), Vec::new());
        env.remote()
            .respond_once(Method::POST, Kind::Expenses.path(), Reply::new(201, "[]"));
        let args = AddArgs::new(Kind::Expenses, "120", fields(None, None, None));
        let out = add(env.app(), &args).await.unwrap();
        assert_eq!(out.message(), "Saved expense");
        assert_eq!(out.structure(), Some(&None));
    }

    #[tokio::test]
    async fn test_add_trims() {
        let env = TestEnv::with_data(Vec::new(), Vec::new());
        let args = AddArgs::new(
            Kind::Expenses,
            "120",
            fields(Some("2024-01-05"), Some("  Comida  "), Some("   ")),
        );
        add(env.app(), &args).await.unwrap();
        let stored = env.remote().stored(Kind::Expenses);
        assert_eq!(stored[0].category(), "Comida");
        assert_eq!(stored[0].description(), None);
    }

    #[tokio::test]
    async fn test_add_bad_amount() {
        let env = TestEnv::with_data(Vec::new(), Vec::new());
        let args = AddArgs::new(Kind::Expenses, "doce", fields(None, None, None));
        let e = add(env.app(), &args).await.unwrap_err();
        assert_eq!(e.to_string(), "'doce' is not a valid amount");
        assert!(env.remote().requests().is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_unspecified_fields() {
        let env = TestEnv::with_data(
            vec![Transaction::new(
                Some(4),
                "2024-01-05",
                "Comida",
                50000,
                Some("Almuerzo".into()),
            )],
            Vec::new(),
        );
        let args = EditArgs::new(Kind::Expenses, Id::from(4), Some("52000".into()), fields(None, None, None));
        edit(env.app(), &args).await.unwrap();
        let stored = env.remote().stored(Kind::Expenses);
        assert_eq!(stored[0].amount(), Amount::from(52000));
        assert_eq!(stored[0].date(), "2024-01-05");
        assert_eq!(stored[0].description(), Some("Almuerzo"));
        assert_eq!(env.app().expenses().state().editing(), None);
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let env = TestEnv::with_data(vec![tx(1, "2024-01-05", "Comida", 1)], Vec::new());
        let args = EditArgs::new(Kind::Expenses, Id::from(9), None, fields(None, None, None));
        let e = edit(env.app(), &args).await.unwrap_err();
        assert_eq!(e.to_string(), "There is no expense with id 9");
    }
}
