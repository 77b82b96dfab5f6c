use crate::model::{Amount, Id};
use serde::{Deserialize, Deserializer, Serialize};

/// A single expense or income record as returned by the backend.
///
/// Missing or `null` text fields deserialize to empty strings so that a partially filled row
/// still shows up in the collection; `id` stays `None` until the remote store assigns one.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<Id>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(crate) date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) amount: Amount,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

impl Transaction {
    /// Builds a record with a numeric `id`. Records read from the backend may carry any `Id`.
    pub fn new(
        id: Option<i64>,
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<Amount>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: id.map(Id::from),
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description,
        }
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Builds the persisted form of a draft once the store has assigned an `id`.
    pub(crate) fn from_draft(id: Id, draft: Draft) -> Self {
        Self {
            id: Some(id),
            date: draft.date,
            category: draft.category,
            amount: draft.amount,
            description: draft.description,
        }
    }
}

/// The body sent to create or update a transaction.
///
/// `description` is always present in the JSON, as `null` when there is none.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Draft {
    pub(crate) date: String,
    pub(crate) category: String,
    pub(crate) amount: Amount,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

impl Draft {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<Amount>,
        description: Option<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
