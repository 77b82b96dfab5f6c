use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Summary statistics over a collection.
///
/// `std_dev` and `monthly_avg` are only ever computed by the backend; a locally derived
/// aggregate leaves them empty.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Aggregate {
    #[serde(default)]
    pub(crate) total: Amount,
    #[serde(default)]
    pub(crate) min: Amount,
    #[serde(default)]
    pub(crate) max: Amount,
    #[serde(default)]
    pub(crate) avg: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) std_dev: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) monthly_avg: Option<Amount>,
}

impl Aggregate {
    pub fn new(
        total: impl Into<Amount>,
        min: impl Into<Amount>,
        max: impl Into<Amount>,
        avg: impl Into<Amount>,
    ) -> Self {
        Self {
            total: total.into(),
            min: min.into(),
            max: max.into(),
            avg: avg.into(),
            std_dev: None,
            monthly_avg: None,
        }
    }

    pub(crate) fn with_backend_fields(mut self, std_dev: Amount, monthly_avg: Amount) -> Self {
        self.std_dev = Some(std_dev);
        self.monthly_avg = Some(monthly_avg);
        self
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn min(&self) -> Amount {
        self.min
    }

    pub fn max(&self) -> Amount {
        self.max
    }

    pub fn avg(&self) -> Amount {
        self.avg
    }

    pub fn std_dev(&self) -> Option<Amount> {
        self.std_dev
    }

    pub fn monthly_avg(&self) -> Option<Amount> {
        self.monthly_avg
    }
}

impl Display for Aggregate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total {} | Minimo {} | Maximo {} | Promedio {}",
            self.total, self.min, self.max, self.avg
        )?;
        if let Some(std_dev) = self.std_dev {
            write!(f, " | Std Dev {std_dev}")?;
        }
        if let Some(monthly_avg) = self.monthly_avg {
            write!(f, " | Prom. mensual {monthly_avg}")?;
        }
        Ok(())
    }
}
