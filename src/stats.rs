//! Aggregate statistics with a local fallback.

use crate::model::{Aggregate, Amount, Transaction};
use rust_decimal::Decimal;

/// Returns the aggregate to present for `items`.
///
/// A backend aggregate always wins and is returned unmodified. Without one, total, min, max and
/// average are computed over the amounts of `items`; an empty collection yields zeros. The local
/// fallback never fills in `std_dev` or `monthly_avg`.
pub fn summarize(backend: Option<&Aggregate>, items: &[Transaction]) -> Aggregate {
    if let Some(aggregate) = backend {
        return aggregate.clone();
    }
    let amounts: Vec<Amount> = items.iter().map(|tx| tx.amount()).collect();
    let (Some(min), Some(max)) = (amounts.iter().min(), amounts.iter().max()) else {
        return Aggregate::default();
    };
    let total: Amount = amounts.iter().sum();
    let avg = total.value() / Decimal::from(amounts.len());
    Aggregate::new(total, *min, *max, Amount::new(avg))
}
