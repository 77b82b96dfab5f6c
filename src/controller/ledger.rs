use crate::model::Kind;

/// The per-kind parameters of a `Controller`.
pub trait Ledger: Send + Sync + 'static {
    /// Which collection, and therefore which endpoints, the controller works on.
    const KIND: Kind;

    /// The category a fresh form starts with.
    const DEFAULT_CATEGORY: &'static str;

    /// Whether a reload also fetches the backend aggregate.
    const WITH_STATS: bool;

    /// Whether load failures are shown in the error display. A secondary ledger only logs them so
    /// that the primary view stays usable.
    const PRIMARY: bool;
}

/// The expenses ledger: the primary view, with backend stats.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expenses;

impl Ledger for Expenses {
    const KIND: Kind = Kind::Expenses;
    const DEFAULT_CATEGORY: &'static str = "Comida";
    const WITH_STATS: bool = true;
    const PRIMARY: bool = true;
}

/// The incomes ledger, loaded in the background.
#[derive(Debug, Clone, Copy, Default)]
pub struct Incomes;

impl Ledger for Incomes {
    const KIND: Kind = Kind::Incomes;
    const DEFAULT_CATEGORY: &'static str = "Ingreso";
    const WITH_STATS: bool = false;
    const PRIMARY: bool = false;
}
