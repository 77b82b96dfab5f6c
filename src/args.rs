//! These structs provide the CLI interface for the expense-tracker CLI.

use crate::config::default_config_path;
use crate::model::{Id, Kind};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

/// expense-tracker: record expenses and incomes, filter them, and check your monthly budget.
///
/// The program talks to an expense tracker backend over its REST API. Filtering and totals are
/// computed locally from the collections the backend returns.
///
/// Set EXPENSE_TRACKER_TEST_MODE to any non-empty value to run against a built-in, in-memory
/// backend seeded with sample data.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List expenses or incomes, optionally filtered by date, month or category.
    ///
    /// --date and --month are mutually exclusive. --category totals the matching records within
    /// --month when one is given, otherwise across the whole collection.
    List(ListArgs),
    /// Record a new expense or income.
    Add(AddArgs),
    /// Change an existing expense or income. Fields that are not given keep their value.
    Edit(EditArgs),
    /// Delete an expense or income.
    Delete(DeleteArgs),
    /// Show total, minimum, maximum and average of the expenses.
    Stats,
    /// Set the monthly budget or show how this month's spending compares to it.
    Budget(BudgetArgs),
    /// Show the spending alerts raised by the backend.
    Alerts,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The root URL of the backend. Overrides the base_url in the config file.
    #[arg(long, env = "EXPENSE_TRACKER_URL")]
    base_url: Option<Url>,

    /// The configuration file. Defaults to ~/.expense-tracker/config.json
    #[arg(long, env = "EXPENSE_TRACKER_CONFIG", default_value_t = default_config())]
    config: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, base_url: Option<Url>, config: PathBuf) -> Self {
        Self {
            log_level,
            base_url,
            config: config.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn config(&self) -> &DisplayPath {
        &self.config
    }
}

/// Args for the `expense-tracker list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Which collection: expenses or incomes
    kind: Kind,

    /// Only records on this exact date, YYYY-MM-DD
    #[arg(long, conflicts_with = "month")]
    date: Option<String>,

    /// Only records in this month, YYYY-MM
    #[arg(long)]
    month: Option<String>,

    /// Only records in this category, ignoring case, and report their total
    #[arg(long)]
    category: Option<String>,
}

impl ListArgs {
    pub fn new(
        kind: Kind,
        date: Option<String>,
        month: Option<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            kind,
            date,
            month,
            category,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// The form fields shared by `add` and `edit`, apart from the amount.
#[derive(Debug, Default, Parser, Clone)]
pub struct FieldArgs {
    /// The date, YYYY-MM-DD. Defaults to today when adding
    #[arg(long)]
    date: Option<String>,

    /// The category. Defaults to Comida for expenses and Ingreso for incomes when adding
    #[arg(long)]
    category: Option<String>,

    /// A free-form description
    #[arg(long)]
    description: Option<String>,
}

impl FieldArgs {
    pub fn new(
        date: Option<String>,
        category: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            date,
            category,
            description,
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Args for the `expense-tracker add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Which collection: expenses or incomes
    kind: Kind,

    /// The amount, e.g. 50000 or 120.50
    #[arg(long, allow_hyphen_values = true)]
    amount: String,

    #[clap(flatten)]
    fields: FieldArgs,
}

impl AddArgs {
    pub fn new(kind: Kind, amount: impl Into<String>, fields: FieldArgs) -> Self {
        Self {
            kind,
            amount: amount.into(),
            fields,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn fields(&self) -> &FieldArgs {
        &self.fields
    }
}

/// Args for the `expense-tracker edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// Which collection: expenses or incomes
    kind: Kind,

    /// The id of the record to change
    id: Id,

    /// The new amount
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,

    #[clap(flatten)]
    fields: FieldArgs,
}

impl EditArgs {
    pub fn new(kind: Kind, id: Id, amount: Option<String>, fields: FieldArgs) -> Self {
        Self {
            kind,
            id,
            amount,
            fields,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn fields(&self) -> &FieldArgs {
        &self.fields
    }
}

/// Args for the `expense-tracker delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// Which collection: expenses or incomes
    kind: Kind,

    /// The id of the record to delete
    id: Id,
}

impl DeleteArgs {
    pub fn new(kind: Kind, id: Id) -> Self {
        Self { kind, id }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn id(&self) -> &Id {
        &self.id
    }
}

/// Args for the `expense-tracker budget` command.
#[derive(Debug, Parser, Clone)]
pub struct BudgetArgs {
    #[command(subcommand)]
    action: BudgetAction,
}

impl BudgetArgs {
    pub fn new(action: BudgetAction) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &BudgetAction {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum BudgetAction {
    /// Set the monthly budget.
    Set {
        /// The budget amount, e.g. 1500000
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Show this month's spending against the budget.
    Status,
}

fn default_config() -> DisplayPath {
    DisplayPath(match default_config_path() {
        Some(path) => path,
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --config or EXPENSE_TRACKER_CONFIG instead of relying on the \
                default config location.",
            );
            PathBuf::from("config.json")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("expense-tracker").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_list_filters() {
        let args = parse(&["list", "expenses", "--month", "2024-01", "--category", "comida"]);
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert_eq!(list.kind(), Kind::Expenses);
        assert_eq!(list.month(), Some("2024-01"));
        assert_eq!(list.category(), Some("comida"));
        assert_eq!(list.date(), None);
    }

    #[test]
    fn test_date_conflicts_with_month() {
        let result = Args::try_parse_from([
            "expense-tracker",
            "list",
            "incomes",
            "--date",
            "2024-01-05",
            "--month",
            "2024-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_negative_amount() {
        let args = parse(&["--log-level", "debug", "edit", "incomes", "7", "--amount", "-20"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::Edit(edit) = args.command() else {
            panic!("expected edit");
        };
        assert_eq!(edit.id(), &Id::from(7));
        assert_eq!(edit.amount(), Some("-20"));
        assert_eq!(edit.fields().category(), None);
    }

    #[test]
    fn test_delete_text_id() {
        let args = parse(&["delete", "expenses", "65a1f0"]);
        let Command::Delete(delete) = args.command() else {
            panic!("expected delete");
        };
        assert_eq!(delete.id().to_string(), "65a1f0");
        assert_eq!(delete.id().as_i64(), None);
    }

    #[test]
    fn test_budget_set() {
        let args = parse(&["--base-url", "http://127.0.0.1:9000", "budget", "set", "150000"]);
        assert_eq!(
            args.common().base_url().map(Url::as_str),
            Some("http://127.0.0.1:9000/")
        );
        let Command::Budget(budget) = args.command() else {
            panic!("expected budget");
        };
        assert!(matches!(budget.action(), BudgetAction::Set { amount } if amount == "150000"));
    }

    #[test]
    fn test_add_requires_amount() {
        assert!(Args::try_parse_from(["expense-tracker", "add", "expenses"]).is_err());
        let args = parse(&["add", "expenses", "--amount", "50000", "--category", "Comida"]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.amount(), "50000");
        assert_eq!(add.fields().date(), None);
    }

    #[test]
    fn test_unknown_kind() {
        assert!(Args::try_parse_from(["expense-tracker", "delete", "savings", "1"]).is_err());
    }
}
