//! Implements the `Remote` trait with an in-memory backend for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a running backend.

use crate::api::{Remote, Reply};
use crate::model::{Aggregate, Amount, Draft, Id, Kind, Transaction};
use crate::{stats, Result};
use reqwest::Method;
use rust_decimal::{Decimal, MathematicalOps};
use serde_json::{json, Value};
use std::collections::{BTreeSet, VecDeque};
use std::io::Cursor;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// One request as the in-memory backend received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// An implementation of the `Remote` trait that does not use the network. It keeps expenses,
/// incomes and the monthly budget in memory and answers the same endpoints, with the same
/// status codes, as the real backend. By default, it is seeded with some existing data.
pub struct TestRemote {
    backend: Mutex<Backend>,
}

#[derive(Debug, Default)]
struct Backend {
    expenses: Vec<Transaction>,
    incomes: Vec<Transaction>,
    next_id: i64,
    budget: Option<Amount>,
    /// The `YYYY-MM` month that budget status and alerts are evaluated for.
    month: String,
    /// Canned replies that take precedence over normal routing, consumed on first match.
    scripted: VecDeque<(Method, String, Reply)>,
    requests: Vec<Request>,
}

impl TestRemote {
    /// Create a new `TestRemote` holding `expenses` and `incomes`. Records without an `id` are
    /// assigned one.
    pub fn new(expenses: Vec<Transaction>, incomes: Vec<Transaction>) -> Self {
        let mut backend = Backend {
            month: chrono::Utc::now().format("%Y-%m").to_string(),
            next_id: 1,
            ..Backend::default()
        };
        for tx in expenses {
            backend.insert(Kind::Expenses, tx);
        }
        for tx in incomes {
            backend.insert(Kind::Incomes, tx);
        }
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// A backend with no data at all.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Evaluate budget status and alerts for `month` instead of the current one.
    pub fn with_month(self, month: impl Into<String>) -> Self {
        self.lock().month = month.into();
        self
    }

    /// The next request matching `method` and `path` gets `reply` instead of being routed.
    pub fn respond_once(&self, method: Method, path: impl Into<String>, reply: Reply) {
        self.lock()
            .scripted
            .push_back((method, path.into(), reply));
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    /// The stored records of `kind`, in insertion order.
    pub fn stored(&self, kind: Kind) -> Vec<Transaction> {
        self.lock().collection(kind).clone()
    }

    fn lock(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TestRemote {
    /// Loads seed data from this module.
    fn default() -> Self {
        let expenses = load_csv(EXPENSE_DATA).unwrap_or_else(|e| {
            warn!("Unable to load seed expenses: {e:#}");
            Vec::new()
        });
        let incomes = load_csv(INCOME_DATA).unwrap_or_else(|e| {
            warn!("Unable to load seed incomes: {e:#}");
            Vec::new()
        });
        Self::new(expenses, incomes)
    }
}

#[async_trait::async_trait]
impl Remote for TestRemote {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Reply> {
        let mut backend = self.lock();
        backend.requests.push(Request {
            method: method.clone(),
            path: path.to_string(),
            body: body.clone(),
        });
        let scripted = backend
            .scripted
            .iter()
            .position(|(m, p, _)| *m == method && p == path);
        if let Some(ix) = scripted {
            if let Some((_, _, reply)) = backend.scripted.remove(ix) {
                return Ok(reply);
            }
        }
        Ok(backend.route(method.as_str(), path, body))
    }
}

impl Backend {
    fn collection(&self, kind: Kind) -> &Vec<Transaction> {
        match kind {
            Kind::Expenses => &self.expenses,
            Kind::Incomes => &self.incomes,
        }
    }

    fn collection_mut(&mut self, kind: Kind) -> &mut Vec<Transaction> {
        match kind {
            Kind::Expenses => &mut self.expenses,
            Kind::Incomes => &mut self.incomes,
        }
    }

    fn insert(&mut self, kind: Kind, mut tx: Transaction) -> Transaction {
        match tx.id.as_ref().map(Id::as_i64) {
            Some(Some(id)) => self.next_id = self.next_id.max(id.saturating_add(1)),
            Some(None) => {}
            None => {
                tx.id = Some(Id::from(self.next_id));
                self.next_id += 1;
            }
        }
        self.collection_mut(kind).push(tx.clone());
        tx
    }

    fn route(&mut self, method: &str, path: &str, body: Option<Value>) -> Reply {
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match (method, segments.as_slice()) {
            ("GET", ["api", "stats"]) => ok(json!({ "stats": self.stats() })),
            ("POST", ["api", "budget"]) => self.set_budget(body),
            ("GET", ["api", "budget", "status"]) => ok(self.budget_status()),
            ("GET", ["api", "alerts"]) => ok(json!(self.alerts())),
            (method, ["api", resource]) => match resource_kind(resource) {
                Some(kind) => match method {
                    "GET" => ok(json!(self.list(kind))),
                    "POST" => self.create(kind, body),
                    _ => method_not_allowed(),
                },
                None => not_found("Not Found"),
            },
            (method, ["api", resource, id]) => {
                let (Some(kind), Ok(id)) = (resource_kind(resource), Id::from_str(id)) else {
                    return not_found("Not Found");
                };
                match method {
                    "PUT" => self.update(kind, &id, body),
                    "DELETE" => self.delete(kind, &id),
                    _ => method_not_allowed(),
                }
            }
            _ => not_found("Not Found"),
        }
    }

    /// Newest first, the way the backend orders its rows.
    fn list(&self, kind: Kind) -> Vec<Transaction> {
        let mut rows = self.collection(kind).clone();
        rows.sort_by(|a, b| {
            let number = |tx: &Transaction| tx.id.as_ref().and_then(Id::as_i64);
            b.date.cmp(&a.date).then(number(b).cmp(&number(a)))
        });
        rows
    }

    fn create(&mut self, kind: Kind, body: Option<Value>) -> Reply {
        match parse_draft(body) {
            Ok(draft) => {
                let id = Id::from(self.next_id);
                let tx = self.insert(kind, Transaction::from_draft(id, draft));
                reply(201, json!(tx))
            }
            Err(detail) => unprocessable(detail),
        }
    }

    fn update(&mut self, kind: Kind, id: &Id, body: Option<Value>) -> Reply {
        let draft = match parse_draft(body) {
            Ok(draft) => draft,
            Err(detail) => return unprocessable(detail),
        };
        let slot = self
            .collection_mut(kind)
            .iter_mut()
            .find(|tx| tx.id.as_ref() == Some(id));
        match slot {
            Some(slot) => {
                *slot = Transaction::from_draft(id.clone(), draft);
                ok(json!(slot))
            }
            None => not_found(missing(kind)),
        }
    }

    fn delete(&mut self, kind: Kind, id: &Id) -> Reply {
        let rows = self.collection_mut(kind);
        let before = rows.len();
        rows.retain(|tx| tx.id.as_ref() != Some(id));
        if rows.len() == before {
            not_found(missing(kind))
        } else {
            Reply::new(204, "")
        }
    }

    fn stats(&self) -> Aggregate {
        let aggregate = stats::summarize(None, &self.expenses);
        if self.expenses.is_empty() {
            return aggregate.with_backend_fields(Amount::ZERO, Amount::ZERO);
        }
        let count = Decimal::from(self.expenses.len());
        let avg = aggregate.avg().value();
        let variance = self
            .expenses
            .iter()
            .map(|tx| {
                let diff = tx.amount.value().saturating_sub(avg);
                Amount::new(diff.saturating_mul(diff))
            })
            .sum::<Amount>()
            .value()
            / count;
        let std_dev = variance.sqrt().unwrap_or_default();
        let months: BTreeSet<&str> = self
            .expenses
            .iter()
            .map(|tx| tx.date.get(..7).unwrap_or(tx.date.as_str()))
            .collect();
        let monthly_avg = aggregate.total().value() / Decimal::from(months.len().max(1));
        aggregate.with_backend_fields(Amount::new(std_dev), Amount::new(monthly_avg))
    }

    fn set_budget(&mut self, body: Option<Value>) -> Reply {
        match body.as_ref().and_then(|b| b.get("amount")) {
            Some(amount) if amount.is_number() => {
                let amount = Amount::from_json(amount);
                self.budget = Some(amount);
                ok(json!({ "budget": amount, "month": self.month }))
            }
            _ => unprocessable("amount must be a number"),
        }
    }

    fn spent_this_month(&self) -> Amount {
        self.expenses
            .iter()
            .filter(|tx| tx.date.starts_with(&self.month))
            .map(|tx| tx.amount)
            .sum()
    }

    fn budget_status(&self) -> Value {
        let Some(budget) = self.budget else {
            return Value::Null;
        };
        let spent = self.spent_this_month();
        if spent > budget {
            json!({ "status": "excedido", "spent": spent, "budget": budget, "month": self.month })
        } else {
            let remaining = budget.saturating_sub(spent);
            json!({
                "status": "ok", "spent": spent, "budget": budget, "remaining": remaining,
                "month": self.month
            })
        }
    }

    fn alerts(&self) -> Vec<String> {
        let mut alerts = Vec::new();
        if let Some(budget) = self.budget {
            let spent = self.spent_this_month();
            if spent > budget {
                alerts.push(format!(
                    "Presupuesto superado: gastado {spent} de {budget} en {}",
                    self.month
                ));
            }
        }
        if self.expenses.is_empty() {
            alerts.push("No hay gastos registrados.".to_string());
        } else if !self.expenses.iter().any(|tx| tx.date.starts_with(&self.month)) {
            alerts.push(format!("No registras gastos en {}.", self.month));
        }
        alerts
    }
}

fn resource_kind(segment: &str) -> Option<Kind> {
    match segment {
        "expenses" => Some(Kind::Expenses),
        "incomes" => Some(Kind::Incomes),
        _ => None,
    }
}

fn missing(kind: Kind) -> &'static str {
    match kind {
        Kind::Expenses => "Expense not found",
        Kind::Incomes => "Income not found",
    }
}

/// Mirrors the backend's validation: text fields are required and `amount` must be a number.
fn parse_draft(body: Option<Value>) -> std::result::Result<Draft, String> {
    let body = body.ok_or_else(|| "request body is required".to_string())?;
    if !body.get("amount").is_some_and(Value::is_number) {
        return Err("amount must be a number".to_string());
    }
    serde_json::from_value(body).map_err(|e| e.to_string())
}

fn reply(status: u16, body: Value) -> Reply {
    Reply::new(status, body.to_string())
}

fn ok(body: Value) -> Reply {
    reply(200, body)
}

fn not_found(detail: impl Into<String>) -> Reply {
    reply(404, json!({ "detail": detail.into() }))
}

fn unprocessable(detail: impl Into<String>) -> Reply {
    reply(422, json!({ "detail": detail.into() }))
}

fn method_not_allowed() -> Reply {
    reply(405, json!({ "detail": "Method Not Allowed" }))
}

/// Loads transactions from a CSV-formatted string with `date,category,amount,description`
/// columns.
fn load_csv(csv_data: &str) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |ix: usize| record.get(ix).unwrap_or_default().trim().to_string();
        let description = field(3);
        rows.push(Transaction::new(
            None,
            field(0),
            field(1),
            Amount::from_json(&Value::String(field(2))),
            (!description.is_empty()).then_some(description),
        ));
    }
    Ok(rows)
}

/// Seed expense data.
const EXPENSE_DATA: &str = r##"date,category,amount,description
2024-01-05,Comida,50000,Almuerzo con el equipo
2024-01-09,Transporte,12000,Taxi al aeropuerto
2024-01-15,Comida,32500,Mercado
2024-01-21,Servicios,145000,Energia
2024-02-02,Comida,41000,
2024-02-10,Entretenimiento,60000,Cine y cena
2024-02-18,Transporte,8500,Bus
"##;

/// Seed income data.
const INCOME_DATA: &str = r##"date,category,amount,description
2024-01-01,Ingreso,3500000,Salario enero
2024-01-20,Freelance,800000,Proyecto web
2024-02-01,Ingreso,3500000,Salario febrero
"##;
