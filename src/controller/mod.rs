//! The transaction lifecycle controller.
//!
//! One generic `Controller` drives create, edit, delete, reload and filtering for a collection. It
//! is instantiated once per `Ledger`, i.e. once for expenses and once for incomes. Its state lives
//! in a `watch` channel so that every mutation notifies subscribers; no lock is ever held across an
//! `.await`. Remote failures never propagate out of the controller: they are written to the shared
//! `ErrorDisplay` and local state is left as it was before the attempt.

mod form;
mod ledger;

pub use form::FormState;
pub use ledger::{Expenses, Incomes, Ledger};

use crate::api::Tracker;
use crate::filter::Filters;
use crate::model::{Aggregate, Id, Transaction};
use crate::notice::ErrorDisplay;
use crate::stats;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What a controller is doing right now.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Submitting,
}

/// Everything a controller presents: the authoritative collection, the backend aggregate, the
/// filters and filtered view, the form, and the id being edited (`None` in create mode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerState {
    items: Vec<Transaction>,
    stats: Option<Aggregate>,
    filters: Filters,
    form: FormState,
    editing: Option<Id>,
    phase: Phase,
}

impl LedgerState {
    fn new(form: FormState) -> Self {
        Self {
            items: Vec::new(),
            stats: None,
            filters: Filters::default(),
            form,
            editing: None,
            phase: Phase::Idle,
        }
    }

    /// The full collection in the order the backend returned it.
    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    /// The aggregate the backend computed, if any.
    pub fn backend_stats(&self) -> Option<&Aggregate> {
        self.stats.as_ref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn editing(&self) -> Option<&Id> {
        self.editing.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The backend aggregate when there is one, otherwise one computed over `items`.
    pub fn stats(&self) -> Aggregate {
        stats::summarize(self.stats.as_ref(), &self.items)
    }
}

/// Drives one collection against the backend. See the module documentation.
pub struct Controller<L: Ledger> {
    tracker: Arc<dyn Tracker>,
    errors: ErrorDisplay,
    today: String,
    state: watch::Sender<LedgerState>,
    _ledger: PhantomData<fn() -> L>,
}

impl<L: Ledger> Controller<L> {
    /// Creates a controller whose form defaults to the current UTC date.
    pub fn new(tracker: Arc<dyn Tracker>, errors: ErrorDisplay) -> Self {
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        Self::with_today(tracker, errors, today)
    }

    /// Creates a controller whose form defaults to `today`.
    pub fn with_today(
        tracker: Arc<dyn Tracker>,
        errors: ErrorDisplay,
        today: impl Into<String>,
    ) -> Self {
        let today = today.into();
        let (state, _) = watch::channel(LedgerState::new(FormState::new(
            today.clone(),
            L::DEFAULT_CATEGORY,
        )));
        Self {
            tracker,
            errors,
            today,
            state,
            _ledger: PhantomData,
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> LedgerState {
        self.state.borrow().clone()
    }

    /// A receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<LedgerState> {
        self.state.subscribe()
    }

    pub fn errors(&self) -> &ErrorDisplay {
        &self.errors
    }

    pub fn today(&self) -> &str {
        &self.today
    }

    fn fresh_form(&self) -> FormState {
        FormState::new(self.today.clone(), L::DEFAULT_CATEGORY)
    }

    fn set_phase(&self, phase: Phase) {
        self.state.send_modify(|state| state.phase = phase);
    }

    /// Applies `edit` to the form.
    pub fn edit_form(&self, edit: impl FnOnce(&mut FormState)) {
        self.state.send_modify(|state| edit(&mut state.form));
    }

    /// Saves the form: an update when editing, otherwise a create.
    ///
    /// On success the form is reset, edit mode ends, the collection is reloaded and the filter
    /// message is cleared; the filter inputs are kept. Returns the saved record when the backend
    /// sent one back. On failure the error is shown and the form and edit mode are unchanged.
    pub async fn submit(&self) -> Option<Transaction> {
        self.errors.clear();
        let (draft, editing) = {
            let state = self.state.borrow();
            (state.form.to_draft(), state.editing.clone())
        };
        let draft = match draft {
            Ok(draft) => draft,
            Err(e) => {
                self.errors.set(e.to_string());
                return None;
            }
        };

        self.set_phase(Phase::Submitting);
        let result = match editing {
            Some(id) => self.tracker.update(L::KIND, &id, &draft).await,
            None => self.tracker.create(L::KIND, &draft).await,
        };

        match result {
            Ok(saved) => {
                let id = saved.as_ref().and_then(Transaction::id);
                info!("Saved {} {}", L::KIND.noun(), id.map(Id::to_string).unwrap_or_default());
                let form = self.fresh_form();
                self.state.send_modify(|state| {
                    state.form = form;
                    state.editing = None;
                    state.phase = Phase::Idle;
                });
                self.reload().await;
                self.state.send_modify(|state| state.filters.clear_message());
                saved
            }
            Err(e) => {
                warn!("Unable to save the {}: {e:#}", L::KIND.noun());
                self.errors.set_error(&e);
                self.set_phase(Phase::Idle);
                None
            }
        }
    }

    /// Enters edit mode for `tx` and copies its fields into the form.
    pub fn begin_edit(&self, tx: &Transaction) {
        let form = FormState::from_transaction(tx, &self.today);
        self.state.send_modify(|state| {
            state.editing = tx.id().cloned();
            state.form = form;
        });
    }

    /// Leaves edit mode and discards the form.
    pub fn cancel_edit(&self) {
        let form = self.fresh_form();
        self.state.send_modify(|state| {
            state.editing = None;
            state.form = form;
        });
    }

    /// Deletes the record with `id` and reloads. There is no confirmation step.
    pub async fn delete(&self, id: &Id) {
        self.errors.clear();
        self.set_phase(Phase::Submitting);
        match self.tracker.delete(L::KIND, id).await {
            Ok(()) => {
                info!("Deleted {} {id}", L::KIND.noun());
                self.set_phase(Phase::Idle);
                self.reload().await;
            }
            Err(e) => {
                warn!("Unable to delete {} {id}: {e:#}", L::KIND.noun());
                self.errors.set_error(&e);
                self.set_phase(Phase::Idle);
            }
        }
    }

    /// Fetches the collection, together with the backend aggregate when the ledger has one, and
    /// shows it in full. Nothing is committed unless every fetch succeeds. Returns whether the
    /// collection was replaced.
    pub async fn reload(&self) -> bool {
        if L::PRIMARY {
            self.errors.clear();
        }
        self.set_phase(Phase::Loading);
        let result = if L::WITH_STATS {
            tokio::try_join!(self.tracker.list(L::KIND), self.tracker.stats())
        } else {
            self.tracker.list(L::KIND).await.map(|items| (items, None))
        };

        match result {
            Ok((items, stats)) => {
                debug!("Loaded {} {}", items.len(), L::KIND);
                self.state.send_modify(|state| {
                    state.filters.show_all(&items);
                    state.items = items;
                    state.stats = stats;
                    state.phase = Phase::Idle;
                });
                true
            }
            Err(e) => {
                if L::PRIMARY {
                    self.errors.set_error(&e);
                } else {
                    warn!("Unable to load {}: {e:#}", L::KIND);
                }
                self.set_phase(Phase::Idle);
                false
            }
        }
    }

    /// Clears the filters and reloads.
    pub async fn refresh(&self) -> bool {
        self.reset_filters();
        self.reload().await
    }

    pub fn set_filter_date(&self, date: impl Into<String>) {
        let date = date.into();
        self.state.send_modify(|state| state.filters.set_date(date));
    }

    pub fn set_filter_month(&self, month: impl Into<String>) {
        let month = month.into();
        self.state.send_modify(|state| state.filters.set_month(month));
    }

    pub fn set_filter_category(&self, category: impl Into<String>) {
        let category = category.into();
        self.state
            .send_modify(|state| state.filters.set_category(category));
    }

    pub fn filter_by_date(&self) {
        self.state
            .send_modify(|state| state.filters.filter_by_date(&state.items));
    }

    pub fn filter_by_month(&self) {
        self.state
            .send_modify(|state| state.filters.filter_by_month(&state.items));
    }

    pub fn filter_by_category(&self) {
        self.state
            .send_modify(|state| state.filters.filter_by_category(&state.items));
    }

    pub fn reset_filters(&self) {
        self.state
            .send_modify(|state| state.filters.reset(&state.items));
    }
}
