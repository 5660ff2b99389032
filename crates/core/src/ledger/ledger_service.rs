use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono_tz::Tz;
use log::{debug, error};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::aggregation::{filter_and_sort, month_total, per_day_totals, rolling_window};
use crate::constants::ROLLING_WINDOW_MONTHS;
use crate::errors::Error;
use crate::expenses::{Expense, ExpenseDraft, ExpenseId, ExpenseStore};
use crate::ledger::{LedgerState, LedgerView};
use crate::utils::time_utils::YearMonth;
use crate::Result;

/// Orchestrates a [`ExpenseStore`] backend, the aggregation functions, and
/// the derived views consumed by the presentation layer.
///
/// The controller owns the authoritative in-memory collection. It is replaced
/// wholesale on every refresh - an atomic swap of an `Arc`, never an in-place
/// mutation - so a concurrent read observes either the old or the new
/// collection in full. Refreshes carry a monotonically increasing generation;
/// a refetch that lost the race to a later-completing one is discarded rather
/// than applied out of order.
pub struct LedgerController {
    inner: Arc<LedgerInner>,
    feed_task: Option<JoinHandle<()>>,
}

struct Authoritative {
    snapshot: Arc<Vec<Expense>>,
    generation: u64,
}

struct ViewContext {
    visible_month: YearMonth,
    rolling_reference: YearMonth,
}

struct LedgerInner {
    store: Arc<dyn ExpenseStore>,
    tz: Tz,
    has_feed: bool,
    authoritative: RwLock<Authoritative>,
    views: RwLock<ViewContext>,
    state: RwLock<LedgerState>,
    generation: AtomicU64,
    view_tx: watch::Sender<LedgerView>,
}

impl LedgerController {
    /// Creates the controller and performs the initial load.
    ///
    /// With a subscribing store the change feed provides the first collection
    /// and every later one; otherwise a one-shot `fetch_all` seeds the state
    /// and later refreshes are explicit refetches after each mutation.
    pub async fn new(store: Arc<dyn ExpenseStore>, tz: Tz, initial_month: YearMonth) -> Self {
        let feed = store.subscribe();
        let (view_tx, _) = watch::channel(LedgerView::empty(
            LedgerState::Uninitialized,
            initial_month,
        ));

        let inner = Arc::new(LedgerInner {
            store,
            tz,
            has_feed: feed.is_some(),
            authoritative: RwLock::new(Authoritative {
                snapshot: Arc::new(Vec::new()),
                generation: 0,
            }),
            views: RwLock::new(ViewContext {
                visible_month: initial_month,
                rolling_reference: initial_month,
            }),
            state: RwLock::new(LedgerState::Uninitialized),
            generation: AtomicU64::new(0),
            view_tx,
        });

        inner.set_state(LedgerState::Loading);

        let feed_task = match feed {
            Some(mut rx) => {
                // The receiver's current value is the collection as of
                // subscription; it seeds the authoritative snapshot.
                let initial = rx.borrow_and_update().clone();
                let generation = inner.next_generation();
                inner.apply_refresh(initial, generation);
                inner.set_state(LedgerState::Ready);

                // Emissions arrive on the store's scheduling context; routing
                // them through LedgerInner keeps every state update on the
                // controller's locked path.
                let forward = Arc::clone(&inner);
                Some(tokio::spawn(async move {
                    while rx.changed().await.is_ok() {
                        let collection = rx.borrow_and_update().clone();
                        let generation = forward.next_generation();
                        forward.apply_refresh(collection, generation);
                    }
                }))
            }
            None => {
                match inner.store.fetch_all().await {
                    Ok(collection) => {
                        let generation = inner.next_generation();
                        inner.apply_refresh(collection, generation);
                        inner.set_state(LedgerState::Ready);
                    }
                    Err(err) => inner.set_error(&err),
                }
                None
            }
        };

        Self { inner, feed_task }
    }

    /// Read-only subscription to the derived views.
    pub fn subscribe(&self) -> watch::Receiver<LedgerView> {
        self.inner.view_tx.subscribe()
    }

    /// The most recently published view.
    pub fn view(&self) -> LedgerView {
        self.inner.view_tx.borrow().clone()
    }

    pub fn state(&self) -> LedgerState {
        self.inner.state.read().unwrap().clone()
    }

    /// Persists `draft`, inserting when `existing` is absent and replacing
    /// the record at `existing` otherwise.
    ///
    /// Validation failures are returned immediately and never reach the
    /// store. Store failures transition to `Error` with the authoritative
    /// collection untouched; no partial mutation is ever applied client-side.
    pub async fn add_or_update(
        &self,
        draft: ExpenseDraft,
        existing: Option<ExpenseId>,
    ) -> Result<()> {
        draft.validate()?;

        self.inner.set_state(LedgerState::Mutating);
        let write = match &existing {
            Some(id) => self.inner.store.update(id, draft).await,
            None => self.inner.store.insert(draft).await.map(|_| ()),
        };

        if let Err(err) = write {
            self.inner.set_error(&err);
            return Err(err);
        }
        self.inner.finish_mutation().await
    }

    /// Deletes the record at `id`.
    pub async fn remove(&self, id: ExpenseId) -> Result<()> {
        self.inner.set_state(LedgerState::Mutating);
        if let Err(err) = self.inner.store.delete(&id).await {
            self.inner.set_error(&err);
            return Err(err);
        }
        self.inner.finish_mutation().await
    }

    /// Navigates the visible month. The store is not touched: the month views
    /// are recomputed from the held collection, and the per-day rolling
    /// window shifts only when the reference month escapes it.
    pub fn set_visible_month(&self, ym: YearMonth) {
        {
            let mut views = self.inner.views.write().unwrap();
            views.visible_month = ym;
            if views.rolling_reference.months_until(ym).unsigned_abs() > ROLLING_WINDOW_MONTHS {
                debug!(
                    "Re-centering rolling window on {}-{:02}",
                    ym.year(),
                    ym.month()
                );
                views.rolling_reference = ym;
            }
        }
        self.inner.publish();
    }

    /// Retries the load after a failure. Never invoked automatically.
    pub async fn reload(&self) -> Result<()> {
        self.inner.set_state(LedgerState::Loading);
        let generation = self.inner.next_generation();
        match self.inner.store.fetch_all().await {
            Ok(collection) => {
                self.inner.apply_refresh(collection, generation);
                self.inner.set_state(LedgerState::Ready);
                Ok(())
            }
            Err(err) => {
                self.inner.set_error(&err);
                Err(err)
            }
        }
    }
}

impl Drop for LedgerController {
    fn drop(&mut self) {
        // Cancels the change-feed subscription exactly once at teardown.
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }
    }
}

impl LedgerInner {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replaces the authoritative collection if `generation` is still the
    /// newest; a stale refetch superseded by a later one is discarded.
    fn apply_refresh(&self, collection: Vec<Expense>, generation: u64) -> bool {
        {
            let mut auth = self.authoritative.write().unwrap();
            if generation <= auth.generation {
                debug!(
                    "Discarding stale refresh (generation {generation}, latest {})",
                    auth.generation
                );
                return false;
            }
            auth.snapshot = Arc::new(collection);
            auth.generation = generation;
        }
        self.publish();
        true
    }

    async fn finish_mutation(&self) -> Result<()> {
        if self.has_feed {
            // The change feed delivers the refreshed collection on its own.
            self.set_state(LedgerState::Ready);
            return Ok(());
        }

        let generation = self.next_generation();
        match self.store.fetch_all().await {
            Ok(collection) => {
                self.apply_refresh(collection, generation);
                self.set_state(LedgerState::Ready);
                Ok(())
            }
            Err(err) => {
                self.set_error(&err);
                Err(err)
            }
        }
    }

    fn set_state(&self, state: LedgerState) {
        *self.state.write().unwrap() = state;
        self.publish();
    }

    fn set_error(&self, err: &Error) {
        error!("Ledger operation failed: {err}");
        self.set_state(LedgerState::Error {
            message: err.to_string(),
        });
    }

    /// Recomputes the derived views from the current snapshot and publishes
    /// them to all subscribers.
    fn publish(&self) {
        let snapshot = Arc::clone(&self.authoritative.read().unwrap().snapshot);
        let (visible_month, rolling_reference) = {
            let views = self.views.read().unwrap();
            (views.visible_month, views.rolling_reference)
        };
        let state = self.state.read().unwrap().clone();

        let visible = filter_and_sort(&snapshot, visible_month, self.tz);
        let total = month_total(&visible);
        let window = rolling_window(rolling_reference, ROLLING_WINDOW_MONTHS, self.tz);
        let per_day = per_day_totals(&snapshot, window.start_millis, window.end_millis, self.tz);

        self.view_tx.send_replace(LedgerView {
            state,
            visible_month,
            visible_month_expenses: visible,
            month_total: total,
            per_day_totals: per_day,
        });
    }
}
