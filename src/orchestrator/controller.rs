use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::debounce::debounce;
use super::state::{PageSnapshot, GENERIC_FETCH_ERROR};
use crate::config::UiConfig;
use crate::store::SearchCountStore;
use crate::tmdb::{MovieSource, MovieSummary};

/// Failed popularity updates buffered for a `side_effect_errors` receiver.
/// Further failures are dropped until it is drained.
pub const SIDE_EFFECT_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub debounce: Duration,
    pub trending_limit: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

impl From<&UiConfig> for OrchestratorSettings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            debounce: Duration::from_millis(ui.debounce_ms),
            trending_limit: ui.trending_limit,
        }
    }
}

/// How a single `fetch_movies` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Results replaced the movie list.
    Loaded(usize),
    /// The API answered `Response: "False"`; carries the message shown.
    Rejected(String),
    /// Transport, status or decode failure.
    Failed,
    /// A newer request was dispatched before this one finished; nothing applied.
    Stale,
}

/// A failed popularity update. Never surfaces in the page's error state.
#[derive(Debug, Clone)]
pub struct SideEffectError {
    pub search_term: String,
    pub message: String,
}

struct Inner {
    snapshot: PageSnapshot,
    generation: u64,
    settled: u64,
}

struct Shared {
    source: Arc<dyn MovieSource>,
    store: Arc<dyn SearchCountStore>,
    settings: OrchestratorSettings,
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<PageSnapshot>,
    input_tx: mpsc::UnboundedSender<String>,
    side_effects: Mutex<Option<mpsc::Sender<SideEffectError>>>,
    debounce_task: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    /// Apply `f` to the state and publish the result.
    fn update<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock();
        let r = f(&mut inner);
        self.snapshot_tx.send_replace(inner.snapshot.clone());
        r
    }

    fn begin_request(&self) -> u64 {
        self.update(|inner| {
            inner.generation += 1;
            inner.snapshot.search.is_loading = true;
            inner.snapshot.search.error_message.clear();
            inner.generation
        })
    }

    /// Run `f` only if `generation` is still the newest request.
    fn apply_if_current(&self, generation: u64, f: impl FnOnce(&mut PageSnapshot)) -> bool {
        self.update(|inner| {
            if inner.generation != generation {
                return false;
            }
            f(&mut inner.snapshot);
            true
        })
    }

    fn report_side_effect(&self, err: SideEffectError) {
        if let Some(ref tx) = *self.side_effects.lock() {
            if let Err(mpsc::error::TrySendError::Full(err)) = tx.try_send(err) {
                debug!(search_term = %err.search_term, "Side effect queue full, dropping error");
            }
        }
    }
}

/// Clears the loading flag when a fetch ends, however it ends.
struct LoadingGuard<'a> {
    shared: &'a Shared,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let generation = self.generation;
        self.shared.update(|inner| {
            inner.settled += 1;
            if inner.generation == generation {
                inner.snapshot.search.is_loading = false;
            }
        });
    }
}

/// Owns the search state of one page and drives the movie and trending
/// fetches. Cheap to clone; all clones share one state.
///
/// Dropping the last clone stops the debounce task.
#[derive(Clone)]
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    /// Must be called inside a tokio runtime: the debounce task is spawned here.
    pub fn new(
        source: Arc<dyn MovieSource>,
        store: Arc<dyn SearchCountStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(PageSnapshot::default());
        let quiet = settings.debounce;

        let shared = Arc::new(Shared {
            source,
            store,
            settings,
            inner: Mutex::new(Inner {
                snapshot: PageSnapshot::default(),
                generation: 0,
                settled: 0,
            }),
            snapshot_tx,
            input_tx,
            side_effects: Mutex::new(None),
            debounce_task: Mutex::new(None),
        });

        let weak = Arc::downgrade(&shared);
        let handle = tokio::spawn(debounce(input_rx, quiet, move |term: String| {
            settle_term(&weak, term)
        }));
        *shared.debounce_task.lock() = Some(handle);

        Self { shared }
    }

    /// `new`, plus the two startup effects: the trending load and the first
    /// (empty-term) fetch of popular movies.
    pub fn mount(
        source: Arc<dyn MovieSource>,
        store: Arc<dyn SearchCountStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        let orchestrator = Self::new(source, store, settings);

        let trending = orchestrator.clone();
        tokio::spawn(async move {
            trending.load_trending_movies().await;
        });

        let initial = orchestrator.clone();
        tokio::spawn(async move {
            initial.fetch_movies("").await;
        });

        orchestrator
    }

    /// Search box input. Updates the raw term at once; the fetch follows
    /// after the debounce quiet period.
    pub fn set_search_term(&self, raw: &str) {
        self.shared.update(|inner| {
            inner.snapshot.search.raw_term = raw.to_string();
        });
        if self.shared.input_tx.send(raw.to_string()).is_err() {
            warn!("Debounce task is gone, search input ignored");
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.shared.inner.lock().snapshot.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Number of fetches that have finished, stale ones included.
    pub fn settled_requests(&self) -> u64 {
        self.shared.inner.lock().settled
    }

    /// Receiver for failed popularity updates. Replaces any earlier receiver;
    /// failures are only logged while nobody holds one. Holds at most
    /// `SIDE_EFFECT_CAPACITY` undrained errors.
    pub fn side_effect_errors(&self) -> mpsc::Receiver<SideEffectError> {
        let (tx, rx) = mpsc::channel(SIDE_EFFECT_CAPACITY);
        *self.shared.side_effects.lock() = Some(tx);
        rx
    }

    /// Stop reacting to input. In-flight fetches still complete.
    pub fn shutdown(&self) {
        if let Some(handle) = self.shared.debounce_task.lock().take() {
            handle.abort();
        }
    }

    /// Fetch movies for `query`, or popular movies when it is empty, and
    /// apply the result unless a newer request has been dispatched since.
    pub async fn fetch_movies(&self, query: &str) -> FetchOutcome {
        let shared = &*self.shared;
        let generation = shared.begin_request();
        let _guard = LoadingGuard { shared, generation };

        debug!(generation, query = %query, "Fetching movies");

        let result = if query.is_empty() {
            shared.source.discover().await
        } else {
            shared.source.search(query).await
        };

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                error!(query = %query, "Error fetching movies: {}", e);
                let applied = shared.apply_if_current(generation, |s| {
                    s.search.error_message = GENERIC_FETCH_ERROR.to_string();
                });
                return if applied { FetchOutcome::Failed } else { FetchOutcome::Stale };
            }
        };

        if page.is_api_failure() {
            let message = page
                .error
                .unwrap_or_else(|| GENERIC_FETCH_ERROR.to_string());
            warn!(query = %query, "Movie API rejected request: {}", message);
            let applied = shared.apply_if_current(generation, |s| {
                s.search.error_message = message.clone();
            });
            return if applied {
                FetchOutcome::Rejected(message)
            } else {
                FetchOutcome::Stale
            };
        }

        let count = page.results.len();
        let first = page.results.first().cloned();

        if !query.is_empty() {
            if let Some(movie) = first {
                self.spawn_record_search(query.to_string(), movie);
            }
        }

        let applied = shared.apply_if_current(generation, |s| {
            s.movies = page.results;
            s.results_loaded = true;
        });
        if !applied {
            debug!(generation, query = %query, "Discarding stale movie results");
            return FetchOutcome::Stale;
        }

        info!(query = %query, count, "Loaded movies");
        FetchOutcome::Loaded(count)
    }

    /// Load the top searches once. Failures leave the list empty.
    pub async fn load_trending_movies(&self) {
        let shared = &*self.shared;
        match shared.store.top(shared.settings.trending_limit).await {
            Ok(entries) => {
                debug!(count = entries.len(), "Loaded trending movies");
                shared.update(|inner| inner.snapshot.trending = entries);
            }
            Err(e) => {
                error!("Error fetching trending movies: {}", e);
            }
        }
    }

    fn spawn_record_search(&self, search_term: String, movie: MovieSummary) {
        let shared = self.shared.clone();
        tokio::spawn(async move {
            if let Err(e) = shared.store.increment(&search_term, &movie).await {
                warn!(search_term = %search_term, "Failed to update search count: {}", e);
                shared.report_side_effect(SideEffectError {
                    search_term,
                    message: e.to_string(),
                });
            }
        });
    }
}

/// Debounce callback: commit the settled term and fetch if it changed.
fn settle_term(shared: &Weak<Shared>, term: String) {
    let Some(shared) = shared.upgrade() else {
        return;
    };

    let changed = shared.update(|inner| {
        if inner.snapshot.search.debounced_term == term {
            return false;
        }
        inner.snapshot.search.debounced_term = term.clone();
        true
    });
    if !changed {
        return;
    }

    let orchestrator = Orchestrator { shared };
    tokio::spawn(async move {
        orchestrator.fetch_movies(&term).await;
    });
}
