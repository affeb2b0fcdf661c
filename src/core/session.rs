use crate::core::engine::DiscoveryEngine;
use crate::core::paginate::{ResultPage, DEFAULT_BATCH_SIZE};
use crate::models::{
    Caregiver, CityFilter, Mode, PreferenceProfile, RankedResult, Requester, SearchCriteria,
    SortKey,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors surfaced by the discovery session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a preference match is already in flight")]
    MatchInFlight,
}

/// Timing and batching knobs for a discovery session
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub batch_size: usize,
    /// Quiet period before a draft query commits and drives recomputation
    pub debounce: Duration,
    /// Settle delay before a batch reveal, so fast scrolling stays smooth
    pub settle_delay: Duration,
    /// Simulated thinking delay between a preference-match request and its
    /// results becoming available
    pub match_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            debounce: Duration::from_millis(500),
            settle_delay: Duration::from_millis(500),
            match_delay: Duration::from_millis(1200),
        }
    }
}

/// Read-only view of the session for the presentation layer
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub results: Vec<RankedResult>,
    pub visible_count: usize,
    pub total: usize,
    pub has_more: bool,
    pub match_pending: bool,
    pub city: CityFilter,
    pub sort: SortKey,
}

struct SessionState {
    mode: Mode,
    /// Selected city, kept outside the mode so location intent survives
    /// search-mode changes
    city: CityFilter,
    sort: SortKey,
    draft_query: String,
    page: ResultPage,
    /// Bumped only when criteria or mode actually change; pending match
    /// completions and reveals compare against it and discard superseded work.
    /// Draft keystrokes never bump it: typing alone must not cancel an
    /// in-flight preference match or a pending reveal.
    generation: u64,
    /// Bumped on every draft keystroke; collapses rapid typing into a single
    /// debounced commit
    draft_generation: u64,
    match_pending: bool,
}

struct SessionInner {
    engine: DiscoveryEngine,
    catalog: Arc<Vec<Caregiver>>,
    requester: Option<Requester>,
    config: SessionConfig,
    state: Mutex<SessionState>,
}

/// Stateful discovery controller owned by one active search session.
///
/// Criteria and catalog are immutable inputs; `recompute` (filter/score ->
/// rank -> reset cursor) is the sole state-mutating pipeline, and every timer
/// (query debounce, reveal settle delay, preference-match delay) is owned here
/// rather than by the rendering layer. The catalog snapshot is read-only;
/// recomputation always derives fresh from current criteria, so there is no
/// incremental state to race on.
#[derive(Clone)]
pub struct DiscoverySession {
    inner: Arc<SessionInner>,
}

impl DiscoverySession {
    pub async fn new(
        engine: DiscoveryEngine,
        catalog: Arc<Vec<Caregiver>>,
        requester: Option<Requester>,
        config: SessionConfig,
    ) -> Self {
        let session = Self {
            inner: Arc::new(SessionInner {
                engine,
                catalog,
                requester,
                config,
                state: Mutex::new(SessionState {
                    mode: Mode::default(),
                    city: CityFilter::Any,
                    sort: SortKey::default(),
                    draft_query: String::new(),
                    page: ResultPage::default(),
                    generation: 0,
                    draft_generation: 0,
                    match_pending: false,
                }),
            }),
        };

        let mut state = session.inner.state.lock().await;
        session.recompute_locked(&mut state);
        drop(state);
        session
    }

    /// Update the draft query immediately; the committed query (and the
    /// recomputation it drives) follows after the quiet period. A newer
    /// keystroke or criteria change invalidates any pending commit. Typing is
    /// draft-only until the commit: it never invalidates in-flight work.
    pub async fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        let (draft_generation, generation) = {
            let mut state = self.inner.state.lock().await;
            state.draft_query = text.clone();
            state.draft_generation += 1;
            (state.draft_generation, state.generation)
        };

        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(session.inner.config.debounce).await;
            let mut state = session.inner.state.lock().await;
            if state.draft_generation != draft_generation || state.generation != generation {
                tracing::trace!("Discarding superseded query commit: {:?}", text);
                return;
            }
            match &mut state.mode {
                Mode::Filter(criteria) => criteria.query = text,
                // Commit is a no-op under preference matching
                Mode::Preference(_) => return,
            }
            state.generation += 1;
            session.recompute_locked(&mut state);
        });
    }

    /// Select a city (or clear it back to "any") and recompute immediately
    pub async fn set_city(&self, city: CityFilter) {
        let mut state = self.inner.state.lock().await;
        state.city = city;
        state.generation += 1;
        self.recompute_locked(&mut state);
    }

    /// Change the plain-mode sort key and recompute immediately
    pub async fn set_sort(&self, sort: SortKey) {
        let mut state = self.inner.state.lock().await;
        state.sort = sort;
        state.generation += 1;
        self.recompute_locked(&mut state);
    }

    /// Replace the plain-mode criteria (except the city, which is owned by the
    /// session) and recompute immediately. No-op under preference matching.
    pub async fn set_criteria(&self, criteria: SearchCriteria) {
        let mut state = self.inner.state.lock().await;
        if matches!(state.mode, Mode::Preference(_)) {
            return;
        }
        state.draft_query = criteria.query.clone();
        state.mode = Mode::Filter(criteria);
        state.generation += 1;
        self.recompute_locked(&mut state);
    }

    /// Start a preference match. Clears the plain filter fields (the selected
    /// city is preserved), then makes scored results available after the
    /// configured thinking delay. A second request while one is pending is
    /// rejected; completions from superseded generations are discarded.
    pub async fn start_preference_match(
        &self,
        profile: PreferenceProfile,
    ) -> Result<(), SessionError> {
        let generation = {
            let mut state = self.inner.state.lock().await;
            if state.match_pending {
                return Err(SessionError::MatchInFlight);
            }
            state.match_pending = true;
            state.draft_query.clear();
            state.mode = Mode::Preference(profile);
            state.generation += 1;
            state.generation
        };

        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(session.inner.config.match_delay).await;
            let mut state = session.inner.state.lock().await;
            state.match_pending = false;
            if state.generation != generation {
                tracing::debug!("Discarding superseded preference match");
                return;
            }
            session.recompute_locked(&mut state);
        });

        Ok(())
    }

    /// Leave preference matching and return to plain filtering with fresh
    /// criteria; the selected city survives the transition
    pub async fn clear_preference_match(&self) {
        let mut state = self.inner.state.lock().await;
        state.mode = Mode::Filter(SearchCriteria::default());
        state.draft_query.clear();
        state.match_pending = false;
        state.generation += 1;
        self.recompute_locked(&mut state);
    }

    /// Reveal the next batch after the settle delay. If the list was recomputed
    /// while the delay was pending, the stale reveal is discarded.
    pub async fn request_more(&self) {
        let generation = {
            let state = self.inner.state.lock().await;
            if !state.page.has_more() {
                return;
            }
            state.generation
        };

        tokio::time::sleep(self.inner.config.settle_delay).await;

        let mut state = self.inner.state.lock().await;
        if state.generation == generation {
            state.page.reveal_more();
        }
    }

    /// Current page, mode status and criteria context for display
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.lock().await;
        SessionSnapshot {
            results: state.page.visible().to_vec(),
            visible_count: state.page.visible_count(),
            total: state.page.total(),
            has_more: state.page.has_more(),
            match_pending: state.match_pending,
            city: state.city.clone(),
            sort: state.sort,
        }
    }

    /// The sole state-mutating pipeline: filter/score -> rank -> reset cursor
    fn recompute_locked(&self, state: &mut SessionState) {
        let now = Utc::now();
        let results = match &state.mode {
            Mode::Filter(criteria) => {
                let mut effective = criteria.clone();
                effective.city = state.city.clone();
                self.inner.engine.search(
                    &self.inner.catalog,
                    &effective,
                    self.inner.requester.as_ref(),
                    state.sort,
                    now,
                )
            }
            Mode::Preference(profile) => {
                self.inner
                    .engine
                    .preference_match(&self.inner.catalog, profile, &state.city, now)
            }
        };

        tracing::debug!(
            "Recomputed ranked list: {} results (generation {})",
            results.len(),
            state.generation
        );

        state.page = ResultPage::new(results, self.inner.config.batch_size);
    }
}
