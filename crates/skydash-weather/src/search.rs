//! Debounced location autocomplete.
//!
//! `SearchMachine` is the pure state machine: it decides what each input,
//! timer fire, and completion does to the observable state. `LocationSearch`
//! drives it from a Tokio runtime, owning the debounce timer and publishing
//! every transition on a watch channel.
//!
//! Ordering is guarded by a generation counter. Each keystroke bumps the
//! generation; a timer or completion carrying an older generation is stale
//! and leaves the suggestions untouched.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;

use skydash_core::{Debouncer, SearchConfig};

use crate::client::LocationSource;
use crate::types::SearchLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Loading,
    Populated,
    Empty,
}

/// Snapshot of the search box as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SearchState {
    pub search_query: String,
    pub suggestions: Vec<SearchLocation>,
    pub is_loading: bool,
    pub phase: SearchPhase,
}

/// What the driver should do once a debounce timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// A newer input superseded this timer.
    Stale,
    /// Query too short; suggestions were cleared without a request.
    Cleared,
    /// Issue a search for `query`, tagged with `generation`.
    Dispatch { generation: u64, query: String },
}

#[derive(Debug)]
pub struct SearchMachine {
    state: SearchState,
    generation: u64,
    in_flight: Option<u64>,
    min_query_len: usize,
}

impl SearchMachine {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            state: SearchState::default(),
            generation: 0,
            in_flight: None,
            min_query_len,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Record a keystroke. Returns the generation the pending timer must carry.
    pub fn input(&mut self, query: &str) -> u64 {
        self.generation += 1;
        self.state.search_query = query.to_string();
        self.state.phase = SearchPhase::Debouncing;
        self.generation
    }

    /// Debounce window elapsed for `generation`.
    pub fn fire(&mut self, generation: u64) -> FireOutcome {
        if generation != self.generation {
            return FireOutcome::Stale;
        }

        let query = self.state.search_query.trim();
        if query.chars().count() < self.min_query_len {
            self.in_flight = None;
            self.state.suggestions.clear();
            self.state.is_loading = false;
            self.state.phase = SearchPhase::Idle;
            return FireOutcome::Cleared;
        }

        let query = query.to_string();
        self.in_flight = Some(generation);
        self.state.is_loading = true;
        self.state.phase = SearchPhase::Loading;
        FireOutcome::Dispatch { generation, query }
    }

    /// A dispatched search finished. Returns `true` if the results were applied.
    pub fn complete(&mut self, generation: u64, results: Vec<SearchLocation>) -> bool {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
            self.state.is_loading = false;
        }

        if generation != self.generation {
            tracing::debug!(
                "Discarding stale search results (generation {} < {})",
                generation,
                self.generation
            );
            return false;
        }

        self.state.phase = if results.is_empty() {
            SearchPhase::Empty
        } else {
            SearchPhase::Populated
        };
        self.state.suggestions = results;
        true
    }

    /// Drop suggestions and invalidate anything pending or in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.state.suggestions.clear();
        self.state.is_loading = false;
        self.state.phase = SearchPhase::Idle;
    }
}

/// Async driver around `SearchMachine`.
pub struct LocationSearch<S> {
    source: Arc<S>,
    machine: Arc<Mutex<SearchMachine>>,
    state_tx: Arc<watch::Sender<SearchState>>,
    debouncer: Debouncer,
}

impl<S: LocationSource + 'static> LocationSearch<S> {
    pub fn new(source: Arc<S>, config: &SearchConfig) -> Self {
        Self::with_window(source, config.debounce(), config.min_query_len)
    }

    pub fn with_window(source: Arc<S>, window: Duration, min_query_len: usize) -> Self {
        let (state_tx, _) = watch::channel(SearchState::default());
        Self {
            source,
            machine: Arc::new(Mutex::new(SearchMachine::new(min_query_len))),
            state_tx: Arc::new(state_tx),
            debouncer: Debouncer::new(window),
        }
    }

    /// Update the query and restart the debounce timer.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let generation = {
            let mut machine = self.machine.lock();
            let generation = machine.input(&query);
            self.state_tx.send_replace(machine.state().clone());
            generation
        };

        let machine = self.machine.clone();
        let state_tx = self.state_tx.clone();
        let source = self.source.clone();

        self.debouncer.schedule(async move {
            let outcome = {
                let mut guard = machine.lock();
                let outcome = guard.fire(generation);
                if outcome != FireOutcome::Stale {
                    state_tx.send_replace(guard.state().clone());
                }
                outcome
            };

            if let FireOutcome::Dispatch { generation, query } = outcome {
                // The request outlives later keystrokes; only its result is gated.
                tokio::spawn(async move {
                    let results = source.search_locations(&query).await;
                    let mut guard = machine.lock();
                    guard.complete(generation, results);
                    state_tx.send_replace(guard.state().clone());
                });
            }
        });
    }

    /// Reset to idle immediately, cancelling the pending timer.
    pub fn clear_suggestions(&mut self) {
        self.debouncer.cancel_pending();
        let mut machine = self.machine.lock();
        machine.clear();
        self.state_tx.send_replace(machine.state().clone());
    }

    pub fn snapshot(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }
}

impl<S> std::fmt::Debug for LocationSearch<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSearch")
            .field("machine", &*self.machine.lock())
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}
