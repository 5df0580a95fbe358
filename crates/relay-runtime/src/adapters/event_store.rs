//! In-memory event store.
//!
//! Implements the admission subsystem's `EventStoreReader` port plus the
//! save operation the pipeline needs. Duplicate ids are ignored.

use cc_01_group_admission::{EventStoreReader, StoreError};
use parking_lot::RwLock;
use shared_types::{Event, Filter};
use std::collections::HashSet;

#[derive(Default)]
struct StoreState {
    events: Vec<Event>,
    ids: HashSet<String>,
}

/// Process-local event store.
#[derive(Default)]
pub struct InMemoryEventStore {
    state: RwLock<StoreState>,
    failure: RwLock<Option<StoreError>>,
}

impl InMemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `event`. Returns `false` if an event with the same id exists.
    pub fn save(&self, event: Event) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut state = self.state.write();
        if !state.ids.insert(event.id.clone()) {
            return Ok(false);
        }
        state.events.push(event);
        Ok(true)
    }

    /// Stored events matching `filter`, in insertion order.
    pub fn query(&self, filter: &Filter) -> Result<Vec<Event>, StoreError> {
        self.check_available()?;
        let state = self.state.read();
        let matching = state.events.iter().filter(|e| filter.matches(e)).cloned();
        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.state.read().events.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every subsequent operation fail with `error`.
    pub fn inject_failure(&self, error: StoreError) {
        *self.failure.write() = Some(error);
    }

    /// Clear an injected failure.
    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match self.failure.read().as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl EventStoreReader for InMemoryEventStore {
    fn count_events(&self, filter: &Filter) -> Result<usize, StoreError> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .count())
    }
}
