//! Generation Session
//!
//! The per-run owner of the two id counters and the run metrics. Ids handed
//! out here index the runtime invocation cache, so they are strictly
//! monotonic: the only way to move a counter is to consume an id.

/// Persistable snapshot of the id counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub next_function_id: u32,
    pub next_type_id: u32,
}

/// Aggregate outcome of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Functions synthesized (blocked ones excluded).
    pub functions: usize,
    /// Synthesized functions containing at least one placeholder.
    pub incomplete: usize,
    /// Functions skipped by the block list.
    pub skipped: usize,
    /// Type-id getters synthesized.
    pub type_getters: usize,
}

#[derive(Debug, Default)]
pub struct Session {
    counters: Counters,
    metrics: Metrics,
}

impl Session {
    /// Resume from persisted counters.
    pub fn new(counters: Counters) -> Self {
        Self {
            counters,
            metrics: Metrics::default(),
        }
    }

    /// Consume the next function id.
    pub fn next_function_id(&mut self) -> u32 {
        let id = self.counters.next_function_id;
        self.counters.next_function_id += 1;
        id
    }

    /// Consume the next type id.
    pub fn next_type_id(&mut self) -> u32 {
        let id = self.counters.next_type_id;
        self.counters.next_type_id += 1;
        id
    }

    pub(crate) fn record_function(&mut self, incomplete: bool) {
        self.metrics.functions += 1;
        if incomplete {
            self.metrics.incomplete += 1;
        }
    }

    pub(crate) fn record_skip(&mut self) {
        self.metrics.skipped += 1;
    }

    pub(crate) fn record_type_getter(&mut self) {
        self.metrics.type_getters += 1;
    }

    /// Counters to persist at the end of the run.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }
}
