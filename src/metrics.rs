use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Live, atomically-updated counters threaded through the graph and its
/// channels. Cheap to increment (a single `Relaxed` add); gated behind
/// [`Config::enable_metrics`](crate::Config::enable_metrics) so the cost is
/// paid only when observability is requested.
#[derive(Debug)]
pub(crate) struct Metrics {
    enabled: AtomicBool,
    nodes_executed: AtomicU64,
    runs_completed: AtomicU64,
    ready_pushes: AtomicU64,
    items_put: AtomicU64,
    items_released: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            nodes_executed: AtomicU64::new(0),
            runs_completed: AtomicU64::new(0),
            ready_pushes: AtomicU64::new(0),
            items_put: AtomicU64::new(0),
            items_released: AtomicU64::new(0),
        }
    }
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set once, before any worker thread starts, from
    /// [`Config::enable_metrics`](crate::Config::enable_metrics).
    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_node_executed(&self) {
        if self.enabled() {
            self.nodes_executed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_run_completed(&self) {
        if self.enabled() {
            self.runs_completed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_ready_push(&self) {
        if self.enabled() {
            self.ready_pushes.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_put(&self) {
        if self.enabled() {
            self.items_put.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_release(&self) {
        if self.enabled() {
            self.items_released.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nodes_executed: self.nodes_executed.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            ready_pushes: self.ready_pushes.load(Ordering::Relaxed),
            items_put: self.items_put.load(Ordering::Relaxed),
            items_released: self.items_released.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of a [`Graph`](crate::Graph)'s metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Number of times any node's `execute` (excluding the synthetic
    /// source/sink) has been called.
    pub nodes_executed: u64,
    /// Number of pipelined runs that have reached the synthetic sink.
    pub runs_completed: u64,
    /// Number of times a node was pushed onto the dispatcher's ready queue.
    pub ready_pushes: u64,
    /// Number of values enqueued into any channel via `put`.
    pub items_put: u64,
    /// Number of items fully released (all consumers observed) from any
    /// channel.
    pub items_released: u64,
}
