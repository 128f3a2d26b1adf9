/// Configuration for a [`Graph`](crate::Graph)'s worker pool, channel
/// capacities, and metrics collection.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of OS worker threads the dispatcher starts.
    pub thread_count: usize,
    /// Capacity used by [`GraphBuilder::add_channel`](crate::GraphBuilder::add_channel)
    /// callers that don't specify one explicitly.
    pub default_channel_capacity: usize,
    /// Enable metrics collection (slight overhead).
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    ///
    /// # Panics
    ///
    /// Panics if `thread_count` or `default_channel_capacity` is zero.
    pub const fn new(
        thread_count: usize,
        default_channel_capacity: usize,
        enable_metrics: bool,
    ) -> Self {
        assert!(thread_count > 0, "thread_count must be at least 1");
        assert!(
            default_channel_capacity > 0,
            "default_channel_capacity must be at least 1"
        );

        Self {
            thread_count,
            default_channel_capacity,
            enable_metrics,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thread_count: 4,
            default_channel_capacity: 1,
            enable_metrics: false,
        }
    }
}

/// Single worker thread, single-slot channels — deterministic, sequential-
/// equivalent execution of a graph.
pub const SINGLE_WORKER_CONFIG: Config = Config::new(1, 1, false);

/// Several worker threads with buffered channels, sized for pipelining many
/// runs concurrently.
pub const PIPELINED_CONFIG: Config = Config::new(8, 16, false);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.thread_count, 4);
        assert_eq!(cfg.default_channel_capacity, 1);
        assert!(!cfg.enable_metrics);
    }

    #[test]
    fn new_validates() {
        let cfg = Config::new(2, 5, true);
        assert_eq!(cfg.thread_count, 2);
        assert_eq!(cfg.default_channel_capacity, 5);
        assert!(cfg.enable_metrics);
    }

    #[test]
    #[should_panic(expected = "thread_count")]
    fn rejects_zero_threads() {
        let _ = Config::new(0, 5, false);
    }

    #[test]
    #[should_panic(expected = "default_channel_capacity")]
    fn rejects_zero_capacity() {
        let _ = Config::new(2, 0, false);
    }
}
