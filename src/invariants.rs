//! Debug assertion macros for the channel and dispatcher invariants.
//!
//! These encode the channel and dispatcher invariants checked at runtime.
//! They are only active in debug builds (`#[cfg(debug_assertions)]`), so
//! there is zero overhead in release builds. Violations here indicate a
//! bug in the scheduler itself, not in user `execute` code, and are
//! treated as fatal.

// =============================================================================
// I1: Bounded queue
// =============================================================================

/// **Invariant**: `0 ≤ queue.len() ≤ capacity`.
///
/// Used in: `Channel::put` after pushing, `Channel::release` after popping.
macro_rules! debug_assert_bounded_queue {
    ($len:expr, $capacity:expr) => {
        debug_assert!(
            $len <= $capacity,
            "I1 violated: queue length {} exceeds capacity {}",
            $len,
            $capacity
        )
    };
}

// =============================================================================
// I2: Outstanding count of the head item
// =============================================================================

/// **Invariant**: for the item at the head of the queue, `0 < outstanding ≤ consumers`.
///
/// Used in: `Channel::put` (at enqueue time) and `Channel::release` (after
/// decrementing, while the item is still retained).
macro_rules! debug_assert_outstanding_in_range {
    ($outstanding:expr, $consumers:expr) => {
        debug_assert!(
            $outstanding > 0 && $outstanding <= $consumers,
            "I2 violated: outstanding {} out of range (0, {}]",
            $outstanding,
            $consumers
        )
    };
}

// =============================================================================
// I3: Dequeue exactly when outstanding reaches zero
// =============================================================================

/// **Invariant**: an item is removed from the queue iff its outstanding count
/// just reached zero.
///
/// Used in: `Channel::release`.
macro_rules! debug_assert_drained_on_zero {
    ($outstanding:expr, $popped:expr) => {
        debug_assert_eq!(
            $outstanding == 0,
            $popped,
            "I3 violated: outstanding reached {} but pop decision was {}",
            $outstanding,
            $popped
        )
    };
}

// =============================================================================
// I4 / P6: put/release balance
// =============================================================================

/// **Invariant**: total `put`s equal total fully-released items, tracked per
/// channel over its lifetime.
///
/// Used in: `Channel::put` and `Channel::release`, debug-only counters.
macro_rules! debug_assert_put_release_balance {
    ($puts:expr, $releases:expr) => {
        debug_assert!(
            $releases <= $puts,
            "P6 violated: {} releases exceed {} puts",
            $releases,
            $puts
        )
    };
}

// =============================================================================
// Dispatcher: readiness sampled only under the dispatcher mutex
// =============================================================================

/// **Invariant**: a node is enqueued only immediately after a locked
/// `is_ready()` check returned true — the race this design specifically
/// forbids.
///
/// Used in: `Dispatcher` worker loop, after the readiness check, before
/// pushing onto the ready queue.
macro_rules! debug_assert_ready_before_enqueue {
    ($ready:expr) => {
        debug_assert!($ready, "race-forbidden: enqueued a node that was not ready")
    };
}

pub(crate) use debug_assert_bounded_queue;
pub(crate) use debug_assert_drained_on_zero;
pub(crate) use debug_assert_outstanding_in_range;
pub(crate) use debug_assert_put_release_balance;
pub(crate) use debug_assert_ready_before_enqueue;
