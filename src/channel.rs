use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use crate::error::GraphError;
use crate::ids::{ChannelId, NodeId};
use crate::invariants::{
    debug_assert_bounded_queue, debug_assert_drained_on_zero, debug_assert_outstanding_in_range,
    debug_assert_put_release_balance,
};
use crate::metrics::Metrics;

struct Item<T> {
    value: Arc<T>,
    outstanding: usize,
}

struct ChannelState<T> {
    queue: VecDeque<Item<T>>,
    producer: Option<NodeId>,
    consumers: Vec<NodeId>,
    puts: u64,
    releases: u64,
}

/// A typed, capacity-bounded, FIFO channel connecting one producer node to
/// zero or more consumer nodes.
///
/// A channel is single-slot when `capacity == 1` and buffered when
/// `capacity > 1`; both are the same type, differing only in the bound
/// enforced by [`can_put`](Channel::can_put) (one abstraction
/// parameterized over capacity rather than two channel types).
///
/// Each queued value is wrapped in an `Arc` so that every consumer can hold
/// an independent, read-only [`ReadHandle`] over it without the channel
/// cloning `T`; the channel itself remains the sole conceptual owner of the
/// payload.
pub struct Channel<T> {
    id: ChannelId,
    name: String,
    capacity: usize,
    state: Mutex<ChannelState<T>>,
    metrics: Arc<Metrics>,
}

impl<T> Channel<T> {
    pub(crate) fn new(id: ChannelId, name: impl Into<String>, capacity: usize, metrics: Arc<Metrics>) -> Arc<Self> {
        assert!(capacity > 0, "channel capacity must be at least 1");
        Arc::new(Self {
            id,
            name: name.into(),
            capacity,
            state: Mutex::new(ChannelState {
                queue: VecDeque::with_capacity(capacity),
                producer: None,
                consumers: Vec::new(),
                puts: 0,
                releases: 0,
            }),
            metrics,
        })
    }

    /// This channel's stable identifier within its graph.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// The channel's diagnostic name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of in-flight values this channel holds at once.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registers `node` as this channel's producer.
    ///
    /// Fatal to call twice with different producers: a
    /// channel has exactly one producer for its lifetime.
    pub(crate) fn bind_producer(&self, node: NodeId) -> Result<(), GraphError> {
        let mut state = self.state.lock().unwrap();
        if state.producer.is_some() {
            return Err(GraphError::DuplicateProducer { channel: self.id });
        }
        state.producer = Some(node);
        Ok(())
    }

    /// Registers `node` as one of this channel's consumers, in binding order.
    ///
    /// Rejects a node that is already a consumer of this channel.
    pub(crate) fn bind_consumer(&self, node: NodeId) -> Result<(), GraphError> {
        let mut state = self.state.lock().unwrap();
        if state.consumers.contains(&node) {
            return Err(GraphError::DuplicateConsumer {
                channel: self.id,
                node,
            });
        }
        state.consumers.push(node);
        Ok(())
    }

    /// Whether this channel currently has a bound producer.
    pub(crate) fn has_producer(&self) -> bool {
        self.state.lock().unwrap().producer.is_some()
    }

    /// Snapshot of this channel's currently bound consumers, in bind order.
    pub(crate) fn consumer_ids(&self) -> Vec<NodeId> {
        self.state.lock().unwrap().consumers.clone()
    }

    /// Number of bound consumers.
    pub(crate) fn consumer_count(&self) -> usize {
        self.state.lock().unwrap().consumers.len()
    }

    /// True iff there is room in the queue for another `put`.
    #[must_use]
    pub fn can_put(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.queue.len() < self.capacity
    }

    /// True iff the queue has an item available for `get`.
    #[must_use]
    pub fn can_get(&self) -> bool {
        let state = self.state.lock().unwrap();
        !state.queue.is_empty()
    }

    /// Enqueues `value`, initializing its outstanding-consumer count to the
    /// number of consumers currently bound to this channel (at least one,
    /// so a channel used standalone — with no bound consumers at all — still
    /// behaves as a plain single-reader FIFO drained by one external
    /// `get`/drop pair; see `DESIGN.md`).
    ///
    /// # Panics
    ///
    /// Panics if `can_put()` was false (I1): this is a fatal invariant
    /// violation, not a recoverable error — the scheduling layer is
    /// responsible for only calling `put` when there is room.
    pub fn put(&self, value: T) {
        let mut state = self.state.lock().unwrap();
        assert!(
            state.queue.len() < self.capacity,
            "I1 violated: put() on a full channel {} (capacity {})",
            self.name,
            self.capacity
        );

        let outstanding = state.consumers.len().max(1);
        debug_assert_outstanding_in_range!(outstanding, outstanding);

        state.queue.push_back(Item {
            value: Arc::new(value),
            outstanding,
        });
        state.puts += 1;
        debug_assert_bounded_queue!(state.queue.len(), self.capacity);
        debug_assert_put_release_balance!(state.puts, state.releases);

        self.metrics.record_put();
    }

    /// Returns a read-only handle over the head item. Multiple consumers
    /// (and, for channels with no bound consumers, the external caller) may
    /// each call `get` once per item; the handle's `Drop` releases this
    /// consumer's share of the item.
    ///
    /// # Panics
    ///
    /// Panics if `can_get()` was false: getting from an empty channel is a
    /// fatal invariant violation, not a recoverable error.
    #[must_use]
    pub fn get(self: &Arc<Self>) -> ReadHandle<T> {
        let state = self.state.lock().unwrap();
        let head = state
            .queue
            .front()
            .expect("I1/I2 violated: get() on an empty channel");
        let value = Arc::clone(&head.value);
        drop(state);

        ReadHandle {
            value,
            channel: Arc::clone(self),
        }
    }

    /// Decrements the head item's outstanding count; removes it once it
    /// reaches zero. Called automatically when a [`ReadHandle`] is dropped.
    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        let outstanding_after = {
            let head = state
                .queue
                .front_mut()
                .expect("I3 violated: release() on an empty channel");
            head.outstanding = head
                .outstanding
                .checked_sub(1)
                .expect("I2 violated: release() past zero outstanding");
            head.outstanding
        };

        let popped = outstanding_after == 0;
        debug_assert_drained_on_zero!(outstanding_after, popped);
        if popped {
            state.queue.pop_front();
            state.releases += 1;
        }
        debug_assert_bounded_queue!(state.queue.len(), self.capacity);
        debug_assert_put_release_balance!(state.puts, state.releases);

        self.metrics.record_release();
    }

    /// Total values `put` into this channel over its lifetime.
    #[cfg(test)]
    pub(crate) fn total_puts(&self) -> u64 {
        self.state.lock().unwrap().puts
    }

    /// Total items fully released (all consumers observed) over this
    /// channel's lifetime.
    #[cfg(test)]
    pub(crate) fn total_releases(&self) -> u64 {
        self.state.lock().unwrap().releases
    }
}

/// A borrowed, read-only view of one value taken from a [`Channel`].
///
/// Dropping the handle releases this consumer's share of the underlying
/// item ("`get` lends a read-only handle whose destruction calls
/// `release`").
pub struct ReadHandle<T> {
    value: Arc<T>,
    channel: Arc<Channel<T>>,
}

impl<T> Deref for ReadHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> Drop for ReadHandle<T> {
    fn drop(&mut self) {
        self.channel.release();
    }
}
