use thiserror::Error;

/// Errors reported synchronously from graph construction.
///
/// Runtime invariant violations (over-`put`, under-`release`, executing a
/// node that isn't ready) are not represented here: they are fatal bugs in
/// the scheduler or user code and are reported by panicking (`debug_assert!`
/// in debug builds, or an explicit `panic!` on the release-mode fast path
/// where the precondition is cheap to check).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The named channel already has a producer bound to it.
    #[error("channel {channel:?} already has a producer")]
    DuplicateProducer {
        /// Identifier of the channel that already has a producer.
        channel: crate::ChannelId,
    },
    /// The named channel already lists this node as a consumer.
    #[error("node {node:?} is already a consumer of channel {channel:?}")]
    DuplicateConsumer {
        /// Identifier of the channel with the duplicate consumer binding.
        channel: crate::ChannelId,
        /// Identifier of the node that was already bound as a consumer.
        node: crate::NodeId,
    },
}
