use std::sync::Arc;

use crate::channel::Channel;
use crate::ids::NodeId;

/// The user-supplied compute step of a node, opaque to the core.
///
/// The closure is expected to `get` each of its captured input channels
/// exactly once and `put` into each of its captured output channels exactly
/// once per call. The core never inspects what the
/// closure does beyond that contract.
pub type Execute = dyn Fn() + Send + Sync;

pub(crate) enum Logic {
    /// The synthetic source/sink nodes: a no-op, present only to give the
    /// dispatcher uniform start/completion signals.
    Synthetic,
    User(Box<Execute>),
}

/// A compute step bound to a fixed set of input and output channels.
///
/// Readiness (see [`is_ready`](Node::is_ready)) is a pure function of the
/// adjacent channels' state; the node itself carries no scheduling state,
/// constructed once and never mutated afterward.
pub struct Node<T> {
    id: NodeId,
    name: String,
    inputs: Vec<Arc<Channel<T>>>,
    outputs: Vec<Arc<Channel<T>>>,
    logic: Logic,
}

impl<T> Node<T> {
    pub(crate) fn new(
        id: NodeId,
        name: impl Into<String>,
        inputs: Vec<Arc<Channel<T>>>,
        outputs: Vec<Arc<Channel<T>>>,
        logic: Logic,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            inputs,
            outputs,
            logic,
        }
    }

    /// This node's stable identifier within its graph.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's diagnostic name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This node's input channels, in bind order.
    #[must_use]
    pub fn inputs(&self) -> &[Arc<Channel<T>>] {
        &self.inputs
    }

    /// This node's output channels, in bind order.
    #[must_use]
    pub fn outputs(&self) -> &[Arc<Channel<T>>] {
        &self.outputs
    }

    /// True iff every output channel has room (`can_put`) and every input
    /// channel has data (`can_get`).
    ///
    /// This single predicate captures both flow-forward (inputs available)
    /// and back-pressure (previous outputs not yet drained) — the dispatcher
    /// never needs any graph-wide analysis to decide what runs next, only
    /// this node's immediately adjacent channels.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.outputs.iter().all(|c| c.can_put()) && self.inputs.iter().all(|c| c.can_get())
    }

    /// Runs this node's `execute`. A no-op for the synthetic source/sink.
    pub(crate) fn execute(&self) {
        if let Logic::User(f) = &self.logic {
            f();
        }
    }

    pub(crate) fn is_synthetic(&self) -> bool {
        matches!(self.logic, Logic::Synthetic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ChannelId;
    use crate::metrics::Metrics;
    use std::sync::Arc;

    fn channel(capacity: usize) -> Arc<Channel<u64>> {
        Channel::new(ChannelId(0), "c", capacity, Arc::new(Metrics::new()))
    }

    #[test]
    fn ready_requires_inputs_and_output_room() {
        let input = channel(1);
        let output = channel(1);
        let node = Node::new(
            NodeId(0),
            "n",
            vec![Arc::clone(&input)],
            vec![Arc::clone(&output)],
            Logic::Synthetic,
        );

        assert!(!node.is_ready(), "no input available yet");
        input.put(1);
        assert!(node.is_ready());

        output.put(2);
        assert!(!node.is_ready(), "output has no room");
    }

    #[test]
    fn source_node_readiness_reduces_to_output_room() {
        let output = channel(1);
        let source = Node::new(NodeId(0), "source", vec![], vec![Arc::clone(&output)], Logic::Synthetic);
        assert!(source.is_ready());
        output.put(1);
        assert!(!source.is_ready());
    }

    #[test]
    fn sink_node_readiness_reduces_to_input_data() {
        let input = channel(1);
        let sink = Node::new(NodeId(0), "sink", vec![Arc::clone(&input)], vec![], Logic::Synthetic);
        assert!(!sink.is_ready());
        input.put(1);
        assert!(sink.is_ready());
    }
}
