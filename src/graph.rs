use std::sync::Arc;

use crate::channel::Channel;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::GraphError;
use crate::ids::{ChannelId, NodeId};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::node::{Logic, Node};

/// Incrementally assembles a graph's channels and nodes, validating bindings
/// as they are added, then hands the finished topology to a [`Dispatcher`].
///
/// Channels and nodes are added in any order, then
/// `build` discovers the channels with no bound producer (sources) and no
/// bound consumers (sinks), wires the two synthetic nodes onto them, and
/// starts the worker pool.
pub struct GraphBuilder<T> {
    channels: Vec<Arc<Channel<T>>>,
    nodes: Vec<Node<T>>,
    metrics: Arc<Metrics>,
}

impl<T> Default for GraphBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GraphBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            nodes: Vec::new(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Adds a new channel of the given `capacity` (must be at least 1; the
    /// channel itself asserts this) and returns a handle to it for binding
    /// to nodes via [`add_node`](Self::add_node).
    pub fn add_channel(&mut self, name: impl Into<String>, capacity: usize) -> Arc<Channel<T>> {
        let id = ChannelId(self.channels.len());
        let channel = Channel::new(id, name, capacity, Arc::clone(&self.metrics));
        self.channels.push(Arc::clone(&channel));
        channel
    }

    /// Adds a compute node bound to `inputs` and `outputs`, with `execute`
    /// run each time the dispatcher determines the node is ready.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateProducer`] if one of `outputs` already
    /// has a producer, or [`GraphError::DuplicateConsumer`] if `inputs`
    /// contains a channel this node is already bound to.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        inputs: Vec<Arc<Channel<T>>>,
        outputs: Vec<Arc<Channel<T>>>,
        execute: impl Fn() + Send + Sync + 'static,
    ) -> Result<NodeId, GraphError> {
        let id = NodeId(self.nodes.len());
        for output in &outputs {
            output.bind_producer(id)?;
        }
        for input in &inputs {
            input.bind_consumer(id)?;
        }
        self.nodes.push(Node::new(id, name, inputs, outputs, Logic::User(Box::new(execute))));
        Ok(id)
    }

    /// Finalizes the topology and starts the worker pool.
    ///
    /// Channels with no bound producer become outputs of a synthetic source
    /// node; channels with no bound consumer become inputs of a synthetic
    /// sink node. Both are wired in before the
    /// dispatcher's worker threads start.
    #[must_use]
    pub fn build(mut self, config: Config) -> Graph<T>
    where
        T: Send + Sync + 'static,
    {
        let source_channels: Vec<_> = self.channels.iter().filter(|c| !c.has_producer()).cloned().collect();
        let sink_channels: Vec<_> = self
            .channels
            .iter()
            .filter(|c| c.consumer_count() == 0)
            .cloned()
            .collect();

        let source_id = NodeId(self.nodes.len());
        for channel in &source_channels {
            channel
                .bind_producer(source_id)
                .expect("freshly discovered source channel cannot already have a producer");
        }
        self.nodes
            .push(Node::new(source_id, "__source", Vec::new(), source_channels, Logic::Synthetic));

        let sink_id = NodeId(self.nodes.len());
        for channel in &sink_channels {
            channel
                .bind_consumer(sink_id)
                .expect("freshly discovered sink channel cannot already be bound to the sink");
        }
        self.nodes
            .push(Node::new(sink_id, "__sink", sink_channels, Vec::new(), Logic::Synthetic));

        self.metrics.set_enabled(config.enable_metrics);

        let nodes: Arc<Vec<Arc<Node<T>>>> = Arc::new(self.nodes.into_iter().map(Arc::new).collect());
        let dispatcher = Dispatcher::start(nodes, source_id, sink_id, config.thread_count, Arc::clone(&self.metrics));

        Graph {
            channels: self.channels,
            dispatcher,
            metrics: self.metrics,
        }
    }
}

/// A built, running dataflow graph: a fixed set of channels and nodes, plus
/// the worker pool that drives them.
///
/// Dropping a `Graph` tears down its worker pool (idempotently, same as
/// calling [`shutdown`](Self::shutdown) explicitly).
pub struct Graph<T> {
    channels: Vec<Arc<Channel<T>>>,
    dispatcher: Arc<Dispatcher<T>>,
    metrics: Arc<Metrics>,
}

impl<T: Send + Sync + 'static> Graph<T> {
    /// Runs `k` pipelined executions of the graph, blocking until every one
    /// has reached the synthetic sink.
    ///
    /// Precondition: every source channel already holds `k`
    /// values staged by the caller — staging them is what requires those
    /// channels to have capacity at least `k` (their own `put` would have
    /// already panicked on I1 otherwise). Interior and sink channels face
    /// no such requirement: an interior channel with capacity below `k`
    /// simply back-pressures, serializing the nodes on
    /// that edge across runs, rather than deadlocking.
    pub fn execute(&self, k: usize) {
        self.dispatcher.execute(k);
    }

    /// A point-in-time snapshot of this graph's counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Looks up one of this graph's channels by id, e.g. to stage inputs
    /// before calling [`execute`](Self::execute) or to read outputs after.
    #[must_use]
    pub fn channel(&self, id: ChannelId) -> &Arc<Channel<T>> {
        &self.channels[id.0]
    }

    /// Stops the worker pool and joins every worker thread. Idempotent
    /// Idempotent: calling it again, or dropping the graph
    /// afterward, is a no-op.
    pub fn shutdown(&self) {
        self.dispatcher.shutdown();
    }
}

impl<T> Drop for Graph<T> {
    fn drop(&mut self) {
        self.dispatcher.shutdown();
    }
}
