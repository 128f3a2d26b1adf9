//! graph-executor — a dataflow graph runtime.
//!
//! A graph is a DAG of compute nodes connected by typed, capacity-bounded
//! channels. A fixed-size worker pool executes ready nodes, discovered
//! purely from the state of each node's adjacent channels, and the same
//! graph can be driven through several pipelined executions at once —
//! node `i+1` of one run may start before node `i-1` of the previous run has
//! finished, as long as channel capacity allows it.
//!
//! # Example
//!
//! ```
//! use graph_executor::{GraphBuilder, SINGLE_WORKER_CONFIG};
//!
//! let mut builder = GraphBuilder::<u64>::new();
//! let input = builder.add_channel("input", 1);
//! let doubled = builder.add_channel("doubled", 1);
//!
//! let (node_in, node_out) = (input.clone(), doubled.clone());
//! builder
//!     .add_node("double", vec![node_in.clone()], vec![node_out.clone()], move || {
//!         let value = *node_in.get();
//!         node_out.put(value * 2);
//!     })
//!     .unwrap();
//!
//! input.put(21);
//! let graph = builder.build(SINGLE_WORKER_CONFIG);
//! graph.execute(1);
//! assert_eq!(*doubled.get(), 42);
//! ```

mod channel;
mod config;
mod dispatcher;
mod error;
mod graph;
mod ids;
mod invariants;
mod metrics;
mod node;

pub use channel::{Channel, ReadHandle};
pub use config::{Config, PIPELINED_CONFIG, SINGLE_WORKER_CONFIG};
pub use error::GraphError;
pub use graph::{Graph, GraphBuilder};
pub use ids::{ChannelId, NodeId};
pub use metrics::MetricsSnapshot;
pub use node::{Execute, Node};
