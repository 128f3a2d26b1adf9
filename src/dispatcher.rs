use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::ids::NodeId;
use crate::invariants::debug_assert_ready_before_enqueue;
use crate::metrics::Metrics;
use crate::node::Node;

struct DispatcherState {
    queue: VecDeque<NodeId>,
    active: bool,
    in_flight: usize,
    /// True iff a node currently has an instance sitting in `queue` or being
    /// executed by a worker. Bounds every non-source node to at most one
    /// outstanding instance at a time ("no other worker can re-enqueue
    /// the same node"); see `DESIGN.md` for why this bookkeeping
    /// is required once pipelined runs let independent producers race ahead
    /// of a shared multi-input consumer. Indexed by `NodeId`; unused for the
    /// synthetic source, which the submit path enqueues directly.
    queued: Vec<bool>,
}

/// Coordinates the worker pool: a single shared FIFO ready-queue, a wake
/// protocol built on two condition variables, and graceful teardown.
///
/// Channel mutexes and the dispatcher mutex are never held simultaneously:
/// `is_ready()` only ever takes channel mutexes, one at a time, and the
/// dispatcher mutex here only ever guards `queue`, `active`, `in_flight`,
/// and `queued`.
pub(crate) struct Dispatcher<T> {
    nodes: Arc<Vec<Arc<Node<T>>>>,
    source: NodeId,
    sink: NodeId,
    state: Mutex<DispatcherState>,
    worker_cv: Condvar,
    client_cv: Condvar,
    workers: Mutex<Option<Vec<JoinHandle<()>>>>,
    metrics: Arc<Metrics>,
}

impl<T: Send + Sync + 'static> Dispatcher<T> {
    pub(crate) fn start(
        nodes: Arc<Vec<Arc<Node<T>>>>,
        source: NodeId,
        sink: NodeId,
        thread_count: usize,
        metrics: Arc<Metrics>,
    ) -> Arc<Self> {
        let node_count = nodes.len();
        let dispatcher = Arc::new(Self {
            nodes,
            source,
            sink,
            state: Mutex::new(DispatcherState {
                queue: VecDeque::new(),
                active: true,
                in_flight: 0,
                queued: vec![false; node_count],
            }),
            worker_cv: Condvar::new(),
            client_cv: Condvar::new(),
            workers: Mutex::new(Some(Vec::with_capacity(thread_count))),
            metrics,
        });

        let mut handles = Vec::with_capacity(thread_count);
        for _ in 0..thread_count {
            let d = Arc::clone(&dispatcher);
            handles.push(thread::spawn(move || d.worker_loop()));
        }
        *dispatcher.workers.lock().unwrap() = Some(handles);

        dispatcher
    }

    /// Runs `k` pipelined executions of the graph, blocking until all have
    /// reached the synthetic sink.
    pub(crate) fn execute(&self, k: usize) {
        {
            let mut state = self.state.lock().unwrap();
            for _ in 0..k {
                state.queue.push_back(self.source);
            }
            state.in_flight += k;
        }
        self.worker_cv.notify_all();

        let mut state = self.state.lock().unwrap();
        while state.in_flight > 0 {
            state = self.client_cv.wait(state).unwrap();
        }
    }

    /// Attempts to enqueue `id` if it is ready and not already pending or
    /// running. Caller must hold `state`'s lock.
    fn try_enqueue(&self, state: &mut DispatcherState, id: NodeId) {
        if state.queued[id.0] {
            return;
        }
        let ready = self.nodes[id.0].is_ready();
        if ready {
            debug_assert_ready_before_enqueue!(ready);
            state.queued[id.0] = true;
            state.queue.push_back(id);
            self.metrics.record_ready_push();
        }
    }

    fn worker_loop(&self) {
        loop {
            let id = {
                let mut state = self.state.lock().unwrap();
                while state.queue.is_empty() && state.active {
                    state = self.worker_cv.wait(state).unwrap();
                }
                if !state.active {
                    return;
                }
                state.queue.pop_front().unwrap()
            };

            if id == self.sink {
                let complete;
                {
                    let mut state = self.state.lock().unwrap();
                    state.in_flight -= 1;
                    complete = state.in_flight == 0;
                    self.metrics.record_run_completed();

                    state.queued[id.0] = false;
                }
                if complete {
                    self.client_cv.notify_all();
                }
                self.worker_cv.notify_all();
                continue;
            }

            let node = &self.nodes[id.0];
            node.execute();
            if !node.is_synthetic() {
                self.metrics.record_node_executed();
            }

            let mut consumers = Vec::new();
            for output in node.outputs() {
                for consumer in output.consumer_ids() {
                    if !consumers.contains(&consumer) {
                        consumers.push(consumer);
                    }
                }
            }

            {
                let mut state = self.state.lock().unwrap();
                state.queued[id.0] = false;
                if !node.is_synthetic() {
                    // Re-check the node we just ran: pipelined runs may have
                    // left more data already buffered on its inputs. The
                    // synthetic source has no inputs, so this check is
                    // vacuously true the moment any output has room and
                    // would otherwise spin the source forever.
                    self.try_enqueue(&mut state, id);
                }
                for consumer in consumers {
                    self.try_enqueue(&mut state, consumer);
                }
            }
            self.worker_cv.notify_all();
        }
    }

    /// Idempotent teardown: flips `active` false, wakes every worker, and
    /// joins them. A second call after the first is a no-op (P5).
    pub(crate) fn shutdown(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.active = false;
        }
        self.worker_cv.notify_all();

        let handles = self.workers.lock().unwrap().take();
        if let Some(handles) = handles {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}
