use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graph_executor::{Config, GraphBuilder};

/// Builds a ten-node Fibonacci-style chain over
/// single-slot channels, ready for a single `execute(1)` call.
type FibChain = (graph_executor::Graph<u64>, graph_executor::ChannelId, graph_executor::ChannelId, graph_executor::ChannelId);

fn fibonacci_chain(threads: usize) -> FibChain {
    let mut builder = GraphBuilder::<u64>::new();
    let channels: Vec<_> = (0..12).map(|i| builder.add_channel(format!("c{i}"), 1)).collect();

    for i in 0..10 {
        let (a, b, out) = (channels[i].clone(), channels[i + 1].clone(), channels[i + 2].clone());
        builder
            .add_node(format!("n{i}"), vec![a.clone(), b.clone()], vec![out.clone()], move || {
                let x = *a.get();
                let y = *b.get();
                out.put(x + y);
            })
            .unwrap();
    }

    let first = channels[0].id();
    let second = channels[1].id();
    let last = channels[11].id();
    (builder.build(Config::new(threads, 1, false)), first, second, last)
}

/// Builds a single-node identity pipeline with buffered channels, suited
/// for measuring pipelined `execute(K)` throughput.
fn identity_pipeline(capacity: usize, threads: usize) -> (graph_executor::Graph<u64>, graph_executor::ChannelId, graph_executor::ChannelId) {
    let mut builder = GraphBuilder::<u64>::new();
    let input = builder.add_channel("input", capacity);
    let output = builder.add_channel("output", capacity);
    let (first, last) = (input.id(), output.id());
    {
        let (i, o) = (input.clone(), output.clone());
        builder
            .add_node("identity", vec![i.clone()], vec![o.clone()], move || {
                let v = *i.get();
                o.put(v);
            })
            .unwrap();
    }
    (builder.build(Config::new(threads, capacity, false)), first, last)
}

fn bench_fibonacci_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("fibonacci_chain");
    group.throughput(Throughput::Elements(1));

    for threads in [1, 2, 4].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{threads}_threads")), threads, |b, &threads| {
            b.iter(|| {
                let (graph, first, second, last) = fibonacci_chain(threads);
                graph.channel(first).put(1);
                graph.channel(second).put(1);
                graph.execute(1);
                black_box(*graph.channel(last).get());
            });
        });
    }

    group.finish();
}

fn bench_pipelined_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipelined_execute");

    for &k in &[1usize, 8, 64, 512] {
        group.throughput(Throughput::Elements(k as u64));
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| {
                let (graph, input_id, output_id) = identity_pipeline(k.max(1), 4);
                let input = graph.channel(input_id);
                for i in 0..k {
                    input.put(i as u64);
                }
                graph.execute(k);

                let output = graph.channel(output_id);
                for _ in 0..k {
                    black_box(*output.get());
                }
            });
        });
    }

    group.finish();
}

fn bench_worker_count_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_count_scaling");
    const K: usize = 256;
    group.throughput(Throughput::Elements(K as u64));

    for &threads in &[1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let (graph, input_id, output_id) = identity_pipeline(K, threads);
                let input = graph.channel(input_id);
                for i in 0..K {
                    input.put(i as u64);
                }
                graph.execute(K);

                let output = graph.channel(output_id);
                for _ in 0..K {
                    black_box(*output.get());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fibonacci_single_run, bench_pipelined_execute, bench_worker_count_scaling);
criterion_main!(benches);
