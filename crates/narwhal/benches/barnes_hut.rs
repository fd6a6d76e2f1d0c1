use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal::graphlib::{Edge, Network, Node};
use narwhal::options::{PhysicsOptions, Solver};
use narwhal::physics::PhysicsEngine;
use std::hint::black_box;
use std::time::Duration;

/// Deterministic scale-free-ish graph: a spine for connectivity plus chords every
/// `fanout` nodes, pre-positioned so no layout pass is needed.
fn build_network(node_count: usize, fanout: usize) -> Network {
    let mut network = Network::new();
    for i in 0..node_count {
        let angle = i as f64 * 0.37;
        let radius = 30.0 + (i % 17) as f64 * 11.0;
        network.add_node(Node::at(
            format!("n{i}"),
            radius * angle.cos(),
            radius * angle.sin(),
        ));
    }
    for i in 0..node_count.saturating_sub(1) {
        network.add_edge(Edge::new(format!("s{i}"), format!("n{i}"), format!("n{}", i + 1)));
    }
    for i in (0..node_count).step_by(fanout.max(2)) {
        let target = (i * 7 + 3) % node_count;
        if target != i {
            network.add_edge(Edge::new(
                format!("c{i}"),
                format!("n{i}"),
                format!("n{target}"),
            ));
        }
    }
    network
}

fn bench_barnes_hut_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("barnes_hut_steps");
    group.measurement_time(Duration::from_secs(10));

    for &node_count in &[100usize, 500, 2000] {
        let network = build_network(node_count, 5);
        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            &network,
            |b, network| {
                b.iter(|| {
                    let mut engine =
                        PhysicsEngine::new(PhysicsOptions::for_solver(Solver::BarnesHut));
                    engine.init_from(network);
                    for _ in 0..25 {
                        black_box(engine.step());
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_barnes_hut_steps);
criterion_main!(benches);
