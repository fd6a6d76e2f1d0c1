use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal::kamada_kawai::KamadaKawai;
use narwhal::graphlib::{Edge, Network, Node};
use std::hint::black_box;

/// Grid graphs stress the all-pairs distance matrix and the incremental gradient cache.
fn grid(side: usize) -> Network {
    let mut network = Network::new();
    for row in 0..side {
        for col in 0..side {
            let jitter = ((row * 31 + col * 17) % 13) as f64;
            network.add_node(Node::at(
                format!("n{row}_{col}"),
                col as f64 * 10.0 + jitter,
                row as f64 * 10.0 - jitter,
            ));
            network.node_mut(&format!("n{row}_{col}")).unwrap().predefined_position = false;
        }
    }
    for row in 0..side {
        for col in 0..side {
            if col + 1 < side {
                network.add_edge(Edge::new(
                    format!("h{row}_{col}"),
                    format!("n{row}_{col}"),
                    format!("n{row}_{}", col + 1),
                ));
            }
            if row + 1 < side {
                network.add_edge(Edge::new(
                    format!("v{row}_{col}"),
                    format!("n{row}_{col}"),
                    format!("n{}_{col}", row + 1),
                ));
            }
        }
    }
    network
}

fn bench_kamada_kawai(c: &mut Criterion) {
    let mut group = c.benchmark_group("kamada_kawai_grid");
    for &side in &[4usize, 8, 12] {
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &side, |b, &side| {
            b.iter(|| {
                let mut network = grid(side);
                KamadaKawai::default().solve(&mut network);
                black_box(network.node("n0_0").unwrap().x)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kamada_kawai);
criterion_main!(benches);
