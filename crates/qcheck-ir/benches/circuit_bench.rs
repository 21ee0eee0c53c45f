//! Benchmarks for qcheck circuit construction
//!
//! Run with: cargo bench -p qcheck-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcheck_ir::{Circuit, GateName, GateRecord, QubitId};

/// Benchmark validated insertion of uncontrolled gates
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("x_gate", |b| {
        let mut circuit = Circuit::new(10).unwrap();
        b.iter(|| {
            circuit.x(black_box(QubitId(0))).unwrap();
        });
    });

    group.bench_function("rx_gate", |b| {
        let mut circuit = Circuit::new(10).unwrap();
        b.iter(|| {
            circuit.rx(black_box(0.25), black_box(QubitId(3))).unwrap();
        });
    });

    group.finish();
}

/// Benchmark insertion cost as the control count grows
fn bench_multi_control(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_control");

    for num_controls in &[1u32, 4, 16, 63] {
        group.bench_with_input(
            BenchmarkId::new("mcx", num_controls),
            num_controls,
            |b, &n| {
                let record = GateRecord::new(GateName::X, [QubitId(n)])
                    .with_controls((0..n).map(QubitId), (0..n).map(|i| (i % 2) as u8));
                b.iter(|| {
                    let mut circuit = Circuit::new(n + 1).unwrap();
                    circuit.add_gate(black_box(record.clone())).unwrap();
                    circuit
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_gate_addition, bench_multi_control);
criterion_main!(benches);
