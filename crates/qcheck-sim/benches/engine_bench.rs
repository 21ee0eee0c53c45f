//! Benchmarks for the simulation engines
//!
//! Run with: cargo bench -p qcheck-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcheck_ir::{Circuit, QubitId, QubitRegister};
use qcheck_sim::{DenseEngine, Observation, PauliSimulator, QubitOrder, RegisterScan};

/// Layer of H then a CX ladder, repeated `layers` times.
fn entangling_circuit(n: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::new(n).unwrap();
    for _ in 0..layers {
        for q in 0..n {
            circuit.h(QubitId(q)).unwrap();
        }
        for q in 0..n.saturating_sub(1) {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

/// CX ladder followed by Y and Z on every qubit.
fn pauli_circuit(n: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::new(n).unwrap();
    circuit.x(QubitId(0)).unwrap();
    for _ in 0..layers {
        for q in 0..n - 1 {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
        for q in 0..n {
            circuit.y(QubitId(q)).unwrap().z(QubitId(q)).unwrap();
        }
    }
    circuit
}

/// Benchmark full operator construction as width grows
fn bench_dense_operator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_operator");
    let engine = DenseEngine::new(QubitOrder::Forward);

    for n in [2_u32, 4, 6, 8] {
        let circuit = entangling_circuit(n, 2);
        group.bench_with_input(BenchmarkId::new("build_operator", n), &circuit, |b, c| {
            b.iter(|| engine.build_operator(black_box(c)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark state-vector application
fn bench_dense_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_apply");
    let engine = DenseEngine::new(QubitOrder::Reversed);

    for n in [4_u32, 6, 8] {
        let circuit = entangling_circuit(n, 2);
        group.bench_with_input(BenchmarkId::new("apply", n), &circuit, |b, c| {
            b.iter(|| engine.apply(black_box(c), None).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the fast engine far past dense widths
fn bench_pauli_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("pauli_run");

    for n in [16_u32, 128, 1024] {
        let circuit = pauli_circuit(n, 4);
        group.bench_with_input(BenchmarkId::new("run_all", n), &circuit, |b, c| {
            b.iter(|| {
                let mut sim = PauliSimulator::new(black_box(c)).unwrap();
                sim.run_all().unwrap();
                sim.into_state()
            });
        });
    }

    group.finish();
}

/// Benchmark a unary-iteration scan as the selection register widens
fn bench_register_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_scan");

    for width in [2_u32, 4, 6] {
        let branches = 1u32 << width;
        let mut circuit = Circuit::new(width + branches).unwrap();
        for branch in 0..branches {
            let values: Vec<u8> = (0..width)
                .map(|j| ((branch >> (width - 1 - j)) & 1) as u8)
                .collect();
            circuit
                .mcx((0..width).map(QubitId), values, QubitId(width + branch))
                .unwrap();
        }
        let targets = QubitRegister::range("targets", width, branches);
        let scan = RegisterScan::new(QubitRegister::range("selection", 0, width))
            .with_target(targets.clone())
            .observe(Observation::TargetFiring(targets.clone()))
            .observe(Observation::FinalValues(targets));

        group.bench_with_input(BenchmarkId::new("unary", width), &circuit, |b, c| {
            b.iter(|| scan.run(black_box(c)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_dense_operator,
    bench_dense_apply,
    bench_pauli_run,
    bench_register_scan,
);
criterion_main!(benches);
