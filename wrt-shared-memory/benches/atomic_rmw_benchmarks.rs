use std::{hint::black_box, thread};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wrt_shared_memory::{AccessWidth, Memory, MemoryConfig, RmwOp, PAGE_SIZE};

fn shared_memory(initial: u32, maximum: u32) -> Memory {
    Memory::new(MemoryConfig::shared(initial, maximum).unwrap()).unwrap()
}

fn benchmark_single_agent_rmw(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_agent_rmw");
    let memory = shared_memory(1, 1);

    for width in AccessWidth::ALL {
        for op in [RmwOp::Add, RmwOp::Xor] {
            let id = BenchmarkId::new(op.name(), width.bits());
            group.bench_with_input(id, &width, |b, &width| {
                b.iter(|| memory.atomic_rmw(op, width, black_box(64), black_box(3)).unwrap());
            });
        }
    }

    group.finish();
}

fn benchmark_contended_add(c: &mut Criterion) {
    const OPS_PER_AGENT: u32 = 10_000;

    let mut group = c.benchmark_group("contended_add32");
    for agents in [2u32, 4] {
        group.throughput(Throughput::Elements(u64::from(agents * OPS_PER_AGENT)));
        group.bench_with_input(BenchmarkId::from_parameter(agents), &agents, |b, &agents| {
            let memory = shared_memory(1, 1);
            b.iter(|| {
                let handles: Vec<_> = (0..agents)
                    .map(|_| {
                        let agent = memory.share().unwrap();
                        thread::spawn(move || {
                            for _ in 0..OPS_PER_AGENT {
                                agent.atomic_add32(0, 1).unwrap();
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }
    group.finish();
}

fn benchmark_grow(c: &mut Criterion) {
    let mut group = c.benchmark_group("grow");
    for delta in [1u32, 16] {
        group.throughput(Throughput::Bytes(u64::from(delta) * PAGE_SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(delta), &delta, |b, &delta| {
            b.iter(|| {
                let memory = shared_memory(0, 16);
                black_box(memory.grow_memory(delta))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_single_agent_rmw, benchmark_contended_add, benchmark_grow);
criterion_main!(benches);
