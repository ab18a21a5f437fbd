use broadcast_ring::BroadcastRing;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::thread;

const MSGS: u64 = 2_000_000;

fn bench_single_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_reader");
    group.throughput(Throughput::Elements(MSGS));

    group.bench_function("publish_and_drain", |b| {
        b.iter(|| {
            let ring: BroadcastRing<u64, 1024> = BroadcastRing::new();
            thread::scope(|scope| {
                scope.spawn(|| {
                    for i in 0..MSGS {
                        ring.enqueue(i);
                    }
                });

                let mut reader = ring.make_reader();
                let mut received = 0u64;
                while received < MSGS {
                    if let Some(item) = reader.read_next() {
                        black_box(item);
                        received += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });
        });
    });

    group.finish();
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout");

    for num_readers in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements(MSGS * num_readers as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{num_readers}_readers")),
            &num_readers,
            |b, &num_readers| {
                b.iter(|| {
                    let ring: BroadcastRing<u64, 4096> = BroadcastRing::new();
                    thread::scope(|scope| {
                        let readers: Vec<_> = (0..num_readers).map(|_| ring.make_reader()).collect();

                        scope.spawn(|| {
                            for i in 0..MSGS {
                                ring.enqueue(i);
                            }
                        });

                        for mut reader in readers {
                            scope.spawn(move || {
                                let mut received = 0u64;
                                while received < MSGS {
                                    if let Some(item) = reader.read_next() {
                                        black_box(item);
                                        received += 1;
                                    } else {
                                        std::hint::spin_loop();
                                    }
                                }
                            });
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

fn bench_capacity_vs_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_size");
    let msgs = 500_000u64;
    group.throughput(Throughput::Elements(msgs));

    group.bench_function("u64_payload", |b| {
        b.iter(|| {
            let ring: BroadcastRing<u64, 1024> = BroadcastRing::new();
            thread::scope(|scope| {
                scope.spawn(|| {
                    for i in 0..msgs {
                        ring.enqueue(i);
                    }
                });
                let mut reader = ring.make_reader();
                let mut received = 0u64;
                while received < msgs {
                    if let Some(item) = reader.read_next() {
                        black_box(item);
                        received += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });
        });
    });

    group.bench_function("64_byte_payload", |b| {
        b.iter(|| {
            let ring: BroadcastRing<[u64; 8], 1024> = BroadcastRing::new();
            thread::scope(|scope| {
                scope.spawn(|| {
                    for i in 0..msgs {
                        ring.enqueue([i; 8]);
                    }
                });
                let mut reader = ring.make_reader();
                let mut received = 0u64;
                while received < msgs {
                    if let Some(item) = reader.read_next() {
                        black_box(item);
                        received += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_single_reader, bench_fanout, bench_capacity_vs_payload);
criterion_main!(benches);
