use broadcast_ring::BroadcastRing;
use std::thread;
use std::time::Instant;

fn main() {
    println!("broadcast-ring Basic Example");
    println!("============================\n");

    const N_READERS: usize = 4;
    const ITEMS: u64 = 1_000_000;

    println!("Configuration:");
    println!("  Readers: {N_READERS}");
    println!("  Items published: {ITEMS}\n");

    let ring: BroadcastRing<u64, 4096> = BroadcastRing::with_metrics();
    let start = Instant::now();

    thread::scope(|scope| {
        let readers: Vec<_> = (0..N_READERS).map(|_| ring.make_reader()).collect();

        scope.spawn(|| {
            for i in 0..ITEMS {
                ring.enqueue(i);
            }
            println!("Producer finished");
        });

        for (id, mut reader) in readers.into_iter().enumerate() {
            scope.spawn(move || {
                let mut received = 0u64;
                while received < ITEMS {
                    if reader.read_next().is_some() {
                        received += 1;
                    } else {
                        thread::yield_now();
                    }
                }
                println!(
                    "Reader {id} finished: {received} items, {} overruns",
                    reader.metrics().overruns_detected
                );
            });
        }
    });

    let elapsed = start.elapsed();
    println!(
        "\nPublished {} items in {elapsed:?} ({:.1}M items/sec)",
        ring.metrics().items_published,
        ring.metrics().items_published as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );
}
