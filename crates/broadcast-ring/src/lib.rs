//! broadcast-ring - a single-producer, multi-consumer seqlock broadcast ring.
//!
//! One producer publishes values into a fixed-capacity array of seqlock-
//! protected slots; any number of readers independently replay the full
//! published stream. There is no backpressure: a reader that falls behind
//! by more than the ring's capacity silently skips the items it missed
//! (or, via [`Reader::try_read_next`], finds out that it happened).
//!
//! # Key properties
//!
//! - Wait-free publish: `enqueue` never blocks, retries, or allocates.
//! - Lock-free read: `read_next`/`try_read_next` retry only while racing a
//!   publish in flight, and that window is bounded.
//! - No reader-reader or reader-writer coordination: readers never block
//!   the producer, and never block each other.
//! - Two interchangeable payload storage policies ([`ByteAtomicCell`],
//!   [`TearableCell`]) and two slot layouts ([`Slot`], [`CacheLineSlot`]),
//!   selected at the type level.
//!
//! # Example
//!
//! ```
//! use broadcast_ring::BroadcastRing;
//!
//! let ring = BroadcastRing::<u64, 8>::new();
//! let mut reader = ring.make_reader();
//!
//! std::thread::scope(|scope| {
//!     scope.spawn(|| {
//!         for i in 0..8u64 {
//!             ring.enqueue(i);
//!         }
//!     });
//! });
//!
//! let mut sum = 0;
//! while let Some(item) = reader.read_next() {
//!     sum += item;
//! }
//! assert_eq!(sum, (0..8u64).sum::<u64>());
//! ```

mod cell;
mod error;
mod invariants;
mod metrics;
mod ring;
mod slot;

pub use cell::{ByteAtomicCell, PayloadCell, TearableCell};
pub use error::RingConfigError;
pub use metrics::{ReaderMetrics, RingMetrics, RingMetricsSnapshot};
pub use ring::{BroadcastRing, Delivery, IsolatedRing, Reader};
pub use slot::{CacheLineSlot, RingSlot, Slot};
