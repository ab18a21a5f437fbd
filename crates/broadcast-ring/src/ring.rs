use crate::cell::{ByteAtomicCell, PayloadCell};
use crate::error::RingConfigError;
use crate::metrics::{ReaderMetrics, RingMetrics, RingMetricsSnapshot};
use crate::slot::{RingSlot, Slot};
use std::cell::UnsafeCell;
use std::marker::PhantomData;

// =============================================================================
// BroadcastRing
// =============================================================================

/// A fixed-capacity array of [`crate::Slot`]s, indexed modulo capacity by a
/// monotonically increasing global sequence number.
///
/// `enqueue` is producer-only and wait-free. `make_reader` hands out
/// [`Reader`] handles that each track an independent cursor and observe the
/// full published stream (or detect that they have fallen behind, see
/// [`Reader::try_read_next`]).
///
/// # Type parameters
/// - `T`: payload type. Must be `Copy + Default` (trivially copyable and
///   default-constructible).
/// - `N`: compile-time slot count. Must be a power of two.
/// - `C`: payload storage policy, [`crate::ByteAtomicCell`] (default) or
///   [`crate::TearableCell`].
/// - `S`: slot wrapper, [`crate::Slot`] (default, unpadded) or
///   [`crate::CacheLineSlot`] (64-byte cache-line isolated).
pub struct BroadcastRing<
    T: Copy,
    const N: usize,
    C: PayloadCell<T> = ByteAtomicCell<T>,
    S: RingSlot<T, C> = Slot<T, C>,
> {
    slots: Box<[S]>,
    /// Producer-only cursor. Not atomic: written only by the producer, and
    /// consumers never read it directly, they infer progress from the
    /// slots' own version counters instead.
    write_index: UnsafeCell<u64>,
    metrics: Option<RingMetrics>,
    _marker: PhantomData<(T, C)>,
}

// SAFETY: `write_index` is written only from the single producer thread by
// contract; slots are read/written under the seqlock protocol implemented
// by `Slot`.
unsafe impl<T: Copy + Send, const N: usize, C: PayloadCell<T> + Send, S: RingSlot<T, C> + Send> Send
    for BroadcastRing<T, N, C, S>
{
}
unsafe impl<T: Copy + Send, const N: usize, C: PayloadCell<T> + Sync, S: RingSlot<T, C> + Sync> Sync
    for BroadcastRing<T, N, C, S>
{
}

/// Compile-time-shaped assertion that `N` is a power of two.
const fn assert_power_of_two(n: usize) {
    assert!(n > 0, "BroadcastRing capacity must be > 0");
    assert!(n.is_power_of_two(), "BroadcastRing capacity must be a power of 2");
}

impl<T: Copy + Default, const N: usize, C: PayloadCell<T>, S: RingSlot<T, C>>
    BroadcastRing<T, N, C, S>
{
    /// Creates a new ring with metrics disabled.
    ///
    /// # Panics
    /// Panics if `N` is not a power of two.
    pub fn new() -> Self {
        assert_power_of_two(N);
        Self::build(None)
    }

    /// Creates a new ring with [`RingMetrics`] enabled.
    ///
    /// # Panics
    /// Panics if `N` is not a power of two.
    pub fn with_metrics() -> Self {
        assert_power_of_two(N);
        Self::build(Some(RingMetrics::new()))
    }

    /// Non-panicking alternative to [`BroadcastRing::new`].
    ///
    /// # Errors
    /// Returns [`RingConfigError::CapacityNotPowerOfTwo`] if `N` is not a
    /// power of two.
    pub fn try_new() -> Result<Self, RingConfigError> {
        if !N.is_power_of_two() || N == 0 {
            return Err(RingConfigError::CapacityNotPowerOfTwo { capacity: N });
        }
        Ok(Self::build(None))
    }

    fn build(metrics: Option<RingMetrics>) -> Self {
        let slots = (0..N).map(|_| S::default()).collect::<Vec<_>>().into_boxed_slice();
        Self {
            slots,
            write_index: UnsafeCell::new(0),
            metrics,
            _marker: PhantomData,
        }
    }

    /// Returns the ring's slot count.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    const fn mask() -> usize {
        N - 1
    }

    /// Publishes `value` into the next slot, wait-free.
    ///
    /// Producer-only. Calling this concurrently from more than one thread is
    /// undefined behavior at the data-structure level: it corrupts the
    /// version counter of whichever slot both callers race on.
    #[inline]
    pub fn enqueue(&self, value: T) {
        // SAFETY: `write_index` has exactly one writer by contract (the
        // single producer thread).
        let write_index = unsafe { *self.write_index.get() };
        let idx = (write_index as usize) & Self::mask();
        self.slots[idx].slot().publish(value);
        // SAFETY: same single-writer contract as the read above.
        unsafe {
            *self.write_index.get() = write_index.wrapping_add(1);
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_publish();
        }
    }

    /// Returns a fresh [`Reader`] starting at position 0, with metrics
    /// tracking matching whether this ring was built `with_metrics`.
    pub fn make_reader(&self) -> Reader<'_, T, N, C, S> {
        Reader {
            ring: self,
            read_index: 0,
            last_version: 0,
            metrics: self.metrics.as_ref().map(|_| ReaderMetrics::default()),
        }
    }

    /// Returns a snapshot of this ring's publish counters, or the all-zero
    /// snapshot if metrics were not enabled at construction.
    pub fn metrics(&self) -> RingMetricsSnapshot {
        self.metrics.as_ref().map(RingMetrics::snapshot).unwrap_or_default()
    }
}

impl<T: Copy + Default, const N: usize, C: PayloadCell<T>, S: RingSlot<T, C>> Default
    for BroadcastRing<T, N, C, S>
{
    fn default() -> Self {
        Self::new()
    }
}

/// `IsolatedRing<T, N>` is a [`BroadcastRing`] whose slots are padded to a
/// 64-byte cache line, eliminating false sharing between adjacent ring
/// positions.
pub type IsolatedRing<T, const N: usize, C = ByteAtomicCell<T>> =
    BroadcastRing<T, N, C, crate::slot::CacheLineSlot<T, C>>;

// =============================================================================
// Reader
// =============================================================================

/// A consumer cursor over a [`BroadcastRing`].
///
/// Each `Reader` independently observes the full published stream. There
/// is no coordination between readers, and a slow reader does not block the
/// producer or any other reader. Readers logically borrow the ring; the
/// `'ring` lifetime ties a `Reader` to the ring it was created from, so the
/// ring cannot be dropped while any reader outlives it.
pub struct Reader<'ring, T: Copy, const N: usize, C: PayloadCell<T> = ByteAtomicCell<T>, S: RingSlot<T, C> = Slot<T, C>> {
    ring: &'ring BroadcastRing<T, N, C, S>,
    read_index: u64,
    last_version: i64,
    metrics: Option<ReaderMetrics>,
}

/// The outcome of [`Reader::try_read_next`]: either there is nothing new yet
/// ([`Delivery::Empty`]), the next item in sequence ([`Delivery::Item`]), or
/// an item that arrived after this reader fell behind and lost some items
/// ([`Delivery::Overrun`]).
///
/// Overrun detection is opt-in: it costs one extra comparison per read, so
/// [`Reader::read_next`] is the plain silent-skip API for callers who don't
/// need to know it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery<T> {
    /// No item available yet at this reader's position.
    Empty,
    /// The next item in sequence, no loss.
    Item(T),
    /// An item arrived, but the producer overwrote at least one slot this
    /// reader had not yet consumed. `lost` is the number of items known to
    /// have been skipped.
    Overrun {
        /// The most recent item, still delivered.
        item: T,
        /// Items skipped since this reader's last successful read.
        lost: u64,
    },
}

impl<T> Delivery<T> {
    /// Extracts the item, if any, discarding overrun information (the
    /// equivalent of what [`Reader::read_next`] returns).
    #[must_use]
    pub fn into_item(self) -> Option<T> {
        match self {
            Delivery::Empty => None,
            Delivery::Item(item) | Delivery::Overrun { item, .. } => Some(item),
        }
    }
}

impl<'ring, T: Copy, const N: usize, C: PayloadCell<T>, S: RingSlot<T, C>>
    Reader<'ring, T, N, C, S>
{
    #[inline]
    const fn mask() -> usize {
        N - 1
    }

    /// Returns the even version slot `read_index % N` must reach before
    /// this reader will accept it.
    #[inline]
    fn expected_min_version(&self) -> i64 {
        let laps_completed = (self.read_index / N as u64) as i64;
        2 * laps_completed + 2
    }

    /// Reads the next item in sequence, lock-free.
    ///
    /// Returns `None` if the producer has not yet reached this reader's
    /// position (the reader has caught up to the producer). If the
    /// producer has overtaken this reader by more than `N` positions, the
    /// item returned is a *later* item, not the one logically next, and the
    /// overrun is skipped silently. Use [`Reader::try_read_next`] to detect
    /// this.
    pub fn read_next(&mut self) -> Option<T> {
        match self.advance() {
            Delivery::Empty => None,
            Delivery::Item(item) | Delivery::Overrun { item, .. } => Some(item),
        }
    }

    /// Like [`Reader::read_next`], but reports when the producer has
    /// overtaken this reader since its last successful read.
    pub fn try_read_next(&mut self) -> Delivery<T> {
        self.advance()
    }

    fn advance(&mut self) -> Delivery<T> {
        let idx = (self.read_index as usize) & Self::mask();
        let expected_min = self.expected_min_version();
        let (value, observed) = self.ring.slots[idx].slot().snapshot(expected_min);

        let Some(value) = value else {
            return Delivery::Empty;
        };

        let previous_read_index = self.read_index;
        self.read_index = self.read_index.wrapping_add(1);
        crate::invariants::debug_assert_cursor_advanced!(previous_read_index, self.read_index);

        // A normal, gap-free advance lands on expected_min exactly. Anything
        // higher means the producer lapped this reader at least once.
        let gap = observed - expected_min;
        debug_assert!(gap >= 0, "observed version fell below the version we just waited for");

        self.last_version = observed;

        if gap == 0 {
            if let Some(metrics) = &mut self.metrics {
                metrics.items_delivered += 1;
            }
            Delivery::Item(value)
        } else {
            // Each extra pair of version increments on this one slot means
            // the producer cycled back around to it one extra full lap:
            // N global items advanced that this reader never saw.
            let extra_laps = (gap as u64) / 2;
            let lost = extra_laps * N as u64;
            if let Some(metrics) = &mut self.metrics {
                metrics.items_delivered += 1;
                metrics.overruns_detected += 1;
                metrics.items_lost += lost;
            }
            Delivery::Overrun { item: value, lost }
        }
    }

    /// The version last observed by this reader.
    #[must_use]
    pub const fn last_observed_version(&self) -> i64 {
        self.last_version
    }

    /// Returns this reader's counters, or the all-zero snapshot if the
    /// owning ring was not constructed `with_metrics`.
    #[must_use]
    pub fn metrics(&self) -> ReaderMetrics {
        self.metrics.unwrap_or_default()
    }
}
