//! The seqlock slot and its cache-line-isolation wrapper.

use crate::cell::PayloadCell;
use crate::invariants::{debug_assert_version_even, debug_assert_version_monotonic};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};

/// One ring position: a [`PayloadCell`] plus the even/odd version counter
/// that makes it safe to publish and read concurrently.
///
/// # Invariants
/// - `version` is even iff the cell is quiescent, odd while a publish is in
///   progress.
/// - `version` is monotonically non-decreasing, advancing by exactly 2 per
///   completed publish.
/// - a successful `snapshot` returns the even value that bounded the read
///   window.
pub struct Slot<T: Copy, C: PayloadCell<T> = crate::cell::ByteAtomicCell<T>> {
    cell: C,
    version: AtomicI64,
    _payload: PhantomData<T>,
}

impl<T: Copy + Default, C: PayloadCell<T>> Default for Slot<T, C> {
    fn default() -> Self {
        Self {
            cell: C::default(),
            version: AtomicI64::new(0),
            _payload: PhantomData,
        }
    }
}

impl<T: Copy, C: PayloadCell<T>> Slot<T, C> {
    /// Publishes `value`, wait-free. Producer-only: calling this from more
    /// than one thread concurrently corrupts `version`.
    ///
    /// Uses the classical seqlock ordering: relaxed on the pre-publish
    /// increment, release on the post-publish increment. The release on the
    /// closing increment is what makes the payload write visible to any
    /// reader that subsequently observes the resulting even version.
    #[inline]
    pub fn publish(&self, value: T) {
        let entering = self.version.fetch_add(1, Ordering::Relaxed) + 1;
        debug_assert!(entering % 2 != 0, "publish did not enter odd state");
        self.cell.store(value);
        let leaving = self.version.fetch_add(1, Ordering::Release) + 1;
        debug_assert_version_even!(leaving);
        debug_assert_version_monotonic!(entering, leaving);
    }

    /// Attempts to read the cell, retrying until a stable (non-torn)
    /// snapshot is observed. Lock-free: bounded per-retry work, but the loop
    /// itself may spin under pathological concurrent-publish pressure.
    ///
    /// Returns `(Some(value), observed_version)` if the stable version is
    /// `>= min_version`, otherwise `(None, observed_version)` (the slot has
    /// not yet reached the version the caller is waiting for).
    #[inline]
    pub fn snapshot(&self, min_version: i64) -> (Option<T>, i64) {
        loop {
            let v0 = self.version.load(Ordering::Acquire);
            let value = self.cell.load();
            let v1 = self.version.load(Ordering::Acquire);

            if v0 % 2 != 0 || v0 != v1 {
                // A publish was in progress, or completed mid-read: retry.
                continue;
            }

            return if v0 >= min_version {
                (Some(value), v0)
            } else {
                (None, v0)
            };
        }
    }
}

/// A slot wrapper that chooses the slot's memory layout: plain (natural
/// alignment, slots packed contiguously) or cache-line-isolated (each slot
/// padded to 64 bytes so adjacent slots never share a cache line).
///
/// Rust cannot parameterize `#[repr(align(N))]` with a const generic, so
/// this is expressed as a type-level choice instead of a runtime flag.
/// [`Slot`] itself implements this trait as the identity (no padding);
/// [`CacheLineSlot`] wraps it with `#[repr(align(64))]`.
pub trait RingSlot<T: Copy, C: PayloadCell<T>>: Default {
    /// Borrows the underlying seqlock slot.
    fn slot(&self) -> &Slot<T, C>;
}

impl<T: Copy + Default, C: PayloadCell<T>> RingSlot<T, C> for Slot<T, C> {
    #[inline]
    fn slot(&self) -> &Slot<T, C> {
        self
    }
}

/// [`Slot`] padded to a 64-byte cache line, eliminating false sharing
/// between adjacent ring positions under concurrent publish/read traffic.
/// Opt-in, since cache-line isolation trades memory footprint for avoiding
/// contention and not every workload needs it.
#[repr(align(64))]
pub struct CacheLineSlot<T: Copy, C: PayloadCell<T> = crate::cell::ByteAtomicCell<T>> {
    inner: Slot<T, C>,
}

impl<T: Copy + Default, C: PayloadCell<T>> Default for CacheLineSlot<T, C> {
    fn default() -> Self {
        Self {
            inner: Slot::default(),
        }
    }
}

impl<T: Copy + Default, C: PayloadCell<T>> RingSlot<T, C> for CacheLineSlot<T, C> {
    #[inline]
    fn slot(&self) -> &Slot<T, C> {
        &self.inner
    }
}
