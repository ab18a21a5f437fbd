//! Payload storage policies.
//!
//! A [`PayloadCell`] holds one payload of type `T` and defines how its bytes
//! may be copied concurrently with a writer. Two variants are provided:
//! [`TearableCell`] (plain copy, fastest, relies on the enclosing seqlock to
//! discard torn reads) and [`ByteAtomicCell`] (per-byte relaxed atomics, so
//! the access itself is never a data race even before the seqlock's retry
//! loop runs).

use std::cell::UnsafeCell;
use std::mem::{self, MaybeUninit};
use std::sync::atomic::{AtomicU8, Ordering};

/// Storage for one payload of type `T`, with a defined concurrent-copy
/// policy.
///
/// Implementors are constructed via `Default` and offer only `store`/`load`,
/// the interface both variants share.
pub trait PayloadCell<T: Copy>: Default {
    /// Writes `value` into the cell. Called only by the producer, already
    /// bracketed by the enclosing [`crate::Slot`]'s version increments.
    fn store(&self, value: T);

    /// Reads the current contents of the cell. May run concurrently with a
    /// writer's `store`; the caller (the seqlock retry loop) is responsible
    /// for discarding a result observed mid-write.
    fn load(&self) -> T;
}

/// Plain, non-atomic payload storage.
///
/// Concurrent `store`/`load` on the same `TearableCell` is a data race in
/// the strict sense the Rust abstract machine defines one. That is
/// intentional: this variant relies on the enclosing seqlock's version
/// check to discard any value assembled from a racing window, and on the
/// target hardware giving byte-stable reads even under that race. Some
/// callers (payloads that are register-sized and rarely written) accept
/// that risk for the extra throughput of skipping per-byte atomics. Prefer
/// [`ByteAtomicCell`] unless you have measured the difference and you
/// understand this caveat.
pub struct TearableCell<T: Copy> {
    value: UnsafeCell<T>,
}

// SAFETY: access is synchronized by the enclosing Slot's seqlock protocol,
// not by this type itself (see the struct-level note on the race it still
// permits within one retry window).
unsafe impl<T: Copy + Send> Sync for TearableCell<T> {}

impl<T: Copy + Default> Default for TearableCell<T> {
    fn default() -> Self {
        Self {
            value: UnsafeCell::new(T::default()),
        }
    }
}

impl<T: Copy + Default> PayloadCell<T> for TearableCell<T> {
    #[inline]
    fn store(&self, value: T) {
        // SAFETY: the writer is the sole producer; readers racing this store
        // is the documented, accepted condition of this variant.
        unsafe {
            *self.value.get() = value;
        }
    }

    #[inline]
    fn load(&self) -> T {
        // SAFETY: as above; the seqlock retry loop discards a torn result.
        unsafe { *self.value.get() }
    }
}

/// Byte-granular atomic payload storage.
///
/// `store`/`load` copy `size_of::<T>()` bytes one at a time through
/// `AtomicU8::from_ptr`, each with `Ordering::Relaxed`. This isolates every
/// byte-level access as its own atomic operation, so the Rust memory model
/// never classifies concurrent `store`/`load` as a data race. The only
/// remaining race is at the *value* level (a reader may observe a mix of
/// bytes from two different writes), which is exactly what the enclosing
/// seqlock's version check is for.
pub struct ByteAtomicCell<T: Copy> {
    value: UnsafeCell<T>,
}

// SAFETY: every byte access goes through an atomic operation; concurrent
// store/load is well-defined at the byte level regardless of T's layout.
unsafe impl<T: Copy + Send> Sync for ByteAtomicCell<T> {}

impl<T: Copy + Default> Default for ByteAtomicCell<T> {
    fn default() -> Self {
        Self {
            value: UnsafeCell::new(T::default()),
        }
    }
}

impl<T: Copy + Default> PayloadCell<T> for ByteAtomicCell<T> {
    fn store(&self, value: T) {
        let src = (&value as *const T).cast::<u8>();
        let dst = self.value.get().cast::<u8>();
        for i in 0..mem::size_of::<T>() {
            // SAFETY: `dst.add(i)` stays within the single `T` this cell
            // owns; `AtomicU8` has alignment 1 so the cast is always valid.
            unsafe {
                let byte = *src.add(i);
                AtomicU8::from_ptr(dst.add(i)).store(byte, Ordering::Relaxed);
            }
        }
    }

    fn load(&self) -> T {
        let mut out = MaybeUninit::<T>::uninit();
        let dst = out.as_mut_ptr().cast::<u8>();
        let src = self.value.get().cast::<u8>();
        for i in 0..mem::size_of::<T>() {
            // SAFETY: same reasoning as `store`; every byte of `out` is
            // written exactly once before `assume_init`.
            unsafe {
                let byte = AtomicU8::from_ptr(src.add(i)).load(Ordering::Relaxed);
                *dst.add(i) = byte;
            }
        }
        // SAFETY: all size_of::<T>() bytes were just initialized above.
        unsafe { out.assume_init() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
    struct Triple {
        a: i32,
        b: i32,
        c: i32,
    }

    #[test]
    fn tearable_round_trips() {
        let cell = TearableCell::<u64>::default();
        assert_eq!(cell.load(), 0);
        cell.store(42);
        assert_eq!(cell.load(), 42);
    }

    #[test]
    fn byte_atomic_round_trips() {
        let cell = ByteAtomicCell::<u64>::default();
        assert_eq!(cell.load(), 0);
        cell.store(0xDEAD_BEEF_u64);
        assert_eq!(cell.load(), 0xDEAD_BEEF_u64);
    }

    #[test]
    fn byte_atomic_round_trips_non_power_of_two_size_payload() {
        let cell = ByteAtomicCell::<Triple>::default();
        let value = Triple { a: 1, b: -2, c: 3 };
        cell.store(value);
        assert_eq!(cell.load(), value);
    }
}
