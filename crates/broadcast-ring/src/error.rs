//! Error types for `broadcast-ring` construction.

use thiserror::Error;

/// Errors that can occur when constructing a [`crate::BroadcastRing`].
///
/// The ring has no fallible *operations*, so this is the only failure mode
/// in the whole crate, and it only exists because
/// [`BroadcastRing::try_new`](crate::BroadcastRing::try_new) gives callers a
/// non-panicking alternative to the `N`-must-be-a-power-of-two assertion that
/// `new()` enforces with `assert!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingConfigError {
    /// The compile-time slot count `N` is not a power of two.
    #[error("ring capacity {capacity} is not a power of two")]
    CapacityNotPowerOfTwo {
        /// The offending capacity.
        capacity: usize,
    },
}
