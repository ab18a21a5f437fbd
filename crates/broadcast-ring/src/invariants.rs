//! Debug assertion macros for the invariants that keep a slot's version
//! counter and a reader's cursor well-formed.
//!
//! These macros are only active in debug builds (`#[cfg(debug_assertions)]`
//! via `debug_assert!`), so there is zero overhead in release builds.

/// Assert that a slot's version is even (quiescent) once a publish has fully
/// completed.
macro_rules! debug_assert_version_even {
    ($version:expr) => {
        debug_assert!(
            $version % 2 == 0,
            "version {} is odd outside of publish",
            $version
        )
    };
}

/// Assert that a slot's version only increases.
macro_rules! debug_assert_version_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "version decreased from {} to {}",
            $old,
            $new
        )
    };
}

/// Assert that a reader's cursor only advances, one position at a time.
macro_rules! debug_assert_cursor_advanced {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new == $old.wrapping_add(1),
            "read_index went from {} to {} (expected +1)",
            $old,
            $new
        )
    };
}

pub(crate) use debug_assert_cursor_advanced;
pub(crate) use debug_assert_version_even;
pub(crate) use debug_assert_version_monotonic;
