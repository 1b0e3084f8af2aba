//! Shared test utilities for the climate feature grid workspace.
//!
//! Provides approximate-equality assertion macros and generators for
//! synthetic observations, frames and series.
//!
//! Add to a crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;

pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting two frames agree cell-by-cell, treating the sentinel
/// as equal to itself.
#[macro_export]
macro_rules! assert_frames_match {
    ($left:expr, $right:expr) => {{
        let left = $left;
        let right = $right;
        assert_eq!(left.shape(), right.shape(), "frame shapes differ");
        for (i, (a, b)) in left.data().iter().zip(right.data()).enumerate() {
            match (a.is_nan(), b.is_nan()) {
                (true, true) => {}
                (false, false) => assert!(
                    (a - b).abs() < 1e-6,
                    "cell {} differs: {} vs {}",
                    i,
                    a,
                    b
                ),
                _ => panic!("cell {} sentinel mismatch: {:?} vs {:?}", i, a, b),
            }
        }
    }};
}
