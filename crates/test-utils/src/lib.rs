//! Shared test utilities for the water-quality producer workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate float comparison macros
//! - Labeled cell and raster generators
//! - Common bounding box fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
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

/// Macro asserting a value lies in a closed interval.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_in_range;
///
/// assert_in_range!(0.17, 0.15, 0.25); // passes
/// ```
#[macro_export]
macro_rules! assert_in_range {
    ($value:expr, $min:expr, $max:expr) => {{
        let value: f64 = $value as f64;
        let min: f64 = $min as f64;
        let max: f64 = $max as f64;
        if !(value >= min && value <= max) {
            panic!(
                "assertion failed: `{:?}` not in [{:?}, {:?}]",
                value, min, max
            );
        }
    }};
}
