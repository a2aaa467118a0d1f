//! Shared test utilities for the STAC workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A metadata XML generator mirroring the INPE `prdf` layout
//! - Canned scene documents for every supported mission/camera
//! - Approximate float assertions
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{fixtures, assert_approx_eq};
//!
//! let scene = fixtures::cbers4_mux();
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::SceneFixture;
pub use generators::{Corner, MetadataXml};

use std::io::Write;

/// Write `contents` to a temporary file that lives as long as the handle.
pub fn temp_file_with(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes())
        .expect("write temp file");
    file
}

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

/// Approximate equality of a `bbox` slice against expected values.
#[macro_export]
macro_rules! assert_bbox_approx_eq {
    ($bbox:expr, [$($expected:expr),+ $(,)?], $epsilon:expr) => {{
        let expected = [$($expected as f64),+];
        let actual: &[f64] = &$bbox;
        assert_eq!(actual.len(), expected.len(), "bbox length");
        for (a, e) in actual.iter().zip(expected.iter()) {
            $crate::assert_approx_eq!(*a, *e, $epsilon);
        }
    }};
}
