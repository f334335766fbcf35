//! Math functions for no_std compatibility.
//!
//! In no_std mode, f64 doesn't have `sqrt`. This module routes it through libm.

/// Square root.
#[inline]
pub fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

/// Square (x^2).
#[inline]
pub fn sq(x: f64) -> f64 {
    x * x
}
