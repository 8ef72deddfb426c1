//! In-place ΔR deduplication of reconstructed object collections.
//!
//! Jets reconstructed on top of a muon footprint (and similar overlaps)
//! are removed before an event is scored, by dropping every candidate
//! object that lands too close in (η, φ) to a reference object.

use dimu_core::{delta_r, Direction};

/// Remove from `clean_this` every object with ΔR < `dr_min` to any
/// object in `from_this`.
///
/// References are scanned in input order; for each reference the
/// candidate list is walked by index, and after a removal the element
/// that fell into the vacated slot is examined next. `from_this` is
/// never modified. Empty inputs and `dr_min <= 0` leave `clean_this`
/// untouched.
pub fn clean_by_dr<T: Direction, U: Direction>(
    clean_this: &mut Vec<T>,
    from_this: &[U],
    dr_min: f64,
) {
    for reference in from_this {
        let mut j = 0;
        while j < clean_this.len() {
            if delta_r(&clean_this[j], reference) < dr_min {
                // the next item falls back into the same index
                clean_this.remove(j);
            } else {
                j += 1;
            }
        }
    }
}
