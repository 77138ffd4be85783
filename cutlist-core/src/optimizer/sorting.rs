//! Part ordering ahead of the placement loop.

use std::cmp::Ordering;

use crate::config::SortingMethod;
use crate::model::{GrainDirection, Part};

/// Stable-sort `parts` in place. All numeric keys are descending; equal keys
/// keep catalog order.
pub fn sort_parts(parts: &mut [Part], method: SortingMethod) {
    parts.sort_by(|a, b| compare(a, b, method));
}

/// Ordering used by [`sort_parts`].
pub fn compare(a: &Part, b: &Part, method: SortingMethod) -> Ordering {
    match method {
        SortingMethod::Area => b.area().cmp(&a.area()),
        SortingMethod::MaxSide => b.max_side().cmp(&a.max_side()),
        SortingMethod::Width => b.width.cmp(&a.width),
        SortingMethod::Height => b.height.cmp(&a.height),
        SortingMethod::Grain => {
            let a_horizontal = a.grain_direction == GrainDirection::Horizontal;
            let b_horizontal = b.grain_direction == GrainDirection::Horizontal;
            b_horizontal
                .cmp(&a_horizontal)
                .then_with(|| b.area().cmp(&a.area()))
        }
        SortingMethod::Priority => b
            .priority
            .cmp(&a.priority)
            .then_with(|| b.area().cmp(&a.area())),
    }
}
