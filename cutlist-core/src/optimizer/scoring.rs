//! Candidate scoring. Lower scores win.

use crate::config::{
    Heuristic, Settings, EDGE_WASTE_LIMIT, EDGE_WASTE_PENALTY, GUILLOTINE_PERIMETER_WEIGHT,
    PRIORITY_BONUS,
};
use crate::model::{FreeRect, Part};

/// Score of placing `part` (turned when `rotated`) at the origin of `rect`.
///
/// The part must fit; leftovers are computed as signed values so a misuse
/// shows up as a large negative term rather than an underflow.
pub fn placement_score(
    part: &Part,
    rect: &FreeRect,
    rotated: bool,
    grain_aligned: bool,
    settings: &Settings,
) -> f64 {
    let (width, height) = part.dimensions(rotated);
    let rem_w = rect.width as f64 - width as f64;
    let rem_h = rect.height as f64 - height as f64;

    let mut score = base_score(settings.heuristic, rem_w, rem_h);

    if !grain_aligned && settings.respect_grain_direction {
        score += part.area() as f64 * settings.grain_penalty_factor;
    }

    score -= part.priority as f64 * PRIORITY_BONUS;

    let edge_waste = rem_w.min(rem_h);
    if edge_waste > 0.0 && edge_waste < EDGE_WASTE_LIMIT {
        score += edge_waste * EDGE_WASTE_PENALTY;
    }

    score
}

/// Geometric term of the score.
pub fn base_score(heuristic: Heuristic, rem_w: f64, rem_h: f64) -> f64 {
    match heuristic {
        Heuristic::BestAreaFit => rem_w * rem_h,
        Heuristic::BestShortSideFit => rem_w.min(rem_h),
        Heuristic::BestLongSideFit => rem_w.max(rem_h),
        Heuristic::GuillotineStandard => {
            rem_w * rem_h + (rem_w + rem_h) * GUILLOTINE_PERIMETER_WEIGHT
        }
    }
}
