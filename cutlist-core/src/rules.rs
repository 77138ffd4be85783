//! Placement rules: fit, material compatibility, rotation gate and grain alignment.

use crate::config::Settings;
use crate::model::{FreeRect, GrainDirection, Material, Part, Sheet};

/// Check if `part` fits in `rect`, swapped when `rotated`.
///
/// The blade width is not subtracted.
pub fn fits(part: &Part, rect: &FreeRect, rotated: bool) -> bool {
    let (width, height) = part.dimensions(rotated);
    rect.fits(width, height)
}

/// Check if a part of `part_material` may be cut from a sheet of `sheet_material`.
pub fn materials_match(part_material: &Material, sheet_material: &Material) -> bool {
    part_material.matches(sheet_material)
}

/// Check if `part` may be turned 90° on `sheet`.
///
/// With grain enforcement on, two fixed grains must already agree.
pub fn can_rotate_part(part: &Part, sheet: &Sheet, settings: &Settings) -> bool {
    if !settings.allow_rotation || !part.allow_rotation {
        return false;
    }
    if !settings.respect_grain_direction {
        return true;
    }
    if !part.grain_direction.is_fixed() || !sheet.grain_direction.is_fixed() {
        return true;
    }
    part.grain_direction == sheet.grain_direction
}

/// Check if placing `part` (turned when `rotated`) on `sheet` keeps the grain aligned.
pub fn is_grain_aligned(part: &Part, rotated: bool, sheet: &Sheet, settings: &Settings) -> bool {
    grain_aligned(part.grain_direction, rotated, sheet.grain_direction, settings)
}

/// Alignment check on bare grain values.
pub fn grain_aligned(
    part_grain: GrainDirection,
    rotated: bool,
    sheet_grain: GrainDirection,
    settings: &Settings,
) -> bool {
    if !settings.respect_grain_direction {
        return true;
    }
    if !part_grain.is_fixed() || !sheet_grain.is_fixed() {
        return true;
    }
    let effective = if rotated {
        part_grain.rotated()
    } else {
        part_grain
    };
    effective == sheet_grain
}
