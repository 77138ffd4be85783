//! Validation of optimizer results and catalogs.

use std::collections::HashSet;

use crate::config::Settings;
use crate::model::{Part, Sheet, SheetLayout};
use crate::rules::{can_rotate_part, fits, materials_match};

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Create a failing result with an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate a whole result set produced with `settings`.
pub fn validate_layout(layouts: &[SheetLayout], settings: &Settings) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let mut seen = HashSet::new();

    for (idx, layout) in layouts.iter().enumerate() {
        result.merge(validate_sheet(layout, idx + 1, settings));

        for placed in &layout.placed_parts {
            if !seen.insert(placed.part.id) {
                result.add_error(format!(
                    "Sheet {}: Part #{} is placed more than once",
                    idx + 1,
                    placed.part.id
                ));
            }
        }
    }

    result
}

/// Validate a single sheet of a result.
pub fn validate_sheet(layout: &SheetLayout, sheet_num: usize, settings: &Settings) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let bounds = layout.sheet.bounds();

    if layout.is_empty() {
        result.add_warning(format!("Sheet {}: No parts placed", sheet_num));
    }

    for placed in &layout.placed_parts {
        let part = &placed.part;
        let label = format!("Sheet {}, Part '{}' #{}", sheet_num, part.name, part.id);

        if placed.sheet_id != layout.id() {
            result.add_error(format!(
                "{}: Recorded on sheet {} instead of {}",
                label,
                placed.sheet_id,
                layout.id()
            ));
        }

        if (placed.placed_width, placed.placed_height) != part.dimensions(placed.rotated) {
            result.add_error(format!(
                "{}: Placed size {}x{} does not match {}x{}{}",
                label,
                placed.placed_width,
                placed.placed_height,
                part.width,
                part.height,
                if placed.rotated { " rotated" } else { "" }
            ));
        }

        if !bounds.contains(&placed.footprint()) {
            result.add_error(format!("{}: Extends beyond sheet bounds", label));
        }

        if !materials_match(&part.material, &layout.sheet.material) {
            result.add_error(format!(
                "{}: Material {} cannot be cut from {}",
                label, part.material, layout.sheet.material
            ));
        }

        if placed.rotated && !can_rotate_part(part, &layout.sheet, settings) {
            result.add_error(format!("{}: Rotated although rotation is not permitted", label));
        }

        if !placed.grain_aligned && settings.respect_grain_direction {
            result.add_warning(format!("{}: Grain is not aligned", label));
        }
    }

    for (i, j) in validate_part_layout(layout) {
        result.add_error(format!(
            "Sheet {}: Parts #{} and #{} overlap",
            sheet_num, layout.placed_parts[i].part.id, layout.placed_parts[j].part.id
        ));
    }

    let covered: u64 = layout.placed_parts.iter().map(|p| p.placed_area()).sum();
    if covered != layout.used_area {
        result.add_error(format!(
            "Sheet {}: Used area {} does not match placed area {}",
            sheet_num, layout.used_area, covered
        ));
    }

    for (rect_idx, rect) in layout.free_rects.iter().enumerate() {
        if !bounds.contains(rect) {
            result.add_error(format!(
                "Sheet {}: Free rectangle {} extends beyond sheet bounds",
                sheet_num,
                rect_idx + 1
            ));
        }
        if rect.area() < settings.min_waste_area {
            result.add_warning(format!(
                "Sheet {}: Free rectangle {} is below the minimum waste area",
                sheet_num,
                rect_idx + 1
            ));
        }
        if layout.placed_parts.iter().any(|p| p.footprint().overlaps(rect)) {
            result.add_error(format!(
                "Sheet {}: Free rectangle {} overlaps a placed part",
                sheet_num,
                rect_idx + 1
            ));
        }
    }

    if layout.efficiency > layout.sheet.max_usage_percent {
        result.add_warning(format!(
            "Sheet {}: Usage {:.1}% exceeds the {:.1}% target",
            sheet_num, layout.efficiency, layout.sheet.max_usage_percent
        ));
    }

    result
}

/// Index pairs of overlapping placements on one sheet.
pub fn validate_part_layout(layout: &SheetLayout) -> Vec<(usize, usize)> {
    let mut overlaps = Vec::new();

    for i in 0..layout.placed_parts.len() {
        for j in i + 1..layout.placed_parts.len() {
            let a = layout.placed_parts[i].footprint();
            let b = layout.placed_parts[j].footprint();
            if a.overlaps(&b) {
                overlaps.push((i, j));
            }
        }
    }

    overlaps
}

/// Warn about parts that no sheet template can hold.
pub fn validate_catalog(parts: &[Part], sheets: &[Sheet], settings: &Settings) -> ValidationResult {
    let mut result = ValidationResult::ok();

    if sheets.is_empty() && !parts.is_empty() {
        result.add_warning("No sheets defined");
        return result;
    }

    for part in parts {
        let compatible: Vec<&Sheet> = sheets
            .iter()
            .filter(|s| materials_match(&part.material, &s.material))
            .collect();

        if compatible.is_empty() {
            result.add_warning(format!(
                "Part '{}' #{}: No sheet of material {}",
                part.name, part.id, part.material
            ));
            continue;
        }

        let holds = compatible.iter().any(|s| {
            let bounds = s.bounds();
            fits(part, &bounds, false) || (can_rotate_part(part, s, settings) && fits(part, &bounds, true))
        });
        if !holds {
            result.add_warning(format!(
                "Part '{}' #{}: {}x{} does not fit any {} sheet",
                part.name, part.id, part.width, part.height, part.material
            ));
        }
    }

    result
}
