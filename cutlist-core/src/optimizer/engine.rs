//! Greedy guillotine placement loop.

use tracing::{debug, warn};

use super::scoring::placement_score;
use super::sorting::sort_parts;
use crate::config::Settings;
use crate::model::{Part, Sheet, SheetLayout};
use crate::rules::{can_rotate_part, fits, is_grain_aligned, materials_match};

/// Best placement found for one part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the working sheet list.
    pub sheet_index: usize,
    /// Index into that sheet's free rectangles.
    pub rect_index: usize,
    /// Whether the part is turned 90°.
    pub rotated: bool,
    /// Whether the placement satisfies the grain rules.
    pub grain_aligned: bool,
    /// Placement score, lower is better.
    pub score: f64,
}

/// Outcome of one optimization pass.
#[derive(Debug, Clone, Default)]
pub struct PlacementOutcome {
    /// Sheets holding at least one part, by descending efficiency.
    pub sheets: Vec<SheetLayout>,
    /// Ids of parts that could not be placed.
    pub unplaced: Vec<u64>,
}

/// Place `parts` onto instances of `templates`.
///
/// Works on copies: the inputs are not modified.
pub fn run(parts: &[Part], templates: &[Sheet], settings: &Settings) -> PlacementOutcome {
    if parts.is_empty() || templates.is_empty() {
        return PlacementOutcome::default();
    }

    let mut queue: Vec<Part> = parts
        .iter()
        .cloned()
        .map(|mut p| {
            p.placed = false;
            p
        })
        .collect();
    sort_parts(&mut queue, settings.sorting_method);

    let mut sheets: Vec<SheetLayout> = templates
        .iter()
        .map(|t| SheetLayout::from_template(t, t.id.clone()))
        .collect();
    let mut unplaced = Vec::new();

    for part in &mut queue {
        if part.placed {
            continue;
        }

        if let Some(best) = find_best_candidate(part, &sheets, settings) {
            let layout = &mut sheets[best.sheet_index];
            let placed = layout.place(
                part,
                best.rect_index,
                best.rotated,
                best.grain_aligned,
                settings.min_waste_area,
            );
            debug!(
                "Placed '{}' #{} on {} at ({}, {}){} score={:.1}",
                part.name,
                part.id,
                placed.sheet_id,
                placed.x,
                placed.y,
                if best.rotated { " rotated" } else { "" },
                best.score
            );
            part.placed = true;
        } else if settings.allow_new_sheets && open_sheet_for(part, templates, &mut sheets, settings) {
            part.placed = true;
        } else {
            warn!(
                "Part '{}' #{} ({}x{} {}) could not be placed",
                part.name, part.id, part.width, part.height, part.material
            );
            unplaced.push(part.id);
        }
    }

    for layout in &mut sheets {
        layout.update_metrics();
    }
    sheets.retain(|s| !s.is_empty());
    sheets.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));

    PlacementOutcome { sheets, unplaced }
}

/// Lowest-scoring placement of `part` over all compatible sheets.
///
/// Ties keep the first candidate: sheet order, then rectangle order, then
/// unrotated before rotated.
pub fn find_best_candidate(
    part: &Part,
    sheets: &[SheetLayout],
    settings: &Settings,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for (sheet_index, layout) in sheets.iter().enumerate() {
        if !materials_match(&part.material, &layout.sheet.material) {
            continue;
        }
        let can_rotate = can_rotate_part(part, &layout.sheet, settings);

        for (rect_index, rect) in layout.free_rects.iter().enumerate() {
            for rotated in [false, true] {
                if (rotated && !can_rotate) || !fits(part, rect, rotated) {
                    continue;
                }
                let grain_aligned = is_grain_aligned(part, rotated, &layout.sheet, settings);
                let score = placement_score(part, rect, rotated, grain_aligned, settings);
                if best.map_or(true, |b| score < b.score) {
                    best = Some(Candidate {
                        sheet_index,
                        rect_index,
                        rotated,
                        grain_aligned,
                        score,
                    });
                }
            }
        }
    }

    best
}

/// Open a fresh instance of the first compatible template that can hold
/// `part` and place it at the origin. Returns `false` if none can.
fn open_sheet_for(
    part: &Part,
    templates: &[Sheet],
    sheets: &mut Vec<SheetLayout>,
    settings: &Settings,
) -> bool {
    for template in templates
        .iter()
        .filter(|t| materials_match(&part.material, &t.material))
    {
        let bounds = template.bounds();
        let rotated = if fits(part, &bounds, false) {
            false
        } else if can_rotate_part(part, template, settings) && fits(part, &bounds, true) {
            true
        } else {
            debug!(
                "Part '{}' #{} does not fit template {} ({}x{})",
                part.name, part.id, template.id, template.width, template.height
            );
            continue;
        };

        let mut layout = SheetLayout::from_template(template, instance_id(template, sheets));
        let grain_aligned = is_grain_aligned(part, rotated, template, settings);
        layout.place(part, 0, rotated, grain_aligned, settings.min_waste_area);
        debug!(
            "Opened {} for '{}' #{}{}",
            layout.id(),
            part.name,
            part.id,
            if rotated { " rotated" } else { "" }
        );
        sheets.push(layout);
        return true;
    }

    false
}

/// Next free `<template>/<k>` id. Skips ids already taken by other sheets,
/// including templates literally named that way.
fn instance_id(template: &Sheet, sheets: &[SheetLayout]) -> String {
    let mut k = sheets.iter().filter(|s| s.template_id == template.id).count();
    loop {
        let id = format!("{}/{}", template.id, k);
        if sheets.iter().all(|s| s.id() != id) {
            return id;
        }
        k += 1;
    }
}
