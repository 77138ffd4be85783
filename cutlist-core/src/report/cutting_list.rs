//! Cutting list: parts by material, per-sheet breakdown and cut order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CUT_ROW_TOLERANCE;
use crate::model::{EdgeBanding, GrainDirection, Part, PlacedPart, SheetLayout};
use crate::statistics::{format_percent, Statistics};

/// Identical catalog parts collapsed into one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialEntry {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub grain_direction: GrainDirection,
    pub edge_banding: EdgeBanding,
    /// Number of catalog parts on this line.
    pub quantity: usize,
    /// How many of them the last run placed.
    pub placed: usize,
}

/// One placement in a sheet breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutListPart {
    pub id: u64,
    pub name: String,
    /// Placed size, e.g. `"800×600mm"`.
    pub dimensions: String,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
    pub grain_aligned: bool,
}

/// One step of the cut order on a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutStep {
    /// 1-based step number.
    pub step: usize,
    /// 1-based row the part belongs to.
    pub row: usize,
    pub part_id: u64,
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Breakdown of one result sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetCutList {
    pub number: usize,
    pub sheet_id: String,
    pub name: String,
    pub material: String,
    pub dimensions: String,
    pub grain_direction: GrainDirection,
    pub efficiency: String,
    pub grain_compliance: String,
    pub parts: Vec<CutListPart>,
    pub cut_sequence: Vec<CutStep>,
}

/// Cutting list for a whole result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuttingList {
    /// Catalog parts grouped by material label.
    pub by_material: BTreeMap<String, Vec<MaterialEntry>>,
    pub sheets: Vec<SheetCutList>,
    pub summary: Statistics,
}

/// Build the cutting list for `parts` and their placement `results`.
pub fn generate_cutting_list(parts: &[Part], results: &[SheetLayout]) -> CuttingList {
    let mut by_material: BTreeMap<String, Vec<MaterialEntry>> = BTreeMap::new();

    for part in parts {
        let entries = by_material
            .entry(part.material.label().to_string())
            .or_default();
        let existing = entries.iter().position(|e| {
            e.name == part.name
                && e.width == part.width
                && e.height == part.height
                && e.grain_direction == part.grain_direction
                && e.edge_banding == part.edge_banding
        });
        match existing {
            Some(idx) => {
                entries[idx].quantity += 1;
                entries[idx].placed += usize::from(part.placed);
            }
            None => entries.push(MaterialEntry {
                name: part.name.clone(),
                width: part.width,
                height: part.height,
                grain_direction: part.grain_direction,
                edge_banding: part.edge_banding,
                quantity: 1,
                placed: usize::from(part.placed),
            }),
        }
    }

    let sheets = results
        .iter()
        .enumerate()
        .map(|(idx, layout)| sheet_cut_list(layout, idx + 1))
        .collect();

    CuttingList {
        by_material,
        sheets,
        summary: Statistics::compute(results, parts.len()),
    }
}

fn sheet_cut_list(layout: &SheetLayout, number: usize) -> SheetCutList {
    let parts = layout
        .placed_parts
        .iter()
        .map(|p| CutListPart {
            id: p.part.id,
            name: p.part.name.clone(),
            dimensions: format_dimensions(p.placed_width, p.placed_height),
            x: p.x,
            y: p.y,
            rotated: p.rotated,
            grain_aligned: p.grain_aligned,
        })
        .collect();

    SheetCutList {
        number,
        sheet_id: layout.id().to_string(),
        name: layout.sheet.name.clone(),
        material: layout.sheet.material.label().to_string(),
        dimensions: format_dimensions(layout.sheet.width, layout.sheet.height),
        grain_direction: layout.sheet.grain_direction,
        efficiency: format_percent(layout.efficiency, 1),
        grain_compliance: format_percent(layout.grain_compliance, 1),
        parts,
        cut_sequence: cut_sequence(&layout.placed_parts),
    }
}

/// Row-major cut order.
///
/// Placements are swept by `y`; a placement starts a new row once its `y`
/// is at least [`CUT_ROW_TOLERANCE`] below the row's first placement.
/// Within a row, placements are ordered by `x`.
pub fn cut_sequence(placed: &[PlacedPart]) -> Vec<CutStep> {
    let mut ordered: Vec<&PlacedPart> = placed.iter().collect();
    ordered.sort_by_key(|p| (p.y, p.x));

    let mut rows: Vec<Vec<&PlacedPart>> = Vec::new();
    let mut anchor = 0;
    for p in ordered {
        if rows.is_empty() || p.y - anchor >= CUT_ROW_TOLERANCE {
            anchor = p.y;
            rows.push(vec![p]);
        } else if let Some(row) = rows.last_mut() {
            row.push(p);
        }
    }

    let mut steps = Vec::with_capacity(placed.len());
    for (row_idx, row) in rows.iter_mut().enumerate() {
        row.sort_by_key(|p| p.x);
        for p in row.iter() {
            steps.push(CutStep {
                step: steps.len() + 1,
                row: row_idx + 1,
                part_id: p.part.id,
                name: p.part.name.clone(),
                x: p.x,
                y: p.y,
                width: p.placed_width,
                height: p.placed_height,
            });
        }
    }

    steps
}

fn format_dimensions(width: u32, height: u32) -> String {
    format!("{}×{}mm", width, height)
}

impl fmt::Display for CuttingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (material, entries) in &self.by_material {
            writeln!(f, "Material {}", material)?;
            for entry in entries {
                write!(
                    f,
                    "  {}x {} {} (grain {})",
                    entry.quantity,
                    entry.name,
                    format_dimensions(entry.width, entry.height),
                    entry.grain_direction
                )?;
                if entry.edge_banding.count() > 0 {
                    write!(f, ", {} banded edges", entry.edge_banding.count())?;
                }
                if entry.placed < entry.quantity {
                    write!(f, ", {} unplaced", entry.quantity - entry.placed)?;
                }
                writeln!(f)?;
            }
        }

        for sheet in &self.sheets {
            writeln!(
                f,
                "Sheet {}: {} ({}) {}, efficiency {}, grain {}",
                sheet.number,
                sheet.name,
                sheet.material,
                sheet.dimensions,
                sheet.efficiency,
                sheet.grain_compliance
            )?;
            for step in &sheet.cut_sequence {
                writeln!(
                    f,
                    "  {:>3}. row {} {} #{} at ({}, {}) {}",
                    step.step,
                    step.row,
                    step.name,
                    step.part_id,
                    step.x,
                    step.y,
                    format_dimensions(step.width, step.height)
                )?;
            }
        }

        write!(f, "Summary: {}", self.summary)
    }
}
