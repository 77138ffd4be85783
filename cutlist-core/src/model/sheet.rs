//! Stock sheets: templates supplied by the user and the working instances
//! the optimizer fills.

use serde::{Deserialize, Serialize};

use super::rect::split;
use super::{FreeRect, GrainDirection, Material, Part, PlacedPart};
use crate::config::DEFAULT_MAX_USAGE_PERCENT;

/// A stock sheet template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    /// Unique sheet id within the catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sheet width (mm).
    pub width: u32,
    /// Sheet height (mm).
    pub height: u32,
    /// Price of one full sheet.
    pub cost: f64,
    /// Panel material.
    pub material: Material,
    /// Grain orientation of the sheet.
    #[serde(default)]
    pub grain_direction: GrainDirection,
    /// Soft cap on usable share, in percent. Informational only.
    #[serde(default = "default_max_usage")]
    pub max_usage_percent: f64,
}

fn default_max_usage() -> f64 {
    DEFAULT_MAX_USAGE_PERCENT
}

impl Sheet {
    /// Create a sheet template with default options.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: u32,
        height: u32,
        cost: f64,
        material: Material,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            cost,
            material,
            grain_direction: GrainDirection::Any,
            max_usage_percent: DEFAULT_MAX_USAGE_PERCENT,
        }
    }

    /// Area in mm².
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Rectangle covering the whole sheet.
    pub fn bounds(&self) -> FreeRect {
        FreeRect::sheet(self.width, self.height)
    }
}

/// A sheet instance with its placements and remaining free space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLayout {
    /// Sheet data. `sheet.id` is the instance id.
    #[serde(flatten)]
    pub sheet: Sheet,
    /// Id of the template this instance was cloned from.
    pub template_id: String,
    /// Remaining usable rectangles.
    pub free_rects: Vec<FreeRect>,
    /// Parts placed on this instance, in placement order.
    pub placed_parts: Vec<PlacedPart>,
    /// Covered area in mm².
    pub used_area: u64,
    /// Used share of the sheet, in percent.
    pub efficiency: f64,
    /// Share of grain-aligned placements, in percent.
    pub grain_compliance: f64,
}

impl SheetLayout {
    /// Fresh instance of `template` with a single full-size free rectangle.
    pub fn from_template(template: &Sheet, instance_id: impl Into<String>) -> Self {
        let mut sheet = template.clone();
        sheet.id = instance_id.into();
        Self {
            free_rects: vec![sheet.bounds()],
            sheet,
            template_id: template.id.clone(),
            placed_parts: Vec::new(),
            used_area: 0,
            efficiency: 0.0,
            grain_compliance: 0.0,
        }
    }

    /// Instance id.
    pub fn id(&self) -> &str {
        &self.sheet.id
    }

    /// Sheet area in mm².
    pub fn area(&self) -> u64 {
        self.sheet.area()
    }

    /// Check if nothing was placed on this instance.
    pub fn is_empty(&self) -> bool {
        self.placed_parts.is_empty()
    }

    /// Place `part` at the origin of free rectangle `rect_index`.
    ///
    /// The consumed rectangle is removed, its guillotine remainder appended,
    /// and every free rectangle below `min_waste_area` dropped.
    pub fn place(
        &mut self,
        part: &Part,
        rect_index: usize,
        rotated: bool,
        grain_aligned: bool,
        min_waste_area: u64,
    ) -> &PlacedPart {
        let rect = self.free_rects.remove(rect_index);
        let (width, height) = part.dimensions(rotated);
        debug_assert!(rect.fits(width, height), "part {} overflows {:?}", part.id, rect);
        debug_assert!(part.material.matches(&self.sheet.material));

        let mut placed = part.clone();
        placed.placed = true;
        self.placed_parts.push(PlacedPart {
            part: placed,
            sheet_id: self.sheet.id.clone(),
            x: rect.x,
            y: rect.y,
            rotated,
            placed_width: width,
            placed_height: height,
            grain_aligned,
        });
        self.used_area += width as u64 * height as u64;

        self.free_rects.extend(split(&rect, width, height));
        self.free_rects.retain(|r| r.area() >= min_waste_area);

        &self.placed_parts[self.placed_parts.len() - 1]
    }

    /// Recompute efficiency and grain compliance from the placements.
    pub fn update_metrics(&mut self) {
        if self.placed_parts.is_empty() || self.area() == 0 {
            return;
        }
        self.efficiency = self.used_area as f64 / self.area() as f64 * 100.0;
        let aligned = self.placed_parts.iter().filter(|p| p.grain_aligned).count();
        self.grain_compliance = aligned as f64 / self.placed_parts.len() as f64 * 100.0;
    }

    /// Number of grain-violating placements.
    pub fn grain_violations(&self) -> usize {
        self.placed_parts.iter().filter(|p| !p.grain_aligned).count()
    }

    /// Uncovered area in mm².
    pub fn waste_area(&self) -> u64 {
        self.area().saturating_sub(self.used_area)
    }
}
