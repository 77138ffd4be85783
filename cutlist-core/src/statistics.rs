//! Aggregates derived from a placement result.

use serde::{Deserialize, Serialize};

use crate::model::SheetLayout;

/// mm² per m².
const MM2_PER_M2: f64 = 1_000_000.0;

/// Per-sheet breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetStatistics {
    /// 1-based position in the result.
    pub number: usize,
    pub sheet_id: String,
    pub name: String,
    pub material: String,
    pub width: u32,
    pub height: u32,
    /// Number of parts on the sheet.
    pub parts: usize,
    pub used_area_m2: f64,
    pub sheet_area_m2: f64,
    /// Used share in percent.
    pub efficiency: f64,
    /// Aligned share of placements in percent.
    pub grain_compliance: f64,
    pub grain_violations: usize,
    /// Full price of the sheet.
    pub cost: f64,
}

/// Summary of one optimization result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sheets: usize,
    /// Parts in the catalog.
    pub total_parts: usize,
    pub placed_parts: usize,
    /// Placed share of the catalog in percent.
    pub placement_rate: f64,
    pub total_sheet_area: u64,
    pub total_used_area: u64,
    pub total_waste_area: u64,
    /// Used share of all sheets in percent.
    pub material_efficiency: f64,
    /// Sheet cost prorated by utilization.
    pub estimated_cost: f64,
    /// Mean of per-sheet efficiencies in percent.
    pub avg_sheet_efficiency: f64,
    /// Aligned share of all placements in percent.
    pub grain_compliance: f64,
    pub grain_violations: usize,
    pub sheets: Vec<SheetStatistics>,
}

impl Statistics {
    /// Statistics for a catalog of `total_parts` with no result.
    pub fn empty(total_parts: usize) -> Self {
        Self {
            total_sheets: 0,
            total_parts,
            placed_parts: 0,
            placement_rate: 0.0,
            total_sheet_area: 0,
            total_used_area: 0,
            total_waste_area: 0,
            material_efficiency: 0.0,
            estimated_cost: 0.0,
            avg_sheet_efficiency: 0.0,
            grain_compliance: 100.0,
            grain_violations: 0,
            sheets: Vec::new(),
        }
    }

    /// Aggregate `results` for a catalog of `total_parts`.
    pub fn compute(results: &[SheetLayout], total_parts: usize) -> Self {
        if results.is_empty() {
            return Self::empty(total_parts);
        }

        let mut stats = Self::empty(total_parts);
        let mut efficiency_sum = 0.0;

        for (idx, layout) in results.iter().enumerate() {
            let area = layout.area();
            let violations = layout.grain_violations();

            stats.total_sheet_area += area;
            stats.total_used_area += layout.used_area;
            stats.estimated_cost +=
                layout.sheet.cost * ratio_percent(layout.used_area as f64, area as f64) / 100.0;
            stats.placed_parts += layout.placed_parts.len();
            stats.grain_violations += violations;
            efficiency_sum += layout.efficiency;

            stats.sheets.push(SheetStatistics {
                number: idx + 1,
                sheet_id: layout.id().to_string(),
                name: layout.sheet.name.clone(),
                material: layout.sheet.material.label().to_string(),
                width: layout.sheet.width,
                height: layout.sheet.height,
                parts: layout.placed_parts.len(),
                used_area_m2: layout.used_area as f64 / MM2_PER_M2,
                sheet_area_m2: area as f64 / MM2_PER_M2,
                efficiency: layout.efficiency,
                grain_compliance: layout.grain_compliance,
                grain_violations: violations,
                cost: layout.sheet.cost,
            });
        }

        stats.total_sheets = results.len();
        stats.total_waste_area = stats.total_sheet_area.saturating_sub(stats.total_used_area);
        stats.material_efficiency = ratio_percent(stats.total_used_area as f64, stats.total_sheet_area as f64);
        stats.placement_rate = ratio_percent(stats.placed_parts as f64, total_parts as f64);
        stats.avg_sheet_efficiency = efficiency_sum / results.len() as f64;
        if stats.placed_parts > 0 {
            let aligned = stats.placed_parts.saturating_sub(stats.grain_violations);
            stats.grain_compliance = ratio_percent(aligned as f64, stats.placed_parts as f64);
        }

        stats
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sheets={} parts={}/{} ({}) efficiency={} avg={} grain={} ({} violations) cost={:.2}",
            self.total_sheets,
            self.placed_parts,
            self.total_parts,
            format_percent(self.placement_rate, 1),
            format_percent(self.material_efficiency, 2),
            format_percent(self.avg_sheet_efficiency, 1),
            format_percent(self.grain_compliance, 1),
            self.grain_violations,
            self.estimated_cost
        )
    }
}

/// `value` as a percentage string with `decimals` places, e.g. `"87.5%"`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Material, Part, Sheet};

    fn layout(width: u32, height: u32, cost: f64, parts: &[(u32, u32, bool)]) -> SheetLayout {
        let sheet = Sheet::new("s", "Sheet", width, height, cost, Material::parse("ПДЧ 18мм"));
        let mut layout = SheetLayout::from_template(&sheet, "s");
        for (idx, &(w, h, aligned)) in parts.iter().enumerate() {
            let part = Part::new(idx as u64 + 1, "P", w, h, Material::parse("ПДЧ 18мм"));
            layout.place(&part, 0, false, aligned, 0);
        }
        layout.update_metrics();
        layout
    }

    #[test]
    fn test_empty_statistics() {
        let stats = Statistics::compute(&[], 4);
        assert_eq!(stats.total_parts, 4);
        assert_eq!(stats.total_sheets, 0);
        assert_eq!(stats.grain_compliance, 100.0);
        assert_eq!(stats.placement_rate, 0.0);
    }

    #[test]
    fn test_compute_single_sheet() {
        let results = vec![layout(1000, 1000, 100.0, &[(500, 1000, true), (250, 1000, false)])];
        let stats = Statistics::compute(&results, 3);

        assert_eq!(stats.total_sheets, 1);
        assert_eq!(stats.placed_parts, 2);
        assert_eq!(stats.total_sheet_area, 1_000_000);
        assert_eq!(stats.total_used_area, 750_000);
        assert_eq!(stats.total_waste_area, 250_000);
        assert!((stats.material_efficiency - 75.0).abs() < 1e-9);
        assert!((stats.placement_rate - 200.0 / 3.0).abs() < 1e-9);
        assert!((stats.estimated_cost - 75.0).abs() < 1e-9);
        assert!((stats.grain_compliance - 50.0).abs() < 1e-9);
        assert_eq!(stats.grain_violations, 1);

        let sheet = &stats.sheets[0];
        assert_eq!(sheet.number, 1);
        assert_eq!(sheet.parts, 2);
        assert!((sheet.used_area_m2 - 0.75).abs() < 1e-9);
        assert_eq!(sheet.grain_violations, 1);
    }

    #[test]
    fn test_average_efficiency_across_sheets() {
        let results = vec![
            layout(1000, 1000, 0.0, &[(1000, 1000, true)]),
            layout(1000, 1000, 0.0, &[(500, 1000, true)]),
        ];
        let stats = Statistics::compute(&results, 2);
        assert!((stats.avg_sheet_efficiency - 75.0).abs() < 1e-9);
        assert!((stats.material_efficiency - 75.0).abs() < 1e-9);
        assert_eq!(stats.sheets[1].number, 2);
    }

    #[test]
    fn test_compute_tolerates_inconsistent_layouts() {
        let mut overfull = layout(100, 100, 10.0, &[(100, 100, true)]);
        overfull.used_area = 20_000;
        let mut zero = layout(100, 100, 10.0, &[]);
        zero.sheet.width = 0;

        let stats = Statistics::compute(&[overfull, zero], 1);
        assert_eq!(stats.total_sheet_area, 10_000);
        assert_eq!(stats.total_waste_area, 0);
        assert!(stats.estimated_cost.is_finite());
        assert!((stats.estimated_cost - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(100.0, 1), "100.0%");
        assert_eq!(format_percent(33.333, 2), "33.33%");
        assert_eq!(format_percent(0.0, 1), "0.0%");
    }

    #[test]
    fn test_summary_line() {
        let results = vec![layout(1000, 1000, 100.0, &[(500, 1000, true), (250, 1000, false)])];
        let stats = Statistics::compute(&results, 2);
        insta::assert_snapshot!(
            stats.to_string(),
            @"sheets=1 parts=2/2 (100.0%) efficiency=75.00% avg=75.0% grain=50.0% (1 violations) cost=75.00"
        );
    }
}
