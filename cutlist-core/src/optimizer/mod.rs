//! Cut-list optimizer: part and sheet catalog plus the placement engine.

mod engine;
mod scoring;
mod sorting;

pub use engine::{find_best_candidate, run, Candidate, PlacementOutcome};
pub use scoring::{base_score, placement_score};
pub use sorting::{compare, sort_parts};

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::{Settings, DEFAULT_MAX_USAGE_PERCENT, DEFAULT_PRIORITY};
use crate::error::{CutlistError, Result};
use crate::model::{EdgeBanding, GrainDirection, GrainPreferences, Material, Part, Sheet, SheetLayout};
use crate::project::ProjectSnapshot;
use crate::report::{generate_cutting_list, CuttingList};
use crate::statistics::Statistics;

/// Optional attributes for [`Optimizer::add_part`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartOptions {
    /// Explicit grain. `None` detects it from the material.
    pub grain_direction: Option<GrainDirection>,
    pub allow_rotation: bool,
    pub priority: i32,
    pub edge_banding: EdgeBanding,
}

impl Default for PartOptions {
    fn default() -> Self {
        Self {
            grain_direction: None,
            allow_rotation: true,
            priority: DEFAULT_PRIORITY,
            edge_banding: EdgeBanding::default(),
        }
    }
}

/// Optional attributes for [`Optimizer::add_sheet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetOptions {
    /// Explicit grain. `None` detects it from the material.
    pub grain_direction: Option<GrainDirection>,
    pub max_usage_percent: f64,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            grain_direction: None,
            max_usage_percent: DEFAULT_MAX_USAGE_PERCENT,
        }
    }
}

/// Optimizer state: catalog, settings, grain table and the last result.
///
/// Any catalog change discards the last result.
#[derive(Debug, Clone)]
pub struct Optimizer {
    settings: Settings,
    grain_preferences: GrainPreferences,
    parts: Vec<Part>,
    sheets: Vec<Sheet>,
    results: Vec<SheetLayout>,
    unplaced: Vec<u64>,
    next_part_id: u64,
    next_sheet_id: u64,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl Optimizer {
    /// Create an empty optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty optimizer with `settings`.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            grain_preferences: GrainPreferences::default(),
            parts: Vec::new(),
            sheets: Vec::new(),
            results: Vec::new(),
            unplaced: Vec::new(),
            next_part_id: 1,
            next_sheet_id: 1,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn grain_preferences(&self) -> &GrainPreferences {
        &self.grain_preferences
    }

    /// Replace the grain table. Already added parts keep their grain.
    pub fn set_grain_preferences(&mut self, preferences: GrainPreferences) {
        self.grain_preferences = preferences;
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheets of the last run, by descending efficiency.
    pub fn results(&self) -> &[SheetLayout] {
        &self.results
    }

    /// Ids of parts the last run could not place.
    pub fn unplaced(&self) -> &[u64] {
        &self.unplaced
    }

    /// Add `quantity` copies of a part. Returns the updated part catalog.
    pub fn add_part(
        &mut self,
        name: &str,
        width: i64,
        height: i64,
        quantity: u32,
        material: &str,
        options: PartOptions,
    ) -> Result<&[Part]> {
        let width = validate_dimension("width", width)?;
        let height = validate_dimension("height", height)?;
        if quantity == 0 {
            return Err(CutlistError::InvalidQuantity { value: quantity });
        }

        let material = Material::parse(material);
        let grain_direction = options
            .grain_direction
            .unwrap_or_else(|| self.grain_preferences.detect(material.label(), width, height));

        for _ in 0..quantity {
            let mut part = Part::new(self.next_part_id, name, width, height, material.clone());
            part.grain_direction = grain_direction;
            part.allow_rotation = options.allow_rotation;
            part.priority = options.priority;
            part.edge_banding = options.edge_banding;
            self.parts.push(part);
            self.next_part_id += 1;
        }

        debug!(
            "Added {}x '{}' {}x{} {} (grain {})",
            quantity, name, width, height, material, grain_direction
        );
        self.invalidate();
        Ok(&self.parts)
    }

    /// Add a sheet template. Returns the updated sheet catalog.
    pub fn add_sheet(
        &mut self,
        name: &str,
        width: i64,
        height: i64,
        cost: f64,
        material: &str,
        options: SheetOptions,
    ) -> Result<&[Sheet]> {
        let width = validate_dimension("width", width)?;
        let height = validate_dimension("height", height)?;
        if !cost.is_finite() || cost < 0.0 {
            return Err(CutlistError::InvalidCost { value: cost });
        }

        let material = Material::parse(material);
        let id = format!("sheet-{}", self.next_sheet_id);
        self.next_sheet_id += 1;

        let mut sheet = Sheet::new(id, name, width, height, cost, material);
        sheet.grain_direction = options.grain_direction.unwrap_or_else(|| {
            self.grain_preferences
                .detect(sheet.material.label(), width, height)
        });
        sheet.max_usage_percent = options.max_usage_percent;

        debug!(
            "Added sheet {} '{}' {}x{} {} (grain {})",
            sheet.id, name, width, height, sheet.material, sheet.grain_direction
        );
        self.sheets.push(sheet);
        self.invalidate();
        Ok(&self.sheets)
    }

    /// Remove a part from the catalog.
    pub fn remove_part(&mut self, id: u64) -> Result<Part> {
        let index = self
            .parts
            .iter()
            .position(|p| p.id == id)
            .ok_or(CutlistError::PartNotFound { id })?;
        self.invalidate();
        Ok(self.parts.remove(index))
    }

    /// Remove a sheet template from the catalog.
    pub fn remove_sheet(&mut self, id: &str) -> Result<Sheet> {
        let index = self
            .sheets
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CutlistError::SheetNotFound { id: id.to_string() })?;
        self.invalidate();
        Ok(self.sheets.remove(index))
    }

    /// Drop parts, sheets and results. Settings and the grain table stay.
    pub fn clear(&mut self) {
        self.parts.clear();
        self.sheets.clear();
        self.invalidate();
        self.next_part_id = 1;
        self.next_sheet_id = 1;
    }

    /// Run the placement engine over the current catalog.
    pub fn calculate_optimization(&mut self) -> &[SheetLayout] {
        let outcome = run(&self.parts, &self.sheets, &self.settings);

        let placed: HashSet<u64> = outcome
            .sheets
            .iter()
            .flat_map(|s| s.placed_parts.iter().map(|p| p.part.id))
            .collect();
        for part in &mut self.parts {
            part.placed = placed.contains(&part.id);
        }

        info!(
            "Placed {}/{} parts on {} sheet(s) ({}, {})",
            placed.len(),
            self.parts.len(),
            outcome.sheets.len(),
            self.settings.heuristic,
            self.settings.sorting_method
        );
        if !outcome.unplaced.is_empty() {
            warn!("{} part(s) could not be placed", outcome.unplaced.len());
        }

        self.results = outcome.sheets;
        self.unplaced = outcome.unplaced;
        &self.results
    }

    /// Statistics of the last run, running the optimizer first if there is
    /// no result yet and the catalog has parts.
    pub fn get_statistics(&mut self) -> Statistics {
        self.ensure_results();
        self.statistics()
    }

    /// Statistics of the last run without running anything.
    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.results, self.parts.len())
    }

    /// Cutting list of the last run, running the optimizer first if needed.
    pub fn generate_cutting_list(&mut self) -> CuttingList {
        self.ensure_results();
        generate_cutting_list(&self.parts, &self.results)
    }

    /// Snapshot of the full state. `exported_at` is left unset.
    pub fn export_project(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            settings: Some(self.settings.clone()),
            grain_preferences: Some(self.grain_preferences.clone()),
            parts: self.parts.clone(),
            sheets: self.sheets.clone(),
            results: self.results.clone(),
            ..Default::default()
        }
    }

    /// Replace the state with `snapshot`.
    ///
    /// Unknown versions and degenerate parts, sheets or results are rejected
    /// without touching the current state.
    /// Missing settings or grain tables keep the current ones.
    pub fn import_project(&mut self, snapshot: ProjectSnapshot) -> Result<()> {
        if !snapshot.is_supported() {
            warn!("Rejected project with version '{}'", snapshot.version);
            return Err(CutlistError::UnsupportedVersion {
                version: snapshot.version,
            });
        }
        check_snapshot(&snapshot)?;

        if let Some(settings) = snapshot.settings {
            self.settings = settings;
        }
        if let Some(preferences) = snapshot.grain_preferences {
            self.grain_preferences = preferences;
        }
        self.parts = snapshot.parts;
        self.sheets = snapshot.sheets;
        self.results = snapshot.results;

        let placed: HashSet<u64> = self
            .results
            .iter()
            .flat_map(|s| s.placed_parts.iter().map(|p| p.part.id))
            .collect();
        self.unplaced = if self.results.is_empty() {
            Vec::new()
        } else {
            self.parts
                .iter()
                .filter(|p| !placed.contains(&p.id))
                .map(|p| p.id)
                .collect()
        };

        self.next_part_id = self.parts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        self.next_sheet_id = self
            .sheets
            .iter()
            .filter_map(|s| s.id.strip_prefix("sheet-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            .max(self.sheets.len() as u64)
            + 1;

        info!(
            "Imported project v{}: {} part(s), {} sheet(s), {} result sheet(s)",
            snapshot.version,
            self.parts.len(),
            self.sheets.len(),
            self.results.len()
        );
        Ok(())
    }

    fn ensure_results(&mut self) {
        if self.results.is_empty() && !self.parts.is_empty() {
            self.calculate_optimization();
        }
    }

    fn invalidate(&mut self) {
        self.results.clear();
        self.unplaced.clear();
    }
}

fn validate_dimension(field: &'static str, value: i64) -> Result<u32> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(CutlistError::InvalidDimension { field, value }),
    }
}

fn check_size(width: u32, height: u32) -> Result<()> {
    validate_dimension("width", width as i64)?;
    validate_dimension("height", height as i64)?;
    Ok(())
}

fn check_sheet(sheet: &Sheet) -> Result<()> {
    check_size(sheet.width, sheet.height)?;
    if !sheet.cost.is_finite() || sheet.cost < 0.0 {
        return Err(CutlistError::InvalidCost { value: sheet.cost });
    }
    Ok(())
}

/// Apply the catalog input rules to everything an imported snapshot carries.
fn check_snapshot(snapshot: &ProjectSnapshot) -> Result<()> {
    for part in &snapshot.parts {
        check_size(part.width, part.height)?;
    }
    for sheet in &snapshot.sheets {
        check_sheet(sheet)?;
    }
    for layout in &snapshot.results {
        check_sheet(&layout.sheet)?;
        for placed in &layout.placed_parts {
            check_size(placed.placed_width, placed.placed_height)?;
        }
        if layout.used_area > layout.area() {
            return Err(CutlistError::InvalidValue {
                field: "usedArea".into(),
                expected: format!("at most {} mm² on sheet {}", layout.area(), layout.id()),
                value: layout.used_area.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    fn kitchen() -> Optimizer {
        let mut opt = Optimizer::new();
        opt.add_sheet("Egger бял", 2800, 2070, 80.0, "ПДЧ 18мм", SheetOptions::default())
            .unwrap();
        opt.add_part("Side", 720, 560, 2, "ПДЧ 18мм", PartOptions::default())
            .unwrap();
        opt.add_part("Shelf", 764, 500, 3, "ПДЧ 18мм", PartOptions::default())
            .unwrap();
        opt
    }

    // ==================== catalog tests ====================

    #[test]
    fn test_add_part_expands_quantity() {
        let mut opt = Optimizer::new();
        let parts = opt
            .add_part("Door", 716, 396, 3, "МДФ 18мм", PartOptions::default())
            .unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(parts.iter().all(|p| p.name == "Door" && !p.placed));
        assert_eq!(parts[0].material.thickness_mm(), Some(18));
    }

    #[test]
    fn test_add_part_rejects_bad_input() {
        let mut opt = Optimizer::new();
        let err = opt
            .add_part("Bad", 0, 100, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidDimension);

        let err = opt
            .add_part("Bad", 100, -5, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap_err();
        assert!(matches!(err, CutlistError::InvalidDimension { field: "height", value: -5 }));

        let err = opt
            .add_part("Bad", 100, 100, 0, "ПДЧ 18мм", PartOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidQuantity);

        let err = opt
            .add_part("Bad", i64::from(u32::MAX) + 1, 100, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidDimension);
        assert!(opt.parts().is_empty());
    }

    #[test]
    fn test_add_part_detects_grain() {
        let mut opt = Optimizer::new();
        opt.add_part("Top", 800, 400, 1, "Масив дъб 20мм", PartOptions::default())
            .unwrap();
        opt.add_part("Leg", 50, 700, 1, "Масив дъб 20мм", PartOptions::default())
            .unwrap();
        opt.add_part("Carcass", 800, 400, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap();
        let explicit = PartOptions {
            grain_direction: Some(GrainDirection::Vertical),
            ..Default::default()
        };
        opt.add_part("Panel", 800, 400, 1, "ХДЛ 3мм", explicit).unwrap();

        let grains: Vec<GrainDirection> = opt.parts().iter().map(|p| p.grain_direction).collect();
        assert_eq!(
            grains,
            vec![
                GrainDirection::Horizontal,
                GrainDirection::Vertical,
                GrainDirection::Any,
                GrainDirection::Vertical
            ]
        );
    }

    #[test]
    fn test_add_sheet_ids_and_validation() {
        let mut opt = Optimizer::new();
        opt.add_sheet("A", 2800, 2070, 80.0, "ПДЧ 18мм", SheetOptions::default())
            .unwrap();
        let sheets = opt
            .add_sheet("B", 2440, 1220, 120.0, "Шперплат 12мм", SheetOptions::default())
            .unwrap();
        assert_eq!(sheets.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["sheet-1", "sheet-2"]);
        assert_eq!(sheets[1].max_usage_percent, 95.0);

        let err = opt
            .add_sheet("C", 2800, 2070, -1.0, "ПДЧ 18мм", SheetOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCost);
        let err = opt
            .add_sheet("C", 2800, 2070, f64::NAN, "ПДЧ 18мм", SheetOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCost);
        assert_eq!(opt.sheets().len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut opt = kitchen();
        opt.calculate_optimization();
        assert!(!opt.results().is_empty());

        let removed = opt.remove_part(1).unwrap();
        assert_eq!(removed.name, "Side");
        assert!(opt.results().is_empty());
        assert!(matches!(opt.remove_part(1), Err(CutlistError::PartNotFound { id: 1 })));

        opt.remove_sheet("sheet-1").unwrap();
        assert!(matches!(
            opt.remove_sheet("sheet-1"),
            Err(CutlistError::SheetNotFound { .. })
        ));

        opt.clear();
        assert!(opt.parts().is_empty());
        let parts = opt
            .add_part("Side", 720, 560, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap();
        assert_eq!(parts[0].id, 1);
    }

    // ==================== run tests ====================

    #[test]
    fn test_calculate_optimization_marks_parts() {
        let mut opt = kitchen();
        opt.add_part("Huge", 5000, 5000, 1, "ПДЧ 18мм", PartOptions::default())
            .unwrap();

        let results = opt.calculate_optimization();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].placed_parts.len(), 5);

        assert_eq!(opt.unplaced(), &[6]);
        let placed: Vec<bool> = opt.parts().iter().map(|p| p.placed).collect();
        assert_eq!(placed, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn test_get_statistics_runs_when_needed() {
        let mut opt = kitchen();
        assert_eq!(opt.statistics().total_sheets, 0);

        let stats = opt.get_statistics();
        assert_eq!(stats.total_parts, 5);
        assert_eq!(stats.placed_parts, 5);
        assert_eq!(stats, opt.get_statistics());
    }

    #[test]
    fn test_statistics_without_parts() {
        let mut opt = Optimizer::new();
        let stats = opt.get_statistics();
        assert_eq!(stats, Statistics::empty(0));
    }

    #[test]
    fn test_cutting_list_runs_when_needed() {
        let mut opt = kitchen();
        let list = opt.generate_cutting_list();
        assert_eq!(list.sheets.len(), 1);
        assert_eq!(list.by_material["ПДЧ 18мм"].len(), 2);
        assert_eq!(list.summary.placed_parts, 5);
    }

    // ==================== project tests ====================

    #[test]
    fn test_export_import_round_trip() {
        let mut opt = kitchen();
        opt.settings_mut().heuristic = crate::config::Heuristic::BestShortSideFit;
        opt.calculate_optimization();
        let snapshot = opt.export_project();
        assert_eq!(snapshot.version, "3.0");
        assert!(snapshot.exported_at.is_none());

        let mut restored = Optimizer::new();
        restored.import_project(snapshot.clone()).unwrap();
        assert_eq!(restored.export_project(), snapshot);

        // Ids continue after the imported ones
        let parts = restored
            .add_part("Back", 700, 300, 1, "ХДЛ 3мм", PartOptions::default())
            .unwrap();
        assert_eq!(parts.last().map(|p| p.id), Some(6));
        let sheets = restored
            .add_sheet("HDF", 2440, 1220, 20.0, "ХДЛ 3мм", SheetOptions::default())
            .unwrap();
        assert_eq!(sheets.last().map(|s| s.id.as_str()), Some("sheet-2"));
    }

    #[test]
    fn test_import_rejects_unknown_version() {
        let mut opt = kitchen();
        let before = opt.export_project();

        let mut snapshot = ProjectSnapshot::default();
        snapshot.version = "0.9".into();
        let err = opt.import_project(snapshot).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedVersion);
        assert_eq!(opt.export_project(), before);
    }

    #[test]
    fn test_import_rejects_zero_width_part() {
        let mut opt = kitchen();
        let before = opt.export_project();

        let snapshot = ProjectSnapshot::from_json(
            r#"{
                "version": "3.0",
                "parts": [
                    {"id": 1, "name": "Flat", "width": 0, "height": 600, "material": "ПДЧ 18мм"},
                    {"id": 2, "name": "Side", "width": 500, "height": 600, "material": "ПДЧ 18мм"}
                ],
                "sheets": [
                    {"id": "sheet-1", "name": "Egger", "width": 1000, "height": 1000,
                     "cost": 50.0, "material": "ПДЧ 18мм"}
                ]
            }"#,
        )
        .unwrap();
        let err = opt.import_project(snapshot).unwrap_err();
        assert!(matches!(err, CutlistError::InvalidDimension { field: "width", value: 0 }));
        assert_eq!(opt.export_project(), before);
    }

    #[test]
    fn test_import_rejects_bad_sheets() {
        let mut opt = Optimizer::new();

        let mut snapshot = ProjectSnapshot::default();
        snapshot.sheets.push(Sheet::new("sheet-1", "Egger", 1000, 0, 50.0, Material::parse("ПДЧ 18мм")));
        let err = opt.import_project(snapshot).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidDimension);

        let mut snapshot = ProjectSnapshot::default();
        snapshot.sheets.push(Sheet::new("sheet-1", "Egger", 1000, 1000, -1.0, Material::parse("ПДЧ 18мм")));
        let err = opt.import_project(snapshot).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCost);
        assert!(opt.sheets().is_empty());
    }

    #[test]
    fn test_import_rejects_overfull_result() {
        let mut opt = Optimizer::new();
        let template = Sheet::new("sheet-1", "Offcut", 100, 100, 5.0, Material::parse("ПДЧ 18мм"));
        let mut layout = SheetLayout::from_template(&template, "sheet-1");
        layout.used_area = 20_000;

        let mut snapshot = ProjectSnapshot::default();
        snapshot.sheets.push(template);
        snapshot.results.push(layout);
        let err = opt.import_project(snapshot).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
        assert!(opt.results().is_empty());
        assert_eq!(opt.get_statistics(), Statistics::empty(0));
    }

    #[test]
    fn test_import_without_settings_keeps_current() {
        let mut opt = Optimizer::new();
        opt.settings_mut().allow_rotation = false;
        let snapshot = ProjectSnapshot::from_json(r#"{"version": "1.0", "parts": []}"#).unwrap();
        opt.import_project(snapshot).unwrap();
        assert!(!opt.settings().allow_rotation);
        assert_eq!(opt.grain_preferences(), &GrainPreferences::default());
    }
}
