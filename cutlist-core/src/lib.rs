//! cutlist-core - Core library for guillotine cut-list optimization.
//!
//! This library places rectangular furniture parts onto stock sheets with a
//! greedy best-fit guillotine packer that respects panel material, wood grain
//! and rotation rules, and derives statistics and cutting lists from the result.
//!
//! # Example
//!
//! ```no_run
//! use cutlist_core::{Optimizer, PartOptions, SheetOptions};
//!
//! let mut optimizer = Optimizer::new();
//! optimizer
//!     .add_sheet("Egger W980", 2800, 2070, 80.0, "ПДЧ 18мм", SheetOptions::default())
//!     .unwrap();
//! optimizer
//!     .add_part("Side", 720, 560, 2, "ПДЧ 18мм", PartOptions::default())
//!     .unwrap();
//! optimizer.calculate_optimization();
//! println!("{}", optimizer.get_statistics());
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod project;
pub mod report;
pub mod rules;
pub mod statistics;
pub mod validation;

// Re-exports for convenience
pub use config::{Heuristic, Settings, SortingMethod};
pub use error::{CutlistError, ErrorCode, Result};
pub use model::{
    EdgeBanding, FreeRect, GrainDirection, GrainPreferences, Material, MaterialKind, Part,
    PlacedPart, Sheet, SheetLayout,
};
pub use optimizer::{Optimizer, PartOptions, SheetOptions};
pub use project::ProjectSnapshot;
pub use report::CuttingList;
pub use statistics::Statistics;
pub use validation::{validate_layout, ValidationResult};

/// Load a project file into a fresh optimizer without running it.
pub fn load_project(input_path: &std::path::Path) -> Result<Optimizer> {
    let snapshot = ProjectSnapshot::load(input_path)?;
    let mut optimizer = Optimizer::new();
    optimizer.import_project(snapshot)?;
    Ok(optimizer)
}

/// Optimize a project file.
///
/// This is the main high-level function that performs the full pipeline:
/// 1. Load and import the project snapshot
/// 2. Run the optimizer with the project's settings
/// 3. Validate the result
///
/// Validation findings are logged; the optimizer is returned either way so
/// the caller can inspect the result.
pub fn optimize_project(input_path: &std::path::Path) -> Result<Optimizer> {
    let mut optimizer = load_project(input_path)?;
    optimizer.calculate_optimization();

    let validation = validate_layout(optimizer.results(), optimizer.settings());
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    for error in &validation.errors {
        tracing::error!("{}", error);
    }

    Ok(optimizer)
}
