//! Configuration constants and optimizer settings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CutlistError;

/// Default blade width in mm (advisory, not subtracted from cuts).
pub const DEFAULT_CUTTING_BLADE_WIDTH: u32 = 4;

/// Free rectangles smaller than this (mm²) are dropped as unusable remnants.
pub const DEFAULT_MIN_WASTE_AREA: u64 = 10_000;

/// Fraction of the part area added to the score of a grain-violating placement.
pub const DEFAULT_GRAIN_PENALTY_FACTOR: f64 = 0.5;

/// Default part priority.
pub const DEFAULT_PRIORITY: i32 = 5;

/// Default maximum usable share of a sheet, in percent (informational).
pub const DEFAULT_MAX_USAGE_PERCENT: f64 = 95.0;

/// Default material label for parts and sheets.
pub const DEFAULT_MATERIAL: &str = "ПДЧ 18мм";

/// Score reduction per priority point.
pub const PRIORITY_BONUS: f64 = 50.0;

/// Leftover strips narrower than this (mm) are penalized.
pub const EDGE_WASTE_LIMIT: f64 = 50.0;

/// Score added per mm of a penalized leftover strip.
pub const EDGE_WASTE_PENALTY: f64 = 10.0;

/// Weight of the leftover perimeter in the guillotine-standard heuristic.
pub const GUILLOTINE_PERIMETER_WEIGHT: f64 = 100.0;

/// Parts whose `y` differs by less than this (mm) share a row in the cut sequence.
pub const CUT_ROW_TOLERANCE: u32 = 10;

/// Order in which parts are fed to the placement loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortingMethod {
    /// Longest side first.
    MaxSide,
    /// Widest first.
    Width,
    /// Tallest first.
    Height,
    /// Horizontal-grain parts first, then by area.
    Grain,
    /// Highest priority first, then by area.
    Priority,
    /// Largest area first. Unknown names fall back here.
    #[default]
    #[serde(other)]
    Area,
}

impl FromStr for SortingMethod {
    type Err = CutlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "area" => Ok(SortingMethod::Area),
            "maxside" | "max-side" => Ok(SortingMethod::MaxSide),
            "width" => Ok(SortingMethod::Width),
            "height" => Ok(SortingMethod::Height),
            "grain" => Ok(SortingMethod::Grain),
            "priority" => Ok(SortingMethod::Priority),
            _ => Err(CutlistError::InvalidValue {
                field: "sortingMethod".into(),
                expected: "area, maxside, width, height, grain or priority".into(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SortingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortingMethod::Area => "area",
            SortingMethod::MaxSide => "maxside",
            SortingMethod::Width => "width",
            SortingMethod::Height => "height",
            SortingMethod::Grain => "grain",
            SortingMethod::Priority => "priority",
        };
        write!(f, "{}", name)
    }
}

/// Base scoring rule for a candidate placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heuristic {
    /// Smallest leftover area.
    #[default]
    #[serde(rename = "BAF")]
    BestAreaFit,
    /// Smallest short leftover side.
    #[serde(rename = "BSSF")]
    BestShortSideFit,
    /// Smallest long leftover side.
    #[serde(rename = "BLSF")]
    BestLongSideFit,
    /// Leftover area plus a perimeter term against long thin leftovers.
    #[serde(rename = "guillotine", other)]
    GuillotineStandard,
}

impl FromStr for Heuristic {
    type Err = CutlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baf" => Ok(Heuristic::BestAreaFit),
            "bssf" => Ok(Heuristic::BestShortSideFit),
            "blsf" => Ok(Heuristic::BestLongSideFit),
            "guillotine" => Ok(Heuristic::GuillotineStandard),
            _ => Err(CutlistError::InvalidValue {
                field: "heuristic".into(),
                expected: "BAF, BSSF, BLSF or guillotine".into(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heuristic::BestAreaFit => write!(f, "BAF"),
            Heuristic::BestShortSideFit => write!(f, "BSSF"),
            Heuristic::BestLongSideFit => write!(f, "BLSF"),
            Heuristic::GuillotineStandard => write!(f, "guillotine"),
        }
    }
}

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Global rotation switch.
    pub allow_rotation: bool,
    /// Enforce grain alignment rules.
    pub respect_grain_direction: bool,
    /// Saw blade width in mm. Advisory only: fit and split math ignore it.
    pub cutting_blade_width: u32,
    /// Minimum area (mm²) for a free rectangle to stay tracked.
    pub min_waste_area: u64,
    /// Part ordering before placement.
    pub sorting_method: SortingMethod,
    /// Candidate scoring rule.
    pub heuristic: Heuristic,
    /// Multiplier of part area added for grain-violating placements.
    pub grain_penalty_factor: f64,
    /// Open extra sheet instances when a part fits nowhere.
    pub allow_new_sheets: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            respect_grain_direction: true,
            cutting_blade_width: DEFAULT_CUTTING_BLADE_WIDTH,
            min_waste_area: DEFAULT_MIN_WASTE_AREA,
            sorting_method: SortingMethod::default(),
            heuristic: Heuristic::default(),
            grain_penalty_factor: DEFAULT_GRAIN_PENALTY_FACTOR,
            allow_new_sheets: true,
        }
    }
}

impl Settings {
    /// Settings with grain rules switched off.
    pub fn ignoring_grain() -> Self {
        Self {
            respect_grain_direction: false,
            ..Default::default()
        }
    }
}
