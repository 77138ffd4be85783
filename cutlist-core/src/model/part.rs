//! Part definitions: the rectangular pieces to be cut.

use serde::{Deserialize, Serialize};

use super::{FreeRect, GrainDirection, Material};
use crate::config::DEFAULT_PRIORITY;

/// Which part edges receive edge banding. Carried through for the cutting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeBanding {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl EdgeBanding {
    /// Banding on all four edges.
    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    /// Number of banded edges.
    pub fn count(&self) -> usize {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .filter(|&&b| b)
            .count()
    }
}

/// A single physical piece to cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Unique part id within the catalog.
    pub id: u64,
    /// Display name shared by all copies of an entry.
    pub name: String,
    /// Nominal width before rotation (mm).
    pub width: u32,
    /// Nominal height before rotation (mm).
    pub height: u32,
    /// Panel material.
    pub material: Material,
    /// Grain orientation of the unrotated part.
    #[serde(default)]
    pub grain_direction: GrainDirection,
    /// Per-part rotation switch.
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
    /// Placement priority, higher is placed preferentially.
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Edge banding flags.
    #[serde(default)]
    pub edge_banding: EdgeBanding,
    /// Whether the last run placed this part.
    #[serde(default)]
    pub placed: bool,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl Part {
    /// Create an unplaced part with default options.
    pub fn new(id: u64, name: impl Into<String>, width: u32, height: u32, material: Material) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            material,
            grain_direction: GrainDirection::Any,
            allow_rotation: true,
            priority: DEFAULT_PRIORITY,
            edge_banding: EdgeBanding::default(),
            placed: false,
        }
    }

    /// Area in mm².
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Longer of the two sides.
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Placed (width, height), swapped when rotated.
    pub fn dimensions(&self, rotated: bool) -> (u32, u32) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// A part assigned to a sheet position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPart {
    /// The placed part.
    #[serde(flatten)]
    pub part: Part,
    /// Id of the sheet instance holding the part.
    pub sheet_id: String,
    /// X origin on sheet.
    pub x: u32,
    /// Y origin on sheet.
    pub y: u32,
    /// Whether the part was turned 90°.
    pub rotated: bool,
    /// Effective width on the sheet.
    pub placed_width: u32,
    /// Effective height on the sheet.
    pub placed_height: u32,
    /// Whether the placement satisfies the grain rules.
    pub grain_aligned: bool,
}

impl PlacedPart {
    /// Sheet region covered by the part.
    pub fn footprint(&self) -> FreeRect {
        FreeRect::new(self.x, self.y, self.placed_width, self.placed_height)
    }

    /// Covered area in mm².
    pub fn placed_area(&self) -> u64 {
        self.placed_width as u64 * self.placed_height as u64
    }
}
