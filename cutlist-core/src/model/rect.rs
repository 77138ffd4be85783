//! Free rectangle bookkeeping and guillotine splitting.

use serde::{Deserialize, Serialize};

/// An unused axis-aligned region of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FreeRect {
    /// X origin on sheet.
    pub x: u32,
    /// Y origin on sheet.
    pub y: u32,
    /// Rectangle width.
    pub width: u32,
    /// Rectangle height.
    pub height: u32,
}

impl FreeRect {
    /// Create a new rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning a whole sheet.
    pub fn sheet(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Area in mm².
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Get the right edge X coordinate.
    pub fn x_max(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Get the bottom edge Y coordinate.
    pub fn y_max(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Check if a `width` × `height` piece fits at this rectangle's origin.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }

    /// Check if `other` lies fully inside this rectangle.
    pub fn contains(&self, other: &FreeRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x_max() <= self.x_max()
            && other.y_max() <= self.y_max()
    }

    /// Check if two rectangles share interior area. Touching edges do not count.
    pub fn overlaps(&self, other: &FreeRect) -> bool {
        let x_overlap = (self.x as u64) < other.x_max() && (other.x as u64) < self.x_max();
        let y_overlap = (self.y as u64) < other.y_max() && (other.y as u64) < self.y_max();
        x_overlap && y_overlap
    }
}

/// Guillotine split of `rect` after placing a `placed_width` × `placed_height`
/// piece at its origin.
///
/// Returns at most two rectangles, right piece first. When both leftovers are
/// positive the larger leftover decides the cut:
/// - `rem_w >= rem_h`: the right piece keeps the full rectangle height and the
///   bottom piece spans only the placed width.
/// - `rem_w < rem_h`: the right piece spans only the placed height and the
///   bottom piece keeps the full rectangle width.
pub fn split(rect: &FreeRect, placed_width: u32, placed_height: u32) -> Vec<FreeRect> {
    debug_assert!(
        rect.fits(placed_width, placed_height),
        "split of {:?} by oversized {}x{}",
        rect,
        placed_width,
        placed_height
    );

    let rem_w = rect.width.saturating_sub(placed_width);
    let rem_h = rect.height.saturating_sub(placed_height);
    let right_x = rect.x + placed_width;
    let bottom_y = rect.y + placed_height;

    match (rem_w > 0, rem_h > 0) {
        (true, true) if rem_w >= rem_h => vec![
            FreeRect::new(right_x, rect.y, rem_w, rect.height),
            FreeRect::new(rect.x, bottom_y, placed_width, rem_h),
        ],
        (true, true) => vec![
            FreeRect::new(right_x, rect.y, rem_w, placed_height),
            FreeRect::new(rect.x, bottom_y, rect.width, rem_h),
        ],
        (true, false) => vec![FreeRect::new(right_x, rect.y, rem_w, rect.height)],
        (false, true) => vec![FreeRect::new(rect.x, bottom_y, rect.width, rem_h)],
        (false, false) => Vec::new(),
    }
}
