//! Data model types for cut-list optimization.

mod grain;
mod material;
mod part;
pub(crate) mod rect;
mod sheet;

pub use grain::{GrainDirection, GrainPreferences, GrainRule};
pub use material::{Material, MaterialKind};
pub use part::{EdgeBanding, Part, PlacedPart};
pub use rect::{split, FreeRect};
pub use sheet::{Sheet, SheetLayout};
