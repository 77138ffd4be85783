//! Post-run checks of layouts and catalogs.

mod validate;

pub use validate::*;
