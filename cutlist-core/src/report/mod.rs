//! Cutting-list projection of an optimization result.

mod cutting_list;

pub use cutting_list::{
    cut_sequence, generate_cutting_list, CutListPart, CutStep, CuttingList, MaterialEntry,
    SheetCutList,
};
