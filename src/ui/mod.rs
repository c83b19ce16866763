//! egui rendering. Widgets read and mutate [`crate::state::AppState`]; no
//! data processing happens here.

pub mod panels;
pub mod plot;
pub mod table;
