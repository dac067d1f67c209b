//! egui rendering. Widgets read and edit [`crate::state::AppState`]; all
//! data work is delegated to the library.

pub mod panels;
pub mod plot;
pub mod section;
pub mod table;
