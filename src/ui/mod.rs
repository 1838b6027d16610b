//! egui rendering. Every widget reads from [`crate::state::AppState`]; no
//! data logic lives here.

pub mod panels;
pub mod plot;
pub mod tables;
