//! egui front end for the quality predictor.

/// Artifact cache and the predict action.
pub mod controller;
/// Form values and their bounds.
pub mod state;
/// eframe application rendering the form.
pub mod ui;
