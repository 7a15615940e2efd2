//! U.S. city affordability explorer.
//!
//! `data` loads and filters the city table, `color` maps a metric onto the
//! marker palette, `state` ties both to the egui front end in `app` / `ui`.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
