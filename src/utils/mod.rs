//! Utility helpers

pub mod app_paths;
