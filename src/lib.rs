//! Bolsa - terminal client for the Bolsa de Empleo Inclusiva job board
//!
//! Multi-step posting and registration wizards with inclusive-language
//! validation, plus a project contributors view.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod ui;
pub mod wizard;
