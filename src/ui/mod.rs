//! Terminal UI: widgets, screens and modal overlays

pub mod contributors;
pub mod dialogs;
pub mod field;
pub mod wizard_view;
