pub mod charts;
pub mod hints;
pub mod panel;
pub mod toast;
