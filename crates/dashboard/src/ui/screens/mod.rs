pub mod dashboard;
pub mod form;
