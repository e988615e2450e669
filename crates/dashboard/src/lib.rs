//! Terminal controller for the expense tracker dashboard.
//!
//! The [`dashboard::Dashboard`] controller is independent from the terminal:
//! it talks to the backend through [`client::Client`], keeps the filter and
//! period state and rebuilds the render targets in [`views`]. The [`app`] and
//! [`ui`] modules put a ratatui front end on top of it.

pub mod app;
pub mod client;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod query;
pub mod state;
pub mod ui;
pub mod views;

pub use dashboard::{Dashboard, DashboardError, Outcome};
