pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::Frame;

use crate::{
    app::{AppState, Mode},
    dashboard::Dashboard,
};

pub use terminal::{DashboardTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, dashboard: &Dashboard, state: &AppState) {
    let area = frame.area();
    screens::dashboard::render(frame, area, dashboard, state);

    match &state.mode {
        Mode::Browse => {}
        Mode::Form(form) => screens::form::render(frame, area, form, dashboard.categories()),
        Mode::ConfirmDelete { title, .. } => screens::form::render_confirm(frame, area, title),
    }

    components::toast::render(frame, area, state.toast.as_ref());
}
