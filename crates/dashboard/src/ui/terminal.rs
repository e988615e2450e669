//! Raw-mode lifecycle of the dashboard terminal.

use std::{
    io::{self, Stdout, stdout},
    panic,
    sync::Once,
};

use crossterm::{
    cursor,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::Result;

pub type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Enters raw mode on the alternate screen. A panic while the dashboard runs
/// leaves the alternate screen before the panic message is printed.
pub fn setup_terminal() -> Result<DashboardTerminal> {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = leave_screen();
            previous(info);
        }));
    });

    enable_raw_mode()?;
    let mut stdout = stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut DashboardTerminal) -> Result<()> {
    leave_screen()?;
    terminal.show_cursor()?;
    Ok(())
}

fn leave_screen() -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(stdout(), LeaveAlternateScreen, cursor::Show)
}
