use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub panel: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(90, 180, 110),
            warning: Color::Rgb(220, 170, 60),
            error: Color::Rgb(200, 80, 80),
        }
    }
}
