use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub accent: Color,
    pub positive: Color,
    pub warning: Color,
    pub negative: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(10, 12, 18),
            panel: Color::Rgb(22, 26, 34),
            text: Color::Rgb(215, 218, 222),
            text_muted: Color::Rgb(130, 135, 145),
            border: Color::Rgb(60, 66, 78),
            accent: Color::Rgb(95, 155, 185),
            positive: Color::Rgb(110, 180, 110),
            warning: Color::Rgb(210, 170, 80),
            negative: Color::Rgb(205, 95, 95),
            error: Color::Rgb(205, 95, 95),
        }
    }
}
