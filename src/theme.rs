use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub bg: Color,
    pub surface: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_accent: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub border: Color,
    pub border_focused: Color,
    pub address_color: Color,
    pub hash_color: Color,
}

pub const THEME: Theme = Theme {
    bg: Color::Rgb(14, 18, 24),
    surface: Color::Rgb(22, 28, 36),
    surface_bright: Color::Rgb(34, 42, 54),
    text: Color::Rgb(222, 226, 232),
    text_muted: Color::Rgb(118, 128, 142),
    text_accent: Color::Rgb(0, 209, 178),
    success: Color::Green,
    error: Color::Red,
    warning: Color::Yellow,
    selected_bg: Color::Rgb(0, 110, 96),
    selected_fg: Color::White,
    border: Color::Rgb(58, 66, 80),
    border_focused: Color::Rgb(0, 209, 178),
    address_color: Color::Rgb(255, 179, 71),
    hash_color: Color::Rgb(150, 150, 180),
};

impl Theme {
    pub const fn header_style(&self) -> Style {
        Style::new().fg(self.text).bg(self.surface)
    }

    pub const fn selected_style(&self) -> Style {
        Style::new().fg(self.selected_fg).bg(self.selected_bg).add_modifier(Modifier::BOLD)
    }

    /// Border for an input that may hold keyboard focus.
    pub const fn focus_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::new().fg(self.border_focused)
        } else {
            Style::new().fg(self.border)
        }
    }

    pub const fn border_style(&self) -> Style {
        self.focus_border_style(false)
    }

    pub const fn muted_style(&self) -> Style {
        Style::new().fg(self.text_muted)
    }

    pub const fn accent_style(&self) -> Style {
        Style::new().fg(self.text_accent)
    }

    pub const fn success_style(&self) -> Style {
        Style::new().fg(self.success)
    }

    pub const fn warning_style(&self) -> Style {
        Style::new().fg(self.warning)
    }

    pub const fn error_style(&self) -> Style {
        Style::new().fg(self.error)
    }

    pub const fn address_style(&self) -> Style {
        Style::new().fg(self.address_color)
    }

    pub const fn hash_style(&self) -> Style {
        Style::new().fg(self.hash_color)
    }

    pub const fn table_header_style(&self) -> Style {
        Style::new().fg(self.text).bg(self.surface_bright).add_modifier(Modifier::BOLD)
    }
}
