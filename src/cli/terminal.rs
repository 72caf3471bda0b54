//! Terminal styling for command output

use std::fmt::Display;

use owo_colors::{OwoColorize, Style};

/// Colors are only used when stdout is a color-capable terminal
fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn paint(text: String, style: Style) -> String {
    if color_enabled() {
        text.style(style).to_string()
    } else {
        text
    }
}

/// Extension trait for styling displayable values
pub trait Colorize: Display {
    /// Facts in good standing (green)
    fn good(&self) -> String {
        paint(self.to_string(), Style::new().green())
    }

    /// Facts that need attention, such as liquidations (yellow)
    fn alert(&self) -> String {
        paint(self.to_string(), Style::new().yellow())
    }

    /// Headings and secondary details
    fn muted(&self) -> String {
        paint(self.to_string(), Style::new().dimmed())
    }
}

impl<T: Display + ?Sized> Colorize for T {}
