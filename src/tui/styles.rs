use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Purpose of a dialog action or notification. Only affects colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Info,
    Success,
    Warning,
}

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent for tabs, focused buttons and borders
    pub primary: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    /// Selected table row
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(2, 136, 209),      // Light blue 700

            text: Color::Rgb(248, 250, 252),       // Slate-50
            text_dim: Color::Rgb(148, 163, 184),   // Slate-400
            text_bright: Color::Rgb(255, 255, 255),

            background: Color::Rgb(15, 23, 42),    // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800

            border: Color::Rgb(71, 85, 105),       // Slate-600
            border_focused: Color::Rgb(2, 136, 209),

            success: Color::Rgb(34, 197, 94),      // Green-500
            warning: Color::Rgb(245, 158, 11),     // Amber-500
            error: Color::Rgb(239, 68, 68),        // Red-500
            info: Color::Rgb(59, 130, 246),        // Blue-500

            selection: Color::Rgb(30, 58, 138),    // Blue-900
        }
    }

    /// Color associated with a severity
    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.error,
            Severity::Info => self.info,
            Severity::Success => self.success,
            Severity::Warning => self.warning,
        }
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        Style::default().fg(self.severity_color(severity))
    }

    /// Base style for normal elements
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Style for secondary text
    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for selected items
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text_bright)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_alt)
    }

    /// Style for a dialog button, highlighted when focused
    pub fn button_style(&self, focused: bool, color: Option<Color>) -> Style {
        let color = color.unwrap_or(self.primary);
        if focused {
            Style::default()
                .fg(self.text_bright)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    }
}
