//! Hedgehog theme and color utilities.

use crate::json::TokenClass;
use crate::notifications::NotificationLevel;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct HedgehogTheme {
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
    pub json_key: Color,
    pub json_string: Color,
    pub json_number: Color,
    pub json_bool: Color,
    pub json_null: Color,
}

impl HedgehogTheme {
    pub fn hedgehog() -> Self {
        Self {
            bg_highlight: Color::Rgb(40, 42, 54),
            primary: Color::Rgb(247, 165, 1),
            primary_dim: Color::Rgb(150, 100, 10),
            secondary: Color::Rgb(29, 74, 255),
            success: Color::Rgb(76, 187, 23),
            warning: Color::Rgb(245, 191, 0),
            error: Color::Rgb(240, 73, 71),
            info: Color::Rgb(92, 160, 255),
            text: Color::Rgb(235, 235, 235),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(90, 90, 90),
            border: Color::Rgb(90, 90, 90),
            border_focus: Color::Rgb(247, 165, 1),
            json_key: Color::Rgb(92, 160, 255),
            json_string: Color::Rgb(152, 195, 121),
            json_number: Color::Rgb(209, 154, 102),
            json_bool: Color::Rgb(198, 120, 221),
            json_null: Color::Rgb(150, 150, 150),
        }
    }
}

impl Default for HedgehogTheme {
    fn default() -> Self {
        Self::hedgehog()
    }
}

pub fn token_color(class: TokenClass, theme: &HedgehogTheme) -> Color {
    match class {
        TokenClass::Key => theme.json_key,
        TokenClass::String => theme.json_string,
        TokenClass::Number => theme.json_number,
        TokenClass::Bool => theme.json_bool,
        TokenClass::Null => theme.json_null,
        TokenClass::Punct => theme.text_dim,
        TokenClass::Placeholder => theme.text_muted,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &HedgehogTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}

pub fn flag_color(active: bool, theme: &HedgehogTheme) -> Color {
    if active {
        theme.success
    } else {
        theme.text_dim
    }
}

pub fn border_color(focused: bool, theme: &HedgehogTheme) -> Color {
    if focused {
        theme.border_focus
    } else {
        theme.border
    }
}
