use ratatui::style::Color;

use crate::model::ColumnType;
use crate::store::ErrorKind;

pub const ACCENT: Color = Color::Cyan;

pub fn column_color(column_type: ColumnType) -> Color {
    match column_type {
        ColumnType::Backlog => Color::Gray,
        ColumnType::Todo => Color::Blue,
        ColumnType::InProgress => Color::Yellow,
        ColumnType::Done => Color::Green,
    }
}

/// `#RRGGBB` label colour; anything else renders gray.
pub fn label_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Color::Gray;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

pub fn error_color(kind: ErrorKind) -> Color {
    match kind {
        ErrorKind::RateLimit => Color::Magenta,
        ErrorKind::Timeout => Color::Yellow,
        _ => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_colors_parse_hex() {
        assert_eq!(label_color("#d73a4a"), Color::Rgb(0xd7, 0x3a, 0x4a));
        assert_eq!(label_color("0075ca"), Color::Rgb(0x00, 0x75, 0xca));
        assert_eq!(label_color("#zzzzzz"), Color::Gray);
        assert_eq!(label_color("1é234"), Color::Gray);
    }
}
