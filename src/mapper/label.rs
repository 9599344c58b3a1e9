use crate::github::raw::RawLabel;
use crate::model::Label;

const FALLBACK_COLOR: &str = "#808080";

pub fn normalize_color(raw: &str) -> String {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{hex}")
    } else {
        FALLBACK_COLOR.to_string()
    }
}

/// Strip the `#` for mutations; GitHub wants bare hex.
pub fn provider_color(color: &str) -> String {
    normalize_color(color).trim_start_matches('#').to_string()
}

pub fn map_label(raw: &RawLabel) -> Label {
    Label {
        id: raw.id.clone().unwrap_or_default(),
        name: raw.name.clone().unwrap_or_default(),
        color: normalize_color(raw.color.as_deref().unwrap_or_default()),
        description: super::user::non_empty(&raw.description),
    }
}
