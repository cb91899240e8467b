// src/domain/format.rs

use crate::domain::geo::LatLng;

const MISSING: &str = "N/A";

/// `1234567.5` -> `1,234,567.5`. At most three fraction digits are kept.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${}", group_thousands(p)),
        None => MISSING.to_string(),
    }
}

pub fn format_acres(acres: Option<f64>) -> String {
    match acres {
        Some(a) => format!("{} acres", group_thousands(a)),
        None => MISSING.to_string(),
    }
}

/// Grouped number without a unit, `N/A` when absent.
pub fn format_number(value: Option<f64>) -> String {
    value.map(group_thousands).unwrap_or_else(|| MISSING.to_string())
}

pub fn format_text(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => MISSING,
    }
}

/// Six fraction digits, as shown in the coordinates card.
pub fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

/// Text placed on the clipboard by "copy coordinates".
pub fn clipboard_text(point: LatLng) -> String {
    format!("{}, {}", point.lat(), point.lng())
}

/// "Showing N of M properties", only while a filter actually hides something.
pub fn showing_caption(visible: usize, total: usize) -> Option<String> {
    (visible > 0 && visible < total).then(|| format!("Showing {visible} of {total} properties"))
}
