//! Utility functions for visualization: mark colors, locale mapping, number formatting.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Stroke color of the population circles (#4286F4).
pub const MARK_COLOR: RGBColor = RGBColor(0x42, 0x86, 0xf4);

/// Background of the highlighted detail panel (light steel blue).
pub const PANEL_COLOR: RGBColor = RGBColor(176, 196, 222);

/// Mark stroke width: 0.3 % of the normalized canvas diagonal, as SVG resolves
/// percentage stroke widths (≈1.8 px on a 600×600 canvas).
pub fn mark_stroke_width(width: u32, height: u32) -> f64 {
    let (w, h) = (width as f64, height as f64);
    0.003 * ((w * w + h * h) / 2.0).sqrt()
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Population in millions → absolute head count with thousands separators.
/// Rounded to whole people; `NaN` for missing values.
pub fn format_population(pop_mlns: f64, locale: &Locale) -> String {
    let people = (pop_mlns * 1_000_000.0).round();
    if !people.is_finite() || people.abs() > i64::MAX as f64 {
        return "NaN".to_string();
    }
    (people as i64).to_formatted_string(locale)
}
