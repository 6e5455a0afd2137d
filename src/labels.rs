//! Axis labels and the per-year title, as positioned text both renderers draw.

use crate::config::PlotConfig;
use crate::models::FilteredView;

/// Points to CSS pixels.
pub fn pt_to_px(pt: f64) -> f64 {
    pt * 96.0 / 72.0
}

/// A piece of text anchored at its baseline start, optionally rotated
/// counter-clockwise about that anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_pt: f64,
    /// `true` reads bottom-to-top (rotated 90° counter-clockwise).
    pub vertical: bool,
}

impl TextLabel {
    pub fn font_px(&self) -> f64 {
        pt_to_px(self.font_pt)
    }
}

pub const TITLE_FONT_PT: f64 = 14.0;
pub const AXIS_FONT_PT: f64 = 10.0;

/// The x-axis label centered near the bottom and the rotated y-axis label near the left edge.
/// Drawn once; they do not depend on the selected year.
pub fn axis_labels(cfg: &PlotConfig) -> [TextLabel; 2] {
    let (w, h) = (cfg.width as f64, cfg.height as f64);
    [
        TextLabel {
            text: "Fertility".to_string(),
            x: w / 2.0 - 10.0,
            y: h - 15.0,
            font_pt: AXIS_FONT_PT,
            vertical: false,
        },
        TextLabel {
            text: "Life Expectancy".to_string(),
            x: 15.0,
            y: h / 2.0 + 30.0,
            font_pt: AXIS_FONT_PT,
            vertical: true,
        },
    ]
}

/// Title text for a view. The year comes from the view's first row; an empty
/// view says so instead.
pub fn title_text(view: &FilteredView) -> String {
    match view.displayed_year() {
        Some(year) => format!("Life Expectancy vs Fertility ({year})"),
        None => format!("No data for {}", view.year),
    }
}

pub fn title(view: &FilteredView) -> TextLabel {
    TextLabel {
        text: title_text(view),
        x: 170.0,
        y: 30.0,
        font_pt: TITLE_FONT_PT,
        vertical: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use std::sync::Arc;

    #[test]
    fn stock_canvas_label_positions() {
        let [x, y] = axis_labels(&PlotConfig::default());
        assert_eq!((x.x, x.y), (290.0, 585.0));
        assert_eq!((y.x, y.y), (15.0, 330.0));
        assert!(y.vertical && !x.vertical);
    }

    #[test]
    fn title_reads_first_row_or_reports_empty_year() {
        let rec = Record {
            time: 1987,
            fertility_rate: 2.0,
            life_expectancy: 70.0,
            pop_mlns: 1.0,
            location: "A".into(),
        };
        let view = FilteredView { year: 1987, records: vec![Arc::new(rec)] };
        assert_eq!(title_text(&view), "Life Expectancy vs Fertility (1987)");

        let empty = FilteredView { year: 1961, records: vec![] };
        assert_eq!(title(&empty).text, "No data for 1961");
        assert!((title(&empty).font_px() - 18.666_666).abs() < 1e-3);
    }
}
