//! Detail panel layout: text measurement, truncation and placement on the canvas.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Cut `text` so it fits `max_px`, ending in a single ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let budget = max_px.saturating_sub(estimate_text_width_px("…", font_px));
    let mut out: String = text
        .chars()
        .scan(0u32, |used, ch| {
            *used += estimate_text_width_px(ch.encode_utf8(&mut [0; 4]), font_px);
            (*used <= budget).then_some(ch)
        })
        .collect();
    if !out.is_empty() {
        out.push('…');
    }
    out
}

/// A laid-out panel: its lines and its box in canvas pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub lines: Vec<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub padding: i32,
}

impl PanelLayout {
    /// Size the panel for `lines` and place its top-left corner at `anchor`,
    /// shifted as needed to stay inside a `canvas` of (width, height).
    pub fn fit(
        lines: &[String],
        font_px: u32,
        line_px: i32,
        max_width: u32,
        anchor: (i32, i32),
        canvas: (u32, u32),
    ) -> Self {
        let padding = 8;
        let max_text = max_width.saturating_sub(2 * padding as u32);
        let lines: Vec<String> = lines
            .iter()
            .map(|l| truncate_to_width(l, font_px, max_text))
            .collect();
        let text_w = lines
            .iter()
            .map(|l| estimate_text_width_px(l, font_px))
            .max()
            .unwrap_or(0) as i32;
        let width = text_w + 2 * padding;
        let height = lines.len() as i32 * line_px + 2 * padding;
        let x = anchor.0.min(canvas.0 as i32 - width - 1).max(1);
        let y = anchor.1.min(canvas.1 as i32 - height - 1).max(1);
        Self {
            lines,
            x,
            y,
            width,
            height,
            padding,
        }
    }
}
