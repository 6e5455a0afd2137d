//! Public types and constants for the visualization module.

/// Output encodings for file rendering, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    /// `.svg` selects SVG; anything else goes to the bitmap backend.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Axis tick count requested from the scales.
pub const AXIS_TICKS: usize = 10;
/// Tick mark length in pixels.
pub const TICK_LEN: i32 = 6;
/// Tick label font size in pixels.
pub const TICK_FONT_PX: u32 = 10;
/// Detail panel font size and line height in pixels.
pub const PANEL_FONT_PX: u32 = 12;
pub const PANEL_LINE_PX: i32 = 16;
/// Widest the detail panel may grow.
pub const PANEL_MAX_W_PX: u32 = 260;
