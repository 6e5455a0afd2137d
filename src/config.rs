//! Chart configuration.
//!
//! Every field has a default matching the stock 600×600 chart, so a JSON file
//! only needs the keys it changes, e.g. `{ "initial_year": 1990, "locale": "de" }`.

use crate::error::{Result, ScatterError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "./data/dataEveryYear.csv";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Uniform margin around the plot area.
    pub margin: u32,
    /// Extra data units added to the right end of the x domain.
    pub x_padding: f64,
    /// Fixed value at the bottom of the y domain.
    pub y_ceiling: f64,
    /// Radius (px) for the smallest and largest population.
    pub radius_range: [f64; 2],
    pub data_path: PathBuf,
    /// Year shown first; `None` picks the first year in the selector.
    pub initial_year: Option<i32>,
    /// Locale tag for thousands separators (`en`, `de`, `fr`, ...).
    pub locale: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            margin: 50,
            x_padding: 0.5,
            y_ceiling: 10.0,
            radius_range: [3.0, 20.0],
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            initial_year: None,
            locale: "en".to_string(),
        }
    }
}

impl PlotConfig {
    /// Read a JSON config file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let txt = std::fs::read_to_string(path.as_ref())?;
        let cfg: PlotConfig = serde_json::from_str(&txt)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// `<config dir>/wbi-scatter/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("wbi-scatter").join("config.json"))
    }

    /// Load the per-user config when it exists, defaults otherwise.
    pub fn discover() -> Result<Self> {
        match Self::default_path() {
            Some(p) if p.is_file() => {
                log::info!("using config {}", p.display());
                Self::load(p)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(ScatterError::InvalidConfig(msg));
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !(200..=3000).contains(&v) {
                return bad(format!("{name} must be between 200 and 3000 pixels, got {v}"));
            }
        }
        if 2 * self.margin >= self.width.min(self.height) {
            return bad(format!(
                "margin {} leaves no plot area in a {}x{} canvas",
                self.margin, self.width, self.height
            ));
        }
        let [rmin, rmax] = self.radius_range;
        if !(rmin.is_finite() && rmax.is_finite() && 0.0 <= rmin && rmin <= rmax) {
            return bad(format!("radius range [{rmin}, {rmax}] is not a valid size range"));
        }
        if !self.x_padding.is_finite() || !self.y_ceiling.is_finite() {
            return bad("x_padding and y_ceiling must be finite".to_string());
        }
        Ok(())
    }

    /// Pixel ranges `(x, y)` of the plot area inside the margins.
    pub fn plot_ranges(&self) -> ((f64, f64), (f64, f64)) {
        let m = self.margin as f64;
        (
            (m, self.width as f64 - m),
            (m, self.height as f64 - m),
        )
    }
}
