//! wbi_scatter
//!
//! Fertility rate vs. life expectancy by year, with point size encoding population.
//! Pairs with the `wbi-scatter` CLI and the `wbi-scatter-gui` viewer.
//!
//! ### Features
//! - Load a yearly cross-country CSV (`time`, `fertility_rate`, `life_expectancy`, `pop_mlns`, `location`)
//! - Fixed axes computed once from all years, so positions compare across years
//! - Keyed enter/update/exit reconciliation of marks when the year changes
//! - Render a year (or every year) to SVG/PNG, optionally with a country's detail panel
//! - Per-year summaries and CSV/JSON export of the selected year
//!
//! ### Example
//! ```no_run
//! use wbi_scatter::{PlotConfig, Scene};
//!
//! let mut scene = Scene::load(PlotConfig::default())?;
//! scene.show_year(1990)?;
//! wbi_scatter::viz::plot_scene(&scene, "scatter_1990.svg", Some("Japan"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod labels;
pub mod marks;
pub mod models;
pub mod scale;
pub mod scene;
pub mod selector;
pub mod stats;
pub mod storage;
pub mod tooltip;
pub mod viz;

pub use config::PlotConfig;
pub use error::ScatterError;
pub use models::{Dataset, FilteredView, Record};
pub use scene::Scene;
