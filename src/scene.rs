//! Application state for one chart session.
//!
//! A [`Scene`] is built once from the full dataset (extents, projections,
//! year list, static labels) and then re-targeted with [`Scene::show_year`].
//! Each call filters, reconciles the marks and replaces the title; the
//! projections are never rebuilt.

use crate::config::PlotConfig;
use crate::error::Result;
use crate::labels::{self, TextLabel};
use crate::marks::{self, MarkSet};
use crate::models::{Dataset, FilteredView};
use crate::scale::Projections;
use crate::selector::{self, YearSelector};
use crate::stats::Limits;
use crate::storage;

/// How many marks entered, stayed and left during one re-render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderCounts {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

#[derive(Debug, Clone)]
pub struct Scene {
    config: PlotConfig,
    dataset: Dataset,
    limits: Limits,
    projections: Projections,
    selector: YearSelector,
    axis_labels: [TextLabel; 2],
    view: FilteredView,
    marks: MarkSet,
    title: TextLabel,
}

impl Scene {
    /// Load `config.data_path` and build the scene.
    pub fn load(config: PlotConfig) -> Result<Self> {
        let dataset = storage::load_csv(&config.data_path)?;
        Self::new(dataset, config)
    }

    /// Build projections and labels from the full dataset and render the initial year.
    pub fn new(dataset: Dataset, config: PlotConfig) -> Result<Self> {
        config.validate()?;
        let limits = Limits::from_dataset(&dataset)?;
        let projections = Projections::build(&limits, &config);
        let selector = YearSelector::from_dataset(&dataset)?;
        let axis_labels = labels::axis_labels(&config);
        let initial = config.initial_year.unwrap_or(selector.selected());
        let view = FilteredView {
            year: initial,
            records: Vec::new(),
        };
        let title = labels::title(&view);

        let mut scene = Self {
            config,
            dataset,
            limits,
            projections,
            selector,
            axis_labels,
            view,
            marks: MarkSet::new(),
            title,
        };
        scene.show_year(initial)?;
        Ok(scene)
    }

    /// Filter to `year`, reconcile the marks and replace the title.
    pub fn show_year(&mut self, year: i32) -> Result<RenderCounts> {
        self.selector.select(year)?;
        let view = self.dataset.filter_year(year);
        if view.is_empty() {
            log::warn!("no rows for year {year}");
        }

        let next = marks::keyed(&view)
            .into_iter()
            .map(|(key, rec)| self.projections.mark_for(rec, key))
            .collect();
        let diff = marks::reconcile(&self.marks, next);
        let counts = RenderCounts {
            entered: diff.enter.len(),
            updated: diff.update.len(),
            exited: diff.exit.len(),
        };
        self.marks.apply(diff);
        self.title = labels::title(&view);
        self.view = view;
        log::debug!(
            "year {year}: {} entered, {} updated, {} exited",
            counts.entered,
            counts.updated,
            counts.exited
        );
        Ok(counts)
    }

    /// Handle a raw value from the year control.
    pub fn select_raw(&mut self, raw: &str) -> Result<RenderCounts> {
        let year = selector::parse_year(raw)?;
        self.show_year(year)
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn projections(&self) -> &Projections {
        &self.projections
    }

    pub fn selector(&self) -> &YearSelector {
        &self.selector
    }

    pub fn selected_year(&self) -> i32 {
        self.selector.selected()
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    pub fn title(&self) -> &TextLabel {
        &self.title
    }

    pub fn axis_labels(&self) -> &[TextLabel; 2] {
        &self.axis_labels
    }
}
