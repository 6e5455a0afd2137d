//! Linear scales and the projection set used by every renderer.
//!
//! The projections are built once from the full-dataset [`Limits`] and then
//! reused for every year, so a country's position is comparable across years.

use crate::config::PlotConfig;
use crate::marks::{Mark, MarkKey};
use crate::models::Record;
use crate::stats::Limits;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Affine map from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Project `v`. Exact at both domain endpoints; a zero-width domain maps
    /// everything to the middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        let t = (v - d0) / span;
        r0 * (1.0 - t) + r1 * t
    }

    /// Inverse of [`apply`](Self::apply), used to read data values back from pixels.
    pub fn invert(&self, px: f64) -> f64 {
        LinearScale::new(self.range, self.domain).apply(px)
    }

    /// Round tick values (1, 2 or 5 × 10ⁿ apart) inside the domain, roughly `count` of them.
    /// The egui painter has no axis support of its own and draws from these.
    /// Ordered like the domain, so an inverted domain yields descending ticks.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if !start.is_finite() || !stop.is_finite() || count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let inc = tick_increment(start, stop, count);
        if inc == 0.0 || !inc.is_finite() {
            return Vec::new();
        }
        let mut out: Vec<f64> = if inc > 0.0 {
            let r0 = (start / inc).ceil() as i64;
            let r1 = (stop / inc).floor() as i64;
            (r0..=r1).map(|i| i as f64 * inc).collect()
        } else {
            let inc = -inc;
            let r0 = (start * inc).ceil() as i64;
            let r1 = (stop * inc).floor() as i64;
            (r0..=r1).map(|i| i as f64 / inc).collect()
        };
        if reverse {
            out.reverse();
        }
        out
    }

    /// Tick step for [`ticks`](Self::ticks) in data units.
    pub fn tick_step(&self, count: usize) -> f64 {
        let (a, b) = self.domain;
        let inc = tick_increment(a.min(b), a.max(b), count.max(1));
        if inc < 0.0 { -1.0 / inc } else { inc }
    }
}

/// Positive: step is `inc`. Negative: step is `1 / -inc` (keeps small steps exact).
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Format a tick value with just enough decimals for `step`.
pub fn tick_format(v: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    format!("{:.*}", decimals, v)
}

/// The x, y and radius projections for one chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Projections {
    /// fertility_rate → horizontal pixel
    pub x: LinearScale,
    /// life_expectancy → vertical pixel
    pub y: LinearScale,
    /// pop_mlns → radius in pixels
    pub radius: LinearScale,
}

impl Projections {
    /// X domain is `[min, max + padding]`. Y domain is `[max, ceiling]`: the largest
    /// observed life expectancy sits at the top edge and a fixed ceiling value at
    /// the bottom, not the observed minimum.
    pub fn build(limits: &Limits, cfg: &PlotConfig) -> Self {
        let (xr, yr) = cfg.plot_ranges();
        let x = LinearScale::new(
            (limits.fertility.min, limits.fertility.max + cfg.x_padding),
            xr,
        );
        let y = LinearScale::new((limits.life_expectancy.max, cfg.y_ceiling), yr);
        let radius = LinearScale::new(
            (limits.population.min, limits.population.max),
            (cfg.radius_range[0], cfg.radius_range[1]),
        );
        log::debug!(
            "projections: x {:?} -> {:?}, y {:?} -> {:?}, r {:?} -> {:?}",
            x.domain,
            x.range,
            y.domain,
            y.range,
            radius.domain,
            radius.range
        );
        Self { x, y, radius }
    }

    pub fn mark_for(&self, record: &Arc<Record>, key: MarkKey) -> Mark {
        Mark {
            key,
            cx: self.x.apply(record.fertility_rate),
            cy: self.y.apply(record.life_expectancy),
            r: self.radius.apply(record.pop_mlns),
            record: Arc::clone(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Extent;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn apply_is_exact_at_endpoints() {
        for (d, r) in [
            ((2.0, 6.5), (50.0, 550.0)),
            ((0.1, 0.7), (13.3, 977.1)),
            ((75.0, 10.0), (50.0, 550.0)),
            ((-3.2, 1e6), (550.0, 50.0)),
        ] {
            let s = LinearScale::new(d, r);
            assert_eq!(s.apply(d.0), r.0);
            assert_eq!(s.apply(d.1), r.1);
        }
    }

    #[test]
    fn degenerate_domain_maps_to_midpoint() {
        let s = LinearScale::new((4.0, 4.0), (3.0, 20.0));
        assert_eq!(s.apply(4.0), 11.5);
    }

    #[test]
    fn nan_projects_to_nan() {
        let s = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        assert!(s.apply(f64::NAN).is_nan());
    }

    #[test]
    fn invert_undoes_apply() {
        let s = LinearScale::new((75.0, 10.0), (50.0, 550.0));
        assert!(approx(s.invert(s.apply(42.0)), 42.0));
    }

    #[test]
    fn ticks_are_round_and_inside_domain() {
        let s = LinearScale::new((2.0, 6.5), (50.0, 550.0));
        assert_eq!(
            s.ticks(10),
            vec![2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5]
        );
        assert_eq!(s.tick_step(10), 0.5);
        assert_eq!(tick_format(2.5, 0.5), "2.5");
        assert_eq!(tick_format(3.0, 0.5), "3.0");
    }

    #[test]
    fn inverted_domain_gives_descending_ticks() {
        let s = LinearScale::new((75.0, 10.0), (50.0, 550.0));
        let t = s.ticks(10);
        assert_eq!(t.first(), Some(&75.0));
        assert_eq!(t.last(), Some(&10.0));
        assert!(t.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(tick_format(70.0, s.tick_step(10)), "70");
    }

    #[test]
    fn projections_follow_padding_rules() {
        let limits = Limits {
            fertility: Extent { min: 2.0, max: 6.0 },
            life_expectancy: Extent { min: 50.0, max: 75.0 },
            population: Extent { min: 10.0, max: 100.0 },
        };
        let p = Projections::build(&limits, &PlotConfig::default());
        assert_eq!(p.x.domain, (2.0, 6.5));
        assert_eq!(p.x.range, (50.0, 550.0));
        assert_eq!(p.y.domain, (75.0, 10.0));
        assert_eq!(p.y.range, (50.0, 550.0));
        assert_eq!(p.radius.domain, (10.0, 100.0));
        assert_eq!(p.radius.range, (3.0, 20.0));
    }
}
