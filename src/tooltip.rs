//! Hover detail panel: its text and its fade in/out.
//!
//! Time is passed in explicitly as seconds (egui's `input.time`), which keeps
//! the fade a pure function of the clock.

use crate::marks::{Mark, MarkKey};
use crate::models::Record;
use crate::viz::util::{format_population, map_locale};

/// Opacity the panel fades up to.
pub const SHOW_OPACITY: f32 = 0.9;
/// Seconds to fade in on hover-start.
pub const SHOW_SECS: f64 = 0.2;
/// Seconds to fade out on hover-end.
pub const HIDE_SECS: f64 = 0.5;
/// Panel offset from the pointer, in canvas units.
pub const POINTER_OFFSET: (f64, f64) = (0.0, -28.0);

/// A measure as it reads in the CSV: shortest round-trip text, always with a
/// decimal part (`6.0`, `71.25`); missing values read `NaN`.
fn measure_text(v: f64) -> String {
    format!("{v:?}")
}

/// Lines of the detail panel for one record.
pub fn detail_lines(record: &Record, locale_tag: &str) -> Vec<String> {
    let (locale, _) = map_locale(locale_tag);
    vec![
        format!("Fertility: {}", measure_text(record.fertility_rate)),
        format!("Life Expectancy: {}", measure_text(record.life_expectancy)),
        format!("Population: {}", format_population(record.pop_mlns, locale)),
        format!("Year: {}", record.time),
        format!("Country: {}", record.location),
    ]
}

/// Cubic in-out easing on `[0, 1]`.
fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// An opacity transition. Starting a new one begins from wherever the old one is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    start: f64,
    duration: f64,
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            start: 0.0,
            duration: 0.0,
        }
    }
}

impl Fade {
    pub fn opacity(&self, now: f64) -> f32 {
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let k = ease_cubic_in_out((now - self.start) / self.duration) as f32;
        self.from + (self.to - self.from) * k
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.duration > 0.0 && now < self.start + self.duration
    }

    fn retarget(&mut self, to: f32, now: f64, duration: f64) {
        *self = Fade {
            from: self.opacity(now),
            to,
            start: now,
            duration,
        };
    }

    pub fn show(&mut self, now: f64) {
        self.retarget(SHOW_OPACITY, now, SHOW_SECS);
    }

    pub fn hide(&mut self, now: f64) {
        self.retarget(0.0, now, HIDE_SECS);
    }
}

/// Hover state of the detail panel.
#[derive(Debug, Clone, Default)]
pub struct Tooltip {
    target: Option<MarkKey>,
    lines: Vec<String>,
    anchor: (f64, f64),
    fade: Fade,
}

impl Tooltip {
    /// Pointer is over `mark` at canvas position `pointer`. Starts the fade-in
    /// only when the hovered mark changes; the panel follows the pointer.
    pub fn hover(&mut self, mark: &Mark, pointer: (f64, f64), locale_tag: &str, now: f64) {
        if self.target.as_ref() != Some(&mark.key) {
            self.target = Some(mark.key.clone());
            self.lines = detail_lines(&mark.record, locale_tag);
            self.fade.show(now);
        }
        self.anchor = (pointer.0 + POINTER_OFFSET.0, pointer.1 + POINTER_OFFSET.1);
    }

    /// Pointer left every mark. The text stays while the panel fades out.
    pub fn leave(&mut self, now: f64) {
        if self.target.take().is_some() {
            self.fade.hide(now);
        }
    }

    pub fn target(&self) -> Option<&MarkKey> {
        self.target.as_ref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    pub fn opacity(&self, now: f64) -> f32 {
        self.fade.opacity(now)
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.fade.is_animating(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record() -> Record {
        Record {
            time: 1960,
            fertility_rate: 6.0,
            life_expectancy: 50.5,
            pop_mlns: 10.25,
            location: "Atlantis".into(),
        }
    }

    fn mark(loc: &str) -> Mark {
        let mut r = record();
        r.location = loc.into();
        Mark {
            key: MarkKey::new(loc),
            record: Arc::new(r),
            cx: 100.0,
            cy: 100.0,
            r: 5.0,
        }
    }

    #[test]
    fn lines_show_all_fields_and_absolute_population() {
        let lines = detail_lines(&record(), "en");
        assert_eq!(
            lines,
            vec![
                "Fertility: 6.0",
                "Life Expectancy: 50.5",
                "Population: 10,250,000",
                "Year: 1960",
                "Country: Atlantis",
            ]
        );
        assert_eq!(detail_lines(&record(), "de")[2], "Population: 10.250.000");
    }

    #[test]
    fn whole_measures_keep_their_decimal_point() {
        let mut r = record();
        r.life_expectancy = 71.0;
        r.fertility_rate = f64::NAN;
        let lines = detail_lines(&r, "en");
        assert_eq!(lines[0], "Fertility: NaN");
        assert_eq!(lines[1], "Life Expectancy: 71.0");
    }

    #[test]
    fn fade_in_takes_200ms_to_reach_090() {
        let mut f = Fade::default();
        assert_eq!(f.opacity(0.0), 0.0);
        f.show(1.0);
        assert_eq!(f.opacity(1.0), 0.0);
        let mid = f.opacity(1.1);
        assert!(mid > 0.0 && mid < SHOW_OPACITY);
        assert!(f.is_animating(1.19));
        assert_eq!(f.opacity(1.2), SHOW_OPACITY);
        assert!(!f.is_animating(1.2));
    }

    #[test]
    fn fade_out_starts_from_current_opacity_and_takes_500ms() {
        let mut f = Fade::default();
        f.show(0.0);
        f.hide(0.1);
        let start = f.opacity(0.1);
        assert!(start > 0.0 && start < SHOW_OPACITY);
        assert!(f.opacity(0.3) < start);
        assert!(f.is_animating(0.59));
        assert_eq!(f.opacity(0.6), 0.0);
    }

    #[test]
    fn tooltip_follows_hover_and_leave() {
        let mut t = Tooltip::default();
        t.hover(&mark("A"), (120.0, 140.0), "en", 0.0);
        assert_eq!(t.target(), Some(&MarkKey::new("A")));
        assert_eq!(t.anchor(), (120.0, 112.0));
        assert_eq!(t.lines()[4], "Country: A");

        // Staying on the same mark does not restart the fade.
        t.hover(&mark("A"), (121.0, 140.0), "en", 0.3);
        assert_eq!(t.opacity(0.3), SHOW_OPACITY);

        t.hover(&mark("B"), (10.0, 40.0), "en", 0.4);
        assert_eq!(t.lines()[4], "Country: B");

        t.leave(1.0);
        assert!(t.target().is_none());
        assert_eq!(t.lines()[4], "Country: B");
        assert_eq!(t.opacity(1.5), 0.0);
    }
}
