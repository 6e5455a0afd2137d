//! Marks (one drawn circle per record) and the keyed enter/update/exit join
//! that brings an existing mark set in line with a new filtered view.
//!
//! The join is backend-independent: the GUI and the file renderers both
//! consume a [`MarkSet`], never the diff machinery directly.

use crate::models::{FilteredView, Record};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Identity of a mark: the country, plus an ordinal that only matters when a
/// country appears more than once in the same year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkKey {
    pub location: String,
    pub ordinal: u32,
}

impl MarkKey {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ordinal: 0,
        }
    }
}

/// A projected record. Coordinates are canvas pixels; `NaN` when a measure is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub key: MarkKey,
    pub record: Arc<Record>,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Mark {
    /// Whether the mark has paintable geometry.
    pub fn is_drawable(&self) -> bool {
        self.cx.is_finite() && self.cy.is_finite() && self.r.is_finite() && self.r >= 0.0
    }

    fn contains(&self, x: f64, y: f64, slack: f64) -> bool {
        self.is_drawable() && (self.cx - x).hypot(self.cy - y) <= self.r + slack
    }
}

/// Pair each row of the view with its identity, keeping view order.
pub fn keyed(view: &FilteredView) -> Vec<(MarkKey, &Arc<Record>)> {
    let mut seen: HashMap<&str, u32> = HashMap::new();
    view.records
        .iter()
        .map(|r| {
            let n = seen.entry(r.location.as_str()).or_insert(0);
            let key = MarkKey {
                location: r.location.clone(),
                ordinal: *n,
            };
            *n += 1;
            (key, r)
        })
        .collect()
}

/// What has to change to go from the current marks to the next ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkDiff {
    /// Marks with no counterpart on screen.
    pub enter: Vec<Mark>,
    /// Marks that already exist; carry their new geometry and record.
    pub update: Vec<Mark>,
    /// Keys on screen that are absent from the next view.
    pub exit: Vec<MarkKey>,
    order: Vec<MarkKey>,
}

impl MarkDiff {
    pub fn is_noop(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty() && self.update.is_empty()
    }
}

/// Compute the join between `current` and `next` by key.
pub fn reconcile(current: &MarkSet, next: Vec<Mark>) -> MarkDiff {
    let mut diff = MarkDiff {
        order: next.iter().map(|m| m.key.clone()).collect(),
        ..Default::default()
    };
    let incoming: HashSet<&MarkKey> = diff.order.iter().collect();
    diff.exit = current
        .order
        .iter()
        .filter(|k| !incoming.contains(k))
        .cloned()
        .collect();

    for m in next {
        if current.marks.contains_key(&m.key) {
            diff.update.push(m);
        } else {
            diff.enter.push(m);
        }
    }
    diff
}

/// The marks currently on screen, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkSet {
    order: Vec<MarkKey>,
    marks: HashMap<MarkKey, Mark>,
}

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &MarkKey) -> Option<&Mark> {
        self.marks.get(key)
    }

    /// Marks in drawing order (order of the filtered view).
    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.order.iter().filter_map(|k| self.marks.get(k))
    }

    pub fn apply(&mut self, diff: MarkDiff) {
        for k in &diff.exit {
            self.marks.remove(k);
        }
        for m in diff.enter.into_iter().chain(diff.update) {
            self.marks.insert(m.key.clone(), m);
        }
        self.order = diff.order;
    }

    /// The mark under `(x, y)`; the smallest one wins where marks overlap,
    /// and among equals the one drawn last.
    pub fn hit_test(&self, x: f64, y: f64, slack: f64) -> Option<&Mark> {
        self.iter()
            .filter(|m| m.contains(x, y, slack))
            .fold(None, |best: Option<&Mark>, m| match best {
                Some(b) if b.r < m.r => Some(b),
                _ => Some(m),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(loc: &str, cx: f64, r: f64) -> Mark {
        Mark {
            key: MarkKey::new(loc),
            record: Arc::new(Record {
                time: 2000,
                fertility_rate: 1.0,
                life_expectancy: 1.0,
                pop_mlns: 1.0,
                location: loc.into(),
            }),
            cx,
            cy: 100.0,
            r,
        }
    }

    fn set_of(marks: Vec<Mark>) -> MarkSet {
        let mut s = MarkSet::new();
        let d = reconcile(&s, marks);
        s.apply(d);
        s
    }

    #[test]
    fn first_render_is_all_enter() {
        let s = MarkSet::new();
        let d = reconcile(&s, vec![mark("A", 1.0, 3.0), mark("B", 2.0, 3.0)]);
        assert_eq!(d.enter.len(), 2);
        assert!(d.update.is_empty());
        assert!(d.exit.is_empty());
    }

    #[test]
    fn join_is_by_key_not_position() {
        let s = set_of(vec![mark("A", 1.0, 3.0), mark("B", 2.0, 3.0)]);
        // B moved to the front, A dropped, C new.
        let d = reconcile(&s, vec![mark("B", 9.0, 3.0), mark("C", 5.0, 3.0)]);
        assert_eq!(d.update.iter().map(|m| m.key.location.as_str()).collect::<Vec<_>>(), ["B"]);
        assert_eq!(d.enter.iter().map(|m| m.key.location.as_str()).collect::<Vec<_>>(), ["C"]);
        assert_eq!(d.exit, vec![MarkKey::new("A")]);

        let mut s = s;
        s.apply(d);
        assert_eq!(s.len(), 2);
        assert_eq!(s.get(&MarkKey::new("B")).unwrap().cx, 9.0);
        assert!(s.get(&MarkKey::new("A")).is_none());
        let order: Vec<_> = s.iter().map(|m| m.key.location.clone()).collect();
        assert_eq!(order, ["B", "C"]);
    }

    #[test]
    fn reapplying_same_marks_changes_nothing() {
        let ms = vec![mark("A", 1.0, 3.0)];
        let s = set_of(ms.clone());
        let d = reconcile(&s, ms);
        assert!(d.enter.is_empty() && d.exit.is_empty());
        let mut s2 = s.clone();
        s2.apply(d);
        assert_eq!(s, s2);
    }

    #[test]
    fn empty_next_removes_everything() {
        let mut s = set_of(vec![mark("A", 1.0, 3.0), mark("B", 2.0, 3.0)]);
        let d = reconcile(&s, vec![]);
        assert_eq!(d.exit.len(), 2);
        s.apply(d);
        assert!(s.is_empty());
    }

    #[test]
    fn duplicate_locations_get_distinct_keys() {
        let rec = |loc: &str| {
            Arc::new(Record {
                time: 1960,
                fertility_rate: 1.0,
                life_expectancy: 1.0,
                pop_mlns: 1.0,
                location: loc.into(),
            })
        };
        let view = FilteredView {
            year: 1960,
            records: vec![rec("A"), rec("B"), rec("A")],
        };
        let keys: Vec<MarkKey> = keyed(&view).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys[0], MarkKey { location: "A".into(), ordinal: 0 });
        assert_eq!(keys[1], MarkKey { location: "B".into(), ordinal: 0 });
        assert_eq!(keys[2], MarkKey { location: "A".into(), ordinal: 1 });
    }

    #[test]
    fn hit_test_prefers_smallest_mark() {
        let s = set_of(vec![mark("Big", 100.0, 20.0), mark("Small", 104.0, 5.0)]);
        assert_eq!(s.hit_test(104.0, 100.0, 0.0).unwrap().key.location, "Small");
        assert_eq!(s.hit_test(85.0, 100.0, 0.0).unwrap().key.location, "Big");
        assert!(s.hit_test(300.0, 300.0, 0.0).is_none());
    }

    #[test]
    fn nan_marks_are_kept_but_never_hit() {
        let s = set_of(vec![mark("Nan", f64::NAN, 3.0)]);
        assert_eq!(s.len(), 1);
        assert!(!s.iter().next().unwrap().is_drawable());
        assert!(s.hit_test(0.0, 100.0, 100.0).is_none());
    }
}
