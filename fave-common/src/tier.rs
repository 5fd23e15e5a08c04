//! Tier containers
//!
//! A tier is a named, domain-bounded sequence of annotations of a single kind.
//! The two kinds form the closed enum [`Tier`]; every consumer matches on it.
//!
//! Items are appended without any ordering check because fragments arrive out
//! of order during assembly. Ordering, gap filling and overlap detection are
//! established later by [`Tier::sort`] and [`Tier::tidy`].

use crate::annotation::{Interval, Item, Point};
use crate::config::ReconcileConfig;
use crate::error::{DomainError, Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, warn};

/// Sort key for [`Tier::sort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Interval start, or point time
    #[default]
    Start,
    /// Interval end, or point time
    End,
    Label,
}

/// Two adjacent items on one tier whose spans overlap
///
/// Collected by [`Tier::tidy`] and returned to the caller; never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapConflict {
    pub tier: String,
    pub first: Item,
    pub second: Item,
}

impl fmt::Display for OverlapConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {} on tier {}", self.first, self.second, self.tier)
    }
}

/// Tier of labelled intervals
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTier {
    name: String,
    min: f64,
    max: f64,
    intervals: Vec<Interval>,
}

impl IntervalTier {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            intervals: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    /// Append at the end and widen the domain to cover the interval
    pub fn append(&mut self, interval: Interval) {
        self.min = self.min.min(interval.start);
        self.max = self.max.max(interval.end);
        self.intervals.push(interval);
    }

    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Start => self.intervals.sort_by(|a, b| a.start.total_cmp(&b.start)),
            SortKey::End => self.intervals.sort_by(|a, b| a.end.total_cmp(&b.end)),
            SortKey::Label => self.intervals.sort_by(|a, b| a.label.cmp(&b.label)),
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.intervals
            .windows(2)
            .all(|pair| pair[0].start.total_cmp(&pair[1].start) != Ordering::Greater)
    }

    /// Widen the domain to `[new_min, new_max]`, covering the new margins with fillers
    ///
    /// Returns the number of filler intervals inserted. Fails without touching
    /// the tier when the requested domain does not contain the current one.
    pub fn extend(
        &mut self,
        new_min: f64,
        new_max: f64,
        config: &ReconcileConfig,
    ) -> std::result::Result<usize, DomainError> {
        check_extend(&self.name, self.min, self.max, new_min, new_max)?;
        debug!(
            "Extending tier \"{}\" from [{}, {}] to [{}, {}]",
            self.name, self.min, self.max, new_min, new_max
        );

        let keep = |start: f64, end: f64| end > start || (end == start && config.zero_length_fillers);
        let mut fillers = 0;

        if self.intervals.is_empty() {
            if keep(new_min, new_max) {
                self.intervals
                    .push(Interval::new(new_min, new_max, config.filler_label.as_str()));
                fillers += 1;
            }
        } else {
            let first_start = self
                .intervals
                .iter()
                .map(|i| i.start)
                .fold(f64::INFINITY, f64::min);
            let last_end = self
                .intervals
                .iter()
                .map(|i| i.end)
                .fold(f64::NEG_INFINITY, f64::max);

            if keep(new_min, first_start) {
                self.intervals.insert(
                    0,
                    Interval::new(new_min, first_start, config.filler_label.as_str()),
                );
                fillers += 1;
            }
            if keep(last_end, new_max) {
                self.intervals
                    .push(Interval::new(last_end, new_max, config.filler_label.as_str()));
                fillers += 1;
            }
            if fillers > 0 {
                self.sort(SortKey::Start);
            }
        }

        self.min = new_min;
        self.max = new_max;
        Ok(fillers)
    }

    /// Fill gaps between neighbours and collect overlapping neighbours
    pub fn tidy(&mut self, config: &ReconcileConfig) -> Vec<OverlapConflict> {
        if !self.is_sorted() {
            debug!("Tier \"{}\" not sorted before tidy, sorting by start", self.name);
            self.sort(SortKey::Start);
        }

        let mut conflicts = Vec::new();
        let mut tidied = Vec::with_capacity(self.intervals.len());
        let mut remaining = std::mem::take(&mut self.intervals).into_iter().peekable();

        while let Some(current) = remaining.next() {
            let gap = match remaining.peek() {
                Some(next) if current.end < next.start => Some(Interval::new(
                    current.end,
                    next.start,
                    config.filler_label.as_str(),
                )),
                Some(next) if current.end > next.start => {
                    warn!(
                        "Overlapping intervals {} and {} on tier {}",
                        current, next, self.name
                    );
                    conflicts.push(OverlapConflict {
                        tier: self.name.clone(),
                        first: Item::Interval(current.clone()),
                        second: Item::Interval(next.clone()),
                    });
                    None
                }
                _ => None,
            };
            tidied.push(current);
            if let Some(filler) = gap {
                tidied.push(filler);
            }
        }

        self.intervals = tidied;
        conflicts
    }

    pub fn rename(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
    }

    pub fn offset(&mut self, delta: f64) {
        self.min += delta;
        self.max += delta;
        for interval in &mut self.intervals {
            interval.shift(delta);
        }
    }

    fn take_items(&mut self) -> Vec<Interval> {
        std::mem::take(&mut self.intervals)
    }
}

impl fmt::Display for IntervalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<IntervalTier \"{}\" with {} intervals>", self.name, self.len())
    }
}

/// Tier of labelled points (a Praat "TextTier")
#[derive(Debug, Clone, PartialEq)]
pub struct PointTier {
    name: String,
    min: f64,
    max: f64,
    points: Vec<Point>,
}

impl PointTier {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            points: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn append(&mut self, point: Point) {
        self.min = self.min.min(point.time);
        self.max = self.max.max(point.time);
        self.points.push(point);
    }

    pub fn sort(&mut self, key: SortKey) {
        match key {
            SortKey::Start | SortKey::End => {
                self.points.sort_by(|a, b| a.time.total_cmp(&b.time))
            }
            SortKey::Label => self.points.sort_by(|a, b| a.label.cmp(&b.label)),
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.points
            .windows(2)
            .all(|pair| pair[0].time.total_cmp(&pair[1].time) != Ordering::Greater)
    }

    /// Widen the domain; points need no filler
    pub fn extend(&mut self, new_min: f64, new_max: f64) -> std::result::Result<usize, DomainError> {
        check_extend(&self.name, self.min, self.max, new_min, new_max)?;
        self.min = new_min;
        self.max = new_max;
        Ok(0)
    }

    /// Collect neighbouring points that share one instant
    pub fn tidy(&mut self) -> Vec<OverlapConflict> {
        if !self.is_sorted() {
            self.sort(SortKey::Start);
        }
        self.points
            .windows(2)
            .filter(|pair| pair[0].time == pair[1].time)
            .map(|pair| {
                warn!(
                    "Coinciding points {} and {} on tier {}",
                    pair[0], pair[1], self.name
                );
                OverlapConflict {
                    tier: self.name.clone(),
                    first: Item::Point(pair[0].clone()),
                    second: Item::Point(pair[1].clone()),
                }
            })
            .collect()
    }

    pub fn rename(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
    }

    pub fn offset(&mut self, delta: f64) {
        self.min += delta;
        self.max += delta;
        for point in &mut self.points {
            point.shift(delta);
        }
    }

    fn take_items(&mut self) -> Vec<Point> {
        std::mem::take(&mut self.points)
    }
}

impl fmt::Display for PointTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PointTier \"{}\" with {} points>", self.name, self.len())
    }
}

fn check_extend(
    tier: &str,
    min: f64,
    max: f64,
    new_min: f64,
    new_max: f64,
) -> std::result::Result<(), DomainError> {
    if new_min > min || new_max < max {
        warn!(
            "Refusing to narrow tier \"{}\" from [{}, {}] to [{}, {}]",
            tier, min, max, new_min, new_max
        );
        return Err(DomainError {
            tier: tier.to_string(),
            current_min: min,
            current_max: max,
            requested_min: new_min,
            requested_max: new_max,
        });
    }
    Ok(())
}

/// An interval tier or a point tier
#[derive(Debug, Clone, PartialEq)]
pub enum Tier {
    Interval(IntervalTier),
    Point(PointTier),
}

impl Tier {
    pub fn name(&self) -> &str {
        match self {
            Tier::Interval(tier) => tier.name(),
            Tier::Point(tier) => tier.name(),
        }
    }

    pub fn min(&self) -> f64 {
        match self {
            Tier::Interval(tier) => tier.min(),
            Tier::Point(tier) => tier.min(),
        }
    }

    pub fn max(&self) -> f64 {
        match self {
            Tier::Interval(tier) => tier.max(),
            Tier::Point(tier) => tier.max(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Tier::Interval(tier) => tier.len(),
            Tier::Point(tier) => tier.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tier::Interval(_) => "interval",
            Tier::Point(_) => "point",
        }
    }

    /// Class tag as written in TextGrid files
    pub fn class_name(&self) -> &'static str {
        match self {
            Tier::Interval(_) => "IntervalTier",
            Tier::Point(_) => "TextTier",
        }
    }

    pub fn item(&self, index: usize) -> Option<Item> {
        match self {
            Tier::Interval(tier) => tier.get(index).cloned().map(Item::Interval),
            Tier::Point(tier) => tier.get(index).cloned().map(Item::Point),
        }
    }

    /// Copy of every item in stored order
    pub fn items(&self) -> Vec<Item> {
        match self {
            Tier::Interval(tier) => tier.iter().cloned().map(Item::Interval).collect(),
            Tier::Point(tier) => tier.iter().cloned().map(Item::Point).collect(),
        }
    }

    /// Append an item of this tier's kind
    pub fn append(&mut self, item: impl Into<Item>) -> Result<()> {
        match (self, item.into()) {
            (Tier::Interval(tier), Item::Interval(interval)) => tier.append(interval),
            (Tier::Point(tier), Item::Point(point)) => tier.append(point),
            (tier, item) => {
                return Err(Error::TierKindMismatch {
                    tier: tier.name().to_string(),
                    expected: tier.kind_name(),
                    found: item.kind_name(),
                })
            }
        }
        Ok(())
    }

    /// Move every item of `other` onto the end of this tier, in order
    ///
    /// Returns the number of items moved. Kinds are checked before anything moves.
    pub fn append_all(&mut self, mut other: Tier) -> Result<usize> {
        match (self, &mut other) {
            (Tier::Interval(tier), Tier::Interval(source)) => {
                let items = source.take_items();
                let count = items.len();
                items.into_iter().for_each(|interval| tier.append(interval));
                Ok(count)
            }
            (Tier::Point(tier), Tier::Point(source)) => {
                let items = source.take_items();
                let count = items.len();
                items.into_iter().for_each(|point| tier.append(point));
                Ok(count)
            }
            (tier, source) => Err(Error::TierKindMismatch {
                tier: tier.name().to_string(),
                expected: tier.kind_name(),
                found: source.kind_name(),
            }),
        }
    }

    /// Stable sort by `key`
    pub fn sort(&mut self, key: SortKey) {
        match self {
            Tier::Interval(tier) => tier.sort(key),
            Tier::Point(tier) => tier.sort(key),
        }
    }

    pub fn is_sorted(&self) -> bool {
        match self {
            Tier::Interval(tier) => tier.is_sorted(),
            Tier::Point(tier) => tier.is_sorted(),
        }
    }

    /// [`Tier::extend_with`] using the default filler settings
    pub fn extend(&mut self, new_min: f64, new_max: f64) -> std::result::Result<usize, DomainError> {
        self.extend_with(new_min, new_max, &ReconcileConfig::default())
    }

    /// Widen the domain to `[new_min, new_max]`
    ///
    /// Interval tiers get filler intervals over the uncovered margins; point
    /// tiers only change their domain. Returns the number of fillers inserted.
    pub fn extend_with(
        &mut self,
        new_min: f64,
        new_max: f64,
        config: &ReconcileConfig,
    ) -> std::result::Result<usize, DomainError> {
        match self {
            Tier::Interval(tier) => tier.extend(new_min, new_max, config),
            Tier::Point(tier) => tier.extend(new_min, new_max),
        }
    }

    /// [`Tier::tidy_with`] using the default filler settings
    pub fn tidy(&mut self) -> Vec<OverlapConflict> {
        self.tidy_with(&ReconcileConfig::default())
    }

    /// Close gaps with fillers and report overlapping neighbours
    ///
    /// Overlapping items are left untouched and get no filler between them.
    /// Repeating the call without mutating the tier in between inserts nothing
    /// and reports only conflicts already reported.
    pub fn tidy_with(&mut self, config: &ReconcileConfig) -> Vec<OverlapConflict> {
        match self {
            Tier::Interval(tier) => tier.tidy(config),
            Tier::Point(tier) => tier.tidy(),
        }
    }

    pub fn rename(&mut self, new_name: impl Into<String>) {
        match self {
            Tier::Interval(tier) => tier.rename(new_name),
            Tier::Point(tier) => tier.rename(new_name),
        }
    }

    /// Shift every item and the domain by `delta` seconds
    pub fn offset(&mut self, delta: f64) {
        match self {
            Tier::Interval(tier) => tier.offset(delta),
            Tier::Point(tier) => tier.offset(delta),
        }
    }
}

impl From<IntervalTier> for Tier {
    fn from(tier: IntervalTier) -> Self {
        Tier::Interval(tier)
    }
}

impl From<PointTier> for Tier {
    fn from(tier: PointTier) -> Self {
        Tier::Point(tier)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Interval(tier) => tier.fmt(f),
            Tier::Point(tier) => tier.fmt(f),
        }
    }
}
