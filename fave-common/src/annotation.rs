//! Annotation value types
//!
//! [`Interval`] and [`Point`] are plain time-stamped records. They are owned by
//! the tier that holds them and carry no reference back to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A labelled time span `[start, end]` in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub label: String,
}

impl Interval {
    pub fn new(start: f64, end: f64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Same span, different label
    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self::new(self.start, self.end, label)
    }

    pub(crate) fn shift(&mut self, delta: f64) {
        self.start += delta;
        self.end += delta;
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Interval \"{}\" {:.6}:{:.6}>", self.label, self.start, self.end)
    }
}

/// A labelled instant in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: f64,
    pub label: String,
}

impl Point {
    pub fn new(time: f64, label: impl Into<String>) -> Self {
        Self {
            time,
            label: label.into(),
        }
    }

    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self::new(self.time, label)
    }

    pub(crate) fn shift(&mut self, delta: f64) {
        self.time += delta;
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Point \"{}\" at {:.6}>", self.label, self.time)
    }
}

/// Either kind of annotation, as handed to [`crate::Tier::append`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Interval(Interval),
    Point(Point),
}

impl Item {
    /// First instant covered by the item
    pub fn start(&self) -> f64 {
        match self {
            Item::Interval(interval) => interval.start,
            Item::Point(point) => point.time,
        }
    }

    /// Last instant covered by the item
    pub fn end(&self) -> f64 {
        match self {
            Item::Interval(interval) => interval.end,
            Item::Point(point) => point.time,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Item::Interval(interval) => &interval.label,
            Item::Point(point) => &point.label,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::Interval(_) => "interval",
            Item::Point(_) => "point",
        }
    }
}

impl From<Interval> for Item {
    fn from(interval: Interval) -> Self {
        Item::Interval(interval)
    }
}

impl From<Point> for Item {
    fn from(point: Point) -> Self {
        Item::Point(point)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Interval(interval) => interval.fmt(f),
            Item::Point(point) => point.fmt(f),
        }
    }
}
