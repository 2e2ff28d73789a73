//! Integer geometry primitives for scan windows and detections.
//!
//! All coordinates follow the image convention: `x` increases to the right,
//! `y` increases downward, and a rectangle is described by its top-left corner
//! `p1` and bottom-right corner `p2`.
//!
//! # Examples
//!
//! ```rust
//! use slider::geometry::{Point, Rect};
//!
//! let car = Rect::new(Point::new(0, 100), Point::new(50, 200)).unwrap();
//! let window = Rect::new(Point::new(25, 150), Point::new(75, 250)).unwrap();
//!
//! let shared = car.overlap(&window).unwrap();
//! assert_eq!(shared.area(), 1250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ScanError};

/// A pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Multiply both coordinates by `factor`, truncating toward zero.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            x: (self.x as f64 * factor) as i64,
            y: (self.y as f64 * factor) as i64,
        }
    }

    pub fn shift(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i64, i64)> for Point {
    fn from(coords: (i64, i64)) -> Self {
        Self::new(coords.0, coords.1)
    }
}

impl From<Point> for (i64, i64) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({},{})", self.x, self.y)
    }
}

/// Axis-aligned rectangle with `p2` dominating `p1` on both axes.
///
/// The invariant is checked on construction, so every `Rect` in circulation
/// has non-negative width and height. Zero-sized rectangles are allowed.
/// Deserialization goes through [`Rect::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RectCorners", into = "RectCorners")]
pub struct Rect {
    p1: Point,
    p2: Point,
}

/// Unchecked serialized form of a [`Rect`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RectCorners {
    p1: Point,
    p2: Point,
}

impl TryFrom<RectCorners> for Rect {
    type Error = ScanError;

    fn try_from(corners: RectCorners) -> Result<Self> {
        Rect::new(corners.p1, corners.p2)
    }
}

impl From<Rect> for RectCorners {
    fn from(rect: Rect) -> Self {
        Self {
            p1: rect.p1,
            p2: rect.p2,
        }
    }
}

impl Rect {
    /// Build a rectangle from its top-left and bottom-right corners.
    ///
    /// # Errors
    /// [`ScanError::InvalidRect`] if `p2.x < p1.x` or `p2.y < p1.y`.
    pub fn new(p1: Point, p2: Point) -> Result<Self> {
        if p2.x < p1.x || p2.y < p1.y {
            return Err(ScanError::InvalidRect { p1, p2 });
        }
        Ok(Self { p1, p2 })
    }

    /// Build a rectangle from `(left, top, right, bottom)` edges.
    pub fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Result<Self> {
        Self::new(Point::new(left, top), Point::new(right, bottom))
    }

    pub fn p1(&self) -> Point {
        self.p1
    }

    pub fn p2(&self) -> Point {
        self.p2
    }

    pub fn left(&self) -> i64 {
        self.p1.x
    }

    pub fn right(&self) -> i64 {
        self.p2.x
    }

    pub fn top(&self) -> i64 {
        self.p1.y
    }

    pub fn bottom(&self) -> i64 {
        self.p2.y
    }

    pub fn width(&self) -> i64 {
        self.p2.x - self.p1.x
    }

    pub fn height(&self) -> i64 {
        self.p2.y - self.p1.y
    }

    pub fn area(&self) -> i64 {
        self.height() * self.width()
    }

    /// Center as `(x, y)` in floating point.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.p1.x + self.p2.x) as f64 / 2.0,
            (self.p1.y + self.p2.y) as f64 / 2.0,
        )
    }

    /// Scale both corners by `factor`.
    ///
    /// # Errors
    /// A negative factor flips the corners and is rejected as
    /// [`ScanError::InvalidRect`].
    pub fn scale(&self, factor: f64) -> Result<Self> {
        Self::new(self.p1.scale(factor), self.p2.scale(factor))
    }

    pub fn shift(&self, dx: i64, dy: i64) -> Self {
        Self {
            p1: self.p1.shift(dx, dy),
            p2: self.p2.shift(dx, dy),
        }
    }

    /// Intersection with `other`.
    ///
    /// Returns `None` unless the intersection has strictly positive width and
    /// height, so rectangles that only touch along an edge do not overlap.
    pub fn overlap(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());

        if right - left <= 0 || bottom - top <= 0 {
            return None;
        }

        Some(Rect {
            p1: Point::new(left, top),
            p2: Point::new(right, bottom),
        })
    }

    /// True when every edge of `other` lies within this rectangle (inclusive).
    pub fn contains(&self, other: &Rect) -> bool {
        other.top() >= self.top()
            && other.bottom() <= self.bottom()
            && other.left() >= self.left()
            && other.right() <= self.right()
    }

    /// True when this rectangle lies within `other` (inclusive).
    pub fn is_contained_in(&self, other: &Rect) -> bool {
        other.contains(self)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect({},{})", self.p1, self.p2)
    }
}

/// A scan window: the region handed to the classifier in one call.
///
/// Stored as the `((x0, y0), (x1, y1))` corner pair the rest of the pipeline
/// exchanges. Windows produced by the generator always have positive size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub start: (i64, i64),
    pub end: (i64, i64),
}

impl Window {
    pub fn new(start: (i64, i64), end: (i64, i64)) -> Self {
        Self { start, end }
    }

    pub fn left(&self) -> i64 {
        self.start.0
    }

    pub fn top(&self) -> i64 {
        self.start.1
    }

    pub fn right(&self) -> i64 {
        self.end.0
    }

    pub fn bottom(&self) -> i64 {
        self.end.1
    }

    pub fn width(&self) -> i64 {
        self.end.0 - self.start.0
    }

    pub fn height(&self) -> i64 {
        self.end.1 - self.start.1
    }

    pub fn to_rect(&self) -> Result<Rect> {
        Rect::new(self.start.into(), self.end.into())
    }
}

impl From<((i64, i64), (i64, i64))> for Window {
    fn from(corners: ((i64, i64), (i64, i64))) -> Self {
        Self::new(corners.0, corners.1)
    }
}

impl From<Window> for ((i64, i64), (i64, i64)) {
    fn from(window: Window) -> Self {
        (window.start, window.end)
    }
}

impl From<Rect> for Window {
    fn from(rect: Rect) -> Self {
        Self::new(rect.p1.into(), rect.p2.into())
    }
}

impl TryFrom<Window> for Rect {
    type Error = ScanError;

    fn try_from(window: Window) -> Result<Self> {
        window.to_rect()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.start.0, self.start.1, self.end.0, self.end.1
        )
    }
}

/// Ordered window sequence. Generation order is row-major and callers may rely on it.
pub type WindowList = Vec<Window>;
