//! Sliding-window generation for a single scale.
//!
//! A [`ScaleSpec`] names a search region, a window size and a fractional
//! overlap per axis. [`generate_windows`] lays windows over that region with
//! a fixed integer stride:
//!
//! ```text
//! step   = floor(window * (1 - overlap))
//! buffer = floor(window * overlap)
//! count  = (span - buffer) / step          (truncating)
//! ```
//!
//! Windows are emitted row-major (y outer, x inner). A region too small to
//! hold one window plus its buffer yields an empty list, not an error.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Axis, RangeBound, Result, ScanError};
use crate::geometry::{Window, WindowList};

fn default_window_size() -> (i64, i64) {
    (64, 64)
}

fn default_overlap() -> (f64, f64) {
    (0.5, 0.5)
}

/// One window size / region / overlap combination of a multi-scale scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpec {
    /// Horizontal search range `(start, stop)`
    #[serde(default)]
    pub x_range: (Option<i64>, Option<i64>),
    /// Vertical search range `(start, stop)`
    #[serde(default)]
    pub y_range: (Option<i64>, Option<i64>),
    /// Window `(width, height)` in pixels
    #[serde(default = "default_window_size")]
    pub window_size: (i64, i64),
    /// Fractional overlap `(x, y)` between neighbouring windows, each in (0, 1)
    #[serde(default = "default_overlap")]
    pub overlap: (f64, f64),
}

/// Fully specified search region of a validated [`ScaleSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRegion {
    pub x_start: i64,
    pub x_stop: i64,
    pub y_start: i64,
    pub y_stop: i64,
}

impl ScanRegion {
    /// Width of the region, `x_stop - x_start`.
    ///
    /// # Errors
    /// [`ScanError::CoordinateOverflow`] if the difference does not fit in an `i64`.
    pub fn x_span(&self) -> Result<i64> {
        span(self.x_start, self.x_stop, Axis::X)
    }

    pub fn y_span(&self) -> Result<i64> {
        span(self.y_start, self.y_stop, Axis::Y)
    }
}

fn span(start: i64, stop: i64, axis: Axis) -> Result<i64> {
    stop.checked_sub(start).ok_or(ScanError::CoordinateOverflow { axis })
}

impl ScaleSpec {
    pub fn new(
        x_range: (i64, i64),
        y_range: (i64, i64),
        window_size: (i64, i64),
        overlap: (f64, f64),
    ) -> Self {
        Self {
            x_range: (Some(x_range.0), Some(x_range.1)),
            y_range: (Some(y_range.0), Some(y_range.1)),
            window_size,
            overlap,
        }
    }

    /// Check every precondition and return the resolved search region.
    ///
    /// # Errors
    /// * [`ScanError::MissingRangeBound`] - a range endpoint is `None`
    /// * [`ScanError::NonPositiveWindowSize`] - width or height is `<= 0`
    /// * [`ScanError::OverlapOutOfRange`] - an overlap is outside the open interval (0, 1)
    pub fn validate(&self) -> Result<ScanRegion> {
        let x_start = require(self.x_range.0, Axis::X, RangeBound::Start)?;
        let x_stop = require(self.x_range.1, Axis::X, RangeBound::Stop)?;
        let y_start = require(self.y_range.0, Axis::Y, RangeBound::Start)?;
        let y_stop = require(self.y_range.1, Axis::Y, RangeBound::Stop)?;

        let (width, height) = self.window_size;
        if width <= 0 || height <= 0 {
            return Err(ScanError::NonPositiveWindowSize { width, height });
        }

        check_overlap(self.overlap.0, Axis::X)?;
        check_overlap(self.overlap.1, Axis::Y)?;

        Ok(ScanRegion {
            x_start,
            x_stop,
            y_start,
            y_stop,
        })
    }
}

fn require(value: Option<i64>, axis: Axis, bound: RangeBound) -> Result<i64> {
    value.ok_or(ScanError::MissingRangeBound { axis, bound })
}

fn check_overlap(value: f64, axis: Axis) -> Result<()> {
    // NaN fails both comparisons
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ScanError::OverlapOutOfRange { axis, value })
    }
}

/// Stride and window count along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisLayout {
    step: i64,
    count: i64,
}

/// Lay out one axis and check that the far edge of the last window is representable.
fn axis_layout(
    window: i64,
    overlap: f64,
    start: i64,
    span: i64,
    axis: Axis,
) -> Result<AxisLayout> {
    let step = (window as f64 * (1.0 - overlap)).floor() as i64;
    if step == 0 {
        return Err(ScanError::ZeroStep {
            axis,
            window,
            overlap,
        });
    }
    let buffer = (window as f64 * overlap).floor() as i64;
    let count = span
        .checked_sub(buffer)
        .ok_or(ScanError::CoordinateOverflow { axis })?
        / step;

    if count > 0 {
        (count - 1)
            .checked_mul(step)
            .and_then(|offset| start.checked_add(offset))
            .and_then(|last| last.checked_add(window))
            .ok_or(ScanError::CoordinateOverflow { axis })?;
    }
    Ok(AxisLayout { step, count })
}

/// Generate the ordered scan windows for one scale.
///
/// # Errors
/// Any validation error from [`ScaleSpec::validate`], or
/// [`ScanError::ZeroStep`] when the truncated stride is zero (for example a
/// 1-pixel window with 50% overlap), or [`ScanError::CoordinateOverflow`]
/// when a span or window edge does not fit in an `i64`.
///
/// # Examples
/// ```rust
/// use slider::generator::{generate_windows, ScaleSpec};
///
/// let spec = ScaleSpec::new((0, 100), (0, 100), (50, 50), (0.5, 0.5));
/// let windows = generate_windows(&spec).unwrap();
///
/// assert_eq!(windows.len(), 9);
/// assert_eq!(windows[0].start, (0, 0));
/// assert_eq!(windows[8].end, (100, 100));
/// ```
pub fn generate_windows(spec: &ScaleSpec) -> Result<WindowList> {
    let region = spec.validate()?;
    let (win_w, win_h) = spec.window_size;

    let x = axis_layout(win_w, spec.overlap.0, region.x_start, region.x_span()?, Axis::X)?;
    let y = axis_layout(win_h, spec.overlap.1, region.y_start, region.y_span()?, Axis::Y)?;

    if x.count <= 0 || y.count <= 0 {
        warn!(
            "Scale {}x{} fits no windows in x [{}, {}) y [{}, {})",
            win_w, win_h, region.x_start, region.x_stop, region.y_start, region.y_stop
        );
        return Ok(Vec::new());
    }

    let mut windows = Vec::with_capacity((x.count * y.count) as usize);
    for ys in 0..y.count {
        for xs in 0..x.count {
            let start_x = xs * x.step + region.x_start;
            let start_y = ys * y.step + region.y_start;
            windows.push(Window::new(
                (start_x, start_y),
                (start_x + win_w, start_y + win_h),
            ));
        }
    }

    debug!(
        "Scale {}x{}: {}x{} windows, step ({}, {})",
        win_w, win_h, x.count, y.count, x.step, y.step
    );

    Ok(windows)
}
