//! Error types for scan planning and aggregation.

use std::fmt;
use thiserror::Error;

use crate::geometry::Point;

/// Image axis a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Which end of a range is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    Stop,
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Start => write!(f, "start"),
            RangeBound::Stop => write!(f, "stop"),
        }
    }
}

/// Errors raised while validating scan configuration or building scan structures.
///
/// Validation variants are returned before anything is constructed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{axis} range is missing its {bound} value")]
    MissingRangeBound { axis: Axis, bound: RangeBound },

    #[error("window size must be positive, got {width}x{height}")]
    NonPositiveWindowSize { width: i64, height: i64 },

    #[error("{axis} overlap must lie in (0, 1), got {value}")]
    OverlapOutOfRange { axis: Axis, value: f64 },

    /// The truncated step `floor(window * (1 - overlap))` came out as zero.
    #[error("{axis} step is zero for window {window} with overlap {overlap}")]
    ZeroStep { axis: Axis, window: i64, overlap: f64 },

    #[error("{axis} coordinates overflow the 64-bit range")]
    CoordinateOverflow { axis: Axis },

    #[error("partition count must be greater than zero, got {0}")]
    InvalidPartitionCount(usize),

    #[error("partition overlap fraction must be finite and non-negative, got {0}")]
    InvalidPartitionOverlap(f64),

    #[error("partition index {index} is out of range for {n_partitions} partitions")]
    PartitionIndexOutOfRange { index: usize, n_partitions: usize },

    #[error("invalid rectangle: {p2} does not dominate {p1}")]
    InvalidRect { p1: Point, p2: Point },

    #[error("label {0} has no pixels in the label map")]
    EmptyLabel(u32),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScanError>;
