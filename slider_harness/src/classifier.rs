//! Window classification boundary.
//!
//! The scan runner calls a [`WindowClassifier`] once per scheduled window
//! and only keeps the windows it accepts. Real detectors (feature
//! extraction plus a trained model) plug in here; [`OverlapClassifier`]
//! stands in for one with known ground-truth targets.

use slider::geometry::{Rect, Window};

/// Decides whether an image patch contains the object of interest.
///
/// Implementations are shared across scan workers and must not rely on
/// call order.
pub trait WindowClassifier: Sync {
    fn is_positive(&self, window: &Window) -> bool;
}

impl<F> WindowClassifier for F
where
    F: Fn(&Window) -> bool + Sync,
{
    fn is_positive(&self, window: &Window) -> bool {
        self(window)
    }
}

/// Accepts windows that sufficiently overlap one of a set of target boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapClassifier {
    targets: Vec<Rect>,
    /// Minimum fraction of the window area that must lie inside one target
    min_overlap: f64,
}

impl OverlapClassifier {
    pub fn new(targets: Vec<Rect>, min_overlap: f64) -> Self {
        Self {
            targets,
            min_overlap,
        }
    }

    pub fn targets(&self) -> &[Rect] {
        &self.targets
    }

    pub fn min_overlap(&self) -> f64 {
        self.min_overlap
    }

    /// Largest fraction of `window` covered by any single target.
    pub fn coverage(&self, window: &Window) -> f64 {
        let Ok(rect) = window.to_rect() else {
            return 0.0;
        };
        let area = rect.area();
        if area <= 0 {
            return 0.0;
        }
        self.targets
            .iter()
            .filter_map(|target| rect.overlap(target))
            .map(|shared| shared.area() as f64 / area as f64)
            .fold(0.0, f64::max)
    }
}

impl WindowClassifier for OverlapClassifier {
    fn is_positive(&self, window: &Window) -> bool {
        self.coverage(window) >= self.min_overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn classifier() -> OverlapClassifier {
        OverlapClassifier::new(vec![Rect::from_edges(100, 100, 200, 200).unwrap()], 0.5)
    }

    #[test]
    fn test_coverage() {
        let c = classifier();
        assert_relative_eq!(c.coverage(&Window::new((100, 100), (150, 150))), 1.0);
        assert_relative_eq!(c.coverage(&Window::new((50, 100), (150, 200))), 0.5);
        assert_relative_eq!(c.coverage(&Window::new((0, 0), (50, 50))), 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let c = classifier();
        assert!(c.is_positive(&Window::new((50, 100), (150, 200))));
        assert!(!c.is_positive(&Window::new((40, 100), (140, 200))));
    }

    #[test]
    fn test_best_target_wins() {
        let c = OverlapClassifier::new(
            vec![
                Rect::from_edges(0, 0, 10, 10).unwrap(),
                Rect::from_edges(20, 0, 40, 20).unwrap(),
            ],
            0.75,
        );
        let window = Window::new((5, 0), (25, 20));
        // 5x10 with the first target, 5x20 with the second
        assert_relative_eq!(c.coverage(&window), 0.25);
        assert!(!c.is_positive(&window));
    }

    #[test]
    fn test_degenerate_window() {
        let c = classifier();
        assert_relative_eq!(c.coverage(&Window::new((120, 120), (120, 180))), 0.0);
        assert_relative_eq!(c.coverage(&Window::new((150, 150), (120, 120))), 0.0);
    }

    #[test]
    fn test_accessors() {
        let c = classifier();
        assert_eq!(c.targets(), &[Rect::from_edges(100, 100, 200, 200).unwrap()]);
        assert_relative_eq!(c.min_overlap(), 0.5);
    }

    #[test]
    fn test_closure_classifier() {
        let right_half = |w: &Window| w.left() >= 50;
        assert!(right_half.is_positive(&Window::new((60, 0), (80, 20))));
        assert!(!right_half.is_positive(&Window::new((0, 0), (20, 20))));
    }
}
