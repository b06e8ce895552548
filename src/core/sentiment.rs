//! Sentiment acceptance window derived from the expression scalar.

use serde::{Deserialize, Serialize};

/// Width of the acceptance band.
pub const WINDOW_WIDTH: f64 = 0.2;

/// The currently accepted sentiment range.
///
/// The sign inversion in [`from_expression`](SentimentWindow::from_expression)
/// means a smile (negative expression) shifts the window toward positive
/// sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentWindow {
    min: f64,
    max: f64,
}

impl SentimentWindow {
    /// Center a window of [`WINDOW_WIDTH`] on the inverted expression scalar.
    pub fn from_expression(expression: f64) -> Self {
        Self {
            min: -expression - WINDOW_WIDTH / 2.0,
            max: -expression + WINDOW_WIDTH / 2.0,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, sentiment: f64) -> bool {
        sentiment >= self.min && sentiment <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_width_is_invariant() {
        for e in [-0.9, -0.5, 0.0, 0.3, 0.9] {
            let window = SentimentWindow::from_expression(e);
            assert!((window.max() - window.min() - WINDOW_WIDTH).abs() < 1e-12);
            assert_eq!(window.min(), -e - WINDOW_WIDTH / 2.0);
        }
    }

    #[test]
    fn test_smile_shifts_window_positive() {
        let window = SentimentWindow::from_expression(-0.5);
        assert_eq!(window.min(), 0.4);
        assert_eq!(window.max(), 0.6);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = SentimentWindow::from_expression(0.0);
        assert!(window.contains(-0.1));
        assert!(window.contains(0.1));
        assert!(!window.contains(-0.1000001));
        assert!(!window.contains(0.1000001));
    }
}
