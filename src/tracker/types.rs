//! Observation types produced by the face tracking boundary.
//!
//! The tracking model is an external black box. All the engine ever sees is
//! a stream of landmark point sets keyed by fixed anatomical indices, so the
//! index contract below must be preserved exactly by any replacement model.

use serde::{Deserialize, Serialize};

/// Face-mesh landmark index of the left mouth corner.
pub const LEFT_MOUTH_CORNER: usize = 78;
/// Face-mesh landmark index of the right mouth corner.
pub const RIGHT_MOUTH_CORNER: usize = 308;
/// Face-mesh landmark index of the upper lip center.
pub const UPPER_LIP_CENTER: usize = 13;
/// Face-mesh landmark index of the lower lip center.
pub const LOWER_LIP_CENTER: usize = 14;

/// A single tracked 2D facial point in image coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint of two landmarks.
    pub fn midpoint(a: Point, b: Point) -> Point {
        Point {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }
}

/// Per-frame landmark positions for one tracked face.
///
/// Overwritten wholesale on each new tracker result; never merged across
/// frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceObservation {
    keypoints: Vec<Point>,
}

impl FaceObservation {
    pub fn new(keypoints: Vec<Point>) -> Self {
        Self { keypoints }
    }

    /// Build an observation carrying only the four mouth landmarks the
    /// expression estimator reads. All other indices are zeroed.
    pub fn from_mouth(
        left_corner: Point,
        right_corner: Point,
        upper_lip: Point,
        lower_lip: Point,
    ) -> Self {
        let mut keypoints = vec![Point::new(0.0, 0.0); RIGHT_MOUTH_CORNER + 1];
        keypoints[LEFT_MOUTH_CORNER] = left_corner;
        keypoints[RIGHT_MOUTH_CORNER] = right_corner;
        keypoints[UPPER_LIP_CENTER] = upper_lip;
        keypoints[LOWER_LIP_CENTER] = lower_lip;
        Self { keypoints }
    }

    /// Landmark at a fixed anatomical index, if the observation carries it.
    pub fn keypoint(&self, index: usize) -> Option<Point> {
        self.keypoints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Events delivered by a tracker to the session loop.
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// The tracking model finished initializing; observations follow.
    Ready,
    /// Zero or more faces observed in the latest frame.
    Frame(Vec<FaceObservation>),
}

/// One recorded frame in a replay file (JSON Lines, one frame per line).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub faces: Vec<RecordedFace>,
}

/// A face as stored in a recording: raw `[x, y]` pairs in landmark order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFace {
    pub keypoints: Vec<[f64; 2]>,
}

impl From<RecordedFace> for FaceObservation {
    fn from(face: RecordedFace) -> Self {
        FaceObservation::new(
            face.keypoints
                .into_iter()
                .map(|[x, y]| Point::new(x, y))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let mid = Point::midpoint(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        assert_eq!(mid, Point::new(2.0, 1.0));
    }

    #[test]
    fn test_from_mouth_places_landmarks_at_contract_indices() {
        let face = FaceObservation::from_mouth(
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
            Point::new(5.0, 6.0),
            Point::new(7.0, 8.0),
        );

        assert_eq!(face.keypoint(LEFT_MOUTH_CORNER), Some(Point::new(1.0, 2.0)));
        assert_eq!(
            face.keypoint(RIGHT_MOUTH_CORNER),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(face.keypoint(UPPER_LIP_CENTER), Some(Point::new(5.0, 6.0)));
        assert_eq!(face.keypoint(LOWER_LIP_CENTER), Some(Point::new(7.0, 8.0)));
    }

    #[test]
    fn test_missing_keypoint_is_none() {
        let face = FaceObservation::new(vec![Point::new(0.0, 0.0)]);
        assert_eq!(face.keypoint(LEFT_MOUTH_CORNER), None);
    }

    #[test]
    fn test_recorded_face_conversion() {
        let recorded = RecordedFace {
            keypoints: vec![[1.0, 2.0], [3.0, 4.0]],
        };
        let face: FaceObservation = recorded.into();
        assert_eq!(face.len(), 2);
        assert_eq!(face.keypoint(1), Some(Point::new(3.0, 4.0)));
    }
}
