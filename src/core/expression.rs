//! Smile/frown expression estimation from mouth landmark geometry.
//!
//! The estimate is the vertical offset between the lip-center midpoint and
//! the mouth-corner midpoint, normalized asymmetrically: smiles produce
//! smaller raw offsets than frowns, so they are scaled up harder.

use crate::tracker::types::{
    FaceObservation, Point, LEFT_MOUTH_CORNER, LOWER_LIP_CENTER, RIGHT_MOUTH_CORNER,
    UPPER_LIP_CENTER,
};

/// Bound enforced on the normalized expression scalar.
pub const EXPRESSION_LIMIT: f64 = 0.9;

/// Divisor for negative raw offsets (smiles).
const SMILE_DIVISOR: f64 = 5.0;
/// Divisor for non-negative raw offsets (frowns).
const FROWN_DIVISOR: f64 = 10.0;

/// Estimate the expression scalar for one face.
///
/// Negative values lean smile, positive lean frown, in image coordinates
/// where y grows downward. Returns `None` when the observation does not
/// carry all four mouth landmarks.
pub fn estimate(face: &FaceObservation) -> Option<f64> {
    let left_corner = face.keypoint(LEFT_MOUTH_CORNER)?;
    let right_corner = face.keypoint(RIGHT_MOUTH_CORNER)?;
    let upper_lip = face.keypoint(UPPER_LIP_CENTER)?;
    let lower_lip = face.keypoint(LOWER_LIP_CENTER)?;

    let corner_mid = Point::midpoint(left_corner, right_corner);
    let lip_mid = Point::midpoint(upper_lip, lower_lip);

    // Lip corners rising above the lip center pull the offset negative.
    let raw = lip_mid.y - corner_mid.y;

    let scaled = if raw < 0.0 {
        raw / SMILE_DIVISOR
    } else {
        raw / FROWN_DIVISOR
    };

    Some(scaled.clamp(-EXPRESSION_LIMIT, EXPRESSION_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Face with the given vertical offset between lip center and corners.
    fn face_with_offset(offset: f64) -> FaceObservation {
        FaceObservation::from_mouth(
            Point::new(200.0, 240.0),
            Point::new(280.0, 240.0),
            Point::new(240.0, 240.0 + offset),
            Point::new(240.0, 240.0 + offset),
        )
    }

    #[test]
    fn test_sign_follows_offset() {
        assert!(estimate(&face_with_offset(-2.0)).unwrap() < 0.0);
        assert!(estimate(&face_with_offset(2.0)).unwrap() > 0.0);
        assert_eq!(estimate(&face_with_offset(0.0)), Some(0.0));
    }

    #[test]
    fn test_asymmetric_scaling() {
        // Same raw magnitude, but the smile side scales twice as hard.
        assert_eq!(estimate(&face_with_offset(-2.0)), Some(-0.4));
        assert_eq!(estimate(&face_with_offset(2.0)), Some(0.2));
    }

    #[test]
    fn test_limit_is_enforced() {
        assert_eq!(estimate(&face_with_offset(-40.0)), Some(-EXPRESSION_LIMIT));
        assert_eq!(estimate(&face_with_offset(40.0)), Some(EXPRESSION_LIMIT));
    }

    #[test]
    fn test_missing_landmarks_produce_no_estimate() {
        let face = FaceObservation::new(vec![Point::new(0.0, 0.0); 20]);
        assert_eq!(estimate(&face), None);
    }
}
