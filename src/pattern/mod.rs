//! Incremental stroke-to-pattern compression
//!
//! Compresses a noisy point stream into a small sequence of direction
//! vectors. Two thresholds work together: a distance threshold rejects
//! hand-tremor noise, and an angle threshold rejects gentle curvature,
//! yielding a stable symbol sequence suitable for exact-match gesture
//! recognition.

use crate::geometry::{angle_difference, Point};
use serde::{Deserialize, Serialize};

/// Default minimum displacement before a movement is considered (pixels)
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 10.0;

/// Default angular difference before a new segment is extracted,
/// in normalized units where 1 = opposite direction
pub const DEFAULT_ANGLE_THRESHOLD: f64 = 0.3;

/// A 2D displacement representing one stroke segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionVector {
    pub dx: f64,
    pub dy: f64,
}

impl DirectionVector {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Vector from `from` to `to`
    pub fn between(from: Point, to: Point) -> Self {
        Self {
            dx: to.x - from.x,
            dy: to.y - from.y,
        }
    }

    /// Euclidean length of the vector
    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

/// An ordered sequence of direction vectors extracted from a drag stroke.
///
/// Empty until the first point is observed; the final vector always
/// represents "last extracted point to current point", so the pattern is
/// only fully realized on read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GesturePattern(pub Vec<DirectionVector>);

impl GesturePattern {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn vectors(&self) -> &[DirectionVector] {
        &self.0
    }
}

/// Result of feeding one point to the [`PatternConstructor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PointOutcome {
    /// Nothing new registered
    Unchanged = 0,
    /// A reference direction was established (no segment yet)
    ReferenceEstablished = 1,
    /// A new segment was extracted and the reference direction replaced
    SegmentExtracted = 2,
}

/// Incremental point-stream to direction-pattern algorithm.
///
/// Maintains the last-extracted point, the previous raw point (the noise
/// anchor), the current reference direction, and the last raw point seen.
/// Confirmed segments are only ever appended; the trailing synthetic
/// vector is recomputed on every [`pattern`](Self::pattern) read.
#[derive(Debug)]
pub struct PatternConstructor {
    distance_threshold: f64,
    angle_threshold: f64,
    /// Start of the segment currently being traced
    last_extracted: Option<Point>,
    /// Noise anchor: only advances on threshold-passing displacements
    previous: Option<Point>,
    /// Current reference direction
    reference: Option<(f64, f64)>,
    /// Most recent raw point seen, threshold-passing or not
    last_point: Option<Point>,
    segments: Vec<DirectionVector>,
}

impl PatternConstructor {
    /// Create with default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_DISTANCE_THRESHOLD, DEFAULT_ANGLE_THRESHOLD)
    }

    /// Create with custom thresholds.
    ///
    /// The distance threshold is clamped to \[0.0, 1000.0\] pixels and the
    /// angle threshold to \[0.0, 1.0\] to prevent degenerate behavior.
    pub fn with_thresholds(distance_threshold: f64, angle_threshold: f64) -> Self {
        Self {
            distance_threshold: distance_threshold.clamp(0.0, 1000.0),
            angle_threshold: angle_threshold.clamp(0.0, 1.0),
            last_extracted: None,
            previous: None,
            reference: None,
            last_point: None,
            segments: Vec::new(),
        }
    }

    /// Feed the next raw point.
    ///
    /// Displacements shorter than the distance threshold are ignored
    /// without advancing the noise anchor, so feeding the same point twice
    /// leaves the pattern unchanged.
    pub fn add_point(&mut self, point: Point) -> PointOutcome {
        let mut outcome = PointOutcome::Unchanged;

        match self.previous {
            None => {
                self.last_extracted = Some(point);
                self.previous = Some(point);
            }
            Some(previous) => {
                let displacement = previous.displacement_to(&point);
                let length = previous.distance_to(&point);

                if length > self.distance_threshold {
                    match self.reference {
                        None => {
                            self.reference = Some(displacement);
                            outcome = PointOutcome::ReferenceEstablished;
                        }
                        Some(reference) => {
                            let difference = angle_difference(reference, displacement);
                            if difference.abs() > self.angle_threshold {
                                // The confirmed segment runs from the last
                                // extracted point to the previous raw point;
                                // the new displacement becomes the reference.
                                let from = self.last_extracted.unwrap_or(previous);
                                self.segments.push(DirectionVector::between(from, previous));
                                self.last_extracted = Some(previous);
                                self.reference = Some(displacement);
                                outcome = PointOutcome::SegmentExtracted;
                            }
                        }
                    }
                    self.previous = Some(point);
                }
            }
        }

        self.last_point = Some(point);
        outcome
    }

    /// Current pattern: all confirmed segments plus one synthetic vector
    /// from the last extracted point to the most recent raw point.
    ///
    /// Pure read; returns an empty pattern before any point is added.
    pub fn pattern(&self) -> GesturePattern {
        let mut vectors = self.segments.clone();
        if let (Some(from), Some(to)) = (self.last_extracted, self.last_point) {
            vectors.push(DirectionVector::between(from, to));
        }
        GesturePattern(vectors)
    }

    /// Number of confirmed segments (excluding the synthetic tail)
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Reset all accumulated state
    pub fn clear(&mut self) {
        self.last_extracted = None;
        self.previous = None;
        self.reference = None;
        self.last_point = None;
        self.segments.clear();
    }
}

impl Default for PatternConstructor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constructor() -> PatternConstructor {
        PatternConstructor::with_thresholds(10.0, 0.3)
    }

    #[test]
    fn test_empty_before_first_point() {
        let c = constructor();
        assert!(c.pattern().is_empty());
    }

    #[test]
    fn test_single_point_yields_zero_tail() {
        let mut c = constructor();
        assert_eq!(c.add_point(Point::new(5.0, 5.0)), PointOutcome::Unchanged);

        let pattern = c.pattern();
        assert_eq!(pattern.len(), 1);
        assert_eq!(pattern.vectors()[0], DirectionVector::new(0.0, 0.0));
    }

    #[test]
    fn test_first_long_displacement_establishes_reference() {
        let mut c = constructor();
        c.add_point(Point::new(0.0, 0.0));
        assert_eq!(
            c.add_point(Point::new(20.0, 0.0)),
            PointOutcome::ReferenceEstablished
        );
        assert_eq!(c.segment_count(), 0);

        // Pattern is segments + the synthetic tail
        let pattern = c.pattern();
        assert_eq!(pattern.len(), 1);
        assert_eq!(pattern.vectors()[0], DirectionVector::new(20.0, 0.0));
    }

    #[test]
    fn test_jitter_below_threshold_ignored() {
        let mut c = constructor();
        c.add_point(Point::new(0.0, 0.0));
        c.add_point(Point::new(20.0, 0.0));

        let before = c.pattern();
        // Same point twice: displacement zero, anchor untouched
        assert_eq!(c.add_point(Point::new(20.0, 0.0)), PointOutcome::Unchanged);
        assert_eq!(c.pattern(), before);

        // Sub-threshold wiggle never produces a segment either
        assert_eq!(c.add_point(Point::new(23.0, 2.0)), PointOutcome::Unchanged);
        assert_eq!(c.segment_count(), 0);
    }

    #[test]
    fn test_sub_threshold_point_still_moves_synthetic_tail() {
        let mut c = constructor();
        c.add_point(Point::new(0.0, 0.0));
        c.add_point(Point::new(20.0, 0.0));
        c.add_point(Point::new(23.0, 0.0));

        // The visible pattern reflects the cursor's current position
        let pattern = c.pattern();
        assert_eq!(pattern.len(), 1);
        assert_eq!(pattern.vectors()[0], DirectionVector::new(23.0, 0.0));
    }

    #[test]
    fn test_straight_line_never_extracts_segments() {
        let mut c = constructor();
        for i in 0..50 {
            let outcome = c.add_point(Point::new(i as f64 * 15.0, 0.0));
            assert_ne!(outcome, PointOutcome::SegmentExtracted);
        }
        assert_eq!(c.segment_count(), 0);
        assert_eq!(c.pattern().len(), 1);
    }

    #[test]
    fn test_right_angle_extracts_segment() {
        let mut c = constructor();
        c.add_point(Point::new(0.0, 0.0));
        c.add_point(Point::new(50.0, 0.0));
        // Sharp turn down: angle difference 0.5 > 0.3
        assert_eq!(
            c.add_point(Point::new(50.0, 50.0)),
            PointOutcome::SegmentExtracted
        );

        assert_eq!(c.segment_count(), 1);
        let pattern = c.pattern();
        assert_eq!(pattern.len(), 2);
        // Confirmed segment: last extracted (origin) -> previous raw point
        assert_eq!(pattern.vectors()[0], DirectionVector::new(50.0, 0.0));
        // Synthetic tail: new extraction anchor -> current point
        assert_eq!(pattern.vectors()[1], DirectionVector::new(0.0, 50.0));
    }

    #[test]
    fn test_gentle_curve_rejected() {
        let mut c = constructor();
        // Points along a wide arc whose total turning stays under the
        // angle threshold, so no segment is ever extracted.
        let mut angle: f64 = 0.0;
        for _ in 0..12 {
            let p = Point::new(500.0 * angle.cos(), 500.0 * angle.sin());
            let outcome = c.add_point(p);
            assert_ne!(outcome, PointOutcome::SegmentExtracted);
            angle += 0.05;
        }
        assert_eq!(c.segment_count(), 0);
    }

    #[test]
    fn test_zigzag_extracts_each_turn() {
        let mut c = constructor();
        c.add_point(Point::new(0.0, 0.0));
        c.add_point(Point::new(50.0, 0.0));
        c.add_point(Point::new(50.0, 50.0));
        c.add_point(Point::new(100.0, 50.0));
        c.add_point(Point::new(100.0, 100.0));

        assert_eq!(c.segment_count(), 3);
        let pattern = c.pattern();
        assert_eq!(pattern.len(), 4);
    }

    #[test]
    fn test_pattern_length_invariant() {
        let mut c = constructor();
        let points = [
            (0.0, 0.0),
            (30.0, 0.0),
            (31.0, 1.0),
            (30.0, 40.0),
            (90.0, 40.0),
            (90.0, 41.0),
        ];
        for (x, y) in points {
            c.add_point(Point::new(x, y));
            // Always segments + exactly one synthetic tail once non-empty
            assert_eq!(c.pattern().len(), c.segment_count() + 1);
        }
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut c = constructor();
        c.add_point(Point::new(0.0, 0.0));
        c.add_point(Point::new(50.0, 0.0));
        c.add_point(Point::new(50.0, 50.0));
        assert!(c.segment_count() > 0);

        c.clear();
        assert_eq!(c.segment_count(), 0);
        assert!(c.pattern().is_empty());

        // Usable again after clear
        c.add_point(Point::new(0.0, 0.0));
        assert_eq!(c.pattern().len(), 1);
    }

    #[test]
    fn test_thresholds_clamped() {
        let c = PatternConstructor::with_thresholds(-5.0, 4.0);
        assert_eq!(c.distance_threshold, 0.0);
        assert_eq!(c.angle_threshold, 1.0);
    }

    #[test]
    fn test_direction_vector_magnitude() {
        assert!((DirectionVector::new(3.0, 4.0).magnitude() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_pattern_serialization() {
        let pattern = GesturePattern(vec![
            DirectionVector::new(1.0, 0.0),
            DirectionVector::new(0.0, -1.0),
        ]);
        let json = serde_json::to_string(&pattern).unwrap();
        let back: GesturePattern = serde_json::from_str(&json).unwrap();
        assert_eq!(pattern, back);
    }
}
