//! # Path
//!
//! This module defines the path followed by the pursuit controller, the simplification of raw
//! sketched waypoints into a reduced polyline, and the segments the controller tracks against.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single point on a sketched path, in field coordinates.
pub type Waypoint = Vector2<f64>;

/// A path defining the desired trajectory of the robot.
///
/// The order of the points defines the direction of travel.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Path {
    pub points: Vec<Waypoint>,
}

/// A straight segment between two consecutive path points.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Segment {
    /// The start point of the segment
    pub start: Waypoint,

    /// The end point of the segment
    pub end: Waypoint,

    /// The vector from start to end
    pub delta: Vector2<f64>,

    /// Unit vector pointing in the direction of the segment
    pub direction: Vector2<f64>,

    /// The length of the segment, always greater than zero
    pub length: f64,

    /// The heading (angle to the +ve x axis) of the segment
    pub angle_rad: f64,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PathError {
    /// Two consecutive waypoints are coincident, so the segment between them has no direction.
    #[error("The segment starting at waypoint {index} has zero length")]
    DegenerateSegment { index: usize },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a path from a sequence of points.
    pub fn from_points(points: Vec<Waypoint>) -> Self {
        Path { points }
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Return the length of the path measured along the polyline.
    ///
    /// If the path is empty (not enough points) then `None` is returned.
    pub fn length(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }

        Some(self.points.windows(2).map(|p| (p[1] - p[0]).norm()).sum())
    }

    /// Return a simplified copy of this path, see [`simplify`].
    pub fn simplify(&self, tolerance: f64, high_quality: bool) -> Self {
        Path {
            points: simplify(&self.points, tolerance, high_quality),
        }
    }

    /// Build the segments joining each pair of consecutive points, see [`build_segments`].
    pub fn segments(&self) -> Result<Vec<Segment>, PathError> {
        build_segments(&self.points)
    }

    /// Remove points which are within `min_sep` of the previously kept point.
    ///
    /// The first and last points of the path are always kept, so that the path still starts and
    /// ends where it was sketched. Returns the number of points removed.
    pub fn remove_coincident(&mut self, min_sep: f64) -> usize {
        let num_before = self.points.len();
        if num_before < 2 {
            return 0;
        }

        let last = self.points[num_before - 1];
        let mut kept: Vec<Waypoint> = Vec::with_capacity(num_before);
        kept.push(self.points[0]);

        for point in self.points[1..num_before - 1].iter() {
            // Safe to index, kept always holds the first point
            if (point - kept[kept.len() - 1]).norm() > min_sep {
                kept.push(*point);
            }
        }

        // The end point replaces the last kept point if the two are too close, unless that would
        // remove the start point.
        if (last - kept[kept.len() - 1]).norm() <= min_sep && kept.len() > 1 {
            kept.pop();
        }
        if (last - kept[kept.len() - 1]).norm() > min_sep {
            kept.push(last);
        }

        self.points = kept;

        let num_removed = num_before - self.points.len();
        if num_removed > 0 {
            debug!("Removed {} coincident points from the path", num_removed);
        }

        num_removed
    }
}

impl Segment {
    /// Create the segment joining `start` to `end`.
    ///
    /// Returns `None` if the points are coincident.
    pub fn new(start: Waypoint, end: Waypoint) -> Option<Self> {
        let delta = end - start;
        let length = delta.norm();

        if !(length > std::f64::EPSILON) {
            return None;
        }

        Some(Self {
            start,
            end,
            delta,
            direction: delta / length,
            length,
            angle_rad: delta[1].atan2(delta[0]),
        })
    }

    /// Get the scalar projection of `point` onto this segment as a fraction of the segment's
    /// length.
    ///
    /// Values in [0, 1) lie alongside the segment, negative values before its start and values of
    /// 1 or more at or beyond its end.
    pub fn projection(&self, point: &Vector2<f64>) -> f64 {
        (point - self.start).dot(&self.direction) / self.length
    }

    /// Get the point at the given fraction along the segment.
    pub fn point_at(&self, fraction: f64) -> Waypoint {
        self.start + fraction * self.length * self.direction
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Simplify a sequence of points, discarding those that deviate less than `tolerance` from the
/// polyline through their retained neighbours.
///
/// This is the Ramer-Douglas-Peucker algorithm operating on squared distances. If `high_quality`
/// is false a cheaper radial distance pass, which drops points within `tolerance` of the
/// previously kept point, is run first.
///
/// The output is always a subsequence of the input which keeps the first and last points. Inputs
/// with two or fewer points are returned unchanged.
pub fn simplify(points: &[Waypoint], tolerance: f64, high_quality: bool) -> Vec<Waypoint> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let sq_tolerance = tolerance.max(0.0).powi(2);

    let simplified = if high_quality {
        simplify_douglas_peucker(points, sq_tolerance)
    } else {
        simplify_douglas_peucker(&simplify_radial_dist(points, sq_tolerance), sq_tolerance)
    };

    trace!(
        "Simplified {} points to {} (tolerance {})",
        points.len(),
        simplified.len(),
        tolerance
    );

    simplified
}

/// Build the segments between each consecutive pair of points.
///
/// Empty and single point inputs produce no segments. Coincident consecutive points produce a
/// [`PathError::DegenerateSegment`] error carrying the index of the first of the pair.
pub fn build_segments(points: &[Waypoint]) -> Result<Vec<Segment>, PathError> {
    points
        .windows(2)
        .enumerate()
        .map(|(index, p)| Segment::new(p[0], p[1]).ok_or(PathError::DegenerateSegment { index }))
        .collect()
}

/// Squared distance between two points.
fn sq_dist(p0: &Waypoint, p1: &Waypoint) -> f64 {
    (p0 - p1).norm_squared()
}

/// Squared distance between a point and the segment `start`-`end`.
fn sq_seg_dist(point: &Waypoint, start: &Waypoint, end: &Waypoint) -> f64 {
    let delta = end - start;
    let len_sq = delta.norm_squared();

    let mut closest = *start;

    if len_sq > 0.0 {
        let t = (point - start).dot(&delta) / len_sq;

        if t > 1.0 {
            closest = *end;
        } else if t > 0.0 {
            closest = start + t * delta;
        }
    }

    sq_dist(point, &closest)
}

/// Basic distance-based simplification, keeps the first and last point.
fn simplify_radial_dist(points: &[Waypoint], sq_tolerance: f64) -> Vec<Waypoint> {
    let mut prev = points[0];
    let mut new_points = vec![prev];

    for point in points[1..].iter() {
        if sq_dist(point, &prev) > sq_tolerance {
            new_points.push(*point);
            prev = *point;
        }
    }

    if let Some(last) = points.last() {
        if prev != *last {
            new_points.push(*last);
        }
    }

    new_points
}

/// Ramer-Douglas-Peucker simplification.
///
/// Uses an explicit stack of (first, last) index ranges rather than recursion, marking retained
/// points so that the output order matches the input.
fn simplify_douglas_peucker(points: &[Waypoint], sq_tolerance: f64) -> Vec<Waypoint> {
    let last = points.len() - 1;

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut ranges = vec![(0, last)];

    while let Some((first, last)) = ranges.pop() {
        let mut max_sq_dist = sq_tolerance;
        let mut index = None;

        for i in (first + 1)..last {
            let sq_dist = sq_seg_dist(&points[i], &points[first], &points[last]);

            if sq_dist > max_sq_dist {
                index = Some(i);
                max_sq_dist = sq_dist;
            }
        }

        if let Some(index) = index {
            keep[index] = true;

            if index - first > 1 {
                ranges.push((first, index));
            }
            if last - index > 1 {
                ranges.push((index, last));
            }
        }
    }

    points
        .iter()
        .zip(keep.iter())
        .filter_map(|(p, k)| if *k { Some(*p) } else { None })
        .collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// A wobbly sketch of an S shape, as a pointer would capture it.
    fn sketch() -> Vec<Waypoint> {
        (0..200)
            .map(|i| {
                let x = i as f64;
                let wobble = if i % 2 == 0 { 0.3 } else { -0.3 };
                Vector2::new(x, 40.0 * (x / 30.0).sin() + wobble)
            })
            .collect()
    }

    fn is_subsequence(sub: &[Waypoint], full: &[Waypoint]) -> bool {
        let mut it = full.iter();
        sub.iter().all(|s| it.any(|f| f == s))
    }

    #[test]
    fn test_simplify_small_inputs_unchanged() {
        let empty: Vec<Waypoint> = vec![];
        assert_eq!(simplify(&empty, 1.0, true), empty);

        let one = vec![Vector2::new(1.0, 2.0)];
        assert_eq!(simplify(&one, 1.0, true), one);

        let two = vec![Vector2::new(1.0, 2.0), Vector2::new(1.0, 2.0)];
        assert_eq!(simplify(&two, 10.0, false), two);
    }

    #[test]
    fn test_simplify_removes_collinear() {
        let points: Vec<Waypoint> = (0..=10).map(|i| Vector2::new(i as f64, 0.0)).collect();

        let simple = simplify(&points, 0.1, true);
        assert_eq!(simple, vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)]);
    }

    #[test]
    fn test_simplify_keeps_corner() {
        let points = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(5.0, 0.1),
            Vector2::new(10.0, 0.0),
            Vector2::new(10.0, 5.0),
            Vector2::new(10.1, 10.0),
        ];

        let simple = simplify(&points, 1.0, true);
        assert_eq!(
            simple,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(10.0, 0.0),
                Vector2::new(10.1, 10.0)
            ]
        );
    }

    #[test]
    fn test_simplify_monotonic_in_tolerance() {
        let points = sketch();

        for quality in [true, false].iter() {
            let mut prev_len = usize::MAX;

            for tol in [0.0, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 50.0].iter() {
                let simple = simplify(&points, *tol, *quality);

                assert_eq!(simple[0], points[0]);
                assert_eq!(simple[simple.len() - 1], points[points.len() - 1]);
                assert!(is_subsequence(&simple, &points));

                if *quality {
                    assert!(simple.len() <= prev_len);
                }
                prev_len = simple.len();
            }
        }
    }

    #[test]
    fn test_simplify_deviation_within_tolerance() {
        let points = sketch();
        let tol = 2.0;
        let simple = simplify(&points, tol, true);

        // Every original point lies within the tolerance of the simplified polyline
        for p in points.iter() {
            let min_sq = simple
                .windows(2)
                .map(|s| sq_seg_dist(p, &s[0], &s[1]))
                .fold(std::f64::MAX, f64::min);
            assert!(min_sq <= tol * tol + 1e-9);
        }
    }

    #[test]
    fn test_build_segments() {
        let points = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(3.0, 4.0),
            Vector2::new(3.0, -6.0),
        ];

        let segs = build_segments(&points).unwrap();
        assert_eq!(segs.len(), 2);

        assert_eq!(segs[0].length, 5.0);
        assert_eq!(segs[0].delta, Vector2::new(3.0, 4.0));
        assert!((segs[0].direction - Vector2::new(0.6, 0.8)).norm() < 1e-12);
        assert!((segs[0].angle_rad - 4f64.atan2(3.0)).abs() < 1e-12);

        assert_eq!(segs[1].length, 10.0);
        assert_eq!(segs[1].direction, Vector2::new(0.0, -1.0));
        assert!((segs[1].angle_rad + std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        // Pure function, same input gives the same segments
        assert_eq!(build_segments(&points).unwrap(), segs);

        // Nothing to build from fewer than two points
        assert!(build_segments(&[]).unwrap().is_empty());
        assert!(build_segments(&points[..1]).unwrap().is_empty());
    }

    #[test]
    fn test_build_segments_degenerate() {
        let points = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 0.0),
        ];

        assert_eq!(
            build_segments(&points),
            Err(PathError::DegenerateSegment { index: 1 })
        );
    }

    #[test]
    fn test_segment_projection() {
        let seg = Segment::new(Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)).unwrap();

        assert_eq!(seg.projection(&Vector2::new(5.0, 3.0)), 0.5);
        assert_eq!(seg.projection(&Vector2::new(-5.0, 3.0)), -0.5);
        assert_eq!(seg.projection(&Vector2::new(12.0, -1.0)), 1.2);
        assert_eq!(seg.point_at(0.25), Vector2::new(2.5, 0.0));
    }

    #[test]
    fn test_remove_coincident() {
        let mut path = Path::from_points(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(0.0, 0.0),
            Vector2::new(5.0, 0.0),
            Vector2::new(5.0, 0.0),
            Vector2::new(10.0, 0.0),
            Vector2::new(10.0, 0.0),
        ]);

        assert_eq!(path.remove_coincident(0.0), 3);
        assert_eq!(
            path.points,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(5.0, 0.0),
                Vector2::new(10.0, 0.0)
            ]
        );
        assert!(path.segments().is_ok());
        assert_eq!(path.length(), Some(10.0));

        // The end point is kept in preference to the point before it
        let mut path = Path::from_points(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(9.9, 0.0),
            Vector2::new(10.0, 0.0),
        ]);
        path.remove_coincident(0.5);
        assert_eq!(
            path.points,
            vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 0.0)]
        );
    }

    #[test]
    fn test_path_json() {
        let path: Path = serde_json::from_str(r#"{"points": [[0.0, 0.0], [100.0, 0.0]]}"#).unwrap();
        assert_eq!(path.get_num_points(), 2);
        assert_eq!(path.length(), Some(100.0));
    }
}
