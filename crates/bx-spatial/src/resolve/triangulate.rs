//! Bounding triangle search over the measured angle grid
//!
//! The grid is treated as flat (azimuth, elevation) coordinates. Because the
//! azimuth seam and the poles break that picture, the search is retried with
//! the grid shifted three ways before giving up.

use super::delaunay::{self, Point};
use crate::error::{SpatialError, SpatialResult};
use crate::position::Direction;

/// Grid projection tried on each attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unwrap {
    /// Azimuths above 180 moved to (-180, 0]
    SignedAzimuth,
    /// Plain [0, 360) azimuths
    PositiveAzimuth,
    /// [0, 360) azimuths, negative elevations moved up by 360
    PositiveElevation,
}

impl Unwrap {
    const ATTEMPTS: [Unwrap; 3] = [Self::SignedAzimuth, Self::PositiveAzimuth, Self::PositiveElevation];

    fn project(self, direction: Direction) -> Point {
        let Direction { azimuth, elevation } = direction;
        match self {
            Self::SignedAzimuth => {
                let az = if azimuth > 180.0 { azimuth - 360.0 } else { azimuth };
                [az, elevation]
            }
            Self::PositiveAzimuth => [azimuth, elevation],
            Self::PositiveElevation => {
                let el = if elevation < 0.0 { elevation + 360.0 } else { elevation };
                [azimuth, el]
            }
        }
    }
}

/// Three measured angles whose grid triangle contains the query
///
/// Returns the original (unshifted) directions, or
/// [`SpatialError::Triangulation`] when every attempt fails.
pub fn bounding_triangle(angles: &[Direction], query: Direction) -> SpatialResult<[Direction; 3]> {
    let mut unique: Vec<Direction> = Vec::with_capacity(angles.len());
    for angle in angles {
        if !unique.iter().any(|u| u.same_angle(angle)) {
            unique.push(*angle);
        }
    }

    for unwrap in Unwrap::ATTEMPTS {
        let points: Vec<Point> = unique.iter().map(|d| unwrap.project(*d)).collect();
        let triangles = delaunay::triangulate(&points);

        if let Some(t) = delaunay::locate(&points, &triangles, unwrap.project(query)) {
            log::debug!(
                "Bounding triangle for {} ({:?}): {} {} {}",
                query,
                unwrap,
                unique[t.a],
                unique[t.b],
                unique[t.c]
            );
            return Ok([unique[t.a], unique[t.b], unique[t.c]]);
        }
    }

    Err(SpatialError::Triangulation {
        azimuth: query.azimuth,
        elevation: query.elevation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::angular_distance;
    use crate::resolve::inverse_distance_weights;

    fn has(found: &[Direction; 3], az: f64, el: f64) -> bool {
        found.iter().any(|d| d.same_angle(&Direction::new(az, el)))
    }

    #[test]
    fn test_square_corners() {
        let grid = [
            Direction::new(30.0, 0.0),
            Direction::new(60.0, 0.0),
            Direction::new(30.0, 40.0),
            Direction::new(60.0, 40.0),
        ];
        let found = bounding_triangle(&grid, Direction::new(45.0, 20.0)).unwrap();

        let corners = found.iter().filter(|d| grid.iter().any(|g| g.same_angle(d))).count();
        assert_eq!(corners, 3);
        assert!(!found[0].same_angle(&found[1]));
        assert!(!found[1].same_angle(&found[2]));
        assert!(!found[0].same_angle(&found[2]));
    }

    #[test]
    fn test_quarter_sphere_square() {
        let grid = [
            Direction::new(0.0, 0.0),
            Direction::new(90.0, 0.0),
            Direction::new(0.0, 45.0),
            Direction::new(90.0, 45.0),
        ];
        let found = bounding_triangle(&grid, Direction::new(45.0, 20.0)).unwrap();

        assert!(found.iter().all(|d| grid.iter().any(|g| g.same_angle(d))));
        assert!(!found[0].same_angle(&found[1]));
        assert!(!found[1].same_angle(&found[2]));
        assert!(!found[0].same_angle(&found[2]));
        // 20 lies below both diagonals, so the bottom edge is always used
        assert!(has(&found, 0.0, 0.0) || has(&found, 90.0, 0.0));
    }

    #[test]
    fn test_below_grid_uses_shifted_elevations() {
        let grid = [
            Direction::new(0.0, -10.0),
            Direction::new(90.0, -10.0),
            Direction::new(45.0, 80.0),
        ];
        let query = Direction::new(45.0, -60.0);

        for unwrap in [Unwrap::SignedAzimuth, Unwrap::PositiveAzimuth] {
            let points: Vec<Point> = grid.iter().map(|d| unwrap.project(*d)).collect();
            let triangles = delaunay::triangulate(&points);
            assert!(delaunay::locate(&points, &triangles, unwrap.project(query)).is_none());
        }

        let found = bounding_triangle(&grid, query).unwrap();
        assert!(has(&found, 0.0, -10.0) && has(&found, 90.0, -10.0) && has(&found, 45.0, 80.0));

        let distances: Vec<f64> = found.iter().map(|d| angular_distance(*d, query)).collect();
        let weights = inverse_distance_weights(&distances);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(weights.iter().all(|w| *w > 0.0));
    }

    #[test]
    fn test_across_seam() {
        // Query at 355 lies between 340 and 10 only once azimuths are signed
        let grid = [
            Direction::new(340.0, -20.0),
            Direction::new(10.0, -20.0),
            Direction::new(340.0, 20.0),
            Direction::new(10.0, 20.0),
        ];
        let found = bounding_triangle(&grid, Direction::new(355.0, 5.0)).unwrap();
        assert!(has(&found, 340.0, -20.0) || has(&found, 340.0, 20.0));
        assert!(has(&found, 10.0, -20.0) || has(&found, 10.0, 20.0));
    }

    #[test]
    fn test_back_hemisphere_uses_positive_azimuths() {
        // 170..190 straddles the signed seam at 180
        let grid = [
            Direction::new(170.0, 0.0),
            Direction::new(190.0, 0.0),
            Direction::new(170.0, 30.0),
            Direction::new(190.0, 30.0),
        ];
        let found = bounding_triangle(&grid, Direction::new(180.0, 10.0)).unwrap();
        assert!(found.iter().all(|d| d.azimuth == 170.0 || d.azimuth == 190.0));
    }

    #[test]
    fn test_duplicates_collapsed() {
        let grid = [
            Direction::new(0.0, 0.0),
            Direction::new(0.0, 0.0),
            Direction::new(40.0, 0.0),
            Direction::new(20.0, 30.0),
        ];
        let found = bounding_triangle(&grid, Direction::new(20.0, 10.0)).unwrap();
        assert!(has(&found, 0.0, 0.0) && has(&found, 40.0, 0.0) && has(&found, 20.0, 30.0));
    }

    #[test]
    fn test_outside_grid_fails() {
        let grid = [
            Direction::new(0.0, 0.0),
            Direction::new(20.0, 0.0),
            Direction::new(10.0, 20.0),
        ];
        let err = bounding_triangle(&grid, Direction::new(90.0, 60.0)).unwrap_err();
        assert!(matches!(err, SpatialError::Triangulation { .. }));
    }
}
