//! Azimuth neighbours on a single elevation plane

use crate::error::{SpatialError, SpatialResult};
use crate::position::Direction;

/// Angles left and right of the query on the nearest elevation plane
///
/// The plane's azimuth list is wrapped with one virtual point on each side
/// (lowest + 360, highest - 360) so a straddling pair always exists. The
/// third slot repeats one of the pair: the right neighbour for front/left
/// queries (azimuth <= 180), the left one otherwise.
pub fn planar_neighbours(angles: &[Direction], query: Direction) -> SpatialResult<[Direction; 3]> {
    let plane = angles
        .iter()
        .map(|d| d.elevation)
        .min_by(|a, b| {
            (a - query.elevation)
                .abs()
                .total_cmp(&(b - query.elevation).abs())
        })
        .ok_or_else(|| SpatialError::EmptyAngleSet("planar neighbour search".into()))?;

    let mut azimuths: Vec<f64> = angles
        .iter()
        .filter(|d| d.elevation == plane)
        .map(|d| d.azimuth)
        .collect();

    let lowest = azimuths.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = azimuths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    azimuths.push(lowest + 360.0);
    azimuths.push(highest - 360.0);

    let mut left: Option<f64> = None;
    let mut right: Option<f64> = None;
    for az in azimuths {
        if az <= query.azimuth {
            if left.is_none_or(|l| az > l) {
                left = Some(az);
            }
        } else if right.is_none_or(|r| az < r) {
            right = Some(az);
        }
    }

    // Both virtual points guarantee a neighbour on each side
    let (Some(left), Some(right)) = (left, right) else {
        return Err(SpatialError::EmptyAngleSet("planar neighbour search".into()));
    };

    // Direction::new folds the virtual points back into [0, 360)
    let left = Direction::new(left, plane);
    let right = Direction::new(right, plane);

    if query.azimuth <= 180.0 {
        Ok([left, right, right])
    } else {
        Ok([right, left, left])
    }
}
