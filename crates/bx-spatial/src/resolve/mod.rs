//! Angle resolution
//!
//! Maps a requested direction onto the measured angle set:
//! - exact match or close enough to the nearest angle: one angle
//! - otherwise up to three neighbours (planar pair or Delaunay triangle),
//!   blended with inverse-distance weights
//!
//! In `auto` mode the 2-point and 3-point blends are compared by how close
//! their weighted Cartesian average lands to the requested direction.

pub mod delaunay;
mod planar;
mod triangulate;

pub use planar::planar_neighbours;
pub use triangulate::bounding_triangle;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::config::{ResolverConfig, TriangulationFailurePolicy};
use crate::error::{SpatialError, SpatialResult};
use crate::layout::RenderLayout;
use crate::position::{CartesianPoint, Direction, angular_distance, cartesian_to_spherical};

/// Resolution strategy requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Pick 2-point or 3-point by residual
    #[default]
    Auto,
    /// Always the single nearest angle
    Nearest,
    /// Azimuth neighbours on one elevation plane
    Planar,
    /// Best pair of the bounding triangle
    TwoPoint,
    /// Whole bounding triangle
    ThreePoint,
}

impl ResolutionMode {
    pub const ALL: [ResolutionMode; 5] = [
        Self::Auto,
        Self::Nearest,
        Self::Planar,
        Self::TwoPoint,
        Self::ThreePoint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Nearest => "nearest",
            Self::Planar => "planar",
            Self::TwoPoint => "two_point",
            Self::ThreePoint => "three_point",
        }
    }
}

impl FromStr for ResolutionMode {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| SpatialError::InvalidMode(s.to_string()))
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy a plan was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanKind {
    Exact,
    Nearest,
    TwoPoint,
    ThreePoint,
}

/// Measured angle and its blend weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedAngle {
    pub direction: Direction,
    pub weight: f64,
}

/// Advisory raised while resolving; never interrupts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResolutionNote {
    /// Layout has no overhead speakers
    ElevationForcedToZero { from: f64 },
    /// Elevation outside the measured range, clamped for triangulation
    ElevationClamped { from: f64, to: f64 },
    /// No bounding triangle; nearest angle used instead
    TriangulationFallback,
}

/// Measured angles and weights standing in for a requested direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionPlan {
    /// Direction after normalization (and elevation forcing)
    pub desired: Direction,
    /// Strategy used
    pub kind: PlanKind,
    /// 1 to 3 distinct angles, weights sum to 1
    pub angles: Vec<WeightedAngle>,
    pub notes: Vec<ResolutionNote>,
}

impl ResolutionPlan {
    /// Build a plan, merging repeated angles and renormalizing weights
    fn new(
        desired: Direction,
        kind: PlanKind,
        entries: &[(Direction, f64)],
        notes: Vec<ResolutionNote>,
    ) -> Self {
        let mut angles: Vec<WeightedAngle> = Vec::with_capacity(entries.len());
        for &(direction, weight) in entries {
            match angles.iter_mut().find(|a| a.direction.same_angle(&direction)) {
                Some(existing) => existing.weight += weight,
                None => angles.push(WeightedAngle { direction, weight }),
            }
        }

        let total: f64 = angles.iter().map(|a| a.weight).sum();
        if total > 0.0 {
            for angle in &mut angles {
                angle.weight /= total;
            }
        }

        Self {
            desired,
            kind,
            angles,
            notes,
        }
    }

    fn single(desired: Direction, kind: PlanKind, direction: Direction, notes: Vec<ResolutionNote>) -> Self {
        Self::new(desired, kind, &[(direction, 1.0)], notes)
    }

    /// Sum of all weights (1.0 up to rounding)
    pub fn weight_sum(&self) -> f64 {
        self.angles.iter().map(|a| a.weight).sum()
    }

    /// Uses a single measured angle
    pub fn is_single(&self) -> bool {
        self.angles.len() == 1
    }
}

/// Inverse-distance weights; zero distances take all the weight
fn inverse_distance_weights(distances: &[f64]) -> Vec<f64> {
    let zeros = distances.iter().filter(|d| **d <= f64::EPSILON).count();
    if zeros > 0 {
        return distances
            .iter()
            .map(|d| if *d <= f64::EPSILON { 1.0 / zeros as f64 } else { 0.0 })
            .collect();
    }

    let inverse: Vec<f64> = distances.iter().map(|d| 1.0 / d).collect();
    let total: f64 = inverse.iter().sum();
    inverse.iter().map(|w| w / total).collect()
}

/// Weighted blend of ranked candidates and its distance from the target
struct Blend {
    entries: Vec<(Direction, f64)>,
    residual: f64,
}

impl Blend {
    fn of(desired: Direction, ranked: &[(Direction, f64)]) -> Self {
        let distances: Vec<f64> = ranked.iter().map(|(_, d)| *d).collect();
        let weights = inverse_distance_weights(&distances);

        let points: Vec<(CartesianPoint, f64)> = ranked
            .iter()
            .zip(&weights)
            .map(|((direction, _), w)| (direction.to_cartesian(), *w))
            .collect();
        let blended = cartesian_to_spherical(CartesianPoint::weighted_sum(&points));

        Self {
            entries: ranked.iter().map(|(d, _)| *d).zip(weights).collect(),
            residual: angular_distance(desired, blended),
        }
    }
}

/// Resolves requested directions into weighted measured angles
#[derive(Debug, Clone, Default)]
pub struct AngleResolver {
    config: ResolverConfig,
}

impl AngleResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a direction against a working angle set
    pub fn resolve(
        &self,
        desired: Direction,
        angles: &[Direction],
        layout: &RenderLayout,
        mode: ResolutionMode,
    ) -> SpatialResult<ResolutionPlan> {
        let mut notes = Vec::new();
        let mut desired = Direction::new(desired.azimuth, desired.elevation);

        if !layout.has_elevation() && desired.elevation != 0.0 {
            log::info!(
                "Layout {} has no elevated speakers, elevation {:.1} set to 0",
                layout,
                desired.elevation
            );
            notes.push(ResolutionNote::ElevationForcedToZero {
                from: desired.elevation,
            });
            desired = desired.with_elevation(0.0);
        }

        let (nearest, nearest_distance) = catalog::nearest(angles, desired)
            .ok_or_else(|| SpatialError::EmptyAngleSet(format!("layout {}", layout)))?;

        if mode == ResolutionMode::Nearest {
            let kind = if nearest.same_angle(&desired) {
                PlanKind::Exact
            } else {
                PlanKind::Nearest
            };
            return Ok(ResolutionPlan::single(desired, kind, nearest, notes));
        }

        if let Some(exact) = angles.iter().find(|a| a.same_angle(&desired)) {
            log::debug!("{} is a measured angle", desired);
            return Ok(ResolutionPlan::single(desired, PlanKind::Exact, *exact, notes));
        }

        if nearest_distance < self.config.distance_threshold {
            log::debug!(
                "{} snapped to nearest {} (distance {:.4})",
                desired,
                nearest,
                nearest_distance
            );
            return Ok(ResolutionPlan::single(desired, PlanKind::Nearest, nearest, notes));
        }

        let candidates = match self.candidates(desired, angles, layout, mode, &mut notes) {
            Ok(candidates) => candidates,
            Err(SpatialError::Triangulation { .. })
                if self.config.on_triangulation_failure == TriangulationFailurePolicy::NearestAngle =>
            {
                log::warn!("No bounding triangle for {}, using nearest angle {}", desired, nearest);
                notes.push(ResolutionNote::TriangulationFallback);
                return Ok(ResolutionPlan::single(desired, PlanKind::Nearest, nearest, notes));
            }
            Err(e) => return Err(e),
        };

        Ok(self.blend(desired, candidates, mode, notes))
    }

    /// Three neighbour candidates, planar or triangulated
    fn candidates(
        &self,
        desired: Direction,
        angles: &[Direction],
        layout: &RenderLayout,
        mode: ResolutionMode,
        notes: &mut Vec<ResolutionNote>,
    ) -> SpatialResult<[Direction; 3]> {
        let single_plane = angles
            .iter()
            .all(|a| a.key().1 == angles[0].key().1);

        if mode == ResolutionMode::Planar || !layout.has_elevation() || single_plane {
            return planar_neighbours(angles, desired);
        }

        let mut query = desired;
        if let Some((lo, hi)) = catalog::elevation_range(angles) {
            let clamped = desired.elevation.clamp(lo, hi);
            if clamped != desired.elevation {
                log::warn!(
                    "Elevation {:.1} outside measured range [{:.1}, {:.1}], clamped to {:.1}",
                    desired.elevation,
                    lo,
                    hi,
                    clamped
                );
                notes.push(ResolutionNote::ElevationClamped {
                    from: desired.elevation,
                    to: clamped,
                });
                query = desired.with_elevation(clamped);
            }
        }

        bounding_triangle(angles, query)
    }

    fn blend(
        &self,
        desired: Direction,
        candidates: [Direction; 3],
        mode: ResolutionMode,
        notes: Vec<ResolutionNote>,
    ) -> ResolutionPlan {
        let mut ranked: Vec<(Direction, f64)> = candidates
            .iter()
            .map(|c| (*c, angular_distance(*c, desired)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let first_second = Blend::of(desired, &[ranked[0], ranked[1]]);
        let first_third = Blend::of(desired, &[ranked[0], ranked[2]]);
        let two_point = if first_third.residual < first_second.residual {
            first_third
        } else {
            first_second
        };
        let three_point = Blend::of(desired, &ranked);

        log::debug!(
            "{} residuals: 2-point {:.6}, 3-point {:.6}",
            desired,
            two_point.residual,
            three_point.residual
        );

        match mode {
            ResolutionMode::ThreePoint => {
                ResolutionPlan::new(desired, PlanKind::ThreePoint, &three_point.entries, notes)
            }
            ResolutionMode::TwoPoint | ResolutionMode::Planar => {
                ResolutionPlan::new(desired, PlanKind::TwoPoint, &two_point.entries, notes)
            }
            ResolutionMode::Auto if two_point.residual <= three_point.residual => {
                let (closest, closest_distance) = ranked[0];
                if (two_point.residual - closest_distance).abs() < self.config.collapse_tolerance {
                    ResolutionPlan::single(desired, PlanKind::Nearest, closest, notes)
                } else {
                    ResolutionPlan::new(desired, PlanKind::TwoPoint, &two_point.entries, notes)
                }
            }
            ResolutionMode::Auto => {
                ResolutionPlan::new(desired, PlanKind::ThreePoint, &three_point.entries, notes)
            }
            ResolutionMode::Nearest => {
                ResolutionPlan::single(desired, PlanKind::Nearest, ranked[0].0, notes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid() -> Vec<Direction> {
        let mut angles = Vec::new();
        for el in [-30.0, 0.0, 30.0, 60.0] {
            for step in 0..24 {
                angles.push(Direction::new(step as f64 * 15.0, el));
            }
        }
        angles
    }

    fn weight_of(plan: &ResolutionPlan, az: f64, el: f64) -> f64 {
        plan.angles
            .iter()
            .find(|a| a.direction.same_angle(&Direction::new(az, el)))
            .map(|a| a.weight)
            .unwrap_or(0.0)
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("three_point".parse::<ResolutionMode>().unwrap(), ResolutionMode::ThreePoint);
        let err = "bilinear".parse::<ResolutionMode>().unwrap_err();
        assert!(err.to_string().contains("two_point"));
    }

    #[test]
    fn test_exact_for_every_mode() {
        let resolver = AngleResolver::default();
        let angles = grid();
        for mode in ResolutionMode::ALL {
            let plan = resolver
                .resolve(Direction::new(30.0, 30.0), &angles, &RenderLayout::Unrestricted, mode)
                .unwrap();
            assert_eq!(plan.kind, PlanKind::Exact, "{}", mode);
            assert_eq!(plan.angles.len(), 1);
            assert_abs_diff_eq!(plan.angles[0].weight, 1.0);
            assert!(plan.angles[0].direction.same_angle(&Direction::new(30.0, 30.0)));
        }
    }

    #[test]
    fn test_negative_azimuth_matches() {
        let resolver = AngleResolver::default();
        let plan = resolver
            .resolve(
                Direction::new(-30.0, 0.0),
                &grid(),
                &RenderLayout::Unrestricted,
                ResolutionMode::Auto,
            )
            .unwrap();
        assert_eq!(plan.kind, PlanKind::Exact);
        assert_eq!(plan.angles[0].direction.azimuth, 330.0);
    }

    #[test]
    fn test_weights_normalized() {
        let resolver = AngleResolver::default();
        let angles = grid();
        let modes = [
            ResolutionMode::Auto,
            ResolutionMode::Planar,
            ResolutionMode::TwoPoint,
            ResolutionMode::ThreePoint,
        ];

        for mode in modes {
            for i in 0..10 {
                for el in [-25.0, 5.0, 44.0] {
                    let desired = Direction::new((i * 37) as f64, el);
                    let plan = resolver
                        .resolve(desired, &angles, &RenderLayout::Unrestricted, mode)
                        .unwrap();
                    assert!(!plan.angles.is_empty() && plan.angles.len() <= 3);
                    assert_abs_diff_eq!(plan.weight_sum(), 1.0, epsilon = 1e-6);
                    assert!(plan.angles.iter().all(|a| a.weight >= 0.0));
                }
            }
        }
    }

    #[test]
    fn test_snap_below_threshold() {
        let resolver = AngleResolver::default();
        let plan = resolver
            .resolve(
                Direction::new(31.0, 0.0),
                &grid(),
                &RenderLayout::Unrestricted,
                ResolutionMode::ThreePoint,
            )
            .unwrap();
        assert_eq!(plan.kind, PlanKind::Nearest);
        assert!(plan.angles[0].direction.same_angle(&Direction::new(30.0, 0.0)));
    }

    #[test]
    fn test_midpoint_two_point() {
        let resolver = AngleResolver::default();
        let ring = [Direction::new(0.0, 0.0), Direction::new(90.0, 0.0)];
        let plan = resolver
            .resolve(Direction::new(45.0, 0.0), &ring, &RenderLayout::Unrestricted, ResolutionMode::Auto)
            .unwrap();

        assert_eq!(plan.kind, PlanKind::TwoPoint);
        assert_abs_diff_eq!(weight_of(&plan, 0.0, 0.0), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(weight_of(&plan, 90.0, 0.0), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_three_point_merges_repeated_candidate() {
        let resolver = AngleResolver::default();
        let ring = [Direction::new(0.0, 0.0), Direction::new(90.0, 0.0)];
        let plan = resolver
            .resolve(
                Direction::new(45.0, 0.0),
                &ring,
                &RenderLayout::Unrestricted,
                ResolutionMode::ThreePoint,
            )
            .unwrap();

        assert_eq!(plan.angles.len(), 2);
        assert_abs_diff_eq!(weight_of(&plan, 0.0, 0.0), 1.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(weight_of(&plan, 90.0, 0.0), 2.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_auto_collapses_to_closest() {
        // Blending 0 with 180 only moves along the same axis
        let resolver = AngleResolver::default();
        let ring = [Direction::new(0.0, 0.0), Direction::new(180.0, 0.0)];
        let plan = resolver
            .resolve(Direction::new(3.0, 0.0), &ring, &RenderLayout::Unrestricted, ResolutionMode::Auto)
            .unwrap();

        assert_eq!(plan.kind, PlanKind::Nearest);
        assert!(plan.angles[0].direction.same_angle(&Direction::front()));
    }

    #[test]
    fn test_flat_layout_forces_elevation() {
        let resolver = AngleResolver::default();
        let layout = RenderLayout::parse("7.1").unwrap();
        let RenderLayout::Surround(speakers) = layout else {
            panic!("expected surround layout");
        };
        let angles: Vec<Direction> = speakers.speaker_directions().collect();

        let plan = resolver
            .resolve(Direction::new(60.0, 20.0), &angles, &layout, ResolutionMode::Auto)
            .unwrap();

        assert_eq!(plan.desired.elevation, 0.0);
        assert!(matches!(plan.notes[0], ResolutionNote::ElevationForcedToZero { .. }));
        assert_abs_diff_eq!(weight_of(&plan, 30.0, 0.0), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(weight_of(&plan, 90.0, 0.0), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_elevation_clamped_for_triangulation() {
        let resolver = AngleResolver::default();
        let mut angles = Vec::new();
        for az in [0.0, 30.0, 60.0, 90.0] {
            angles.push(Direction::new(az, 0.0));
            angles.push(Direction::new(az, 30.0));
        }

        let plan = resolver
            .resolve(Direction::new(45.0, 60.0), &angles, &RenderLayout::Unrestricted, ResolutionMode::Auto)
            .unwrap();

        assert!(plan.notes.contains(&ResolutionNote::ElevationClamped { from: 60.0, to: 30.0 }));
        assert_abs_diff_eq!(plan.weight_sum(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_triangulation_failure_policy() {
        // A single azimuth column cannot be triangulated
        let column = [
            Direction::new(0.0, -30.0),
            Direction::new(0.0, 0.0),
            Direction::new(0.0, 30.0),
        ];
        let desired = Direction::new(90.0, 10.0);

        let strict = AngleResolver::default();
        let err = strict
            .resolve(desired, &column, &RenderLayout::Unrestricted, ResolutionMode::Auto)
            .unwrap_err();
        assert!(matches!(err, SpatialError::Triangulation { .. }));

        let lenient = AngleResolver::new(
            ResolverConfig::default().with_triangulation_failure(TriangulationFailurePolicy::NearestAngle),
        );
        let plan = lenient
            .resolve(desired, &column, &RenderLayout::Unrestricted, ResolutionMode::Auto)
            .unwrap();
        assert_eq!(plan.kind, PlanKind::Nearest);
        assert!(plan.notes.contains(&ResolutionNote::TriangulationFallback));
    }

    #[test]
    fn test_empty_angles() {
        let resolver = AngleResolver::default();
        assert!(matches!(
            resolver.resolve(Direction::front(), &[], &RenderLayout::Unrestricted, ResolutionMode::Auto),
            Err(SpatialError::EmptyAngleSet(_))
        ));
    }

    #[test]
    fn test_inverse_distance_weights() {
        let w = inverse_distance_weights(&[1.0, 3.0]);
        assert_abs_diff_eq!(w[0], 0.75);
        assert_abs_diff_eq!(w[1], 0.25);

        let w = inverse_distance_weights(&[0.0, 2.0, 0.0]);
        assert_eq!(w, vec![0.5, 0.0, 0.5]);
    }
}
