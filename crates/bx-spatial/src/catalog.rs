//! Measured angle catalog
//!
//! Lists the directions available for an IR set, optionally narrowed to the
//! speakers of a surround layout, and memoizes the result per
//! (profile, response type, sample rate, layout).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{SpatialError, SpatialResult};
use crate::ir::{AngleDiscovery, IrContext};
use crate::layout::RenderLayout;
use crate::position::{Direction, angular_distance};

type CatalogKey = (IrContext, &'static str);

/// Memoized view over an [`AngleDiscovery`] source
pub struct AngleCatalog {
    discovery: Arc<dyn AngleDiscovery>,
    cache: RwLock<HashMap<CatalogKey, Arc<[Direction]>>>,
}

impl AngleCatalog {
    pub fn new(discovery: Arc<dyn AngleDiscovery>) -> Self {
        Self {
            discovery,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Directions a source can be rendered from
    ///
    /// A surround layout yields exactly its speaker directions (LFE excluded),
    /// whether or not each one was measured; loading a missing one later fails
    /// with a not-found error.
    pub fn available_angles(
        &self,
        ctx: &IrContext,
        layout: &RenderLayout,
    ) -> SpatialResult<Arc<[Direction]>> {
        let key = (*ctx, layout.name());

        if let Some(angles) = self.cache.read().get(&key) {
            return Ok(Arc::clone(angles));
        }

        let angles: Vec<Direction> = match layout {
            RenderLayout::Unrestricted => self.discovery.measured_angles(ctx)?,
            RenderLayout::Surround(speakers) => {
                let mut directions: Vec<Direction> = Vec::new();
                for direction in speakers.speaker_directions() {
                    if !contains(&directions, direction) {
                        directions.push(direction);
                    }
                }
                directions
            }
        };

        if angles.is_empty() {
            return Err(SpatialError::EmptyAngleSet(format!("{} ({})", ctx, layout)));
        }

        log::info!(
            "Discovered {} measured angles for {} layout {}",
            angles.len(),
            ctx,
            layout
        );

        let angles: Arc<[Direction]> = angles.into();
        self.cache.write().insert(key, Arc::clone(&angles));
        Ok(angles)
    }

    /// Is the direction one of the available angles
    pub fn contains(
        &self,
        ctx: &IrContext,
        layout: &RenderLayout,
        direction: Direction,
    ) -> SpatialResult<bool> {
        Ok(contains(&self.available_angles(ctx, layout)?, direction))
    }

    /// Closest available angle and its distance
    pub fn nearest(
        &self,
        ctx: &IrContext,
        layout: &RenderLayout,
        direction: Direction,
    ) -> SpatialResult<(Direction, f64)> {
        let angles = self.available_angles(ctx, layout)?;
        nearest(&angles, direction).ok_or_else(|| SpatialError::EmptyAngleSet(ctx.to_string()))
    }

    /// Closest available angle off the horizontal plane, if any
    pub fn nearest_elevated(
        &self,
        ctx: &IrContext,
        layout: &RenderLayout,
        direction: Direction,
    ) -> SpatialResult<Option<(Direction, f64)>> {
        Ok(nearest_elevated(&self.available_angles(ctx, layout)?, direction))
    }

    /// Lowest and highest available elevation
    pub fn elevation_range(
        &self,
        ctx: &IrContext,
        layout: &RenderLayout,
    ) -> SpatialResult<(f64, f64)> {
        let angles = self.available_angles(ctx, layout)?;
        elevation_range(&angles).ok_or_else(|| SpatialError::EmptyAngleSet(ctx.to_string()))
    }

    /// Number of memoized angle sets
    pub fn cached_sets(&self) -> usize {
        self.cache.read().len()
    }
}

/// Membership at 0.1 degree precision
pub fn contains(angles: &[Direction], direction: Direction) -> bool {
    angles.iter().any(|angle| angle.same_angle(&direction))
}

/// Closest angle by Cartesian distance (first one wins a tie)
pub fn nearest(angles: &[Direction], direction: Direction) -> Option<(Direction, f64)> {
    angles
        .iter()
        .map(|angle| (*angle, angular_distance(*angle, direction)))
        .fold(None, |best, candidate| match best {
            Some((_, best_distance)) if best_distance <= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Closest angle with non-zero elevation
pub fn nearest_elevated(angles: &[Direction], direction: Direction) -> Option<(Direction, f64)> {
    let elevated: Vec<Direction> = angles
        .iter()
        .copied()
        .filter(|angle| angle.elevation != 0.0)
        .collect();
    nearest(&elevated, direction)
}

/// (min, max) elevation
pub fn elevation_range(angles: &[Direction]) -> Option<(f64, f64)> {
    angles.iter().fold(None, |range, angle| match range {
        None => Some((angle.elevation, angle.elevation)),
        Some((lo, hi)) => Some((lo.min(angle.elevation), hi.max(angle.elevation))),
    })
}
