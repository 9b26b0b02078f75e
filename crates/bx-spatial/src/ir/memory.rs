//! In-memory impulse response store

use std::collections::HashMap;
use std::sync::Arc;

use super::{
    AngleDiscovery, ImpulseResponse, ImpulseResponseProvider, IrContext, ReverbKind, ReverbLibrary,
    SampleRate,
};
use crate::error::{SpatialError, SpatialResult};
use crate::position::Direction;

/// Impulse responses and reverbs held in memory
///
/// Serves as provider, angle discovery and reverb library at once. Used for
/// embedding synthetic or pre-decoded sets and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    responses: HashMap<(IrContext, (i32, i32)), (Direction, Arc<ImpulseResponse>)>,
    reverbs: HashMap<(ReverbKind, SampleRate), Arc<[f32]>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the response measured at a direction
    pub fn insert(&mut self, ctx: IrContext, direction: Direction, ir: ImpulseResponse) {
        self.responses
            .insert((ctx, direction.key()), (direction, Arc::new(ir)));
    }

    /// Builder-style insert
    pub fn with_response(mut self, ctx: IrContext, direction: Direction, ir: ImpulseResponse) -> Self {
        self.insert(ctx, direction, ir);
        self
    }

    /// Add a mono room response
    pub fn insert_reverb(&mut self, kind: ReverbKind, sample_rate: SampleRate, samples: Vec<f32>) {
        self.reverbs.insert((kind, sample_rate), samples.into());
    }

    /// Number of stored directional responses
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl ImpulseResponseProvider for MemoryStore {
    fn load(&self, ctx: &IrContext, direction: Direction) -> SpatialResult<Arc<ImpulseResponse>> {
        self.responses
            .get(&(*ctx, direction.key()))
            .map(|(_, ir)| Arc::clone(ir))
            .ok_or_else(|| ctx.not_found(direction))
    }
}

impl AngleDiscovery for MemoryStore {
    fn measured_angles(&self, ctx: &IrContext) -> SpatialResult<Vec<Direction>> {
        let mut angles: Vec<Direction> = self
            .responses
            .iter()
            .filter(|((key_ctx, _), _)| key_ctx == ctx)
            .map(|(_, (direction, _))| *direction)
            .collect();
        angles.sort_by_key(|direction| direction.key());
        Ok(angles)
    }
}

impl ReverbLibrary for MemoryStore {
    fn reverb(&self, kind: ReverbKind, sample_rate: SampleRate) -> SpatialResult<Arc<[f32]>> {
        self.reverbs
            .get(&(kind, sample_rate))
            .cloned()
            .ok_or_else(|| {
                SpatialError::Store(format!(
                    "no {} reverb at {} Hz",
                    kind,
                    sample_rate.as_u32()
                ))
            })
    }
}
