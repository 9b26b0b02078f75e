//! Memoizing impulse response provider

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{ImpulseResponse, ImpulseResponseProvider, IrContext};
use crate::error::SpatialResult;
use crate::position::Direction;

type CacheKey = (IrContext, (i32, i32));

/// Caches every loaded impulse response for the lifetime of the wrapper
///
/// Entries are written once per key and never mutated afterwards. Two
/// threads missing the same key both load it; the later insert replaces an
/// equal value.
pub struct CachedProvider<P> {
    inner: P,
    entries: RwLock<HashMap<CacheKey, Arc<ImpulseResponse>>>,
}

impl<P: ImpulseResponseProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached responses
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all cached responses
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: ImpulseResponseProvider> ImpulseResponseProvider for CachedProvider<P> {
    fn load(&self, ctx: &IrContext, direction: Direction) -> SpatialResult<Arc<ImpulseResponse>> {
        let key = (*ctx, direction.key());

        if let Some(ir) = self.entries.read().get(&key) {
            return Ok(Arc::clone(ir));
        }

        // Lock is not held while loading
        let ir = self.inner.load(ctx, direction)?;
        log::debug!("Cached impulse response {} at {}", ctx, direction);
        self.entries.write().insert(key, Arc::clone(&ir));
        Ok(ir)
    }
}
