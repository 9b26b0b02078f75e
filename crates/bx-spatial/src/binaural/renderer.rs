//! Single-source binaural renderer

use std::sync::Arc;

use super::{StereoBuffer, convolve_stereo};
use crate::catalog::AngleCatalog;
use crate::config::ResolverConfig;
use crate::error::SpatialResult;
use crate::ir::{AngleDiscovery, ImpulseResponse, ImpulseResponseProvider, IrContext};
use crate::layout::RenderLayout;
use crate::position::Direction;
use crate::resolve::{AngleResolver, ResolutionMode, ResolutionPlan};

/// Which IR set to render with and how to resolve directions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Listener profile, response type and sample rate
    pub ir: IrContext,
    /// Angle set restriction
    pub layout: RenderLayout,
    /// Resolution strategy
    pub mode: ResolutionMode,
}

impl RenderContext {
    /// Unrestricted layout, auto resolution
    pub fn new(ir: IrContext) -> Self {
        Self {
            ir,
            layout: RenderLayout::Unrestricted,
            mode: ResolutionMode::Auto,
        }
    }

    /// Set layout
    pub fn with_layout(mut self, layout: RenderLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set resolution mode
    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Renders mono sources through resolved (and blended) impulse responses
pub struct BinauralRenderer {
    catalog: AngleCatalog,
    provider: Arc<dyn ImpulseResponseProvider>,
    resolver: AngleResolver,
}

impl BinauralRenderer {
    /// Create new renderer
    pub fn new(
        discovery: Arc<dyn AngleDiscovery>,
        provider: Arc<dyn ImpulseResponseProvider>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            catalog: AngleCatalog::new(discovery),
            provider,
            resolver: AngleResolver::new(config),
        }
    }

    /// Create from a store that both lists and loads responses
    pub fn from_store<S>(store: Arc<S>, config: ResolverConfig) -> Self
    where
        S: AngleDiscovery + ImpulseResponseProvider + 'static,
    {
        Self::new(store.clone(), store, config)
    }

    /// Measured angle catalog
    pub fn catalog(&self) -> &AngleCatalog {
        &self.catalog
    }

    /// Resolution plan for a direction
    pub fn resolve(&self, direction: Direction, ctx: &RenderContext) -> SpatialResult<ResolutionPlan> {
        let angles = self.catalog.available_angles(&ctx.ir, &ctx.layout)?;
        self.resolver.resolve(direction, &angles, &ctx.layout, ctx.mode)
    }

    /// Load and blend the responses named by a plan
    pub fn load_plan(&self, plan: &ResolutionPlan, ir: &IrContext) -> SpatialResult<Arc<ImpulseResponse>> {
        let mut parts = Vec::with_capacity(plan.angles.len());
        for angle in &plan.angles {
            parts.push((self.provider.load(ir, angle.direction)?, angle.weight));
        }

        match parts.as_slice() {
            [(single, _)] => Ok(Arc::clone(single)),
            _ => Ok(Arc::new(ImpulseResponse::blend(&parts))),
        }
    }

    /// Resolved, blended impulse response for a direction
    pub fn impulse_response_for(
        &self,
        direction: Direction,
        ctx: &RenderContext,
    ) -> SpatialResult<Arc<ImpulseResponse>> {
        let plan = self.resolve(direction, ctx)?;
        self.load_plan(&plan, &ctx.ir)
    }

    /// Render a mono signal as if it came from `direction`
    pub fn render_source(
        &self,
        signal: &[f32],
        direction: Direction,
        ctx: &RenderContext,
    ) -> SpatialResult<StereoBuffer> {
        let ir = self.impulse_response_for(direction, ctx)?;
        Ok(convolve_stereo(signal, &ir))
    }
}
