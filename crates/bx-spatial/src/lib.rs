//! Binamix spatial core
//!
//! Binaural rendering from measured HRIR/BRIR sets:
//!
//! ## Angle Resolution
//! - Exact and nearest-angle lookup at 0.1 degree precision
//! - 2-point planar interpolation on an elevation ring
//! - 3-point interpolation over a Delaunay triangulation of the grid
//! - Seam and pole retries for the triangulation
//!
//! ## Rendering
//! - Weighted IR blending before a single convolution pass
//! - Direct or FFT convolution depending on kernel length
//!
//! ## Mixing
//! - Multi-track binaural and constant-power stereo mixes
//! - Reverb send with wet/dry cross-fade
//! - Surround (5.1 to 9.1.4) to binaural re-rendering
//!
//! Storage stays behind the [`ImpulseResponseProvider`], [`AngleDiscovery`]
//! and [`ReverbLibrary`] traits; `bx-store` implements them over WAV files.

pub mod binaural;
pub mod catalog;
pub mod config;
pub mod ir;
pub mod layout;
pub mod mixer;
pub mod resolve;

mod error;
mod position;

pub use binaural::{BinauralRenderer, RenderContext, StereoBuffer};
pub use catalog::AngleCatalog;
pub use config::{MixConfig, ResolverConfig, TrackFailurePolicy, TriangulationFailurePolicy};
pub use error::{SpatialError, SpatialResult};
pub use ir::{
    AngleDiscovery, CachedProvider, ImpulseResponse, ImpulseResponseProvider, IrContext,
    ListenerProfile, MemoryStore, ResponseType, ReverbKind, ReverbLibrary, SampleRate,
};
pub use layout::{RenderLayout, SpeakerLayout, SurroundChannel};
pub use mixer::{Mixer, Track};
pub use position::{
    CartesianPoint, Direction, angular_distance, cartesian_to_spherical, normalize_azimuth,
    pan_gains, pan_source, spherical_to_cartesian,
};
pub use resolve::{
    AngleResolver, PlanKind, ResolutionMode, ResolutionNote, ResolutionPlan, WeightedAngle,
};
