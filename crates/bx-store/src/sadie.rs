//! SADIE II style directory store
//!
//! ```text
//! <root>/<profile>/<profile>_<HRIR|BRIR>_WAV/<44K_16bit|48K_24bit|96K_24bit>/azi_30,0_ele_0,0.wav
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bx_spatial::{
    AngleDiscovery, Direction, ImpulseResponse, ImpulseResponseProvider, IrContext, SampleRate,
    SpatialResult,
};

use crate::error::{StoreError, StoreResult};
use crate::filename;
use crate::wav::read_wav;

/// Folder name for a sample rate's WAV set
pub fn rate_folder(sample_rate: SampleRate) -> &'static str {
    match sample_rate {
        SampleRate::Hz44100 => "44K_16bit",
        SampleRate::Hz48000 => "48K_24bit",
        SampleRate::Hz96000 => "96K_24bit",
    }
}

/// Stereo impulse responses stored as one WAV file per measured angle
#[derive(Debug, Clone)]
pub struct SadieStore {
    root: PathBuf,
}

impl SadieStore {
    /// Open a store rooted at the dataset directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the WAV files of one IR set
    pub fn set_dir(&self, ctx: &IrContext) -> PathBuf {
        let profile = ctx.profile.to_string();
        self.root
            .join(&profile)
            .join(format!("{}_{}_WAV", profile, ctx.response))
            .join(rate_folder(ctx.sample_rate))
    }

    /// Path of the file for a direction
    pub fn file_path(&self, ctx: &IrContext, direction: Direction) -> PathBuf {
        self.set_dir(ctx).join(filename::encode(direction))
    }

    fn list(&self, ctx: &IrContext) -> StoreResult<Vec<Direction>> {
        let dir = self.set_dir(ctx);
        if !dir.is_dir() {
            return Err(StoreError::MissingDirectory(dir));
        }

        let mut angles = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.to_ascii_lowercase().ends_with(".wav") {
                continue;
            }
            match filename::decode(name) {
                Ok(direction) => angles.push(direction),
                Err(e) => log::debug!("Ignoring {}: {}", name, e),
            }
        }

        // read_dir order is platform dependent
        angles.sort_by_key(|d| d.key());
        Ok(angles)
    }

    fn read(&self, ctx: &IrContext, path: &Path) -> StoreResult<ImpulseResponse> {
        let data = read_wav(path)?;

        if data.sample_rate != ctx.sample_rate.as_u32() {
            return Err(StoreError::SampleRateMismatch {
                path: path.to_path_buf(),
                expected: ctx.sample_rate.as_u32(),
                got: data.sample_rate,
            });
        }
        if data.channel_count() != 2 {
            return Err(StoreError::ChannelCount {
                path: path.to_path_buf(),
                expected: 2,
                got: data.channel_count(),
            });
        }

        let mut channels = data.channels.into_iter();
        let left = channels.next().unwrap_or_default();
        let right = channels.next().unwrap_or_default();
        Ok(ImpulseResponse::new(left, right))
    }
}

impl ImpulseResponseProvider for SadieStore {
    fn load(&self, ctx: &IrContext, direction: Direction) -> SpatialResult<Arc<ImpulseResponse>> {
        let path = self.file_path(ctx, direction);
        if !path.is_file() {
            return Err(ctx.not_found(direction));
        }

        log::debug!("Loading {}", path.display());
        Ok(Arc::new(self.read(ctx, &path)?))
    }
}

impl AngleDiscovery for SadieStore {
    fn measured_angles(&self, ctx: &IrContext) -> SpatialResult<Vec<Direction>> {
        Ok(self.list(ctx)?)
    }
}
