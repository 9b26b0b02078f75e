//! Room responses for the reverb send

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bx_spatial::{ReverbKind, ReverbLibrary, SampleRate, SpatialResult};

use crate::error::StoreResult;
use crate::resample::resample_mono;
use crate::wav::read_wav;

/// `<dir>/<room>.wav` files, downmixed to mono on load
///
/// A file recorded at another rate is resampled to the mix rate.
#[derive(Debug, Clone)]
pub struct WavReverbLibrary {
    dir: PathBuf,
}

impl WavReverbLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File for a room
    pub fn path(&self, kind: ReverbKind) -> PathBuf {
        self.dir.join(format!("{}.wav", kind.name()))
    }

    fn read(&self, path: &Path, sample_rate: SampleRate) -> StoreResult<Vec<f32>> {
        let data = read_wav(path)?;
        let source_rate = data.sample_rate;
        let target_rate = sample_rate.as_u32();
        if source_rate != target_rate {
            log::info!(
                "Resampling {} from {} Hz to {} Hz",
                path.display(),
                source_rate,
                target_rate
            );
        }
        resample_mono(&data.into_mono(), source_rate, target_rate)
    }
}

impl ReverbLibrary for WavReverbLibrary {
    fn reverb(&self, kind: ReverbKind, sample_rate: SampleRate) -> SpatialResult<Arc<[f32]>> {
        let path = self.path(kind);
        log::debug!("Loading {} reverb from {}", kind, path.display());
        Ok(self.read(&path, sample_rate)?.into())
    }
}
