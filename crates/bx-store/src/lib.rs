//! Binamix on-disk stores
//!
//! WAV-backed implementations of the `bx-spatial` storage traits:
//! - [`SadieStore`]: one stereo WAV per measured angle, SADIE II folder layout
//! - [`WavReverbLibrary`]: mono room responses for the reverb send, resampled
//!   to the mix rate

pub mod filename;
pub mod resample;
pub mod wav;

mod error;
mod reverb;
mod sadie;

pub use error::{StoreError, StoreResult};
pub use reverb::WavReverbLibrary;
pub use sadie::{SadieStore, rate_folder};
pub use wav::{WavData, read_wav};
