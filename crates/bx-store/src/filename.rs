//! Direction <-> filename encoding
//!
//! Files are named `azi_<azimuth>_ele_<elevation>.wav` with one decimal and a
//! comma as decimal separator, e.g. `azi_30,0_ele_-15,0.wav`.

use bx_spatial::Direction;

use crate::error::{StoreError, StoreResult};

/// Extension of stored impulse responses
pub const WAV_EXTENSION: &str = "wav";

fn encode_angle(angle: f64) -> String {
    let text = format!("{:.1}", angle).replace('.', ",");
    // "-0,0" names the same file as "0,0"
    if text == "-0,0" { "0,0".to_string() } else { text }
}

fn decode_angle(text: &str, filename: &str) -> StoreResult<f64> {
    text.replace(',', ".")
        .parse()
        .map_err(|_| StoreError::MalformedFilename(filename.to_string()))
}

/// Filename for a measured direction
pub fn encode(direction: Direction) -> String {
    format!(
        "azi_{}_ele_{}.{}",
        encode_angle(direction.azimuth),
        encode_angle(direction.elevation),
        WAV_EXTENSION
    )
}

/// Direction encoded in a filename
pub fn decode(filename: &str) -> StoreResult<Direction> {
    let malformed = || StoreError::MalformedFilename(filename.to_string());

    let stem = filename
        .strip_suffix(".wav")
        .or_else(|| filename.strip_suffix(".WAV"))
        .ok_or_else(malformed)?;
    let rest = stem.strip_prefix("azi_").ok_or_else(malformed)?;
    let (azimuth, elevation) = rest.split_once("_ele_").ok_or_else(malformed)?;

    Ok(Direction::new(
        decode_angle(azimuth, filename)?,
        decode_angle(elevation, filename)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(Direction::new(30.0, 0.0)), "azi_30,0_ele_0,0.wav");
        assert_eq!(encode(Direction::new(45.0, 35.3)), "azi_45,0_ele_35,3.wav");
        assert_eq!(encode(Direction::new(-90.0, -15.0)), "azi_270,0_ele_-15,0.wav");
        assert_eq!(encode(Direction::new(0.0, -0.0)), "azi_0,0_ele_0,0.wav");
    }

    #[test]
    fn test_decode() {
        let direction = decode("azi_337,5_ele_-30,0.wav").unwrap();
        assert_eq!(direction.azimuth, 337.5);
        assert_eq!(direction.elevation, -30.0);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for name in ["readme.txt", "azi_30,0.wav", "azi_x_ele_0,0.wav", "ele_0,0_azi_1,0.wav"] {
            assert!(
                matches!(decode(name), Err(StoreError::MalformedFilename(_))),
                "{} should be rejected",
                name
            );
        }
    }
}
