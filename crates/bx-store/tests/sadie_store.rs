//! On-disk store tests against a small synthetic dataset

use std::path::Path;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use bx_spatial::{
    AngleDiscovery, BinauralRenderer, Direction, ImpulseResponseProvider, IrContext, MixConfig,
    Mixer, RenderContext, ResolverConfig, ReverbKind, ReverbLibrary, SampleRate, SpatialError,
    Track,
};
use bx_store::{SadieStore, WavReverbLibrary, filename};
use tempfile::TempDir;

fn write_wav(path: &Path, sample_rate: u32, channels: &[&[f32]]) {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..channels[0].len() {
        for channel in channels {
            writer.write_sample(channel[i]).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// D1 HRIR set at 48 kHz: four horizontal angles, left ear = 1, right ear = az / 360
fn dataset() -> (TempDir, SadieStore, IrContext) {
    let dir = TempDir::new().unwrap();
    let store = SadieStore::new(dir.path());
    let ctx = IrContext::parse("D1", "HRIR", 48000).unwrap();

    let set_dir = store.set_dir(&ctx);
    std::fs::create_dir_all(&set_dir).unwrap();
    for az in [0.0f32, 90.0, 180.0, 270.0] {
        let path = set_dir.join(filename::encode(Direction::new(az as f64, 0.0)));
        write_wav(&path, 48000, &[&[1.0, 0.0], &[az / 360.0, 0.0]]);
    }
    std::fs::write(set_dir.join("notes.txt"), "not audio").unwrap();
    std::fs::write(set_dir.join("broken_name.wav"), "").unwrap();

    (dir, store, ctx)
}

#[test]
fn test_layout_on_disk() {
    let (dir, store, ctx) = dataset();
    let expected = dir.path().join("D1").join("D1_HRIR_WAV").join("48K_24bit");
    assert_eq!(store.set_dir(&ctx), expected);
    assert!(store.file_path(&ctx, Direction::new(90.0, 0.0)).ends_with("azi_90,0_ele_0,0.wav"));
}

#[test]
fn test_discovery_skips_foreign_files() {
    let (_dir, store, ctx) = dataset();
    let angles = store.measured_angles(&ctx).unwrap();
    assert_eq!(angles.len(), 4);
    assert_eq!(angles[0], Direction::new(0.0, 0.0));
}

#[test]
fn test_missing_set_directory() {
    let (_dir, store, _) = dataset();
    let brir = IrContext::parse("D1", "BRIR", 48000).unwrap();
    assert!(matches!(store.measured_angles(&brir), Err(SpatialError::Store(_))));
}

#[test]
fn test_load_and_not_found() {
    let (_dir, store, ctx) = dataset();

    let ir = store.load(&ctx, Direction::new(90.0, 0.0)).unwrap();
    assert_eq!(ir.len(), 2);
    assert_abs_diff_eq!(ir.right[0], 0.25);

    let err = store.load(&ctx, Direction::new(45.0, 35.3)).unwrap_err();
    assert!(matches!(err, SpatialError::ImpulseResponseNotFound { .. }));
    assert!(err.to_string().contains("BRIR"));
}

#[test]
fn test_rate_mismatch() {
    let (_dir, store, ctx) = dataset();
    let path = store.file_path(&ctx, Direction::new(45.0, 0.0));
    write_wav(&path, 44100, &[&[1.0], &[1.0]]);

    let err = store.load(&ctx, Direction::new(45.0, 0.0)).unwrap_err();
    assert!(err.to_string().contains("44100"));
}

#[test]
fn test_reverb_library() {
    let dir = TempDir::new().unwrap();
    let library = WavReverbLibrary::new(dir.path());
    write_wav(&library.path(ReverbKind::Office), 48000, &[&[1.0, 0.5], &[0.0, 0.5]]);

    let ir = library.reverb(ReverbKind::Office, SampleRate::Hz48000).unwrap();
    assert_eq!(ir.len(), 2);
    assert_abs_diff_eq!(ir[0], 0.5);
    assert_abs_diff_eq!(ir[1], 0.5);

    assert!(library.reverb(ReverbKind::SmallRoom, SampleRate::Hz48000).is_err());
}

#[test]
fn test_reverb_resampled_to_mix_rate() {
    let dir = TempDir::new().unwrap();
    let library = WavReverbLibrary::new(dir.path());
    let tail: Vec<f32> = (0..4800).map(|i| (-(i as f32) / 800.0).exp()).collect();
    write_wav(&library.path(ReverbKind::MeetingRoom), 48000, &[&tail[..]]);

    let at_44k = library.reverb(ReverbKind::MeetingRoom, SampleRate::Hz44100).unwrap();
    assert_eq!(at_44k.len(), 4410);
    let at_96k = library.reverb(ReverbKind::MeetingRoom, SampleRate::Hz96000).unwrap();
    assert_eq!(at_96k.len(), 9600);
}

#[test]
fn test_mix_with_reverb_at_other_rate() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SadieStore::new(dir.path()));
    let ctx = IrContext::parse("D2", "BRIR", 44100).unwrap();
    let set_dir = store.set_dir(&ctx);
    std::fs::create_dir_all(&set_dir).unwrap();
    for az in [0.0, 90.0, 180.0, 270.0] {
        let path = set_dir.join(filename::encode(Direction::new(az, 0.0)));
        write_wav(&path, 44100, &[&[1.0], &[1.0]]);
    }

    let reverbs = Arc::new(WavReverbLibrary::new(dir.path()));
    let room: Vec<f32> = (0..480).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
    write_wav(&reverbs.path(ReverbKind::LectureTheatre), 48000, &[&room[..]]);

    let renderer = BinauralRenderer::new(store.clone(), store, ResolverConfig::default());
    let mixer = Mixer::new(renderer, reverbs, MixConfig::default());

    let audio = vec![0.0f32; 100];
    let tracks = [Track::new("voice", &audio).with_direction(0.0, 0.0).with_reverb(0.3)];
    let out = mixer.mix_binaural(&tracks, &RenderContext::new(ctx)).unwrap();

    // 480 taps at 48 kHz become 441 at 44.1 kHz
    assert_eq!(out.len(), 100 + 441 - 1);
}

#[test]
fn test_mix_from_disk() {
    let (dir, store, ctx) = dataset();
    let store = Arc::new(store);
    let reverbs = Arc::new(WavReverbLibrary::new(dir.path()));
    write_wav(&reverbs.path(ReverbKind::LectureTheatre), 48000, &[&[1.0]]);

    let renderer = BinauralRenderer::new(store.clone(), store, ResolverConfig::default());
    let mixer = Mixer::new(renderer, reverbs, MixConfig::default());

    let audio = [1.0f32, 0.0, 0.0];
    let tracks = [
        Track::new("front", &audio).with_direction(0.0, 0.0).with_reverb(0.5),
        Track::new("side", &audio).with_direction(90.0, 0.0),
    ];
    let out = mixer.mix_binaural(&tracks, &RenderContext::new(ctx)).unwrap();

    // 3 samples + 1-tap reverb - 1, + 2-tap IR - 1
    assert_eq!(out.len(), 4);
    assert_abs_diff_eq!(out.left[0], 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(out.right[0], 0.25, epsilon = 1e-6);
}
