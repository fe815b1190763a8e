//! Integration tests for the audio engine driven offline.

use std::sync::Arc;

use clipdeck_audio::{AudioConfig, AudioEngine, Waveform};
use clipdeck_container::MediaLibrary;
use clipdeck_core::Sound;

fn mono_engine() -> AudioEngine {
    AudioEngine::new(AudioConfig {
        sample_rate: 44_100,
        output_channels: 1,
        ring_capacity: 4096,
    })
}

fn ramp(len: usize) -> Arc<Sound> {
    Arc::new(Sound::new((0..len as i16).collect()))
}

fn level(sample: i16) -> f32 {
    sample as f32 / i16::MAX as f32
}

#[test]
fn overlapping_sounds_mix_on_a_shared_timeline() {
    let mut engine = mono_engine();
    let source = ramp(200);
    engine.play_sound(&source, 0..100, true, 1.0).unwrap();
    engine.play_sound(&source, 50..150, false, 1.0).unwrap();

    let mut render = |engine: &mut AudioEngine| {
        let mut out = vec![0.0f32; 50];
        engine.render_offline(&mut out).unwrap();
        out
    };

    let out1 = render(&mut engine);
    let out2 = render(&mut engine);
    let out3 = render(&mut engine);
    let out4 = render(&mut engine);

    for i in 0..50 {
        let e1 = level(i as i16) + level(50 + i as i16);
        let e2 = level(50 + i as i16) + level(100 + i as i16);
        assert!((out1[i] - e1).abs() < 1e-6, "callback 1 sample {i}");
        assert!((out2[i] - e2).abs() < 1e-6, "callback 2 sample {i}");
    }
    // Loop reset callback mixes nothing and the one-shot has ended
    assert!(out3.iter().all(|&s| s == 0.0));
    // The looped sound resumes from the top of its range
    for i in 0..50 {
        assert!((out4[i] - level(i as i16)).abs() < 1e-6, "callback 4 sample {i}");
    }
}

#[test]
fn stops_take_effect_at_the_next_callback() {
    let mut engine = mono_engine();
    let source = Arc::new(Sound::new(vec![4_000i16; 1000]));
    let id = engine.play_sound(&source, 0..1000, true, 1.0).unwrap();

    let mut out = vec![0.0f32; 64];
    engine.render_offline(&mut out).unwrap();
    assert!(out.iter().all(|&s| s > 0.0));

    engine.stop_sound(id).unwrap();
    // One callback of already-mixed audio drains first
    engine.render_offline(&mut out).unwrap();
    assert!(out.iter().all(|&s| s > 0.0));

    engine.render_offline(&mut out).unwrap();
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn playheads_stream_back_to_the_listener() {
    let mut engine = mono_engine();
    let source = ramp(2000);
    let id = engine.play_sound(&source, 0..2000, false, 1.0).unwrap();
    let updates = engine.playhead_updates();

    let mut out = vec![0.0f32; 100];
    let mut seen = Vec::new();
    for _ in 0..3 {
        engine.render_offline(&mut out).unwrap();
        seen.extend(updates.try_iter());
    }

    // Warm-up mixes two quanta up front, then one per callback
    let positions: Vec<usize> = seen.iter().map(|&(_, p)| p).collect();
    assert_eq!(positions, vec![200, 300, 400]);
    assert!(seen.iter().all(|&(i, _)| i == id));
}

#[test]
fn master_gain_and_clamp_hold_at_the_mix() {
    let mut engine = mono_engine();
    let loud = Arc::new(Sound::new(vec![i16::MAX; 2000]));
    engine.play_sound(&loud, 0..2000, false, 1.0).unwrap();
    engine.play_sound(&loud, 0..2000, false, 1.0).unwrap();

    let mut out = vec![0.0f32; 64];
    engine.render_offline(&mut out).unwrap();
    assert!(out.iter().all(|&s| s <= 1.0));
    assert!(out.iter().all(|&s| s > 0.99));

    engine.set_master_gain(0.25).unwrap();
    // Gain applies at the mix stage, one ring lead behind the output
    engine.render_offline(&mut out).unwrap();
    engine.render_offline(&mut out).unwrap();
    assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-3));
}

#[test]
fn imported_wav_plays_through_the_engine() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let path = tmp.path().join("hit.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..500 {
        writer.write_sample(10_000i16).unwrap();
    }
    writer.finalize().unwrap();

    let mut library = MediaLibrary::new();
    let sound_id = library.import_wav(&path).unwrap();
    let sound = library.sound(sound_id).unwrap();

    let mut engine = mono_engine();
    engine
        .play_sound(&sound, 0..sound.len(), false, 1.0)
        .unwrap();
    let mut out = vec![0.0f32; 64];
    engine.render_offline(&mut out).unwrap();

    let expected = 10_000.0 / i16::MAX as f32;
    assert!(out.iter().all(|&s| (s - expected).abs() < 1e-6));
}

#[test]
fn waveform_reduction_matches_duration() {
    let samples: Vec<i16> = (0..44_100)
        .map(|i| ((i % 100) * 600 - 30_000) as i16)
        .collect();
    let waveform = Waveform::compute(&samples, 441, 44_100);
    assert_eq!(waveform.data.len(), 100);
    assert!((waveform.duration_seconds() - 1.0).abs() < 1e-9);
}
