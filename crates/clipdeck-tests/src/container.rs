//! Integration tests for clip recording, container round trips, and the
//! media library.

use clipdeck_codec::{decode_frame, ClipRecorder, CodecPool};
use clipdeck_container::{decode, encode, Clip, MediaLibrary};
use clipdeck_core::{ClipdeckError, PixelBuffer, Sound, SoundId};
use uuid::Uuid;

fn record_clip(pool: &CodecPool, frames: usize) -> Clip {
    let mut recorder = ClipRecorder::new(pool.clone(), 64, 48);
    for i in 0..frames {
        let shade = (40 * i + 40) as u8;
        recorder
            .append_frame(&PixelBuffer::solid(64, 48, [shade, shade, shade, 255]))
            .unwrap();
    }
    recorder.set_mask(&vec![0xC0; 64 * 48]).unwrap();
    recorder.finish().unwrap()
}

#[test]
fn recorded_clip_survives_container_round_trip() {
    let pool = CodecPool::new(2);
    let clip = record_clip(&pool, 4);

    let decoded = decode(&encode(&clip).unwrap()).unwrap();
    assert_eq!(decoded.frame_count(), 4);
    assert_eq!((decoded.width, decoded.height), (64, 48));
    assert_eq!(decoded.mask, clip.mask);
    for i in 0..4 {
        assert_eq!(
            decoded.frame_bytes(i).unwrap(),
            clip.frame_bytes(i).unwrap()
        );
    }
}

#[test]
fn decoded_pixels_match_recorded_frames() {
    let pool = CodecPool::new(2);
    let clip = record_clip(&pool, 2);
    let reloaded = decode(&encode(&clip).unwrap()).unwrap();

    let frame = decode_frame(&pool, &reloaded, 1).unwrap();
    assert_eq!((frame.width, frame.height), (64, 48));

    // Flat grey field: JPEG stays within a few steps of the source
    let px = &frame.row(20)[..4];
    assert!((px[0] as i32 - 80).abs() < 8, "red channel was {}", px[0]);
    assert!((px[3] as i32 - 0xC0).abs() < 8, "alpha was {}", px[3]);
}

#[test]
fn clip_file_round_trip_through_library() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let path = tmp.path().join("demo.clip");

    let pool = CodecPool::new(2);
    let mut library = MediaLibrary::new();
    let id = library.insert_clip(record_clip(&pool, 3));
    library.save_clip(id, &path).unwrap();

    let mut restored = MediaLibrary::new();
    let new_id = restored.load_clip(&path).unwrap();
    let original = library.clip(id).unwrap();
    let loaded = restored.clip(new_id).unwrap();

    assert_eq!(loaded.frame_count(), original.frame_count());
    assert_eq!(loaded.payload, original.payload);
    assert_eq!(loaded.mask, original.mask);
}

#[test]
fn corrupted_file_is_reported_not_panicked() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let path = tmp.path().join("broken.clip");

    let pool = CodecPool::new(1);
    let clip = record_clip(&pool, 2);
    let mut bytes = encode(&clip).unwrap();
    bytes.truncate(bytes.len() / 2);
    std::fs::write(&path, &bytes).unwrap();

    let mut library = MediaLibrary::new();
    assert!(matches!(
        library.load_clip(&path),
        Err(ClipdeckError::CorruptContainer(_))
    ));
}

#[test]
fn wav_import_lands_in_library() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let path = tmp.path().join("tone.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..400i16 {
        writer.write_sample(i * 50).unwrap();
    }
    writer.finalize().unwrap();

    let mut library = MediaLibrary::new();
    let id = library.import_wav(&path).unwrap();
    let sound = library.sound(id).unwrap();
    assert_eq!(sound.len(), 400);
    assert_eq!(sound.samples[1], 50);
}

#[test]
fn sound_survives_raw_file_round_trip() {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let path = tmp.path().join("clap.pcm");

    let mut library = MediaLibrary::new();
    let id = library.insert_sound(Sound::new(vec![-3, 0, 3, 9000, -9000]));
    library.save_sound(id, &path).unwrap();

    let mut restored = MediaLibrary::new();
    let new_id = restored.load_sound(&path).unwrap();
    assert_eq!(
        restored.sound(new_id).unwrap().samples,
        vec![-3, 0, 3, 9000, -9000]
    );
}

#[test]
fn unknown_ids_are_not_found() {
    let library = MediaLibrary::new();
    assert!(library.sound(SoundId(Uuid::new_v4())).is_none());
    assert!(matches!(
        library.save_sound(SoundId(Uuid::new_v4()), std::path::Path::new("never.pcm")),
        Err(ClipdeckError::NotFound(_))
    ));
}
