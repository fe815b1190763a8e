//! Integration tests for the codec pool under concurrent load.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clipdeck_codec::{decode_frame, ClipRecorder, CodecPool};
use clipdeck_core::{ClipdeckError, PixelBuffer};

#[test]
fn pool_never_exceeds_its_bound_under_contention() {
    let pool = CodecPool::new(2);
    let in_use = Arc::new(AtomicUsize::new(0));
    let high_water = Arc::new(AtomicUsize::new(0));

    let mut workers = Vec::new();
    for _ in 0..6 {
        let pool = pool.clone();
        let in_use = Arc::clone(&in_use);
        let high_water = Arc::clone(&high_water);
        workers.push(thread::spawn(move || {
            let mut handle = pool.checkout();
            let now = in_use.fetch_add(1, Ordering::SeqCst) + 1;
            high_water.fetch_max(now, Ordering::SeqCst);
            let _ = handle.encode_rgb(&PixelBuffer::solid(32, 32, [50, 100, 150, 255]));
            thread::sleep(Duration::from_millis(10));
            in_use.fetch_sub(1, Ordering::SeqCst);
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(high_water.load(Ordering::SeqCst) <= 2);
    assert_eq!(pool.idle_count(), 2);
}

#[test]
fn concurrent_frame_decodes_share_the_pool() {
    let pool = CodecPool::new(2);
    let mut recorder = ClipRecorder::new(pool.clone(), 48, 48);
    for shade in [30u8, 90, 150, 210] {
        recorder
            .append_frame(&PixelBuffer::solid(48, 48, [shade, shade, shade, 255]))
            .unwrap();
    }
    let clip = Arc::new(recorder.finish().unwrap());

    let mut workers = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        let clip = Arc::clone(&clip);
        workers.push(thread::spawn(move || {
            let frame = decode_frame(&pool, &clip, i % 4).unwrap();
            frame.row(0)[0]
        }));
    }
    let shades: Vec<u8> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    for (i, &shade) in shades.iter().enumerate() {
        let expected = [30i32, 90, 150, 210][i % 4];
        assert!(
            (shade as i32 - expected).abs() < 10,
            "worker {i} saw shade {shade}, expected about {expected}"
        );
    }
    assert_eq!(pool.idle_count(), 2);
}

#[test]
fn failures_return_handles_to_the_pool() {
    let pool = CodecPool::new(1);
    let mut recorder = ClipRecorder::new(pool.clone(), 16, 16);
    recorder
        .append_frame(&PixelBuffer::solid(16, 16, [200, 40, 40, 255]))
        .unwrap();
    let mut clip = recorder.finish().unwrap();

    // Clobber the frame payload, then hammer it; every failure must put
    // the pool's single handle back.
    for byte in &mut clip.payload {
        *byte = 0xFF;
    }
    for _ in 0..4 {
        let err = decode_frame(&pool, &clip, 0).unwrap_err();
        assert!(matches!(err, ClipdeckError::CodecFailure { frame: 0, .. }));
    }
    assert_eq!(pool.idle_count(), 1);
}

#[test]
fn quality_setting_shapes_encoded_size() {
    let frame = PixelBuffer::test_pattern(96, 64);

    let coarse = {
        let pool = CodecPool::with_quality(1, 30);
        let mut handle = pool.checkout();
        handle.encode_rgb(&frame).unwrap()
    };
    let fine = {
        let pool = CodecPool::with_quality(1, 95);
        let mut handle = pool.checkout();
        handle.encode_rgb(&frame).unwrap()
    };
    assert!(fine.len() > coarse.len());
}
