use std::time::{Duration, Instant};

use crate::frame_pipeline::common::error::FrameError;
use crate::frame_pipeline::frame::{Frame, FrameTimestamp, PixelFormat};

#[test]
fn test_new_accepts_consistent_buffer() {
    let frame = Frame::new(vec![0u8; 4 * 3 * 3], 4, 3, PixelFormat::Rgb, FrameTimestamp(7)).unwrap();

    assert_eq!(frame.width(), 4);
    assert_eq!(frame.height(), 3);
    assert_eq!(frame.pixel_count(), 12);
    assert_eq!(frame.format(), PixelFormat::Rgb);
    assert_eq!(frame.timestamp(), FrameTimestamp(7));
}

#[test]
fn test_new_rejects_short_buffer() {
    let result = Frame::new(vec![0u8; 10], 4, 3, PixelFormat::Grayscale, FrameTimestamp(0));

    assert_eq!(
        result.unwrap_err(),
        FrameError::BufferSizeMismatch {
            format: PixelFormat::Grayscale,
            expected: 12,
            actual: 10,
        }
    );
}

#[test]
fn test_new_rejects_zero_dimensions() {
    let result = Frame::new(Vec::new(), 0, 5, PixelFormat::Yuv, FrameTimestamp(0));

    assert!(matches!(result, Err(FrameError::InvalidDimensions(0, 5))));
}

#[test]
fn test_new_rejects_overflowing_dimensions() {
    let result = Frame::new(Vec::new(), usize::MAX, 2, PixelFormat::Rgb, FrameTimestamp(0));

    assert!(matches!(result, Err(FrameError::InvalidDimensions(_, _))));
}

#[test]
fn test_with_data_keeps_geometry_and_timestamp() {
    let rgb = Frame::filled(2, 2, PixelFormat::Rgb, 9, FrameTimestamp(42)).unwrap();
    let gray = rgb.with_data(PixelFormat::Grayscale, vec![1, 2, 3, 4]).unwrap();

    assert_eq!(gray.width(), 2);
    assert_eq!(gray.height(), 2);
    assert_eq!(gray.timestamp(), FrameTimestamp(42));
    assert_eq!(gray.data(), &[1, 2, 3, 4]);
    assert_eq!(rgb.data(), &[9u8; 12][..]);
}

#[test]
fn test_with_data_validates_length() {
    let rgb = Frame::filled(2, 2, PixelFormat::Rgb, 0, FrameTimestamp(0)).unwrap();

    assert!(rgb.with_data(PixelFormat::Grayscale, vec![0; 12]).is_err());
}

#[test]
fn test_timestamp_since_origin() {
    let origin = Instant::now();
    let later = origin + Duration::from_millis(5);

    assert_eq!(FrameTimestamp::since(origin, later).as_nanos(), 5_000_000);
    assert_eq!(FrameTimestamp::since(later, origin), FrameTimestamp(0));
}

#[test]
fn test_format_display_names() {
    assert_eq!(PixelFormat::Rgb.to_string(), "RGB");
    assert_eq!(PixelFormat::Grayscale.to_string(), "GRAYSCALE");
    assert_eq!(PixelFormat::Yuv.to_string(), "YUV");
}

#[test]
fn test_into_data_returns_original_buffer() {
    let data: Vec<u8> = (0..6).collect();
    let frame = Frame::new(data.clone(), 3, 2, PixelFormat::Grayscale, FrameTimestamp(1)).unwrap();

    assert_eq!(frame.into_data(), data);
}

#[test]
fn test_timestamp_duration_and_display() {
    let ts = FrameTimestamp::from_nanos(1_500_000);

    assert_eq!(ts.as_duration(), Duration::from_micros(1500));
    assert_eq!(ts.to_string(), "1.500ms");
}
