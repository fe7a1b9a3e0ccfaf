//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the operations the transcoder needs:
//! decode, normalize orientation, measure, resize, and encode. The pipeline
//! depends only on this contract, so tests drive it with a mock and never
//! touch real pixels.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec).

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Resize failed: {0}")]
    Resize(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Capability to turn source bytes into encoded variant bytes.
///
/// `Image` is the codec's in-memory representation. It must be `Sync`
/// because one resized image is shared read-only by concurrent encodes.
pub trait ImageCodec: Sync {
    type Image: Send + Sync;

    /// Decode source bytes, keeping any stored orientation metadata.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, CodecError>;

    /// Apply stored rotation/mirroring so pixels match display orientation.
    fn normalize_orientation(&self, image: Self::Image) -> Self::Image;

    /// Current pixel dimensions.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Resize to the given width without enlarging.
    fn resize(&self, image: &Self::Image, width: u32) -> Result<Self::Image, CodecError>;

    /// Encode to the format described by `params`.
    fn encode(&self, image: &Self::Image, params: &EncodeParams) -> Result<Vec<u8>, CodecError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::calculations::calculate_resize_dimensions;
    use crate::imaging::params::OutputFormat;
    use std::sync::Mutex;

    /// Mock codec that records operations without touching pixels.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// Source "bytes" are ASCII of the form `WxH` or `WxH;rot90`, so test
    /// fixtures are plain text files. Anything else fails to decode.
    #[derive(Default)]
    pub struct MockCodec {
        pub failing_encodes: Vec<(u32, OutputFormat)>,
        pub failing_resizes: Vec<u32>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode,
        Normalize { rotated: bool },
        Resize { from_width: u32, width: u32 },
        Encode { width: u32, format: OutputFormat, quality: u32 },
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MockImage {
        pub width: u32,
        pub height: u32,
        pub pending_rotation: bool,
    }

    impl MockCodec {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail every encode of `format` at the given output width.
        pub fn failing_encode(mut self, width: u32, format: OutputFormat) -> Self {
            self.failing_encodes.push((width, format));
            self
        }

        /// Fail the resize that targets `width`.
        pub fn failing_resize(mut self, width: u32) -> Self {
            self.failing_resizes.push(width);
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    fn parse_mock_source(bytes: &[u8]) -> Option<MockImage> {
        let text = std::str::from_utf8(bytes).ok()?.trim();
        let (dims, rotated) = match text.strip_suffix(";rot90") {
            Some(dims) => (dims, true),
            None => (text, false),
        };
        let (w, h) = dims.split_once('x')?;
        Some(MockImage {
            width: w.parse().ok()?,
            height: h.parse().ok()?,
            pending_rotation: rotated,
        })
    }

    impl ImageCodec for MockCodec {
        type Image = MockImage;

        fn decode(&self, bytes: &[u8]) -> Result<MockImage, CodecError> {
            self.record(RecordedOp::Decode);
            parse_mock_source(bytes)
                .ok_or_else(|| CodecError::Decode("not a mock image".to_string()))
        }

        fn normalize_orientation(&self, image: MockImage) -> MockImage {
            self.record(RecordedOp::Normalize {
                rotated: image.pending_rotation,
            });
            if image.pending_rotation {
                MockImage {
                    width: image.height,
                    height: image.width,
                    pending_rotation: false,
                }
            } else {
                image
            }
        }

        fn dimensions(&self, image: &MockImage) -> Dimensions {
            Dimensions {
                width: image.width,
                height: image.height,
            }
        }

        fn resize(&self, image: &MockImage, width: u32) -> Result<MockImage, CodecError> {
            self.record(RecordedOp::Resize {
                from_width: image.width,
                width,
            });
            if self.failing_resizes.contains(&width) {
                return Err(CodecError::Resize(format!("mock resize to {width} failed")));
            }
            let (w, h) = calculate_resize_dimensions((image.width, image.height), width);
            Ok(MockImage {
                width: w,
                height: h,
                pending_rotation: false,
            })
        }

        fn encode(&self, image: &MockImage, params: &EncodeParams) -> Result<Vec<u8>, CodecError> {
            let format = params.format();
            self.record(RecordedOp::Encode {
                width: image.width,
                format,
                quality: params.quality().value(),
            });
            if self.failing_encodes.contains(&(image.width, format)) {
                return Err(CodecError::Encode(format!(
                    "mock {format} encode at {}px failed",
                    image.width
                )));
            }
            Ok(format!("{}x{}.{}", image.width, image.height, format.extension()).into_bytes())
        }
    }

    #[test]
    fn mock_decodes_dimension_text() {
        let codec = MockCodec::new();
        let image = codec.decode(b"2000x1500").unwrap();
        assert_eq!(codec.dimensions(&image), Dimensions { width: 2000, height: 1500 });
        assert_eq!(codec.get_operations(), vec![RecordedOp::Decode]);
    }

    #[test]
    fn mock_rejects_garbage() {
        let codec = MockCodec::new();
        assert!(matches!(codec.decode(b"\xff\xd8garbage"), Err(CodecError::Decode(_))));
    }

    #[test]
    fn mock_normalize_swaps_rotated_dimensions() {
        let codec = MockCodec::new();
        let image = codec.decode(b"1500x2000;rot90").unwrap();
        let upright = codec.normalize_orientation(image);
        assert_eq!(codec.dimensions(&upright), Dimensions { width: 2000, height: 1500 });
    }

    #[test]
    fn mock_resize_never_enlarges() {
        let codec = MockCodec::new();
        let image = codec.decode(b"2000x1500").unwrap();
        let resized = codec.resize(&image, 3000).unwrap();
        assert_eq!(resized.width, 2000);
    }

    #[test]
    fn mock_encode_failure_is_targeted() {
        let codec = MockCodec::new().failing_encode(800, OutputFormat::Webp);
        let image = MockImage {
            width: 800,
            height: 600,
            pending_rotation: false,
        };
        let webp = EncodeParams::Webp {
            quality: crate::imaging::Quality::new(70),
        };
        let avif = EncodeParams::Avif {
            quality: crate::imaging::Quality::new(45),
            effort: crate::imaging::Effort::new(4),
        };
        assert!(codec.encode(&image, &webp).is_err());
        assert!(codec.encode(&image, &avif).is_ok());
    }
}
