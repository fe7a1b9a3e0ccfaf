//! Image codec layer.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image` crate readers, format guessed from magic bytes |
//! | **Orientation** | EXIF orientation applied via `DynamicImage::apply_orientation` |
//! | **Resize** | Lanczos3, never enlarging |
//! | **Encode** | AVIF (rav1e), WebP (libwebp), JPEG (`jpeg-encoder`) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing encodes
//! - **Backend**: [`ImageCodec`] trait + error type
//! - **Rust codec**: [`RustCodec`], the production implementation

pub mod backend;
mod calculations;
mod params;
pub mod rust_codec;

pub use backend::{CodecError, Dimensions, ImageCodec};
pub use calculations::calculate_resize_dimensions;
pub use params::{EncodeParams, Effort, OutputFormat, Quality};
pub use rust_codec::RustCodec;
