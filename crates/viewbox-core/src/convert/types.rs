//! Core types for the conversion pipeline.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for conversion operations.
///
/// Every failure in every path is reported through this enum as a value.
/// Nothing in the pipeline panics or unwinds; the caller decides what
/// absence looks like.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An external codec (HEIC or TIFF) rejected the input.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The TIFF container holds no image frames.
    #[error("no image frames found")]
    NoFrames,

    /// An RGBA buffer's length disagrees with its declared dimensions.
    #[error("invalid pixel buffer: expected {expected} bytes for {width}x{height} RGBA, got {actual}")]
    InvalidPixelBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The rendering surface is missing or failed to encode.
    #[error("rendering surface unavailable: {0}")]
    Surface(String),

    /// The file's bytes could not be read.
    #[error("read failed: {0}")]
    Read(String),

    /// Classification matched no conversion path.
    #[error("unsupported media type {media_type:?} for file {file_name:?}")]
    UnsupportedType {
        media_type: String,
        file_name: String,
    },
}

/// One user-supplied file, borrowed for the duration of a conversion.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// Filename, used for extension-based classification fallback.
    pub name: &'a str,
    /// Declared media type, e.g. `"image/tiff"`. May be empty.
    pub media_type: &'a str,
    /// Full file content.
    pub bytes: &'a [u8],
}

/// Output format requested from a HEIC decode capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetFormat {
    /// PNG output; what the dispatcher always asks for.
    #[default]
    Png,
    /// JPEG output.
    Jpeg,
}

impl TargetFormat {
    /// The media type string handed to the decode capability.
    pub fn media_type(self) -> &'static str {
        match self {
            TargetFormat::Png => "image/png",
            TargetFormat::Jpeg => "image/jpeg",
        }
    }
}

/// A decoded frame as flat 8-bit RGBA samples.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Build a buffer, validating that `samples` is exactly
    /// `width * height * 4` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidPixelBuffer`] on any length mismatch.
    /// A decoder handing back a short or oversized buffer is a broken
    /// decoder, and the conversion fails rather than rendering garbage.
    pub fn from_rgba(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, ConvertError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(ConvertError::InvalidPixelBuffer {
                width,
                height,
                expected: usize::MAX,
                actual: samples.len(),
            })?;
        if samples.len() != expected {
            return Err(ConvertError::InvalidPixelBuffer {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat RGBA samples, row-major, 4 bytes per pixel.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Renderable image content produced by a conversion.
///
/// Encoded paths own freshly produced PNG bytes; the passthrough path
/// borrows the caller's bytes untouched. Either way the payload carries the
/// media type a browser should attach to the resource it builds from it.
#[derive(Debug, Clone)]
pub struct Renderable<'a> {
    bytes: Cow<'a, [u8]>,
    media_type: Cow<'a, str>,
}

impl<'a> Renderable<'a> {
    /// Wrap freshly encoded PNG bytes.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Cow::Owned(bytes),
            media_type: Cow::Borrowed("image/png"),
        }
    }

    /// Wrap the original bytes unchanged.
    ///
    /// No conversion happens on this path. Browser-native formats are
    /// assumed renderable as-is, and the bytes stay byte-identical to the
    /// input.
    pub fn passthrough(bytes: &'a [u8], media_type: &'a str) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
            media_type: Cow::Borrowed(media_type),
        }
    }

    /// The renderable content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Media type of the content, e.g. `"image/png"`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// True if this payload is the caller's bytes, unconverted.
    pub fn is_passthrough(&self) -> bool {
        matches!(self.bytes, Cow::Borrowed(_))
    }
}
