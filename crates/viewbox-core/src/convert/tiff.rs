//! TIFF rasterization path.
//!
//! TIFF files are containers: a header in either byte order, then a chain of
//! image file directories (IFDs), one per frame. The conversion contract is
//! first-frame-only: check the container, decode frame one, expand its
//! samples to flat RGBA.
//!
//! The bitstream itself (strips, tiles, compression schemes) is the `tiff`
//! crate's problem; this module owns the container pre-check and the RGBA
//! expansion around it.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

use super::{ConvertError, PixelBuffer};

// TIFF container magic
const TIFF_MAGIC_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00]; // II + 42
const TIFF_MAGIC_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A]; // MM + 42

/// Capability that turns TIFF bytes into the first frame's pixels.
///
/// Injected into the dispatcher so tests can substitute fakes.
pub trait TiffDecoder {
    /// Decode the first frame to an RGBA pixel buffer.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::NoFrames`] - valid container, zero frames
    /// - [`ConvertError::Decode`] - not a TIFF, or the codec rejected it
    /// - [`ConvertError::InvalidPixelBuffer`] - the expanded samples do not
    ///   match the frame's dimensions
    fn decode_first_frame(&self, bytes: &[u8]) -> Result<PixelBuffer, ConvertError>;
}

/// Production decoder backed by the `tiff` (image-tiff) crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTiffDecoder;

impl TiffDecoder for ImageTiffDecoder {
    fn decode_first_frame(&self, bytes: &[u8]) -> Result<PixelBuffer, ConvertError> {
        check_container(bytes)?;

        let mut decoder = Decoder::new(Cursor::new(bytes))
            .map_err(|e| ConvertError::Decode(format!("TIFF: {e}")))?;
        let (width, height) = decoder
            .dimensions()
            .map_err(|e| ConvertError::Decode(format!("TIFF: {e}")))?;
        let color = decoder
            .colortype()
            .map_err(|e| ConvertError::Decode(format!("TIFF: {e}")))?;
        let result = decoder
            .read_image()
            .map_err(|e| ConvertError::Decode(format!("TIFF: {e}")))?;

        let samples = expand_to_rgba(result, color)?;
        PixelBuffer::from_rgba(width, height, samples)
    }
}

/// Validate the container header: magic bytes plus a non-zero IFD0 offset.
///
/// A well-formed header whose first-IFD offset is zero is a container with
/// no frames at all, which is distinct from a corrupt file.
fn check_container(bytes: &[u8]) -> Result<(), ConvertError> {
    if bytes.len() < 8 {
        return Err(ConvertError::Decode("TIFF: truncated header".to_string()));
    }

    let little_endian = if bytes[..4] == TIFF_MAGIC_LE {
        true
    } else if bytes[..4] == TIFF_MAGIC_BE {
        false
    } else {
        return Err(ConvertError::Decode("TIFF: not a TIFF container".to_string()));
    };

    let offset_bytes = [bytes[4], bytes[5], bytes[6], bytes[7]];
    let ifd0_offset = if little_endian {
        u32::from_le_bytes(offset_bytes)
    } else {
        u32::from_be_bytes(offset_bytes)
    };

    if ifd0_offset == 0 {
        return Err(ConvertError::NoFrames);
    }
    Ok(())
}

/// Expand decoded samples to flat 8-bit RGBA, verbatim.
///
/// Gray and RGB gain opaque alpha; 16-bit samples narrow to their high
/// byte. Palette, CMYK and float samples are out of contract.
fn expand_to_rgba(result: DecodingResult, color: ColorType) -> Result<Vec<u8>, ConvertError> {
    match (result, color) {
        (DecodingResult::U8(buf), ColorType::RGBA(8)) => Ok(buf),
        (DecodingResult::U8(buf), ColorType::RGB(8)) => {
            Ok(buf.chunks_exact(3).flat_map(|px| [px[0], px[1], px[2], 255]).collect())
        }
        (DecodingResult::U8(buf), ColorType::GrayA(8)) => {
            Ok(buf.chunks_exact(2).flat_map(|px| [px[0], px[0], px[0], px[1]]).collect())
        }
        (DecodingResult::U8(buf), ColorType::Gray(8)) => {
            Ok(buf.iter().flat_map(|&g| [g, g, g, 255]).collect())
        }
        (DecodingResult::U16(buf), ColorType::RGBA(16)) => {
            Ok(buf.iter().map(|&s| (s >> 8) as u8).collect())
        }
        (DecodingResult::U16(buf), ColorType::RGB(16)) => Ok(buf
            .chunks_exact(3)
            .flat_map(|px| {
                [
                    (px[0] >> 8) as u8,
                    (px[1] >> 8) as u8,
                    (px[2] >> 8) as u8,
                    255,
                ]
            })
            .collect()),
        (DecodingResult::U16(buf), ColorType::GrayA(16)) => Ok(buf
            .chunks_exact(2)
            .flat_map(|px| {
                let g = (px[0] >> 8) as u8;
                [g, g, g, (px[1] >> 8) as u8]
            })
            .collect()),
        (DecodingResult::U16(buf), ColorType::Gray(16)) => Ok(buf
            .iter()
            .flat_map(|&s| {
                let g = (s >> 8) as u8;
                [g, g, g, 255]
            })
            .collect()),
        (_, color) => Err(ConvertError::Decode(format!(
            "TIFF: unsupported color type {color:?}"
        ))),
    }
}
