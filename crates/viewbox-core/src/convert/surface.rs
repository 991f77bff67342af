//! In-memory pixel surface encoding.
//!
//! The TIFF path materializes a [`PixelBuffer`] and needs it turned into
//! PNG bytes a browser can display. The surface writes the RGBA samples
//! verbatim - no color conversion, no resampling - and hands back the
//! encoded result.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{ConvertError, PixelBuffer};

/// Capability that turns an RGBA pixel buffer into encoded image bytes.
///
/// Injected into the dispatcher so tests can substitute a failing or
/// recording surface.
pub trait SurfaceRenderer {
    /// Encode the buffer to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Surface`] if the surface cannot be created
    /// or the encoder fails.
    fn encode_png(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, ConvertError>;
}

/// Production surface backed by the `image` crate's encoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngSurface;

impl PngSurface {
    /// JPEG twin of [`SurfaceRenderer::encode_png`], used when a caller
    /// requests JPEG output from the native HEIC decoder.
    ///
    /// JPEG carries no alpha channel, so the alpha samples are dropped.
    pub fn encode_jpeg(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, ConvertError> {
        check_dimensions(buffer)?;
        let rgb: Vec<u8> = buffer
            .samples()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut out = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut out, 90);
        encoder
            .write_image(&rgb, buffer.width(), buffer.height(), ExtendedColorType::Rgb8)
            .map_err(|e| ConvertError::Surface(e.to_string()))?;
        Ok(out.into_inner())
    }
}

impl SurfaceRenderer for PngSurface {
    fn encode_png(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, ConvertError> {
        check_dimensions(buffer)?;
        let mut out = Cursor::new(Vec::new());
        let encoder = PngEncoder::new(&mut out);
        encoder
            .write_image(
                buffer.samples(),
                buffer.width(),
                buffer.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| ConvertError::Surface(e.to_string()))?;
        Ok(out.into_inner())
    }
}

/// A surface cannot be allocated for a zero-sized frame.
fn check_dimensions(buffer: &PixelBuffer) -> Result<(), ConvertError> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(ConvertError::Surface(format!(
            "cannot allocate a {}x{} surface",
            buffer.width(),
            buffer.height()
        )));
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: PNG encoding is lossless - decode returns exactly the
        /// samples that went in.
        #[test]
        fn prop_png_roundtrip_verbatim((width, height) in (1u32..=16, 1u32..=16), seed in any::<u8>()) {
            let len = (width * height * 4) as usize;
            let samples: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect();
            let buf = PixelBuffer::from_rgba(width, height, samples.clone()).unwrap();

            let png = PngSurface.encode_png(&buf).unwrap();
            let decoded = image::load_from_memory(&png).unwrap().into_rgba8();

            prop_assert_eq!(decoded.dimensions(), (width, height));
            prop_assert_eq!(decoded.into_raw(), samples);
        }
    }
}
