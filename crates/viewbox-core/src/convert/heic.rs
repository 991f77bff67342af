//! HEIC decode capability.
//!
//! HEIC decoding is delegated to an external codec in every deployment: the
//! browser build injects a JavaScript decoder through the bindings crate,
//! and native builds can enable the `heif` feature to decode through
//! libheif. The dispatcher only knows the trait.

use async_trait::async_trait;

use super::{ConvertError, TargetFormat};

/// Capability that decodes HEIC bytes into an encoded raster image.
///
/// The decode is `async` because the production browser implementation
/// suspends on a JavaScript codec; native implementations complete
/// immediately.
#[async_trait(?Send)]
pub trait HeicDecoder {
    /// Decode HEIC content, producing bytes in the requested target format.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Decode`] if the capability is missing or the
    /// codec rejects the input.
    async fn decode(&self, bytes: &[u8], target: TargetFormat) -> Result<Vec<u8>, ConvertError>;
}

/// Placeholder decoder for builds with no HEIC capability wired in.
///
/// Every decode fails, which the dispatcher reports like any other decode
/// failure. This keeps HEIC files from being mistaken for a supported path
/// when no codec is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledHeicDecoder;

#[async_trait(?Send)]
impl HeicDecoder for DisabledHeicDecoder {
    async fn decode(&self, _bytes: &[u8], _target: TargetFormat) -> Result<Vec<u8>, ConvertError> {
        Err(ConvertError::Decode(
            "HEIC: no decode capability configured".to_string(),
        ))
    }
}

#[cfg(feature = "heif")]
pub use libheif::LibheifDecoder;

#[cfg(feature = "heif")]
mod libheif {
    use async_trait::async_trait;
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    use crate::convert::{
        ConvertError, HeicDecoder, PixelBuffer, PngSurface, SurfaceRenderer, TargetFormat,
    };

    /// Native HEIC decoder backed by libheif.
    ///
    /// Decodes the primary image to interleaved RGBA, compacts the row
    /// stride, then encodes through the pixel surface.
    pub struct LibheifDecoder {
        lib: LibHeif,
    }

    impl LibheifDecoder {
        pub fn new() -> Self {
            Self {
                lib: LibHeif::new(),
            }
        }

        fn decode_rgba(&self, bytes: &[u8]) -> Result<PixelBuffer, ConvertError> {
            let ctx = HeifContext::read_from_bytes(bytes)
                .map_err(|e| ConvertError::Decode(format!("HEIC: {e}")))?;
            let handle = ctx
                .primary_image_handle()
                .map_err(|e| ConvertError::Decode(format!("HEIC: {e}")))?;
            let image = self
                .lib
                .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
                .map_err(|e| ConvertError::Decode(format!("HEIC: {e}")))?;

            let planes = image.planes();
            let plane = planes
                .interleaved
                .ok_or_else(|| ConvertError::Decode("HEIC: no interleaved plane".to_string()))?;

            let width = plane.width;
            let height = plane.height;
            let row_bytes = width as usize * 4;
            let mut samples = Vec::with_capacity(row_bytes * height as usize);
            for row in 0..height as usize {
                let start = row * plane.stride;
                samples.extend_from_slice(&plane.data[start..start + row_bytes]);
            }

            PixelBuffer::from_rgba(width, height, samples)
        }
    }

    impl Default for LibheifDecoder {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait(?Send)]
    impl HeicDecoder for LibheifDecoder {
        async fn decode(
            &self,
            bytes: &[u8],
            target: TargetFormat,
        ) -> Result<Vec<u8>, ConvertError> {
            let buffer = self.decode_rgba(bytes)?;
            match target {
                TargetFormat::Png => PngSurface.encode_png(&buffer),
                TargetFormat::Jpeg => PngSurface.encode_jpeg(&buffer),
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_disabled_decoder_always_fails() {
        let result = block_on(DisabledHeicDecoder.decode(&[0xFF; 8], TargetFormat::Png));
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }
}
