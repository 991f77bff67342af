//! Image conversion pipeline for Viewbox.
//!
//! This module provides functionality for:
//! - Classification-driven dispatch of incoming files
//! - HEIC transcoding through an external decode capability
//! - TIFF rasterization (first frame, expanded to RGBA, encoded as PNG)
//! - Passthrough of browser-native raster formats
//!
//! # Architecture
//!
//! The pipeline is designed to be used from Web Workers via WASM bindings.
//! Each conversion is a single logical operation: one classification step
//! followed by exactly one path. The operation is asynchronous because the
//! HEIC capability suspends; the TIFF decode and PNG encode run to
//! completion synchronously once the bytes are available.
//!
//! External codecs, the pixel surface and the diagnostics sink are injected
//! capabilities, so the dispatcher can be tested against fakes.
//!
//! # Examples
//!
//! ```ignore
//! use viewbox_core::convert::{Converter, SourceFile};
//!
//! let bytes = std::fs::read("scan.tiff").unwrap();
//! let source = SourceFile { name: "scan.tiff", media_type: "image/tiff", bytes: &bytes };
//! let renderable = futures::executor::block_on(
//!     Converter::new().convert_to_renderable(&source),
//! )?;
//! println!("{} bytes of {}", renderable.bytes().len(), renderable.media_type());
//! ```

mod heic;
mod surface;
mod tiff;
mod types;

pub use heic::{DisabledHeicDecoder, HeicDecoder};
#[cfg(feature = "heif")]
pub use heic::LibheifDecoder;
pub use surface::{PngSurface, SurfaceRenderer};
pub use tiff::{ImageTiffDecoder, TiffDecoder};
pub use types::{ConvertError, PixelBuffer, Renderable, SourceFile, TargetFormat};

use crate::classify::{classify, MediaClass};
use crate::observe::{ConversionLog, StdLog};

/// Format dispatcher: classifies a file and runs one conversion path.
///
/// Holds the injected capabilities. [`Converter::new`] wires the production
/// defaults (no HEIC capability, the `tiff`-crate decoder, the PNG
/// surface, the `log`-facade observer); the `with_*` builders replace any
/// of them.
pub struct Converter {
    heic: Box<dyn HeicDecoder>,
    tiff: Box<dyn TiffDecoder>,
    surface: Box<dyn SurfaceRenderer>,
    log: Box<dyn ConversionLog>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// Converter with the production default capabilities.
    pub fn new() -> Self {
        Self {
            heic: Box::new(DisabledHeicDecoder),
            tiff: Box::new(ImageTiffDecoder),
            surface: Box::new(PngSurface),
            log: Box::new(StdLog),
        }
    }

    /// Replace the HEIC decode capability.
    pub fn with_heic_decoder(mut self, heic: Box<dyn HeicDecoder>) -> Self {
        self.heic = heic;
        self
    }

    /// Replace the TIFF decode capability.
    pub fn with_tiff_decoder(mut self, tiff: Box<dyn TiffDecoder>) -> Self {
        self.tiff = tiff;
        self
    }

    /// Replace the pixel surface.
    pub fn with_surface(mut self, surface: Box<dyn SurfaceRenderer>) -> Self {
        self.surface = surface;
        self
    }

    /// Replace the diagnostics sink.
    pub fn with_log(mut self, log: Box<dyn ConversionLog>) -> Self {
        self.log = log;
        self
    }

    /// Convert a file into renderable image content.
    ///
    /// Classifies by declared media type and filename, then runs exactly
    /// one path:
    ///
    /// - HEIC: decode through the HEIC capability, requesting PNG.
    /// - TIFF: decode the first frame, expand to RGBA, encode as PNG.
    /// - Browser-native (JPEG/PNG/BMP/GIF): return the original bytes
    ///   unchanged.
    /// - Anything else: fail as unsupported.
    ///
    /// # Errors
    ///
    /// Every failure is reported to the diagnostics sink and returned as a
    /// [`ConvertError`] value. This function never panics on malformed
    /// input; callers at an absence-style boundary map `Err` to their null
    /// equivalent.
    pub async fn convert_to_renderable<'a>(
        &self,
        source: &SourceFile<'a>,
    ) -> Result<Renderable<'a>, ConvertError> {
        match classify(source.media_type, source.name) {
            MediaClass::Heic => {
                let png = self
                    .heic
                    .decode(source.bytes, TargetFormat::Png)
                    .await
                    .map_err(|e| self.report(e))?;
                Ok(Renderable::png(png))
            }
            MediaClass::Tiff => {
                let buffer = self
                    .tiff
                    .decode_first_frame(source.bytes)
                    .map_err(|e| self.report(e))?;
                let png = self
                    .surface
                    .encode_png(&buffer)
                    .map_err(|e| self.report(e))?;
                Ok(Renderable::png(png))
            }
            MediaClass::BrowserNative => {
                Ok(Renderable::passthrough(source.bytes, source.media_type))
            }
            MediaClass::Unsupported => {
                let err = ConvertError::UnsupportedType {
                    media_type: source.media_type.to_string(),
                    file_name: source.name.to_string(),
                };
                self.log.warn(&err.to_string());
                Err(err)
            }
        }
    }

    fn report(&self, err: ConvertError) -> ConvertError {
        self.log.error(&err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::testing::RecordingLog;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::io::Cursor;

    struct FakeHeicDecoder {
        output: Result<Vec<u8>, String>,
    }

    #[async_trait(?Send)]
    impl HeicDecoder for FakeHeicDecoder {
        async fn decode(&self, _bytes: &[u8], target: TargetFormat) -> Result<Vec<u8>, ConvertError> {
            assert_eq!(target, TargetFormat::Png);
            self.output.clone().map_err(ConvertError::Decode)
        }
    }

    struct UnavailableSurface;

    impl SurfaceRenderer for UnavailableSurface {
        fn encode_png(&self, _buffer: &PixelBuffer) -> Result<Vec<u8>, ConvertError> {
            Err(ConvertError::Surface("no rendering context".to_string()))
        }
    }

    fn source<'a>(name: &'a str, media_type: &'a str, bytes: &'a [u8]) -> SourceFile<'a> {
        SourceFile {
            name,
            media_type,
            bytes,
        }
    }

    /// Encode a one-frame RGBA8 TIFF for use as test input.
    fn rgba_tiff(width: u32, height: u32, samples: &[u8]) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        let mut encoder = ::tiff::encoder::TiffEncoder::new(&mut out).unwrap();
        encoder
            .write_image::<::tiff::encoder::colortype::RGBA8>(width, height, samples)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_heic_path_wraps_decoder_output() {
        let fake_png = vec![0x89, b'P', b'N', b'G', 1, 2, 3];
        let converter = Converter::new().with_heic_decoder(Box::new(FakeHeicDecoder {
            output: Ok(fake_png.clone()),
        }));

        // Empty declared type; the extension alone selects the HEIC path
        let result = block_on(converter.convert_to_renderable(&source("photo.heic", "", &[0u8; 4])));

        let renderable = result.unwrap();
        assert_eq!(renderable.bytes(), fake_png.as_slice());
        assert_eq!(renderable.media_type(), "image/png");
        assert!(!renderable.is_passthrough());
    }

    #[test]
    fn test_heic_failure_is_logged_and_returned() {
        let log = RecordingLog::default();
        let converter = Converter::new()
            .with_heic_decoder(Box::new(FakeHeicDecoder {
                output: Err("codec exploded".to_string()),
            }))
            .with_log(Box::new(log.clone()));

        let result =
            block_on(converter.convert_to_renderable(&source("photo.heic", "image/heic", &[])));

        assert!(matches!(result, Err(ConvertError::Decode(_))));
        assert_eq!(log.errors().len(), 1);
        assert!(log.errors()[0].contains("codec exploded"));
        assert!(log.warnings().is_empty());
    }

    #[test]
    fn test_tiff_path_produces_png_with_frame_dimensions() {
        // 2x2 all-white frame, per the classic scanner case
        let bytes = rgba_tiff(2, 2, &[255u8; 2 * 2 * 4]);
        let converter = Converter::new();

        let result =
            block_on(converter.convert_to_renderable(&source("scan.tiff", "image/tiff", &bytes)));

        let renderable = result.unwrap();
        assert_eq!(renderable.media_type(), "image/png");

        let decoded = image::load_from_memory(renderable.bytes()).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert!(decoded.into_raw().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_tiff_with_zero_frames_fails() {
        let log = RecordingLog::default();
        let converter = Converter::new().with_log(Box::new(log.clone()));

        // Valid header, IFD0 offset zero
        let bytes = [0x49, 0x49, 0x2A, 0x00, 0, 0, 0, 0];
        let result =
            block_on(converter.convert_to_renderable(&source("empty.tiff", "image/tiff", &bytes)));

        assert!(matches!(result, Err(ConvertError::NoFrames)));
        assert_eq!(log.errors().len(), 1);
    }

    #[test]
    fn test_tiff_surface_failure_is_logged_and_returned() {
        let log = RecordingLog::default();
        let converter = Converter::new()
            .with_surface(Box::new(UnavailableSurface))
            .with_log(Box::new(log.clone()));

        let bytes = rgba_tiff(1, 1, &[0u8, 0, 0, 255]);
        let result =
            block_on(converter.convert_to_renderable(&source("scan.tiff", "image/tiff", &bytes)));

        assert!(matches!(result, Err(ConvertError::Surface(_))));
        assert!(log.errors()[0].contains("no rendering context"));
    }

    #[test]
    fn test_passthrough_returns_input_bytes_unchanged() {
        let converter = Converter::new();
        let original = vec![0xFFu8, 0xD8, 0xFF, 0xE0, 42, 42];

        for media_type in ["image/jpeg", "image/png", "image/bmp", "image/gif"] {
            let result = block_on(
                converter.convert_to_renderable(&source("anything", media_type, &original)),
            );
            let renderable = result.unwrap();
            assert!(renderable.is_passthrough());
            assert_eq!(renderable.bytes(), original.as_slice());
            assert_eq!(renderable.media_type(), media_type);
        }
    }

    #[test]
    fn test_passthrough_does_not_validate_bytes() {
        // A declared JPEG with garbage bytes still passes through: this
        // path never decodes
        let converter = Converter::new();
        let garbage = vec![0u8; 16];
        let result =
            block_on(converter.convert_to_renderable(&source("x.jpg", "image/jpeg", &garbage)));
        assert_eq!(result.unwrap().bytes(), garbage.as_slice());
    }

    #[test]
    fn test_unsupported_type_warns_and_fails() {
        let log = RecordingLog::default();
        let converter = Converter::new().with_log(Box::new(log.clone()));

        let result = block_on(
            converter.convert_to_renderable(&source("doc.pdf", "application/pdf", &[1, 2, 3])),
        );

        match result {
            Err(ConvertError::UnsupportedType {
                media_type,
                file_name,
            }) => {
                assert_eq!(media_type, "application/pdf");
                assert_eq!(file_name, "doc.pdf");
            }
            other => panic!("expected UnsupportedType, got {:?}", other),
        }
        assert_eq!(log.warnings().len(), 1);
        assert!(log.warnings()[0].contains("application/pdf"));
        assert!(log.errors().is_empty());
    }

    #[test]
    fn test_extension_overrides_mismatched_media_type() {
        // Declared as PDF, named .heic: the HEIC rule fires first
        let converter = Converter::new().with_heic_decoder(Box::new(FakeHeicDecoder {
            output: Ok(vec![1, 2, 3]),
        }));
        let result = block_on(
            converter.convert_to_renderable(&source("img.HEIC", "application/pdf", &[0u8; 2])),
        );
        assert_eq!(result.unwrap().bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_default_heic_capability_fails_cleanly() {
        let log = RecordingLog::default();
        let converter = Converter::new().with_log(Box::new(log.clone()));

        let result =
            block_on(converter.convert_to_renderable(&source("photo.heic", "image/heic", &[])));

        assert!(matches!(result, Err(ConvertError::Decode(_))));
        assert_eq!(log.errors().len(), 1);
    }
}
