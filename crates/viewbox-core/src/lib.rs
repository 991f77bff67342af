//! Viewbox Core - Image conversion library
//!
//! This crate provides the core conversion functionality for Viewbox:
//! classifying user-supplied image files and turning them into renderable
//! PNG data (or passing browser-native formats through untouched).
//!
//! The heavy lifting - HEIC and TIFF bitstream decoding - belongs to
//! external codecs behind capability traits. This crate owns the dispatch
//! around them: classification, the RGBA pixel model, the PNG surface, and
//! a uniform failure story where every error is a logged value, never a
//! panic.

pub mod classify;
pub mod convert;
pub mod observe;

pub use classify::{classify, is_heic, is_tiff, MediaClass};
pub use convert::{ConvertError, Converter, PixelBuffer, Renderable, SourceFile, TargetFormat};
pub use observe::{ConversionLog, StdLog};
