//! Viewbox WASM - WebAssembly bindings for Viewbox
//!
//! This crate exposes the viewbox-core conversion pipeline to
//! JavaScript/TypeScript applications running in a browser.
//!
//! # Module Structure
//!
//! - `convert` - The conversion entry points (`convert_to_renderable`,
//!   `convert_bytes`) and classification probes
//! - `heic` - Bridge that lets JavaScript supply the HEIC codec
//! - `resource` - Blob/object-URL wrapping for renderable bytes
//! - `observe` - Console-backed diagnostics
//!
//! # Usage
//!
//! ```typescript
//! import init, { convert_to_renderable } from '@viewbox/wasm';
//! import heic2any from 'heic2any';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const url = await convert_to_renderable(file, async (bytes, toType) => {
//!   const blob = await heic2any({ blob: new Blob([bytes]), toType });
//!   return new Uint8Array(await blob.arrayBuffer());
//! });
//! if (url !== null) {
//!   img.src = url; // caller revokes with URL.revokeObjectURL when done
//! }
//! ```

use wasm_bindgen::prelude::*;

mod convert;
mod heic;
mod observe;
mod resource;

// Re-export public surface
pub use convert::{convert_bytes, convert_to_renderable, is_heic, is_tiff};
pub use heic::JsHeicDecoder;
pub use observe::ConsoleLog;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: install a panic hook for readable browser console traces
    // when the console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
