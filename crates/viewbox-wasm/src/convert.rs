//! Conversion WASM bindings.
//!
//! This module exposes the core dispatcher to JavaScript. The contract at
//! this boundary is absence, not exceptions: every returned promise
//! resolves to an object URL string or `null`, and never rejects. Failures
//! are reported to the browser console on the way out.
//!
//! # Functions
//!
//! - [`convert_to_renderable`] - Convert a `File` to a displayable object URL
//! - [`convert_bytes`] - Same pipeline for callers that already hold bytes
//! - [`is_heic`] / [`is_tiff`] - Classification probes
//!
//! # Example
//!
//! ```typescript
//! const url = await convert_to_renderable(file, heicDecoder);
//! preview.src = url ?? FALLBACK_IMAGE;
//! ```

use viewbox_core::{ConversionLog, Converter, ConvertError, SourceFile};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::heic::JsHeicDecoder;
use crate::observe::{js_error_message, ConsoleLog};
use crate::resource::object_url;

/// Convert a user-supplied file into a displayable object URL.
///
/// Classifies the file by its declared media type and name, then runs one
/// conversion path: HEIC transcode (through `heic_decoder`), TIFF
/// rasterization, passthrough for browser-native formats, or rejection.
///
/// # Arguments
///
/// * `file` - The input `File` (or any `Blob` carrying a name and type)
/// * `heic_decoder` - Optional async JavaScript function
///   `(bytes: Uint8Array, toType: string) => Promise<Uint8Array>` used for
///   HEIC content, typically wrapping a codec library such as heic2any.
///   Without it, HEIC files fail like any other decode failure.
///
/// # Returns
///
/// A promise resolving to an object URL string usable as an image source,
/// or `null` if the file could not be converted. The promise never
/// rejects. The caller owns the URL and should release it with
/// `URL.revokeObjectURL` once the image is no longer displayed.
///
/// # Example
///
/// ```typescript
/// const url = await convert_to_renderable(file, heicDecoder);
/// if (url === null) showBrokenThumbnail();
/// ```
#[wasm_bindgen]
pub async fn convert_to_renderable(
    file: web_sys::File,
    heic_decoder: Option<js_sys::Function>,
) -> JsValue {
    let name = file.name();
    let media_type = file.type_();

    let bytes = match read_bytes(&file).await {
        Ok(bytes) => bytes,
        Err(err) => {
            ConsoleLog.error(&err.to_string());
            return JsValue::NULL;
        }
    };

    match convert_inner(&bytes, &media_type, &name, heic_decoder).await {
        Some(url) => JsValue::from_str(&url),
        None => JsValue::NULL,
    }
}

/// Convert raw file bytes into a displayable object URL.
///
/// Identical to [`convert_to_renderable`] for callers that already read the
/// file, e.g. inside a Web Worker fed by `postMessage`.
///
/// # Arguments
///
/// * `bytes` - Full file content
/// * `media_type` - Declared media type (may be empty)
/// * `file_name` - Filename, used for extension-based classification
/// * `heic_decoder` - Optional HEIC codec function, as in
///   [`convert_to_renderable`]
#[wasm_bindgen]
pub async fn convert_bytes(
    bytes: Vec<u8>,
    media_type: String,
    file_name: String,
    heic_decoder: Option<js_sys::Function>,
) -> JsValue {
    match convert_inner(&bytes, &media_type, &file_name, heic_decoder).await {
        Some(url) => JsValue::from_str(&url),
        None => JsValue::NULL,
    }
}

/// True if the file would take the HEIC conversion path.
#[wasm_bindgen]
pub fn is_heic(media_type: &str, file_name: &str) -> bool {
    viewbox_core::is_heic(media_type, file_name)
}

/// True if the file would take the TIFF conversion path.
#[wasm_bindgen]
pub fn is_tiff(media_type: &str, file_name: &str) -> bool {
    viewbox_core::is_tiff(media_type, file_name)
}

/// Run the core dispatcher and wrap the result as an object URL.
///
/// All failures have been logged by the time this returns `None`.
async fn convert_inner(
    bytes: &[u8],
    media_type: &str,
    file_name: &str,
    heic_decoder: Option<js_sys::Function>,
) -> Option<String> {
    let mut converter = Converter::new().with_log(Box::new(ConsoleLog));
    if let Some(decode) = heic_decoder {
        converter = converter.with_heic_decoder(Box::new(JsHeicDecoder::new(decode)));
    }

    let source = SourceFile {
        name: file_name,
        media_type,
        bytes,
    };

    // The converter has already logged the failure; absence is the contract
    let renderable = converter.convert_to_renderable(&source).await.ok()?;

    match object_url(renderable.bytes(), renderable.media_type()) {
        Ok(url) => Some(url),
        Err(err) => {
            ConsoleLog.error(&format!(
                "object URL creation failed: {}",
                js_error_message(&err)
            ));
            None
        }
    }
}

/// Read a file's full content, suspending on the browser's async read.
async fn read_bytes(file: &web_sys::File) -> Result<Vec<u8>, ConvertError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ConvertError::Read(js_error_message(&e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
