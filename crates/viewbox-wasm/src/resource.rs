//! Referenceable resources for renderable bytes.
//!
//! A successful conversion ends as an object URL: the bytes go into a
//! `Blob` carrying the right media type, and `URL.createObjectURL` hands
//! back a reference the browser can use as an image source. The URL is
//! owned by the caller, who revokes it with `URL.revokeObjectURL` when the
//! image leaves the screen.

use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

/// Wrap bytes as a dereferenceable object URL.
pub(crate) fn object_url(bytes: &[u8], media_type: &str) -> Result<String, JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(media_type);

    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}
