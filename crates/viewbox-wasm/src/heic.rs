//! JavaScript-backed HEIC decode capability.
//!
//! Browsers get HEIC support from JavaScript codec libraries (heic2any and
//! friends), so the bindings let the caller hand one in as an async
//! function. This module adapts that function to the core
//! [`HeicDecoder`] trait.

use async_trait::async_trait;
use js_sys::{Promise, Uint8Array};
use viewbox_core::convert::{ConvertError, HeicDecoder, TargetFormat};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::observe::js_error_message;

/// HEIC decoder delegating to a caller-supplied JavaScript function.
///
/// The function receives `(bytes: Uint8Array, toType: string)` and must
/// return a `Uint8Array` of encoded image bytes, or a promise of one. A
/// throw, a rejection, or a non-`Uint8Array` result all surface as decode
/// failures.
pub struct JsHeicDecoder {
    decode: js_sys::Function,
}

impl JsHeicDecoder {
    pub fn new(decode: js_sys::Function) -> Self {
        Self { decode }
    }
}

#[async_trait(?Send)]
impl HeicDecoder for JsHeicDecoder {
    async fn decode(&self, bytes: &[u8], target: TargetFormat) -> Result<Vec<u8>, ConvertError> {
        let input = Uint8Array::from(bytes);
        let to_type = JsValue::from_str(target.media_type());

        let returned = self
            .decode
            .call2(&JsValue::NULL, &input, &to_type)
            .map_err(|e| ConvertError::Decode(format!("HEIC: {}", js_error_message(&e))))?;

        // Promise::resolve flattens both promise and plain-value returns
        let settled = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| ConvertError::Decode(format!("HEIC: {}", js_error_message(&e))))?;

        let output: Uint8Array = settled.dyn_into().map_err(|value| {
            ConvertError::Decode(format!(
                "HEIC: decoder returned {:?} instead of a Uint8Array",
                value
            ))
        })?;
        Ok(output.to_vec())
    }
}
