//! Console-backed diagnostics.

use viewbox_core::ConversionLog;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Diagnostics sink writing to the browser console.
///
/// Unsupported inputs land as `console.warn`, failed conversions as
/// `console.error`, matching what a page author expects to see when a
/// thumbnail silently refuses to appear.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLog;

impl ConversionLog for ConsoleLog {
    fn warn(&self, message: &str) {
        console::warn_1(&JsValue::from_str(message));
    }

    fn error(&self, message: &str) {
        console::error_1(&JsValue::from_str(message));
    }
}

/// Render a JavaScript error value as a log-friendly string.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
