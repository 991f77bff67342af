//! Media type classification for incoming files.
//!
//! Conversion starts by deciding which path a file takes, using only its
//! declared media type and its filename. The rules are ordered and the first
//! match wins, so a file named `photo.heic` with a bogus declared type still
//! routes to the HEIC path.

use serde::{Deserialize, Serialize};

/// Media types the browser can render without any conversion.
pub const NATIVE_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/bmp", "image/gif"];

/// Conversion path selected for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaClass {
    /// HEIC/HEIF content; decoded by the external HEIC capability.
    Heic,
    /// TIFF content; rasterized frame by frame in process.
    Tiff,
    /// Already renderable by the browser; passed through untouched.
    BrowserNative,
    /// Nothing we can do with it.
    Unsupported,
}

/// Classify a file by declared media type and filename.
///
/// The rules are ordered, first match wins:
///
/// 1. Media type contains `"heic"`, or the name ends in `.heic`
///    (case-insensitive) -> [`MediaClass::Heic`].
/// 2. Media type is exactly `image/tiff`, or the name ends in `.tiff`
///    (case-insensitive) -> [`MediaClass::Tiff`].
/// 3. Media type is one of [`NATIVE_MEDIA_TYPES`] -> [`MediaClass::BrowserNative`].
/// 4. Anything else -> [`MediaClass::Unsupported`].
///
/// Only `.heic` and `.tiff` are recognized as extensions. `.heif` and `.tif`
/// are deliberately not: callers rely on rejected inputs staying rejected.
pub fn classify(media_type: &str, file_name: &str) -> MediaClass {
    if media_type.contains("heic") || ends_with_ignore_case(file_name, ".heic") {
        MediaClass::Heic
    } else if media_type == "image/tiff" || ends_with_ignore_case(file_name, ".tiff") {
        MediaClass::Tiff
    } else if NATIVE_MEDIA_TYPES.contains(&media_type) {
        MediaClass::BrowserNative
    } else {
        MediaClass::Unsupported
    }
}

/// True if the file would take the HEIC path.
pub fn is_heic(media_type: &str, file_name: &str) -> bool {
    classify(media_type, file_name) == MediaClass::Heic
}

/// True if the file would take the TIFF path.
pub fn is_tiff(media_type: &str, file_name: &str) -> bool {
    classify(media_type, file_name) == MediaClass::Tiff
}

/// ASCII case-insensitive suffix check.
///
/// Compares raw bytes so a multi-byte character at the suffix boundary can
/// never cause a char-boundary panic; a non-ASCII tail simply fails to match.
fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    let name = name.as_bytes();
    let suffix = suffix.as_bytes();
    name.len() >= suffix.len()
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: classification never panics, whatever the inputs.
        #[test]
        fn prop_classify_total(media_type in any::<String>(), name in any::<String>()) {
            let _ = classify(&media_type, &name);
        }

        /// Property: any name ending in ".heic" (any case) classifies as Heic
        /// regardless of the declared media type.
        #[test]
        fn prop_heic_extension_wins(
            stem in any::<String>(),
            media_type in any::<String>(),
            ext in "\\.[hH][eE][iI][cC]",
        ) {
            let name = format!("{stem}{ext}");
            prop_assert_eq!(classify(&media_type, &name), MediaClass::Heic);
        }

        /// Property: any media type containing "heic" classifies as Heic.
        #[test]
        fn prop_heic_media_type_wins(
            prefix in any::<String>(),
            suffix in any::<String>(),
            name in any::<String>(),
        ) {
            let media_type = format!("{prefix}heic{suffix}");
            prop_assert_eq!(classify(&media_type, &name), MediaClass::Heic);
        }

        /// Property: a ".tiff" name never classifies as Heic unless the media
        /// type says so.
        #[test]
        fn prop_tiff_extension(stem in "[a-zA-Z0-9_-]*", ext in "\\.[tT][iI][fF][fF]") {
            let name = format!("{stem}{ext}");
            prop_assert_eq!(classify("", &name), MediaClass::Tiff);
        }
    }
}
