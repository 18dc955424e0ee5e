//! Collision-resistant filename generation for uploaded media.

use rand::RngCore;
use sirena_core::constants::DEFAULT_MEDIA_EXTENSION;

/// Generate a filename of the form `{hex32}-{unix_millis}.{ext}`.
///
/// The identifier is 16 cryptographically random bytes hex-encoded, so no two
/// submissions contend on the same path. The extension is the MIME subtype
/// with any `;`-delimited parameter stripped (e.g. `audio/webm;codecs=opus`
/// becomes `webm`), defaulting to `webm` when the MIME type is absent or
/// unparseable.
pub fn new_media_filename(mime_type: Option<&str>) -> String {
    let mut raw = [0u8; 16];
    rand::rng().fill_bytes(&mut raw);
    let millis = chrono::Utc::now().timestamp_millis();
    format!(
        "{}-{}.{}",
        hex::encode(raw),
        millis,
        extension_for_mime(mime_type)
    )
}

/// Normalized extension for a MIME type.
pub fn extension_for_mime(mime_type: Option<&str>) -> &str {
    mime_type
        .and_then(|m| m.split('/').nth(1))
        .and_then(|subtype| subtype.split(';').next())
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_MEDIA_EXTENSION)
}
