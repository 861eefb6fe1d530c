// Content-type keys handlers answer with, and the MIME strings they map to.

pub const JSON: &str = "json";
pub const JS: &str = "js";
pub const HTML: &str = "html";
pub const CSS: &str = "css";
pub const PLAIN: &str = "plain";
pub const FAVICON: &str = "favicon";
pub const PNG: &str = "png";
pub const JPG: &str = "jpg";

/// Sent when a handler answers with a key missing from [`CONTENT_TYPES`].
pub const FALLBACK_MIME: &str = "application/octet-stream";

pub static CONTENT_TYPES: &[(&str, &str)] = &[
    (JSON, "application/json"),
    (JS, "application/javascript"),
    (HTML, "text/html"),
    (CSS, "text/css"),
    (PLAIN, "text/plain"),
    (FAVICON, "image/x-icon"),
    (PNG, "image/png"),
    (JPG, "image/jpg"),
];

#[must_use]
pub fn mime_for(key: &str) -> Option<&'static str> {
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, mime)| *mime)
}

#[must_use]
pub fn header_value_for(key: &str) -> &'static str {
    mime_for(key).unwrap_or(FALLBACK_MIME)
}

/// Maps a file extension onto the content-type key the asset handler answers with.
#[must_use]
pub fn key_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "json" => JSON,
        "js" | "mjs" => JS,
        "html" | "htm" => HTML,
        "css" => CSS,
        "ico" => FAVICON,
        "png" => PNG,
        "jpg" | "jpeg" => JPG,
        _ => PLAIN,
    }
}
