//! Fixers coerce the loosely typed values a handler answers with into typed
//! defaults. Every input produces a usable value.

use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;

use crate::payload::{Payload, PayloadStrategy};

pub const DEFAULT_STATUS_CODE: u16 = 200;
pub const DEFAULT_CONTENT_TYPE: &str = crate::content_types::JSON;

/// Returns the trimmed string when `value` is a string with content. Otherwise
/// returns an empty string if `force_non_empty` is set, or `None`.
#[must_use]
pub fn fix_trimmed_string(value: Option<&Value>, force_non_empty: bool) -> Option<String> {
    match value.and_then(Value::as_str).map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Some(String::from(trimmed)),
        _ if force_non_empty => Some(String::new()),
        _ => None,
    }
}

/// Integer values usable as an HTTP status pass through unchanged, `404.0`
/// included; anything else becomes `200`.
#[must_use]
pub fn fix_status_code(value: Option<&Value>) -> u16 {
    value
        .and_then(integral_number)
        .and_then(|code| u16::try_from(code).ok())
        .filter(|code| StatusCode::from_u16(*code).is_ok())
        .unwrap_or(DEFAULT_STATUS_CODE)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn integral_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.is_finite() && number.fract() == 0.0)
            .filter(|number| (0.0..=f64::from(u16::MAX)).contains(number))
            .map(|number| number as u64)
    })
}

#[must_use]
pub fn fix_content_type(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map_or_else(|| String::from(DEFAULT_CONTENT_TYPE), String::from)
}

/// Serializes `payload` with the strategy registered for `content_type`;
/// unknown keys fall through to the default strategy.
#[must_use]
pub fn fix_payload(content_type: &str, payload: Option<Payload>) -> Bytes {
    PayloadStrategy::from_key(content_type).serialize(payload)
}
