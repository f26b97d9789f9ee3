use super::{merge_bool, TransformError};
use base64::alphabet;
use base64::engine::general_purpose::{
    GeneralPurpose, GeneralPurposeConfig, STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD,
};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Base64DecodeConfig {
    pub url_safe: bool,
}

impl Default for Base64DecodeConfig {
    fn default() -> Self {
        Self { url_safe: true }
    }
}

impl Base64DecodeConfig {
    pub fn merged(self, patch: &Map<String, Value>) -> Result<Self, String> {
        Ok(Self {
            url_safe: merge_bool(patch, "urlSafe", self.url_safe)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Base64EncodeConfig {
    pub url_safe: bool,
    pub include_padding: bool,
}

impl Default for Base64EncodeConfig {
    fn default() -> Self {
        Self {
            url_safe: false,
            include_padding: true,
        }
    }
}

impl Base64EncodeConfig {
    pub fn merged(self, patch: &Map<String, Value>) -> Result<Self, String> {
        Ok(Self {
            url_safe: merge_bool(patch, "urlSafe", self.url_safe)?,
            include_padding: merge_bool(patch, "includePadding", self.include_padding)?,
        })
    }
}

/// Accepts padded, unpadded and over-padded input and ignores unused trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Whitespace and trailing `=` are dropped before decoding, so only characters outside
/// the alphabet fail. Bytes that are not valid UTF-8 come out as U+FFFD.
pub fn decode(input: &str, config: &Base64DecodeConfig) -> Result<String, TransformError> {
    let sanitized = sanitize(input, config.url_safe);
    let bytes = LENIENT
        .decode(sanitized.as_bytes())
        .map_err(|err| TransformError::InvalidBase64 {
            reason: err.to_string(),
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn encode(input: &str, config: &Base64EncodeConfig) -> String {
    let engine = match (config.url_safe, config.include_padding) {
        (false, true) => &STANDARD,
        (false, false) => &STANDARD_NO_PAD,
        (true, true) => &URL_SAFE,
        (true, false) => &URL_SAFE_NO_PAD,
    };
    engine.encode(input.as_bytes())
}

fn sanitize(input: &str, url_safe: bool) -> String {
    let mut sanitized: String = input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| match ch {
            '-' if url_safe => '+',
            '_' if url_safe => '/',
            other => other,
        })
        .collect();
    sanitized.truncate(sanitized.trim_end_matches('=').len());
    // A lone final symbol carries fewer than eight bits.
    if sanitized.len() % 4 == 1 {
        sanitized.pop();
    }
    sanitized
}
