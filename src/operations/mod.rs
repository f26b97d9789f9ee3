pub mod base64;
pub mod hex;
pub mod html;
pub mod unicode;
pub mod url;

pub use self::base64::{Base64DecodeConfig, Base64EncodeConfig};
pub use self::hex::{HexDecodeConfig, HexEncodeConfig};
pub use self::url::{UrlDecodeConfig, UrlEncodeConfig};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

pub mod operation_ids {
    pub const URL_DECODE: &str = "urlDecode";
    pub const URL_ENCODE: &str = "urlEncode";
    pub const BASE64_DECODE: &str = "base64Decode";
    pub const BASE64_ENCODE: &str = "base64Encode";
    pub const HEX_DECODE: &str = "hexDecode";
    pub const HEX_ENCODE: &str = "hexEncode";
    pub const HTML_DECODE: &str = "htmlDecode";
    pub const HTML_ENCODE: &str = "htmlEncode";
    pub const UNICODE_ESCAPE: &str = "unicodeEscape";
    pub const UNICODE_UNESCAPE: &str = "unicodeUnescape";
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("malformed percent escape at byte {offset}")]
    MalformedPercentEscape { offset: usize },
    #[error("percent-decoded bytes are not valid UTF-8")]
    InvalidPercentUtf8,
    #[error("invalid base64 input: {reason}")]
    InvalidBase64 { reason: String },
    #[error("hex input has odd length ({length} characters)")]
    OddHexLength { length: usize },
    #[error("invalid hex character `{character}` at index {index}")]
    InvalidHexCharacter { character: char, index: usize },
    #[error("invalid unicode escape `{sequence}`")]
    InvalidUnicodeEscape { sequence: String },
    #[error("config for `{found}` cannot drive operation `{expected}`")]
    ConfigMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Per-step configuration. Each variant belongs to exactly one operation id, so a
/// step's config can be checked against the operation it references before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationConfig {
    UrlDecode(UrlDecodeConfig),
    UrlEncode(UrlEncodeConfig),
    Base64Decode(Base64DecodeConfig),
    Base64Encode(Base64EncodeConfig),
    HexDecode(HexDecodeConfig),
    HexEncode(HexEncodeConfig),
    HtmlDecode,
    HtmlEncode,
    UnicodeEscape,
    UnicodeUnescape,
}

impl OperationConfig {
    pub fn operation_id(&self) -> &'static str {
        match self {
            Self::UrlDecode(_) => operation_ids::URL_DECODE,
            Self::UrlEncode(_) => operation_ids::URL_ENCODE,
            Self::Base64Decode(_) => operation_ids::BASE64_DECODE,
            Self::Base64Encode(_) => operation_ids::BASE64_ENCODE,
            Self::HexDecode(_) => operation_ids::HEX_DECODE,
            Self::HexEncode(_) => operation_ids::HEX_ENCODE,
            Self::HtmlDecode => operation_ids::HTML_DECODE,
            Self::HtmlEncode => operation_ids::HTML_ENCODE,
            Self::UnicodeEscape => operation_ids::UNICODE_ESCAPE,
            Self::UnicodeUnescape => operation_ids::UNICODE_UNESCAPE,
        }
    }

    /// Overlays the keys present in `patch` onto this config, one field at a time.
    /// Keys the config does not know are ignored.
    pub fn merged_with(self, patch: &Map<String, Value>) -> Result<Self, String> {
        Ok(match self {
            Self::UrlDecode(config) => Self::UrlDecode(config.merged(patch)?),
            Self::UrlEncode(config) => Self::UrlEncode(config.merged(patch)?),
            Self::Base64Decode(config) => Self::Base64Decode(config.merged(patch)?),
            Self::Base64Encode(config) => Self::Base64Encode(config.merged(patch)?),
            Self::HexDecode(config) => Self::HexDecode(config.merged(patch)?),
            Self::HexEncode(config) => Self::HexEncode(config.merged(patch)?),
            unit @ (Self::HtmlDecode
            | Self::HtmlEncode
            | Self::UnicodeEscape
            | Self::UnicodeUnescape) => unit,
        })
    }

    pub(crate) fn apply(&self, input: &str) -> Result<String, TransformError> {
        match self {
            Self::UrlDecode(config) => url::decode(input, config),
            Self::UrlEncode(config) => Ok(url::encode(input, config)),
            Self::Base64Decode(config) => base64::decode(input, config),
            Self::Base64Encode(config) => Ok(base64::encode(input, config)),
            Self::HexDecode(config) => hex::decode(input, config),
            Self::HexEncode(config) => Ok(hex::encode(input, config)),
            Self::HtmlDecode => Ok(html::decode(input)),
            Self::HtmlEncode => Ok(html::encode(input)),
            Self::UnicodeEscape => Ok(unicode::escape(input)),
            Self::UnicodeUnescape => unicode::unescape(input),
        }
    }
}

impl Serialize for OperationConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::UrlDecode(config) => config.serialize(serializer),
            Self::UrlEncode(config) => config.serialize(serializer),
            Self::Base64Decode(config) => config.serialize(serializer),
            Self::Base64Encode(config) => config.serialize(serializer),
            Self::HexDecode(config) => config.serialize(serializer),
            Self::HexEncode(config) => config.serialize(serializer),
            Self::HtmlDecode | Self::HtmlEncode | Self::UnicodeEscape | Self::UnicodeUnescape => {
                serializer.serialize_map(Some(0))?.end()
            }
        }
    }
}

pub(crate) fn merge_bool(
    patch: &Map<String, Value>,
    key: &str,
    current: bool,
) -> Result<bool, String> {
    match patch.get(key) {
        None | Some(Value::Null) => Ok(current),
        Some(Value::Bool(value)) => Ok(*value),
        Some(other) => Err(format!("`{key}` must be a boolean, got `{other}`")),
    }
}
