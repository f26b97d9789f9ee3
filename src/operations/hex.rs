use super::{merge_bool, TransformError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HexDecodeConfig {
    pub ignore_whitespace: bool,
}

impl Default for HexDecodeConfig {
    fn default() -> Self {
        Self {
            ignore_whitespace: true,
        }
    }
}

impl HexDecodeConfig {
    pub fn merged(self, patch: &Map<String, Value>) -> Result<Self, String> {
        Ok(Self {
            ignore_whitespace: merge_bool(patch, "ignoreWhitespace", self.ignore_whitespace)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HexEncodeConfig {
    pub uppercase: bool,
}

impl HexEncodeConfig {
    pub fn merged(self, patch: &Map<String, Value>) -> Result<Self, String> {
        Ok(Self {
            uppercase: merge_bool(patch, "uppercase", self.uppercase)?,
        })
    }
}

pub fn decode(input: &str, config: &HexDecodeConfig) -> Result<String, TransformError> {
    let sanitized = if config.ignore_whitespace {
        Cow::Owned(input.chars().filter(|ch| !ch.is_whitespace()).collect())
    } else {
        Cow::Borrowed(input)
    };

    let length = sanitized.chars().count();
    if length % 2 != 0 {
        return Err(TransformError::OddHexLength { length });
    }
    if let Some((index, character)) = sanitized
        .chars()
        .enumerate()
        .find(|(_, ch)| !ch.is_ascii_hexdigit())
    {
        return Err(TransformError::InvalidHexCharacter { character, index });
    }

    let bytes = hex::decode(sanitized.as_bytes()).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            TransformError::InvalidHexCharacter {
                character: c,
                index,
            }
        }
        _ => TransformError::OddHexLength { length },
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn encode(input: &str, config: &HexEncodeConfig) -> String {
    if config.uppercase {
        hex::encode_upper(input)
    } else {
        hex::encode(input)
    }
}
