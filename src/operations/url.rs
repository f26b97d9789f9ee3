use super::{merge_bool, TransformError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlDecodeConfig {
    pub plus_to_space: bool,
}

impl Default for UrlDecodeConfig {
    fn default() -> Self {
        Self {
            plus_to_space: true,
        }
    }
}

impl UrlDecodeConfig {
    pub fn merged(self, patch: &Map<String, Value>) -> Result<Self, String> {
        Ok(Self {
            plus_to_space: merge_bool(patch, "plusToSpace", self.plus_to_space)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEncodeConfig {
    pub space_to_plus: bool,
}

impl UrlEncodeConfig {
    pub fn merged(self, patch: &Map<String, Value>) -> Result<Self, String> {
        Ok(Self {
            space_to_plus: merge_bool(patch, "spaceToPlus", self.space_to_plus)?,
        })
    }
}

pub fn decode(input: &str, config: &UrlDecodeConfig) -> Result<String, TransformError> {
    let prepared = if config.plus_to_space {
        Cow::Owned(input.replace('+', " "))
    } else {
        Cow::Borrowed(input)
    };
    validate_percent_escapes(&prepared)?;
    urlencoding::decode(&prepared)
        .map(Cow::into_owned)
        .map_err(|_| TransformError::InvalidPercentUtf8)
}

/// Marks that URI components may carry unescaped, on top of `A-Z a-z 0-9 - _ . ~`.
const COMPONENT_MARKS: &[char] = &['!', '*', '\'', '(', ')'];

/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )` pass through; every other UTF-8 byte becomes `%XX`.
pub fn encode(input: &str, config: &UrlEncodeConfig) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(mark) = rest.find(COMPONENT_MARKS) {
        push_encoded(&mut output, &rest[..mark], config);
        output.push_str(&rest[mark..mark + 1]);
        rest = &rest[mark + 1..];
    }
    push_encoded(&mut output, rest, config);
    output
}

fn push_encoded(output: &mut String, chunk: &str, config: &UrlEncodeConfig) {
    let encoded = urlencoding::encode(chunk);
    if config.space_to_plus {
        output.push_str(&encoded.replace("%20", "+"));
    } else {
        output.push_str(&encoded);
    }
}

fn validate_percent_escapes(input: &str) -> Result<(), TransformError> {
    let bytes = input.as_bytes();
    let mut offset = 0;
    while offset < bytes.len() {
        if bytes[offset] != b'%' {
            offset += 1;
            continue;
        }
        let well_formed = bytes
            .get(offset + 1..offset + 3)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(TransformError::MalformedPercentEscape { offset });
        }
        offset += 3;
    }
    Ok(())
}
