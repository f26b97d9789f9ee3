use super::TransformError;
use std::fmt::Write as _;

/// Keeps printable ASCII (U+0020..=U+007E) other than `\` and writes everything else as
/// `\uXXXX`, or `\u{X...}` past the basic multilingual plane. Hex digits are uppercase.
pub fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        let code = u32::from(ch);
        if (0x20..=0x7e).contains(&code) && ch != '\\' {
            output.push(ch);
        } else if code > 0xffff {
            let _ = write!(output, "\\u{{{code:X}}}");
        } else {
            let _ = write!(output, "\\u{code:04X}");
        }
    }
    output
}

/// Parses `\uXXXX` and `\u{X...}` escapes. Two `\uXXXX` escapes forming a UTF-16
/// surrogate pair become one character. A backslash that does not start a well-formed
/// escape is copied through untouched.
pub fn unescape(input: &str) -> Result<String, TransformError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("\\u") {
        output.push_str(&rest[..start]);
        let text = &rest[start..];
        let Some(escape) = read_escape(text) else {
            output.push_str("\\u");
            rest = &text[2..];
            continue;
        };

        let mut next = &text[escape.len..];
        let decoded = if !escape.braced && is_high_surrogate(escape.value) {
            match read_escape(next) {
                Some(low) if !low.braced && is_low_surrogate(low.value) => {
                    next = &next[low.len..];
                    char::from_u32(
                        0x10000 + ((escape.value - 0xD800) << 10) + (low.value - 0xDC00),
                    )
                }
                _ => None,
            }
        } else {
            char::from_u32(escape.value)
        };
        let decoded = decoded.ok_or_else(|| TransformError::InvalidUnicodeEscape {
            sequence: text[..escape.len].to_string(),
        })?;
        output.push(decoded);
        rest = next;
    }
    output.push_str(rest);
    Ok(output)
}

struct Escape {
    value: u32,
    len: usize,
    braced: bool,
}

fn read_escape(text: &str) -> Option<Escape> {
    let body = text.strip_prefix("\\u")?;
    if let Some(braced) = body.strip_prefix('{') {
        let close = braced.find('}')?;
        let digits = &braced[..close];
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        return Some(Escape {
            value: u32::from_str_radix(digits, 16).unwrap_or(u32::MAX),
            len: close + 4,
            braced: true,
        });
    }
    let digits = body.get(..4)?;
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    Some(Escape {
        value: u32::from_str_radix(digits, 16).ok()?,
        len: 6,
        braced: false,
    })
}

fn is_high_surrogate(value: u32) -> bool {
    (0xD800..0xDC00).contains(&value)
}

fn is_low_surrogate(value: u32) -> bool {
    (0xDC00..0xE000).contains(&value)
}
