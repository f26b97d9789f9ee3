//! HTML entity codec over a fixed entity table.
//!
//! Decoding recognizes `&lt;` `&gt;` `&amp;` `&quot;` `&#39;` `&apos;`, decimal `&#NNN;` and
//! hexadecimal `&#xHH;` references. A reference must end with `;`. Named entities outside
//! the table are left verbatim. Numeric references to NUL, a surrogate or anything past
//! U+10FFFF decode to U+FFFD. Decoding is a single pass, so `&amp;lt;` yields `&lt;`.
//!
//! Encoding escapes `&`, `<`, `>`, `"` and `'`.

const MAX_REFERENCE_LEN: usize = 32;

pub fn decode(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match decode_reference(candidate) {
            Some((decoded, consumed)) => {
                output.push(decoded);
                rest = &candidate[consumed..];
            }
            None => {
                output.push('&');
                rest = &candidate[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

pub fn encode(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            other => output.push(other),
        }
    }
    output
}

/// `candidate` starts with `&`. Returns the decoded character and the number of bytes
/// the reference spans, `;` included.
fn decode_reference(candidate: &str) -> Option<(char, usize)> {
    let tail = &candidate[1..];
    let body_len = tail
        .char_indices()
        .take(MAX_REFERENCE_LEN)
        .find(|(_, ch)| *ch == ';')
        .map(|(index, _)| index)?;
    let body = &tail[..body_len];
    let decoded = match body {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        _ => decode_numeric(body.strip_prefix('#')?)?,
    };
    Some((decoded, body_len + 2))
}

fn decode_numeric(reference: &str) -> Option<char> {
    let (digits, radix) = match reference.strip_prefix(|ch: char| ch == 'x' || ch == 'X') {
        Some(hex) => (hex, 16),
        None => (reference, 10),
    };
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }
    let decoded = u32::from_str_radix(digits, radix)
        .ok()
        .filter(|value| *value != 0)
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Some(decoded)
}
