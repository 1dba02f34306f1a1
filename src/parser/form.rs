//! `application/x-www-form-urlencoded` decoding.

use std::collections::HashMap;

/// Decode a form-encoded component: `+` becomes a space and `%XX` escapes
/// become the byte they name. Malformed escapes are kept as-is.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (bytes.get(i + 1).and_then(hex_value), bytes.get(i + 2).and_then(hex_value)) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: &u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Parse a form-encoded string into a map of decoded fields.
///
/// Pairs are separated by `&`. A key without `=` maps to an empty value, and
/// the first occurrence of a repeated key wins.
pub fn parse_form(input: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for pair in input.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        fields
            .entry(percent_decode(key))
            .or_insert_with(|| percent_decode(value));
    }

    fields
}
