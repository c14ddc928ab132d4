/// Replaces every `&`, `<`, `>`, `"` and `'` with its named reference.
///
/// Safe for both text content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}

/// Percent-encodes bytes that may not appear raw in an `href`, then escapes
/// the result for use inside a double-quoted attribute.
pub(crate) fn escape_url_attr(text: &str) -> String {
    escape_html(&percent_encode_unsafe(text))
}

/// Percent-encodes spaces, backslashes, control and non-ASCII bytes. Every
/// other character, including reserved ones, is left as written.
pub(crate) fn percent_encode_unsafe(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for &byte in text.as_bytes() {
        match byte {
            b' ' => encoded.push_str("%20"),
            b'\\' => encoded.push_str("%5C"),
            0x00..=0x1F | 0x7F..=0xFF => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
            _ => encoded.push(byte as char),
        }
    }
    encoded
}
