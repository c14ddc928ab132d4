use crate::escape::{escape_html, escape_url_attr};
use crate::model::CustomEmoji;

/// Appends `escaped` to `out`, replacing known `:shortcode:` occurrences
/// with their image.
///
/// `escaped` must already be HTML-escaped text; shortcodes only contain
/// `[A-Za-z0-9_]`, which escaping leaves untouched.
pub(crate) fn push_emojified(out: &mut String, escaped: &str, emojis: &[CustomEmoji]) {
    if emojis.is_empty() {
        out.push_str(escaped);
        return;
    }

    let bytes = escaped.as_bytes();
    let mut copied = 0usize;
    let mut idx = 0usize;
    while idx < bytes.len() {
        if bytes[idx] == b':' && !blocks_shortcode(escaped[..idx].chars().next_back()) {
            let code_start = idx + 1;
            let code_end = code_start
                + bytes[code_start..]
                    .iter()
                    .take_while(|b| is_shortcode_byte(**b))
                    .count();
            let closed = bytes.get(code_end) == Some(&b':')
                && code_end - code_start >= 2
                && !blocks_shortcode(escaped[code_end + 1..].chars().next());
            if closed {
                let shortcode = &escaped[code_start..code_end];
                if let Some(emoji) = emojis.iter().find(|emoji| emoji.shortcode == shortcode) {
                    out.push_str(&escaped[copied..idx]);
                    push_emoji_image(out, emoji);
                    idx = code_end + 1;
                    copied = idx;
                    continue;
                }
            }
        }
        idx += 1;
    }
    out.push_str(&escaped[copied..]);
}

pub(crate) fn emojify(escaped: &str, emojis: &[CustomEmoji]) -> String {
    let mut out = String::with_capacity(escaped.len());
    push_emojified(&mut out, escaped, emojis);
    out
}

fn push_emoji_image(out: &mut String, emoji: &CustomEmoji) {
    let code = escape_html(&emoji.shortcode);
    out.push_str("<img draggable=\"false\" class=\"emojione\" alt=\":");
    out.push_str(&code);
    out.push_str(":\" title=\":");
    out.push_str(&code);
    out.push_str(":\" src=\"");
    out.push_str(&escape_url_attr(&emoji.url));
    out.push_str("\" />");
}

fn blocks_shortcode(neighbour: Option<char>) -> bool {
    neighbour.is_some_and(|ch| ch.is_alphanumeric() || ch == ':')
}

fn is_shortcode_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
