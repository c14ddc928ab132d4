use tracing::{debug, trace};
use url::Url;

use crate::entity::{EntityKind, EntitySpan, HashtagPayload, MentionPayload, UrlPayload};
use crate::escape::percent_encode_unsafe;
use crate::span::Span;

const SCHEMES: [&[u8]; 2] = [b"https://", b"http://"];

/// Finds every URL, mention and hashtag in `text`.
///
/// The result is ordered by start offset and pairwise non-overlapping. URLs
/// are found first; mention and hashtag candidates never reach into a URL,
/// so `?x=@alice` inside a query string stays part of the link.
pub fn scan(text: &str) -> Vec<EntitySpan> {
    let mut entities = scan_urls(text);
    let claimed: Vec<Span> = entities.iter().map(|entity| entity.span).collect();
    entities.extend(scan_mentions_and_hashtags(text, &claimed));
    entities.sort_by_key(|entity| entity.span.start);
    entities
}

/// Finds URLs only. Used where mentions and hashtags are not linked.
pub fn scan_urls(text: &str) -> Vec<EntitySpan> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(start) = find_scheme(text, pos) {
        match match_url(text, start) {
            Some(entity) => {
                pos = entity.span.end;
                out.push(entity);
            }
            // Schemes start with an ASCII byte, so `start + 1` is a char boundary.
            None => pos = start + 1,
        }
    }
    out
}

fn find_scheme(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    (from..bytes.len()).find(|&idx| scheme_len(&bytes[idx..]).is_some())
}

fn scheme_len(bytes: &[u8]) -> Option<usize> {
    SCHEMES
        .iter()
        .find(|scheme| starts_with_ignore_ascii_case(bytes, scheme))
        .map(|scheme| scheme.len())
}

fn starts_with_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn match_url(text: &str, start: usize) -> Option<EntitySpan> {
    let scheme_end = start + scheme_len(&text.as_bytes()[start..])?;
    let host_end = scan_host(text, scheme_end);
    let host = &text[scheme_end..host_end];
    if !is_valid_host(host) {
        trace!(host, "url candidate without a usable host");
        return None;
    }

    let authority_end = scan_port(text, host_end);
    let mut end = authority_end;
    if matches!(text[end..].chars().next(), Some('/' | '?' | '#')) {
        end = scan_path(text, end);
        end = trim_trailing(text, authority_end, end);
    }

    let raw = &text[start..end];
    let parsed = match Url::parse(raw) {
        Ok(parsed) if parsed.host_str().is_some() => parsed,
        Ok(_) => return None,
        Err(err) => {
            debug!(candidate = raw, error = %err, "rejected url candidate");
            return None;
        }
    };

    let scheme = &text[start..scheme_end];
    let port = &text[host_end..authority_end];
    let rest = &text[authority_end..end];
    let href = build_href(scheme, parsed.host_str().unwrap_or_default(), port, rest);

    Some(EntitySpan {
        span: Span { start, end },
        kind: EntityKind::Url(UrlPayload {
            scheme: scheme.to_string(),
            host: text[scheme_end..authority_end].to_string(),
            rest: rest.to_string(),
            href,
            parsed,
        }),
    })
}

/// Link target for a match: scheme, port, path and query as written, host in
/// its ASCII-compatible form. An empty path becomes `/`.
fn build_href(scheme: &str, ascii_host: &str, port: &str, rest: &str) -> String {
    let mut href =
        String::with_capacity(scheme.len() + ascii_host.len() + port.len() + rest.len() + 1);
    href.push_str(scheme);
    href.push_str(ascii_host);
    href.push_str(port);
    if !rest.starts_with('/') {
        href.push('/');
    }
    href.push_str(&percent_encode_unsafe(rest));
    href
}

fn scan_host(text: &str, from: usize) -> usize {
    let end = text[from..]
        .char_indices()
        .find(|(_, ch)| !is_host_char(*ch))
        .map(|(idx, _)| from + idx)
        .unwrap_or(text.len());
    let bytes = text.as_bytes();
    let mut trimmed = end;
    while trimmed > from && matches!(bytes[trimmed - 1], b'.' | b'-') {
        trimmed -= 1;
    }
    trimmed
}

fn is_host_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '.'
}

fn is_valid_host(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    if labels
        .iter()
        .any(|label| label.is_empty() || label.starts_with('-') || label.ends_with('-'))
    {
        return false;
    }
    let all_digits = |label: &&str| label.bytes().all(|b| b.is_ascii_digit());
    match labels.last() {
        // A numeric top-level label is only valid as part of a dotted quad.
        Some(tld) if all_digits(tld) => labels.len() == 4 && labels.iter().all(all_digits),
        _ => true,
    }
}

fn scan_port(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    if bytes.get(from) != Some(&b':') {
        return from;
    }
    let digits = bytes[from + 1..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if (1..=5).contains(&digits) {
        from + 1 + digits
    } else {
        from
    }
}

fn scan_path(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, ch)| !is_path_char(*ch))
        .map(|(idx, _)| from + idx)
        .unwrap_or(text.len())
}

fn is_path_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !ch.is_control()
        && !matches!(ch, '<' | '>' | '"' | '`' | '{' | '}' | '|' | '\\' | '^')
}

/// Drops sentence punctuation from the end of a path. A closing bracket
/// stays only when it closes an opening one earlier in the path.
fn trim_trailing(text: &str, floor: usize, end: usize) -> usize {
    let path = &text[floor..end];
    let mut parens = 0usize;
    let mut brackets = 0usize;
    // Matching depends only on what precedes a character, so trimming the
    // tail never changes the verdict for what remains.
    let marked: Vec<(usize, char, bool)> = path
        .char_indices()
        .map(|(idx, ch)| {
            let closes = match ch {
                '(' => {
                    parens += 1;
                    false
                }
                '[' => {
                    brackets += 1;
                    false
                }
                ')' if parens > 0 => {
                    parens -= 1;
                    true
                }
                ']' if brackets > 0 => {
                    brackets -= 1;
                    true
                }
                _ => false,
            };
            (idx, ch, closes)
        })
        .collect();

    let mut keep = path.len();
    for &(idx, ch, closes) in marked.iter().rev() {
        let trim = match ch {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | '*' => true,
            ')' | ']' => !closes,
            _ => false,
        };
        if !trim {
            break;
        }
        keep = idx;
    }
    floor + keep
}

fn scan_mentions_and_hashtags(text: &str, claimed: &[Span]) -> Vec<EntitySpan> {
    let mut out = Vec::new();
    let mut claimed = claimed.iter().peekable();
    let mut prev: Option<char> = None;
    let mut pos = 0usize;

    while pos < text.len() {
        while claimed.next_if(|span| span.end <= pos).is_some() {}
        if let Some(span) = claimed.peek() {
            if span.start <= pos {
                prev = text[..span.end].chars().next_back();
                pos = span.end;
                continue;
            }
        }
        let limit = claimed.peek().map_or(text.len(), |span| span.start);

        let Some(ch) = text[pos..].chars().next() else {
            break;
        };
        let found = match ch {
            '@' if prev.is_none_or(|c| !is_word_char(c) && c != '/') => {
                match_mention(text, pos, limit)
            }
            '#' if prev.is_none_or(|c| !is_word_char(c) && c != '/' && c != ')') => {
                match_hashtag(text, pos, limit)
            }
            _ => None,
        };

        match found {
            Some(entity) => {
                pos = entity.span.end;
                prev = text[..pos].chars().next_back();
                out.push(entity);
            }
            None => {
                prev = Some(ch);
                pos += ch.len_utf8();
            }
        }
    }

    out
}

fn match_mention(text: &str, at: usize, limit: usize) -> Option<EntitySpan> {
    let bytes = text.as_bytes();
    let name_start = at + 1;
    let mut end = name_start;
    while end < limit && is_username_byte(bytes[end]) {
        end += 1;
    }
    if end == name_start {
        return None;
    }
    let username = text[name_start..end].to_string();

    let mut domain = None;
    if end < limit && bytes[end] == b'@' {
        let domain_start = end + 1;
        let mut domain_end = domain_start;
        while domain_end < limit && is_domain_byte(bytes[domain_end]) {
            domain_end += 1;
        }
        while domain_end > domain_start && matches!(bytes[domain_end - 1], b'.' | b'-') {
            domain_end -= 1;
        }
        if domain_end > domain_start && bytes[domain_start].is_ascii_alphanumeric() {
            domain = Some(text[domain_start..domain_end].to_string());
            end = domain_end;
        }
    }

    Some(EntitySpan {
        span: Span { start: at, end },
        kind: EntityKind::Mention(MentionPayload { username, domain }),
    })
}

fn match_hashtag(text: &str, at: usize, limit: usize) -> Option<EntitySpan> {
    let name_start = at + 1;
    let end = text[name_start..limit]
        .char_indices()
        .find(|(_, ch)| !is_word_char(*ch))
        .map_or(limit, |(idx, _)| name_start + idx);
    let name = &text[name_start..end];
    if !name.chars().any(|ch| ch.is_alphabetic() || ch == '_') {
        return None;
    }
    Some(EntitySpan {
        span: Span { start: at, end },
        kind: EntityKind::Hashtag(HashtagPayload {
            name: name.to_string(),
        }),
    })
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_username_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_domain_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'.' || byte == b'-'
}
