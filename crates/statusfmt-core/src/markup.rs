use crate::span::Span;

/// One piece of already-sanitized markup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Node<'a> {
    Tag(Tag<'a>),
    Comment(Span),
    Text(Span),
}

impl Node<'_> {
    pub fn span(&self) -> Span {
        match self {
            Node::Tag(tag) => tag.span,
            Node::Comment(span) | Node::Text(span) => *span,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Tag<'a> {
    pub name: &'a str,
    pub closing: bool,
    pub span: Span,
}

impl Tag<'_> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Splits serialized markup into tags and text runs.
///
/// This is not an HTML parser. It relies on the input coming out of a
/// sanitizer, where every `<` in text is escaped and attribute values are
/// quoted. A `>` inside a quoted attribute value does not end the tag.
pub(crate) fn nodes(html: &str) -> Vec<Node<'_>> {
    let bytes = html.as_bytes();
    let mut out = Vec::new();
    let mut text_start = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }
        let Some((node, end)) = markup_at(html, pos) else {
            pos += 1;
            continue;
        };
        if text_start < pos {
            out.push(Node::Text(Span {
                start: text_start,
                end: pos,
            }));
        }
        out.push(node);
        pos = end;
        text_start = end;
    }
    if text_start < bytes.len() {
        out.push(Node::Text(Span {
            start: text_start,
            end: bytes.len(),
        }));
    }
    out
}

fn markup_at(html: &str, start: usize) -> Option<(Node<'_>, usize)> {
    let bytes = html.as_bytes();
    let rest = &html[start..];
    if rest.starts_with("<!--") {
        let end = rest[4..]
            .find("-->")
            .map_or(html.len(), |idx| start + 4 + idx + 3);
        return Some((Node::Comment(Span { start, end }), end));
    }

    let mut name_start = start + 1;
    let closing = bytes.get(name_start) == Some(&b'/');
    if closing {
        name_start += 1;
    }
    let name_len = bytes[name_start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }

    let mut quote: Option<u8> = None;
    let mut idx = name_start + name_len;
    while idx < bytes.len() {
        let byte = bytes[idx];
        match quote {
            Some(open) if byte == open => quote = None,
            Some(_) => {}
            None if byte == b'"' || byte == b'\'' => quote = Some(byte),
            None if byte == b'>' => {
                let end = idx + 1;
                let tag = Tag {
                    name: &html[name_start..name_start + name_len],
                    closing,
                    span: Span { start, end },
                };
                return Some((Node::Tag(tag), end));
            }
            None => {}
        }
        idx += 1;
    }
    None
}

/// Text node spans of `html`, in document order.
pub(crate) fn text_nodes(html: &str) -> Vec<Span> {
    nodes(html)
        .into_iter()
        .filter_map(|node| match node {
            Node::Text(span) => Some(span),
            _ => None,
        })
        .collect()
}
