use crate::entity::UrlPayload;
use crate::escape::{escape_html, push_escaped};

/// Renders a matched URL as an anchor.
///
/// The anchor text keeps every character of the link: the scheme (and a
/// leading `www.`) sits in an invisible span, up to `budget` characters
/// follow in the visible span, and the remainder goes into a trailing
/// invisible span.
pub fn render_link(payload: &UrlPayload, budget: usize) -> String {
    let (prefix, body) = display_parts(payload);
    let split = body
        .char_indices()
        .nth(budget)
        .map_or(body.len(), |(idx, _)| idx);
    let (visible, hidden) = body.split_at(split);
    let class = if hidden.is_empty() { "" } else { "ellipsis" };

    let mut out = String::new();
    out.push_str("<a href=\"");
    out.push_str(&escape_html(payload.href()));
    out.push_str("\" rel=\"nofollow noopener\" target=\"_blank\">");
    out.push_str("<span class=\"invisible\">");
    push_escaped(&mut out, &prefix);
    out.push_str("</span><span class=\"");
    out.push_str(class);
    out.push_str("\">");
    push_escaped(&mut out, visible);
    out.push_str("</span><span class=\"invisible\">");
    push_escaped(&mut out, hidden);
    out.push_str("</span></a>");
    out
}

fn display_parts(payload: &UrlPayload) -> (String, String) {
    let mut prefix = payload.scheme.clone();
    let mut host = payload.host.as_str();
    if host.len() > 4 && host.is_char_boundary(4) && host[..4].eq_ignore_ascii_case("www.") {
        prefix.push_str(&host[..4]);
        host = &host[4..];
    }

    let mut body = String::with_capacity(host.len() + payload.rest.len() + 1);
    body.push_str(host);
    if !payload.rest.starts_with('/') {
        body.push('/');
    }
    body.push_str(&payload.rest);
    (prefix, body)
}
