use std::collections::{HashMap, HashSet};

use ammonia::Builder;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::CollaboratorError;
use crate::markup::text_nodes;
use crate::span::Span;

/// Markup cleaned by a [`Sanitizer`], with the offsets of its text nodes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SanitizedHtml {
    pub html: String,
    pub text_nodes: Vec<Span>,
}

impl SanitizedHtml {
    /// Wraps sanitizer output, locating its text nodes.
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        let text_nodes = text_nodes(&html);
        Self { html, text_nodes }
    }
}

/// Strips disallowed tags and attributes from remote markup.
pub trait Sanitizer {
    fn sanitize(&self, raw_html: &str) -> Result<SanitizedHtml, CollaboratorError>;
}

impl<T: Sanitizer + ?Sized> Sanitizer for &T {
    fn sanitize(&self, raw_html: &str) -> Result<SanitizedHtml, CollaboratorError> {
        (**self).sanitize(raw_html)
    }
}

/// The restricted allowlist applied to statuses received over federation:
/// paragraphs, line breaks, spans and links, nothing executable.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrictSanitizer;

static STRICT: Lazy<Builder<'static>> = Lazy::new(|| {
    let tags: HashSet<&'static str> = ["a", "br", "p", "span"].into_iter().collect();

    // `rel` and `target` are forced below, never taken from the input.
    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href", "class"].into_iter().collect());
    tag_attributes.insert("span", ["class"].into_iter().collect());

    let url_schemes: HashSet<&'static str> = ["http", "https"].into_iter().collect();

    let mut builder = Builder::default();
    builder
        .tags(tags)
        .generic_attributes(HashSet::new())
        .tag_attributes(tag_attributes)
        .url_schemes(url_schemes)
        .link_rel(Some("nofollow noopener"))
        .set_tag_attribute_value("a", "target", "_blank");
    builder
});

impl Sanitizer for StrictSanitizer {
    fn sanitize(&self, raw_html: &str) -> Result<SanitizedHtml, CollaboratorError> {
        let html = STRICT.clean(raw_html).to_string();
        debug!(
            input_len = raw_html.len(),
            output_len = html.len(),
            "sanitized remote markup"
        );
        Ok(SanitizedHtml::from_html(html))
    }
}
