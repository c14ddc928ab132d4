use html_escape::decode_html_entities;
use tracing::debug;

use crate::assemble::{RenderContext, assemble, assemble_inline, wrap_paragraph};
use crate::error::FormatError;
use crate::markup::{Node, nodes};
use crate::model::Status;
use crate::sanitize::{SanitizedHtml, Sanitizer};
use crate::span::Span;

/// How far a status body can be trusted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrustMode {
    /// Locally authored text: everything is escaped.
    PlainText,
    /// Received markup: sanitized first, then only text nodes are processed.
    PreSanitized,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Prepared<'a> {
    pub text: &'a str,
    pub trust: TrustMode,
}

pub fn prepare(status: &Status) -> Prepared<'_> {
    let trust = if status.local {
        TrustMode::PlainText
    } else {
        TrustMode::PreSanitized
    };
    debug!(local = status.local, ?trust, "prepared status body");
    Prepared {
        text: &status.text,
        trust,
    }
}

/// Renders a body according to its trust mode.
pub(crate) fn render_body(
    prepared: Prepared<'_>,
    sanitizer: &dyn Sanitizer,
    context: &RenderContext<'_>,
) -> Result<String, FormatError> {
    match prepared.trust {
        TrustMode::PlainText => assemble(prepared.text, context),
        TrustMode::PreSanitized => {
            let clean = sanitizer
                .sanitize(prepared.text)
                .map_err(FormatError::Sanitize)?;
            render_sanitized(&clean, context)
        }
    }
}

/// Linkifies the text nodes of sanitized markup and leaves the markup
/// itself untouched. Text already inside a link is copied verbatim.
pub(crate) fn render_sanitized(
    clean: &SanitizedHtml,
    context: &RenderContext<'_>,
) -> Result<String, FormatError> {
    let html = clean.html.as_str();
    let mut out = String::with_capacity(html.len());
    let mut state = MarkupState::default();
    let mut cursor = 0usize;

    for span in &clean.text_nodes {
        if span.start < cursor || span.end > html.len() {
            continue;
        }
        let markup = &html[cursor..span.start];
        state.observe(markup);
        out.push_str(markup);

        let raw = &html[span.range()];
        if state.anchor_depth > 0 {
            out.push_str(raw);
        } else {
            let text = decode_html_entities(raw);
            let spans = context.scope.scan(&text);
            out.push_str(&assemble_inline(&text, &spans, context, false)?);
        }
        cursor = span.end;
    }
    let markup = &html[cursor..];
    state.observe(markup);
    out.push_str(markup);

    if state.has_paragraph {
        Ok(wrap_loose_runs(&out))
    } else {
        Ok(wrap_paragraph(&out))
    }
}

/// Puts content sitting between paragraphs into paragraphs of its own.
/// Runs without any non-whitespace text are left alone.
fn wrap_loose_runs(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + 16);
    let mut depth = 0usize;
    let mut run: Option<Span> = None;
    let mut run_has_content = false;

    for node in nodes(html) {
        let span = node.span();
        let paragraph = match node {
            Node::Tag(tag) if tag.is("p") => Some(tag),
            _ => None,
        };
        if depth == 0 && paragraph.is_none() {
            run = Some(run.map_or(span, |run| Span {
                start: run.start,
                end: span.end,
            }));
            if let Node::Text(text) = node {
                run_has_content |= !html[text.range()].trim().is_empty();
            }
            continue;
        }

        flush_run(&mut out, html, run.take(), run_has_content);
        run_has_content = false;
        if let Some(tag) = paragraph {
            depth = if tag.closing {
                depth.saturating_sub(1)
            } else {
                depth + 1
            };
        }
        out.push_str(&html[span.range()]);
    }
    flush_run(&mut out, html, run, run_has_content);
    out
}

fn flush_run(out: &mut String, html: &str, run: Option<Span>, has_content: bool) {
    let Some(run) = run else {
        return;
    };
    let markup = &html[run.range()];
    if has_content {
        out.push_str(&wrap_paragraph(markup));
    } else {
        out.push_str(markup);
    }
}

#[derive(Default)]
struct MarkupState {
    anchor_depth: usize,
    has_paragraph: bool,
}

impl MarkupState {
    fn observe(&mut self, markup: &str) {
        for node in nodes(markup) {
            let Node::Tag(tag) = node else {
                continue;
            };
            if tag.is("a") {
                self.anchor_depth = if tag.closing {
                    self.anchor_depth.saturating_sub(1)
                } else {
                    self.anchor_depth + 1
                };
            } else if tag.is("p") && !tag.closing {
                self.has_paragraph = true;
            }
        }
    }
}

/// Text content of sanitized markup: `<br>` becomes a newline and
/// consecutive paragraphs are separated by a blank line.
pub(crate) fn sanitized_plain_text(clean: &SanitizedHtml) -> String {
    let html = clean.html.as_str();
    let mut out = String::with_capacity(html.len());
    let mut paragraph_closed = false;
    for node in nodes(html) {
        match node {
            Node::Tag(tag) if tag.is("br") => out.push('\n'),
            Node::Tag(tag) if tag.is("p") && tag.closing => paragraph_closed = true,
            Node::Text(span) => {
                if paragraph_closed && !out.is_empty() {
                    out.push_str("\n\n");
                }
                paragraph_closed = false;
                out.push_str(&decode_html_entities(&html[span.range()]));
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{TrustMode, prepare, render_sanitized, sanitized_plain_text};
    use crate::assemble::{EntityScope, RenderContext};
    use crate::directory::AccountDirectory;
    use crate::error::FormatError;
    use crate::model::{Account, Status};
    use crate::options::FormatterOptions;
    use crate::sanitize::SanitizedHtml;

    fn render(html: &str) -> Result<String, FormatError> {
        let options = FormatterOptions::default();
        let directory = AccountDirectory::new();
        let context = RenderContext {
            options: &options,
            resolver: &directory,
            emojis: &[],
            scope: EntityScope::All,
        };
        render_sanitized(&SanitizedHtml::from_html(html), &context)
    }

    #[test]
    fn locality_picks_trust_mode() {
        let local = Status::local(Account::local("alice"), "hi");
        let remote = Status::remote(Account::remote("bob", "remote.example"), "<p>hi</p>");
        assert_eq!(prepare(&local).trust, TrustMode::PlainText);
        assert_eq!(prepare(&remote).trust, TrustMode::PreSanitized);
        assert_eq!(prepare(&remote).text, "<p>hi</p>");
    }

    #[test]
    fn plain_text_keeps_breaks_and_paragraphs() {
        let clean = SanitizedHtml::from_html("<p>one<br>two &amp; a half</p><p>three</p>");
        assert_eq!(sanitized_plain_text(&clean), "one\ntwo & a half\n\nthree");
    }

    #[test]
    fn text_outside_paragraphs_is_wrapped() -> Result<(), FormatError> {
        assert_eq!(render("lead<p>para</p>")?, "<p>lead</p><p>para</p>");
        assert_eq!(
            render("<p>one</p>tail <br>end")?,
            "<p>one</p><p>tail <br>end</p>"
        );
        Ok(())
    }

    #[test]
    fn whitespace_between_paragraphs_is_kept_bare() -> Result<(), FormatError> {
        assert_eq!(render("<p>one</p>\n<p>two</p>")?, "<p>one</p>\n<p>two</p>");
        assert_eq!(render("plain")?, "<p>plain</p>");
        Ok(())
    }
}
