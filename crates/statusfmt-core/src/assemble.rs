use crate::directory::AccountResolver;
use crate::emoji::push_emojified;
use crate::entity::{EntityKind, EntitySpan};
use crate::error::FormatError;
use crate::escape::escape_html;
use crate::link::render_link;
use crate::mention::{render_hashtag, render_mention};
use crate::model::CustomEmoji;
use crate::options::FormatterOptions;
use crate::scanner::{scan, scan_urls};

/// Which entity kinds get linked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntityScope {
    All,
    UrlsOnly,
}

impl EntityScope {
    pub fn scan(self, text: &str) -> Vec<EntitySpan> {
        match self {
            EntityScope::All => scan(text),
            EntityScope::UrlsOnly => scan_urls(text),
        }
    }
}

/// Everything the assembler needs besides the text itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub options: &'a FormatterOptions,
    pub resolver: &'a dyn AccountResolver,
    pub emojis: &'a [CustomEmoji],
    pub scope: EntityScope,
}

/// Interleaves escaped text with rendered entities, without a paragraph
/// wrapper.
///
/// `spans` must be ordered and non-overlapping, as produced by the scanner.
/// Each character of `text` is escaped exactly once; entity markup is
/// emitted verbatim. With `line_breaks`, every `\n` (or `\r\n`) in the text
/// becomes `<br />`.
pub fn assemble_inline(
    text: &str,
    spans: &[EntitySpan],
    context: &RenderContext<'_>,
    line_breaks: bool,
) -> Result<String, FormatError> {
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut cursor = 0usize;

    for entity in spans {
        debug_assert!(entity.span.start >= cursor, "entity spans overlap");
        push_text(&mut out, &text[cursor..entity.span.start], context, line_breaks);
        let matched = &text[entity.span.range()];
        match &entity.kind {
            EntityKind::Url(payload) => {
                out.push_str(&render_link(payload, context.options.link_display_budget));
            }
            EntityKind::Mention(payload) => {
                match render_mention(payload, context.resolver, context.options)? {
                    Some(html) => out.push_str(&html),
                    None => push_text(&mut out, matched, context, line_breaks),
                }
            }
            EntityKind::Hashtag(payload) => {
                out.push_str(&render_hashtag(payload, context.options));
            }
        }
        cursor = entity.span.end;
    }
    push_text(&mut out, &text[cursor..], context, line_breaks);

    Ok(out)
}

/// Scans, assembles and wraps plain text in a single paragraph.
pub fn assemble(text: &str, context: &RenderContext<'_>) -> Result<String, FormatError> {
    let spans = context.scope.scan(text);
    let inline = assemble_inline(text, &spans, context, true)?;
    Ok(wrap_paragraph(&inline))
}

pub(crate) fn wrap_paragraph(inline: &str) -> String {
    format!("<p>{}</p>", inline)
}

fn push_text(out: &mut String, text: &str, context: &RenderContext<'_>, line_breaks: bool) {
    if text.is_empty() {
        return;
    }
    if !line_breaks {
        push_emojified(out, &escape_html(text), context.emojis);
        return;
    }
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push_str("<br />");
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        push_emojified(out, &escape_html(line), context.emojis);
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityScope, RenderContext, assemble};
    use crate::directory::AccountDirectory;
    use crate::error::FormatError;
    use crate::model::Account;
    use crate::options::FormatterOptions;

    fn render(text: &str, scope: EntityScope) -> Result<String, FormatError> {
        let options = FormatterOptions::default();
        let directory = AccountDirectory::new().with(Account::local("alice"));
        let context = RenderContext {
            options: &options,
            resolver: &directory,
            emojis: &[],
            scope,
        };
        assemble(text, &context)
    }

    #[test]
    fn gaps_are_escaped_and_wrapped() -> Result<(), FormatError> {
        assert_eq!(
            render("<b>bold</b> & done", EntityScope::All)?,
            "<p>&lt;b&gt;bold&lt;/b&gt; &amp; done</p>"
        );
        Ok(())
    }

    #[test]
    fn line_breaks_are_kept() -> Result<(), FormatError> {
        assert_eq!(
            render("one\r\ntwo\nthree", EntityScope::All)?,
            "<p>one<br />two<br />three</p>"
        );
        Ok(())
    }

    #[test]
    fn unresolved_mention_is_plain_text() -> Result<(), FormatError> {
        assert_eq!(render("hi @nobody", EntityScope::All)?, "<p>hi @nobody</p>");
        Ok(())
    }

    #[test]
    fn urls_only_scope_skips_mentions_and_tags() -> Result<(), FormatError> {
        let html = render("@alice #rust http://x.com", EntityScope::UrlsOnly)?;
        assert!(html.starts_with("<p>@alice #rust <a href=\"http://x.com/\""));
        Ok(())
    }

    #[test]
    fn empty_text_is_an_empty_paragraph() -> Result<(), FormatError> {
        assert_eq!(render("", EntityScope::All)?, "<p></p>");
        Ok(())
    }
}
