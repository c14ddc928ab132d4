use crate::adapter::{Prepared, TrustMode, prepare, render_body, render_sanitized, sanitized_plain_text};
use crate::assemble::{EntityScope, RenderContext, assemble};
use crate::directory::AccountResolver;
use crate::emoji::emojify;
use crate::error::FormatError;
use crate::escape::escape_html;
use crate::mention::render_account_mention;
use crate::model::{Account, CustomEmoji, Status};
use crate::options::FormatterOptions;
use crate::sanitize::{Sanitizer, StrictSanitizer};

/// Turns status bodies into display HTML.
///
/// Holds no per-call state; a single formatter can serve any number of
/// threads as long as its collaborators can.
#[derive(Clone, Debug)]
pub struct Formatter<R, S = StrictSanitizer> {
    options: FormatterOptions,
    resolver: R,
    sanitizer: S,
}

impl<R: AccountResolver> Formatter<R, StrictSanitizer> {
    pub fn with_resolver(options: FormatterOptions, resolver: R) -> Self {
        Self::new(options, resolver, StrictSanitizer)
    }
}

impl<R: AccountResolver, S: Sanitizer> Formatter<R, S> {
    pub fn new(options: FormatterOptions, resolver: R, sanitizer: S) -> Self {
        Self {
            options,
            resolver,
            sanitizer,
        }
    }

    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    /// Renders a status, trusting local text as plain text and sanitizing
    /// remote markup. A reblog renders the original, credited to its author.
    pub fn format(&self, status: &Status) -> Result<String, FormatError> {
        self.format_with(status, None)
    }

    /// Renders a status whose body is markup, whatever its origin.
    pub fn reformat(&self, status: &Status) -> Result<String, FormatError> {
        self.format_with(status, Some(TrustMode::PreSanitized))
    }

    /// Text of a status with all markup removed.
    pub fn plaintext(&self, status: &Status) -> Result<String, FormatError> {
        let status = status.reblog.as_deref().unwrap_or(status);
        if status.local {
            return Ok(status.text.clone());
        }
        let clean = self
            .sanitizer
            .sanitize(&status.text)
            .map_err(FormatError::Sanitize)?;
        Ok(sanitized_plain_text(&clean))
    }

    pub fn format_spoiler(&self, status: &Status) -> String {
        emojify(&escape_html(&status.spoiler_text), &status.emojis)
    }

    pub fn format_display_name(&self, account: &Account, emojis: &[CustomEmoji]) -> String {
        let name = if account.display_name.trim().is_empty() {
            &account.username
        } else {
            &account.display_name
        };
        emojify(&escape_html(name), emojis)
    }

    /// Renders a profile bio. Local bios only get their URLs linked.
    pub fn simplified_format(&self, account: &Account) -> Result<String, FormatError> {
        if account.is_local() {
            let context = self.context(&[], EntityScope::UrlsOnly);
            return assemble(&account.note, &context);
        }
        let clean = self
            .sanitizer
            .sanitize(&account.note)
            .map_err(FormatError::Sanitize)?;
        render_sanitized(&clean, &self.context(&[], EntityScope::All))
    }

    fn format_with(&self, status: &Status, force: Option<TrustMode>) -> Result<String, FormatError> {
        if let Some(original) = status.reblog.as_deref() {
            let inner = self.format_with(original, force)?;
            return Ok(self.credit(&original.account, inner));
        }

        let prepared = prepare(status);
        let prepared = Prepared {
            trust: force.unwrap_or(prepared.trust),
            ..prepared
        };
        let context = self.context(&status.emojis, EntityScope::All);
        render_body(prepared, &self.sanitizer, &context)
    }

    /// Prefixes rendered content with `RT @author`, inside its first
    /// paragraph when it opens with one.
    fn credit(&self, author: &Account, inner: String) -> String {
        let mention = render_account_mention(author, &self.options);
        match inner.strip_prefix("<p>") {
            Some(rest) if rest.starts_with(char::is_whitespace) => {
                format!("<p>RT {}{}", mention, rest)
            }
            Some(rest) => format!("<p>RT {} {}", mention, rest),
            None => format!("<p>RT {}</p>{}", mention, inner),
        }
    }

    fn context<'a>(&'a self, emojis: &'a [CustomEmoji], scope: EntityScope) -> RenderContext<'a> {
        RenderContext {
            options: &self.options,
            resolver: &self.resolver,
            emojis,
            scope,
        }
    }
}
