use url::Url;

use crate::span::Span;

/// A recognized entity occurrence inside the scanned text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntitySpan {
    pub span: Span,
    pub kind: EntityKind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntityKind {
    Url(UrlPayload),
    Mention(MentionPayload),
    Hashtag(HashtagPayload),
}

impl EntitySpan {
    pub fn is_url(&self) -> bool {
        matches!(self.kind, EntityKind::Url(_))
    }
}

/// A matched link. The display parts keep the text exactly as written;
/// `href` differs only in its ASCII-compatible host and percent-encoded
/// non-ASCII path bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UrlPayload {
    /// Scheme as written, including `://`.
    pub scheme: String,
    /// Host (and port, if any) as written.
    pub host: String,
    /// Path, query and fragment as written.
    pub rest: String,
    pub(crate) href: String,
    pub(crate) parsed: Url,
}

impl UrlPayload {
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Host in ASCII-compatible encoding.
    pub fn ascii_host(&self) -> &str {
        self.parsed.host_str().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.parsed.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.parsed.query()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MentionPayload {
    pub username: String,
    /// `None` means the mention targets a local account.
    pub domain: Option<String>,
}

impl MentionPayload {
    pub fn acct(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{}@{}", self.username, domain),
            None => self.username.clone(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HashtagPayload {
    pub name: String,
}
