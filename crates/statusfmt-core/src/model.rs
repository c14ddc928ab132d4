use crate::options::FormatterOptions;

/// Account record as returned by the account directory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    pub username: String,
    /// `None` for accounts hosted on this instance.
    pub domain: Option<String>,
    pub display_name: String,
    /// Profile bio. Plain text for local accounts, HTML for remote ones.
    pub note: String,
    /// Canonical profile URL when known.
    pub url: Option<String>,
}

impl Account {
    pub fn local(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn remote(username: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            domain: Some(domain.into()),
            ..Default::default()
        }
    }

    pub fn is_local(&self) -> bool {
        self.domain.is_none()
    }

    pub fn acct(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{}@{}", self.username, domain),
            None => self.username.clone(),
        }
    }

    pub fn profile_url(&self, options: &FormatterOptions) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        match &self.domain {
            Some(domain) => format!("https://{}/@{}", domain, self.username),
            None => options.local_profile_url(&self.username),
        }
    }
}

/// Custom emoji already mapped to an image by the emoji collaborator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustomEmoji {
    pub shortcode: String,
    pub url: String,
}

/// A message to render. `text` is plain text for local statuses and HTML
/// for statuses received over federation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Status {
    pub text: String,
    pub local: bool,
    pub account: Account,
    pub reblog: Option<Box<Status>>,
    pub spoiler_text: String,
    pub emojis: Vec<CustomEmoji>,
}

impl Status {
    pub fn local(account: Account, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            local: true,
            account,
            ..Default::default()
        }
    }

    pub fn remote(account: Account, html: impl Into<String>) -> Self {
        Self {
            text: html.into(),
            local: false,
            account,
            ..Default::default()
        }
    }

    pub fn reblog_of(account: Account, original: Status) -> Self {
        Self {
            local: true,
            account,
            reblog: Some(Box::new(original)),
            ..Default::default()
        }
    }
}
