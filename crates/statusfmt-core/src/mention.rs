use tracing::trace;

use crate::directory::AccountResolver;
use crate::entity::{HashtagPayload, MentionPayload};
use crate::error::FormatError;
use crate::escape::{escape_html, escape_url_attr};
use crate::model::Account;
use crate::options::FormatterOptions;

/// Resolves a mention and renders its profile link.
///
/// `Ok(None)` when the account is unknown; the caller then emits the
/// matched text as plain escaped text.
pub fn render_mention(
    payload: &MentionPayload,
    resolver: &dyn AccountResolver,
    options: &FormatterOptions,
) -> Result<Option<String>, FormatError> {
    let domain = options.normalize_domain(payload.domain.as_deref());
    let account = resolver
        .resolve(&payload.username, domain)
        .map_err(|source| FormatError::AccountLookup {
            acct: payload.acct(),
            source,
        })?;
    match account {
        Some(account) => Ok(Some(render_account_mention(&account, options))),
        None => {
            trace!(acct = %payload.acct(), "mention did not resolve");
            Ok(None)
        }
    }
}

pub fn render_account_mention(account: &Account, options: &FormatterOptions) -> String {
    format!(
        "<span class=\"h-card\"><a href=\"{}\" class=\"u-url mention\">@<span>{}</span></a></span>",
        escape_url_attr(&account.profile_url(options)),
        escape_html(&account.username)
    )
}

pub fn render_hashtag(payload: &HashtagPayload, options: &FormatterOptions) -> String {
    format!(
        "<a href=\"{}\" class=\"mention hashtag\" rel=\"tag\">#<span>{}</span></a>",
        escape_url_attr(&options.tag_url(&payload.name)),
        escape_html(&payload.name)
    )
}

#[cfg(test)]
mod tests {
    use super::{render_hashtag, render_mention};
    use crate::directory::{AccountDirectory, AccountResolver};
    use crate::entity::{HashtagPayload, MentionPayload};
    use crate::error::{CollaboratorError, FormatError};
    use crate::model::Account;
    use crate::options::FormatterOptions;

    fn options() -> FormatterOptions {
        FormatterOptions {
            local_domain: "cb6e6126.ngrok.io".to_string(),
            ..Default::default()
        }
    }

    fn mention(username: &str, domain: Option<&str>) -> MentionPayload {
        MentionPayload {
            username: username.to_string(),
            domain: domain.map(str::to_string),
        }
    }

    #[test]
    fn local_mention_links_profile() -> Result<(), FormatError> {
        let directory = AccountDirectory::new().with(Account::local("alice"));
        let html = render_mention(&mention("Alice", None), &directory, &options())?;
        assert_eq!(
            html.as_deref(),
            Some(
                "<span class=\"h-card\"><a href=\"https://cb6e6126.ngrok.io/@alice\" \
                 class=\"u-url mention\">@<span>alice</span></a></span>"
            )
        );
        Ok(())
    }

    #[test]
    fn own_domain_resolves_locally() -> Result<(), FormatError> {
        let directory = AccountDirectory::new().with(Account::local("alice"));
        let html = render_mention(
            &mention("alice", Some("CB6E6126.ngrok.io")),
            &directory,
            &options(),
        )?;
        assert!(html.is_some());
        Ok(())
    }

    #[test]
    fn unknown_remote_mention_is_not_linked() -> Result<(), FormatError> {
        let directory = AccountDirectory::new().with(Account::local("alice"));
        let html = render_mention(&mention("alice", Some("example.com")), &directory, &options())?;
        assert_eq!(html, None);
        Ok(())
    }

    struct Unavailable;

    impl AccountResolver for Unavailable {
        fn resolve(
            &self,
            _username: &str,
            _domain: Option<&str>,
        ) -> Result<Option<Account>, CollaboratorError> {
            Err("directory offline".into())
        }
    }

    #[test]
    fn directory_failure_is_surfaced() {
        let err = render_mention(&mention("bob", Some("remote.example")), &Unavailable, &options())
            .unwrap_err();
        assert_eq!(err.to_string(), "account lookup failed for @bob@remote.example");
    }

    #[test]
    fn hashtag_links_lowercase_tag() {
        let html = render_hashtag(
            &HashtagPayload {
                name: "HashTag".to_string(),
            },
            &options(),
        );
        assert_eq!(
            html,
            "<a href=\"https://cb6e6126.ngrok.io/tags/hashtag\" class=\"mention hashtag\" \
             rel=\"tag\">#<span>HashTag</span></a>"
        );
    }
}
