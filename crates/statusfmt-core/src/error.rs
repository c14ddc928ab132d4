use thiserror::Error;

/// Failure reported by an external collaborator (account directory, sanitizer).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Infrastructure failures surfaced by a formatting call.
///
/// Malformed input is never an error; it degrades to escaped text.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("account lookup failed for @{acct}")]
    AccountLookup {
        acct: String,
        #[source]
        source: CollaboratorError,
    },
    #[error("html sanitizer failed")]
    Sanitize(#[source] CollaboratorError),
}
