mod adapter;
mod assemble;
mod directory;
mod emoji;
mod entity;
mod error;
mod escape;
mod formatter;
mod link;
mod markup;
mod mention;
mod model;
mod options;
mod sanitize;
mod scanner;
mod span;

pub use adapter::{Prepared, TrustMode, prepare};
pub use assemble::{EntityScope, RenderContext, assemble, assemble_inline};
pub use directory::{AccountDirectory, AccountResolver};
pub use entity::{EntityKind, EntitySpan, HashtagPayload, MentionPayload, UrlPayload};
pub use error::{CollaboratorError, FormatError};
pub use escape::escape_html;
pub use formatter::Formatter;
pub use link::render_link;
pub use mention::{render_account_mention, render_hashtag, render_mention};
pub use model::{Account, CustomEmoji, Status};
pub use options::FormatterOptions;
pub use sanitize::{SanitizedHtml, Sanitizer, StrictSanitizer};
pub use scanner::{scan, scan_urls};
pub use span::{Span, SpanError};
