//! Keyword records shared by the providers, the scorer and the planning
//! stages.
//!
//! Providers emit [`KeywordRecord`]s; the scorer turns them into
//! [`ScoredKeyword`]s, which is also the shape API callers send back for
//! filtering, grouping and theming.

mod brand;
mod types;

pub use brand::{contains_phrase, contains_term, hostname_tokens, is_brand_label, words};
pub use types::*;
