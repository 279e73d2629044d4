//! Campaign planning stages that run on scored keywords.
//!
//! - **Filter**: volume, competition, opportunity and brand predicates
//! - **Grouping**: intent-based ad groups with match types
//! - **Themes**: Performance-Max themes by lexical heuristics
//! - **Bids**: target CPA/CPC and per-group bid recommendations
//!
//! All stages are pure functions over request-scoped values.

mod bids;
mod filter;
mod grouping;
mod themes;
mod types;

pub use bids::calculate_bids;
pub use filter::filter_keywords;
pub use grouping::{group_keywords, GROUPING_NOTES};
pub use themes::{bucketize, categorize};
pub use types::*;
