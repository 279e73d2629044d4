//! Keyword acquisition waterfall.
//!
//! Providers are tried strictly in priority order:
//! - **DataForSEO** first
//! - **Google Ads** and **Microsoft Ads** keyword planners next
//! - **SerpAPI** discovery last
//!
//! The first provider that returns at least one keyword wins. Every tier,
//! including skipped ones, leaves a [`ProviderAttempt`] behind so callers can
//! tell "no data anywhere" apart from "nothing configured".

mod types;
mod waterfall;

pub use types::{Acquisition, AttemptOutcome, ProviderAttempt};
pub use waterfall::Waterfall;
