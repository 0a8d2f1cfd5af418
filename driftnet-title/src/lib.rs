//! Driftnet Title - Default release-name collaborators
//!
//! Ships the stock implementations of the two string-classifier traits
//! `driftnet-core` consumes: [`SceneTitleParser`] for release-name parsing
//! and [`KeywordContentFilter`] for the adult-content gate. Both are
//! best-effort by design; callers with better classifiers plug in their own
//! trait implementations instead.

pub mod filter;
pub mod parser;

pub use filter::KeywordContentFilter;
pub use parser::SceneTitleParser;
