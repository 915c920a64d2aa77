//! deed-harvest - record extraction and fuzzy matching for county tax-deed
//! auction captures.
//!
//! A Rust port of a pile of per-county Python scraper scripts, reduced to
//! the parts that generalize: turning captured auction cards into typed
//! sold-with-surplus records, and deciding which on-page candidate matches
//! a query address or parcel number. Fetching, spreadsheets, and OCR stay
//! with the callers.

pub mod auction;
pub mod commands;
pub mod config;
pub mod format;
pub mod matching;
pub mod page;
pub mod tabular;

pub use auction::models::{AuctionRecord, Money, SaleStatus};
pub use auction::parser::{parse_auction_block, parse_currency, parse_date_flexible, BlockParser};
pub use config::Config;
pub use matching::{is_exact_numeric_match, normalize, similarity, Matcher};
