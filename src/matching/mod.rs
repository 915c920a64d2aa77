//! Fuzzy matching of scraped candidate rows against a target query.

pub mod normalize;
pub mod similarity;

pub use normalize::normalize;
pub use similarity::{is_exact_numeric_match, levenshtein, similarity, Matcher, Ranked};
