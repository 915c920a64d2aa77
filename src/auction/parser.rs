//! Label-anchored extraction of auction records from semi-structured blocks.
//!
//! A block is whatever one listing card collapses to as text. Most blocks on
//! a results page are decorative (pager chrome, legal footers), so every
//! extraction failure here is a silent `None`, never an error.

use crate::auction::labels;
use crate::auction::models::{AuctionRecord, Money, SaleStatus};
use crate::config::Config;
use crate::page;
use chrono::NaiveDate;
use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// How far past a label a value may run when no other label terminates it.
const VALUE_WINDOW: usize = 120;

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*-?\d[\d,]*(?:\.\d+)?[Mm]?").unwrap());

static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap());

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap());

/// Parser for auction listing blocks.
///
/// Pure and stateless apart from the configured surplus threshold; any
/// number of callers may share one instance.
pub struct BlockParser {
    min_surplus: f64,
}

impl BlockParser {
    /// Creates a parser using the configured minimum surplus.
    pub fn new(config: &Config) -> Self {
        Self::with_minimum_surplus(config.min_surplus)
    }

    /// Creates a parser with an explicit surplus threshold.
    pub fn with_minimum_surplus(min_surplus: f64) -> Self {
        Self { min_surplus }
    }

    /// Extracts a sold record from one block of text or markup.
    ///
    /// Returns `None` for anything that is not a complete sold card: wrong
    /// status, missing required fields, or no recognizable content at all.
    pub fn parse_block(&self, block: &str) -> Option<AuctionRecord> {
        let text = if block.contains('<') {
            page::fragment_text(block)
        } else {
            page::collapse_whitespace(block)
        };
        if text.is_empty() {
            return None;
        }

        let status = detect_status(&text);
        let sale_price = labeled_money(&text, labels::SALE_PRICE);

        // A card qualifies when it says "sold" or carries a sold amount;
        // everything else is not applicable rather than wrong.
        if status != SaleStatus::Sold && sale_price.is_none() {
            trace!("block is not a sold card: {:?}", snippet(&text));
            return None;
        }

        let case_number = labeled_value(&text, labels::CASE_NUMBER);
        let parcel_id = labeled_value(&text, labels::PARCEL_ID);
        let opening_bid = labeled_money(&text, labels::OPENING_BID);

        let (Some(case_number), Some(parcel_id), Some(opening_bid), Some(sale_price)) =
            (case_number, parcel_id, opening_bid, sale_price)
        else {
            debug!("sold card missing required fields: {:?}", snippet(&text));
            return None;
        };

        let assessed_value = labeled_money(&text, labels::ASSESSED_VALUE);
        let property_address = labeled_value(&text, labels::PROPERTY_ADDRESS);
        // Some portals label the date, others drop it unlabeled into the
        // card header next to the status word; fall back to the first date
        // anywhere in the block.
        let auction_date = labeled_value(&text, labels::AUCTION_DATE)
            .map(|value| parse_date_flexible(&value))
            .filter(|date| !date.is_empty())
            .or_else(|| {
                let found = parse_date_flexible(&text);
                (!found.is_empty()).then_some(found)
            });

        let record = AuctionRecord::sold(
            case_number,
            parcel_id,
            property_address,
            auction_date,
            opening_bid,
            assessed_value,
            sale_price,
            self.min_surplus,
        );

        trace!(
            "parsed sold card {} / {} (surplus {:?})",
            record.case_number,
            record.parcel_id,
            record.surplus_assessed_vs_sale
        );

        Some(record)
    }

    /// Parses every block, keeping the sold cards.
    pub fn parse_blocks(&self, blocks: &[String]) -> Vec<AuctionRecord> {
        let records: Vec<AuctionRecord> =
            blocks.iter().filter_map(|block| self.parse_block(block)).collect();
        debug!("{} of {} blocks parsed as sold cards", records.len(), blocks.len());
        records
    }
}

/// Free-function surface over [`BlockParser`] for one-shot callers.
pub fn parse_auction_block(block: &str, config: &Config) -> Option<AuctionRecord> {
    BlockParser::new(config).parse_block(block)
}

/// Classifies a block's sale status from its indicator text.
///
/// Negative indicators win over the bare "sold" substring, since "not sold"
/// and friends contain it.
pub fn detect_status(text: &str) -> SaleStatus {
    let lower = text.to_ascii_lowercase();
    if labels::NOT_SOLD.iter().any(|token| find_token(&lower, token, 0).is_some()) {
        return SaleStatus::NotSold;
    }
    if labels::SOLD.iter().any(|token| find_token(&lower, token, 0).is_some()) {
        return SaleStatus::Sold;
    }
    SaleStatus::Unknown
}

/// Parses a currency string into its numeric amount.
///
/// `$1,234.56` → `1234.56`; `$2.5M` → `2_500_000.0`. Everything except
/// digits, a decimal point, and a minus sign is stripped before parsing;
/// a second decimal point fails the float parse and yields `None`.
pub fn parse_currency(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String =
        trimmed.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-').collect();
    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;

    let millions = trimmed
        .trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_ascii_lowercase()
        .ends_with('m');

    Some(if millions { value * 1_000_000.0 } else { value })
}

/// Finds the first date in the text and renders it as `MM/DD/YYYY`.
///
/// Accepts `MM/DD/YYYY` and `YYYY-MM-DD`, each with or without a trailing
/// time, which is dropped. Returns an empty string when nothing parses as a
/// real calendar date.
pub fn parse_date_flexible(text: &str) -> String {
    for caps in SLASH_DATE.captures_iter(text) {
        if let Some(date) = calendar_date(&caps[3], &caps[1], &caps[2]) {
            return date.format("%m/%d/%Y").to_string();
        }
    }
    for caps in ISO_DATE.captures_iter(text) {
        if let Some(date) = calendar_date(&caps[1], &caps[2], &caps[3]) {
            return date.format("%m/%d/%Y").to_string();
        }
    }
    String::new()
}

fn calendar_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Reads the value that follows the first matching label.
///
/// Labels match case-insensitively at word boundaries, with an optional
/// trailing colon. The value runs to the next known label or the end of a
/// bounded window, whichever comes first.
pub fn labeled_value(text: &str, group: &[&str]) -> Option<String> {
    // ASCII lowercasing is byte-for-byte, so indices into `lower` are valid
    // for `text`.
    let lower = text.to_ascii_lowercase();
    let value_start = group.iter().find_map(|alias| label_end(&lower, alias))?;

    let mut end = next_label_start(&lower, value_start)
        .unwrap_or(lower.len())
        .min(value_start + VALUE_WINDOW)
        .min(lower.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    let value = text[value_start..end].trim().trim_end_matches(|c| c == ',' || c == ';').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Reads a labeled value and takes its first currency-shaped substring.
pub fn labeled_money(text: &str, group: &[&str]) -> Option<Money> {
    let value = labeled_value(text, group)?;
    let matched = CURRENCY.find(&value)?;
    Money::parse(matched.as_str())
}

/// Byte offset just past `alias` (and an optional colon) at its first
/// word-boundary occurrence.
fn label_end(lower: &str, alias: &str) -> Option<usize> {
    let start = find_token(lower, alias, 0)?;
    let mut end = start + alias.len();
    let bytes = lower.as_bytes();
    while end < bytes.len() && bytes[end] == b' ' {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b':' {
        end += 1;
    }
    Some(end)
}

/// Earliest position of any known label at or after `from`.
fn next_label_start(lower: &str, from: usize) -> Option<usize> {
    labels::ALL_GROUPS
        .iter()
        .flat_map(|group| group.iter())
        .filter_map(|alias| find_token(lower, alias, from))
        .min()
}

/// Substring search constrained to word boundaries, so "apn" never matches
/// inside "grapnel" and "sold" never matches inside "soldier".
fn find_token(lower: &str, needle: &str, from: usize) -> Option<usize> {
    let bytes = lower.as_bytes();
    let mut search = from;
    while search <= lower.len() {
        let found = lower[search..].find(needle)?;
        let pos = search + found;
        let end = pos + needle.len();
        let before_ok = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
        let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some(pos);
        }
        search = pos + 1;
        while search < lower.len() && !lower.is_char_boundary(search) {
            search += 1;
        }
    }
    None
}

fn snippet(text: &str) -> &str {
    let mut end = text.len().min(60);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
