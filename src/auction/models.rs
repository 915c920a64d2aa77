//! Data models for auction listings and derived surplus figures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an auction listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Sold,
    NotSold,
    Unknown,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Sold => write!(f, "sold"),
            SaleStatus::NotSold => write!(f, "not sold"),
            SaleStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A currency figure: the text as scraped plus its parsed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    /// Original text, e.g. `"$45,000.00"`
    pub raw: String,
    /// Parsed numeric amount
    pub amount: f64,
}

impl Money {
    /// Parses a currency string, keeping the original text alongside the
    /// amount. Returns `None` for anything `parse_currency` rejects.
    pub fn parse(text: &str) -> Option<Self> {
        crate::auction::parser::parse_currency(text)
            .map(|amount| Self { raw: text.trim().to_string(), amount })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// One completed sale extracted from an auction card.
///
/// Only valid records exist: construction is gated on the parcel id, case
/// number, opening bid, and sale price all being present, so those fields
/// are not `Option`. Records are never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionRecord {
    /// Always `Sold`; other statuses never produce a record
    pub status: SaleStatus,
    /// Court case / cause number
    pub case_number: String,
    /// Parcel or account identifier
    pub parcel_id: String,
    /// Street address if the card lists one
    pub property_address: Option<String>,
    /// Canonical `MM/DD/YYYY` date if the card lists one
    pub auction_date: Option<String>,
    /// Opening / minimum bid
    pub opening_bid: Money,
    /// County's value assessment, if listed
    pub assessed_value: Option<Money>,
    /// Price the property sold for
    pub sale_price: Money,
    /// assessed − sale, when the assessment is present
    pub surplus_assessed_vs_sale: Option<f64>,
    /// sale − opening bid
    pub surplus_sale_vs_opening: f64,
    /// Whether assessed − sale reaches the configured minimum surplus
    pub meets_minimum_surplus: bool,
}

impl AuctionRecord {
    /// Builds a sold record and computes the derived surplus figures.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn sold(
        case_number: String,
        parcel_id: String,
        property_address: Option<String>,
        auction_date: Option<String>,
        opening_bid: Money,
        assessed_value: Option<Money>,
        sale_price: Money,
        min_surplus: f64,
    ) -> Self {
        let surplus_assessed_vs_sale =
            assessed_value.as_ref().map(|assessed| assessed.amount - sale_price.amount);
        let surplus_sale_vs_opening = sale_price.amount - opening_bid.amount;
        let meets_minimum_surplus =
            surplus_assessed_vs_sale.is_some_and(|surplus| surplus >= min_surplus);

        Self {
            status: SaleStatus::Sold,
            case_number,
            parcel_id,
            property_address,
            auction_date,
            opening_bid,
            assessed_value,
            sale_price,
            surplus_assessed_vs_sale,
            surplus_sale_vs_opening,
            meets_minimum_surplus,
        }
    }

    /// Identity for caller-side deduplication across pages and sources.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.case_number, &self.parcel_id)
    }
}
