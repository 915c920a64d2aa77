//! Label tokens for auction-card field extraction.
//!
//! County portals render the same concepts under slightly different labels
//! ("Cause Number" vs "Case Number", "Adjudged Value" vs "Assessed Value").
//! This file is the single place to touch when a portal renames a column.
//!
//! All entries are lowercase; matching is case-insensitive with a tolerated
//! trailing colon. Order within a group is priority order.

/// Court case / cause number.
pub const CASE_NUMBER: &[&str] = &["cause number", "case number", "case no", "case #"];

/// Parcel / account identifier.
pub const PARCEL_ID: &[&str] =
    &["account number", "parcel id", "parcel number", "alternate key", "apn"];

/// Street address of the property.
pub const PROPERTY_ADDRESS: &[&str] =
    &["property address", "site address", "situs address"];

/// Opening / minimum bid.
pub const OPENING_BID: &[&str] =
    &["est. min. bid", "est min bid", "opening bid", "minimum bid", "starting bid"];

/// County's value assessment.
pub const ASSESSED_VALUE: &[&str] =
    &["adjudged value", "assessed value", "appraised value", "just value"];

/// Price the property actually sold for.
pub const SALE_PRICE: &[&str] =
    &["sold amount", "amount sold", "sale price", "sold for", "winning bid"];

/// When the auction ran.
pub const AUCTION_DATE: &[&str] = &["auction date", "sale date", "sold date", "auction starts"];

/// Status line label.
pub const STATUS: &[&str] = &["auction status", "status"];

/// Labels that never become record fields but still terminate the previous
/// field's value.
pub const BOUNDARY_ONLY: &[&str] =
    &["sold to", "auction type", "final judgment", "certificate number"];

/// Indicators that a card did not complete as a sale. Checked before the
/// bare "sold" substring because several of these contain it.
pub const NOT_SOLD: &[&str] =
    &["redeemed", "canceled", "cancelled", "not sold", "unsold", "withdrawn"];

/// Completed-sale indicators.
pub const SOLD: &[&str] = &["sold"];

/// Every label group, used to find where one value ends and the next begins.
pub const ALL_GROUPS: &[&[&str]] = &[
    CASE_NUMBER,
    PARCEL_ID,
    PROPERTY_ADDRESS,
    OPENING_BID,
    ASSESSED_VALUE,
    SALE_PRICE,
    AUCTION_DATE,
    STATUS,
    BOUNDARY_ONLY,
];
