//! Auction-card extraction: label tables, data models, and the block parser.

pub mod labels;
pub mod models;
pub mod parser;

pub use models::{AuctionRecord, Money, SaleStatus};
pub use parser::{parse_auction_block, parse_currency, parse_date_flexible, BlockParser};
