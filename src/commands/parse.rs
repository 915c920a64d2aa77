//! Parse command implementation.

use crate::auction::{AuctionRecord, BlockParser};
use crate::config::Config;
use crate::format::Formatter;
use crate::page;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extracts sold records from a captured results page.
pub struct ParseCommand {
    config: Config,
}

impl ParseCommand {
    /// Creates a new parse command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads a capture file and returns formatted records.
    ///
    /// `qualified_only` keeps only records meeting the surplus threshold.
    pub fn execute(&self, input: &Path, qualified_only: bool) -> Result<String> {
        let raw = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read capture file: {}", input.display()))?;

        let records = self.extract(&raw, qualified_only)?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_records(&records))
    }

    /// Parses capture content into deduplicated sold records.
    pub fn extract(&self, raw: &str, qualified_only: bool) -> Result<Vec<AuctionRecord>> {
        if page::is_blocked(raw) {
            bail!(
                "Capture looks like a CAPTCHA/bot-check interstitial, \
                 not a results page. Re-fetch and try again."
            );
        }

        if let Some(pages) = page::total_pages(raw) {
            debug!("pager reports {} page(s); this capture is one of them", pages);
        }

        let blocks = match &self.config.block_selector {
            Some(selector) => {
                let blocks = page::block_texts(raw, selector)?;
                if blocks.is_empty() {
                    warn!("selector {:?} matched no blocks", selector);
                }
                blocks
            }
            None => page::paragraph_blocks(raw),
        };
        debug!("split capture into {} block(s)", blocks.len());

        let parser = BlockParser::new(&self.config);
        let mut seen = HashSet::new();
        let mut records: Vec<AuctionRecord> = Vec::new();

        for record in parser.parse_blocks(&blocks) {
            let key = {
                let (case, parcel) = record.dedup_key();
                (case.to_string(), parcel.to_string())
            };
            if !seen.insert(key) {
                debug!(
                    "dropping duplicate card {} / {}",
                    record.case_number, record.parcel_id
                );
                continue;
            }
            if qualified_only && !record.meets_minimum_surplus {
                continue;
            }
            records.push(record);
        }

        info!("extracted {} sold record(s)", records.len());
        Ok(records)
    }
}
