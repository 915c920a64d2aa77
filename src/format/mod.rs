//! Output formatting for records and match rankings (table, JSON, CSV).

use crate::auction::AuctionRecord;
use crate::config::OutputFormat;
use crate::matching::Ranked;

/// Formats parse and rank results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats extracted auction records.
    pub fn format_records(&self, records: &[AuctionRecord]) -> String {
        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::record_csv_header(),
                OutputFormat::Table => "No sold records found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => json(records),
            OutputFormat::Table => self.record_table(records),
            OutputFormat::Csv => self.record_csv(records),
        }
    }

    /// Formats ranked match candidates.
    pub fn format_ranked(&self, ranked: &[Ranked]) -> String {
        if ranked.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => Self::ranked_csv_header(),
                OutputFormat::Table => "No candidates.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => json(ranked),
            OutputFormat::Table => self.ranked_table(ranked),
            OutputFormat::Csv => self.ranked_csv(ranked),
        }
    }

    // Table formatting

    fn record_table(&self, records: &[AuctionRecord]) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{:<16} {:<14} {:>12} {:>12} {:>12} {:<5}",
            "Case", "Parcel", "Sold", "Assessed", "Surplus", "Meets"
        ));
        lines.push(format!(
            "{:-<16} {:-<14} {:-<12} {:-<12} {:-<12} {:-<5}",
            "", "", "", "", "", ""
        ));

        for record in records {
            let assessed = record
                .assessed_value
                .as_ref()
                .map(|m| format!("{:.2}", m.amount))
                .unwrap_or_else(|| "-".to_string());
            let surplus = record
                .surplus_assessed_vs_sale
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "-".to_string());

            lines.push(format!(
                "{:<16} {:<14} {:>12.2} {:>12} {:>12} {:<5}",
                truncate(&record.case_number, 16),
                truncate(&record.parcel_id, 14),
                record.sale_price.amount,
                assessed,
                surplus,
                if record.meets_minimum_surplus { "yes" } else { "no" },
            ));
        }

        lines.push(String::new());
        lines.push(format!("{} record(s)", records.len()));
        lines.join("\n")
    }

    fn ranked_table(&self, ranked: &[Ranked]) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{:<7} {:<6} {:<8} {}", "Score", "Exact", "Match", "Candidate"));
        lines.push(format!("{:-<7} {:-<6} {:-<8} {:-<40}", "", "", "", ""));

        for r in ranked {
            lines.push(format!(
                "{:<7.3} {:<6} {:<8} {}",
                r.score,
                if r.exact { "yes" } else { "no" },
                if r.accepted { "yes" } else { "no" },
                r.candidate,
            ));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn record_csv_header() -> String {
        "case_number,parcel_id,property_address,auction_date,opening_bid,assessed_value,\
         sale_price,surplus_assessed_vs_sale,surplus_sale_vs_opening,meets_minimum_surplus"
            .to_string()
    }

    fn record_csv(&self, records: &[AuctionRecord]) -> String {
        let mut lines = vec![Self::record_csv_header()];

        for record in records {
            lines.push(
                [
                    csv_field(&record.case_number),
                    csv_field(&record.parcel_id),
                    csv_field(record.property_address.as_deref().unwrap_or("")),
                    csv_field(record.auction_date.as_deref().unwrap_or("")),
                    format!("{:.2}", record.opening_bid.amount),
                    record
                        .assessed_value
                        .as_ref()
                        .map(|m| format!("{:.2}", m.amount))
                        .unwrap_or_default(),
                    format!("{:.2}", record.sale_price.amount),
                    record
                        .surplus_assessed_vs_sale
                        .map(|s| format!("{:.2}", s))
                        .unwrap_or_default(),
                    format!("{:.2}", record.surplus_sale_vs_opening),
                    record.meets_minimum_surplus.to_string(),
                ]
                .join(","),
            );
        }

        lines.join("\n")
    }

    fn ranked_csv_header() -> String {
        "candidate,score,exact,accepted".to_string()
    }

    fn ranked_csv(&self, ranked: &[Ranked]) -> String {
        let mut lines = vec![Self::ranked_csv_header()];
        for r in ranked {
            lines.push(format!(
                "{},{:.6},{},{}",
                csv_field(&r.candidate),
                r.score,
                r.exact,
                r.accepted
            ));
        }
        lines.join("\n")
    }
}

fn json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
