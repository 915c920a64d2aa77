//! Rank command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::matching::{Matcher, Ranked};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Ranks candidate rows from a results list against a query string.
pub struct RankCommand {
    config: Config,
}

impl RankCommand {
    /// Creates a new rank command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads candidates (one per line) and returns them ranked best-first.
    ///
    /// `top` limits the output; `0` means everything.
    pub fn execute(&self, query: &str, candidates_file: &Path, top: usize) -> Result<String> {
        let content = std::fs::read_to_string(candidates_file).with_context(|| {
            format!("Failed to read candidates file: {}", candidates_file.display())
        })?;

        let candidates: Vec<String> =
            content.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect();
        debug!("ranking {} candidate(s) against {:?}", candidates.len(), query);

        let ranked = self.rank(query, &candidates, top);

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_ranked(&ranked))
    }

    /// Scores and sorts candidates, best first. Ties keep input order.
    pub fn rank(&self, query: &str, candidates: &[String], top: usize) -> Vec<Ranked> {
        let matcher = Matcher::new(self.config.min_similarity);

        let mut ranked = matcher.rank_all(query, candidates);
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        if top > 0 {
            ranked.truncate(top);
        }

        let accepted = ranked.iter().filter(|r| r.accepted).count();
        info!("{} of {} candidate(s) accepted", accepted, ranked.len());

        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn make_config() -> Config {
        Config { format: OutputFormat::Table, ..Config::default() }
    }

    fn candidates(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_orders_best_first() {
        let cmd = RankCommand::new(make_config());
        let ranked = cmd.rank(
            "123 Main St",
            &candidates(&["987 Elm Terrace", "123 Main Street", "123 Main St"]),
            0,
        );
        assert_eq!(ranked[0].candidate, "123 Main St");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].candidate, "123 Main Street");
        assert!(!ranked[2].accepted);
    }

    #[test]
    fn test_rank_top_limits() {
        let cmd = RankCommand::new(make_config());
        let ranked =
            cmd.rank("123 Main St", &candidates(&["a", "b", "123 Main St", "c"]), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate, "123 Main St");
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let cmd = RankCommand::new(make_config());
        let ranked =
            cmd.rank("123 Main St", &candidates(&["123 MAIN ST", "123 Main St"]), 0);
        assert_eq!(ranked[0].candidate, "123 MAIN ST");
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn test_rank_numeric_identifiers() {
        let cmd = RankCommand::new(make_config());
        let ranked = cmd.rank("12345", &candidates(&["12346", "12345"]), 0);
        assert_eq!(ranked[0].candidate, "12345");
        assert!(ranked[0].exact);
        assert!(ranked[0].accepted);
        assert!(!ranked[1].accepted);
    }

    #[test]
    fn test_execute_reads_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "123 Main Street").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  987 Elm Terrace  ").unwrap();

        let cmd = RankCommand::new(make_config());
        let output = cmd.execute("123 Main St", file.path(), 0).unwrap();
        assert!(output.contains("123 Main Street"));
        assert!(output.contains("987 Elm Terrace"));
    }

    #[test]
    fn test_execute_missing_file() {
        let cmd = RankCommand::new(make_config());
        let err = cmd.execute("q", Path::new("/nonexistent/candidates.txt"), 0).unwrap_err();
        assert!(err.to_string().contains("Failed to read candidates file"));
    }
}
