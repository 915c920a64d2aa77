//! Edit-distance similarity scoring and the candidate acceptance policy.

use crate::matching::normalize;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Classic Levenshtein edit distance: the minimum number of single-character
/// insertions, deletions, and substitutions turning `a` into `b`.
///
/// Single rolling row, so memory is O(len(b)) while time stays O(n·m).
/// Inputs are usually normalized keys (pure ASCII), but the loop walks chars
/// so arbitrary UTF-8 is safe.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        // row[j] holds the value for the previous character of `a` until it
        // is overwritten; `diagonal` saves the cell the substitution needs.
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

/// Similarity of two raw strings after normalization, in `[0, 1]`.
///
/// `1 − distance / max(len)`. Two strings that both normalize to empty are a
/// perfect (degenerate) match by convention, since there is nothing left to
/// disagree about.
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_of_keys(&normalize(a), &normalize(b))
}

fn similarity_of_keys(ka: &str, kb: &str) -> f64 {
    let longest = ka.chars().count().max(kb.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(ka, kb) as f64 / longest as f64
}

/// True iff both inputs normalize to the same non-empty all-digit string.
///
/// Tax parcel and account numbers must match exactly; "00123" and "123" are
/// different identifiers even though they are one edit apart.
pub fn is_exact_numeric_match(a: &str, b: &str) -> bool {
    let ka = normalize(a);
    let kb = normalize(b);
    is_digits(&ka) && is_digits(&kb) && ka == kb
}

fn is_digits(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// A scored candidate from a results list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranked {
    /// Candidate text as scraped
    pub candidate: String,
    /// Similarity against the query, in [0, 1]
    pub score: f64,
    /// Whether the pair matched as numeric identifiers
    pub exact: bool,
    /// Whether the acceptance policy admits this candidate
    pub accepted: bool,
}

/// Acceptance policy for picking which on-page result corresponds to a query.
///
/// A candidate is accepted when its similarity reaches the configured
/// minimum. When query and candidate are both pure digit strings the fuzzy
/// score is ignored and only exact equality matches.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    min_similarity: f64,
}

impl Matcher {
    /// Creates a matcher with the given acceptance threshold.
    ///
    /// The threshold is policy, not algorithm; `Config::validate` keeps it in
    /// `[0, 1]` before it reaches here.
    pub fn new(min_similarity: f64) -> Self {
        Self { min_similarity }
    }

    /// Scores one candidate against the query.
    pub fn rank(&self, query: &str, candidate: &str) -> Ranked {
        let kq = normalize(query);
        let kc = normalize(candidate);

        let numeric_pair = is_digits(&kq) && is_digits(&kc);
        let exact = numeric_pair && kq == kc;

        let (score, accepted) = if numeric_pair {
            (if exact { 1.0 } else { similarity_of_keys(&kq, &kc) }, exact)
        } else {
            let score = similarity_of_keys(&kq, &kc);
            (score, score >= self.min_similarity)
        };

        trace!("ranked {:?}: score {:.3}, exact {}, accepted {}", candidate, score, exact, accepted);

        Ranked { candidate: candidate.to_string(), score, exact, accepted }
    }

    /// True when the candidate would be clicked for this query.
    pub fn is_match(&self, query: &str, candidate: &str) -> bool {
        self.rank(query, candidate).accepted
    }

    /// Scores every candidate, preserving input order.
    pub fn rank_all(&self, query: &str, candidates: &[String]) -> Vec<Ranked> {
        candidates.iter().map(|c| self.rank(query, c)).collect()
    }

    /// Index and score of the best accepted candidate, first-wins on ties.
    pub fn best_match(&self, query: &str, candidates: &[String]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let ranked = self.rank(query, candidate);
            if !ranked.accepted {
                continue;
            }
            match best {
                Some((_, score)) if score >= ranked.score => {}
                _ => best = Some((i, ranked.score)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_similarity_identity() {
        for s in ["123 Main St", "Palm Bay", "00123"] {
            assert_eq!(similarity(s, s), 1.0);
        }
    }

    #[test]
    fn test_similarity_symmetry() {
        let pairs =
            [("123 Main St", "123 Main Street"), ("Oak Blvd", "Oak Boulevard"), ("", "x")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn test_similarity_empty_convention() {
        assert_eq!(similarity("", ""), 1.0);
        // Strings of pure punctuation normalize to empty too.
        assert_eq!(similarity("!!!", "---"), 1.0);
    }

    #[test]
    fn test_similarity_bounds() {
        let pairs = [("abcd", "wxyz"), ("a", "aaaa"), ("123 Main", "totally different")];
        for (a, b) in pairs {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "{s} out of range for {a:?}/{b:?}");
        }
    }

    #[test]
    fn test_similarity_ignores_unit_noise() {
        // After normalization these differ only slightly, so the score is
        // high even though the raw strings look different.
        let s = similarity("123 Main St, Apt 4B", "123 MAIN ST");
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_exact_numeric_match() {
        assert!(is_exact_numeric_match("12345", "12345"));
        assert!(is_exact_numeric_match(" 12-34-5 ", "12345"));
        assert!(!is_exact_numeric_match("12345", "12346"));
        assert!(!is_exact_numeric_match("00123", "123"));
        assert!(!is_exact_numeric_match("", ""));
        assert!(!is_exact_numeric_match("12a45", "12a45"));
    }

    #[test]
    fn test_matcher_threshold() {
        let matcher = Matcher::new(0.5);
        assert!(matcher.is_match("123 Main St", "123 Main Street"));
        assert!(!matcher.is_match("123 Main St", "987 Elm Terrace West"));
    }

    #[test]
    fn test_matcher_numeric_pairs_never_fuzzy() {
        let matcher = Matcher::new(0.5);
        // One digit apart scores 0.8 as text, but identifiers only match
        // exactly.
        assert!(similarity("12345", "12346") >= 0.5);
        assert!(!matcher.is_match("12345", "12346"));
        assert!(matcher.is_match("12345", "1-2-3-4-5"));
    }

    #[test]
    fn test_matcher_rank_fields() {
        let matcher = Matcher::new(0.5);

        let ranked = matcher.rank("12345", "12345");
        assert!(ranked.exact);
        assert!(ranked.accepted);
        assert_eq!(ranked.score, 1.0);

        let ranked = matcher.rank("123 Main St", "123 Main Street");
        assert!(!ranked.exact);
        assert!(ranked.accepted);
        assert!(ranked.score < 1.0);
    }

    #[test]
    fn test_best_match_picks_highest() {
        let matcher = Matcher::new(0.5);
        let candidates = vec![
            "987 Elm Terrace".to_string(),
            "123 Main Street".to_string(),
            "123 Main St".to_string(),
        ];
        let (index, score) = matcher.best_match("123 Main St", &candidates).unwrap();
        assert_eq!(index, 2);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_best_match_first_wins_ties() {
        let matcher = Matcher::new(0.5);
        let candidates = vec!["123 Main St".to_string(), "123 MAIN ST".to_string()];
        let (index, _) = matcher.best_match("123 Main St", &candidates).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_best_match_none_accepted() {
        let matcher = Matcher::new(0.5);
        let candidates = vec!["completely unrelated".to_string()];
        assert!(matcher.best_match("123 Main St", &candidates).is_none());
    }

    #[test]
    fn test_ranked_serde() {
        let ranked =
            Ranked { candidate: "123 Main".into(), score: 0.75, exact: false, accepted: true };
        let json = serde_json::to_string(&ranked).unwrap();
        assert!(json.contains("0.75"));
        let parsed: Ranked = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.candidate, ranked.candidate);
        assert!(parsed.accepted);
    }
}
