//! Utilities over captured pages: block splitting, pager text, link and
//! phone extraction, interstitial detection.
//!
//! Everything here is parameterized by the caller — selectors, URL bases,
//! href prefixes — so no county portal's markup is baked into the library.

use anyhow::{anyhow, Result};
use regex_lite::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

static PAGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)page of (\d+)").unwrap());

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d{3}\) \d{3}-\d{4}").unwrap());

/// Collapses whitespace runs to single spaces and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an HTML fragment, whitespace-collapsed.
pub fn fragment_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    collapse_whitespace(&fragment.root_element().text().collect::<String>())
}

/// Splits a captured results page into candidate block texts.
///
/// The selector comes from the caller (CLI flag or config); an invalid
/// selector is a configuration mistake and fails loudly instead of yielding
/// zero blocks.
pub fn block_texts(html: &str, css_selector: &str) -> Result<Vec<String>> {
    let selector = Selector::parse(css_selector)
        .map_err(|e| anyhow!("invalid block selector {:?}: {}", css_selector, e))?;

    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect())
}

/// Plain-text fallback for block splitting: paragraphs separated by blank
/// lines.
pub fn paragraph_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(collapse_whitespace(&current));
                current.clear();
            }
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.is_empty() {
        blocks.push(collapse_whitespace(&current));
    }

    blocks.retain(|block| !block.is_empty());
    blocks
}

/// Detects CAPTCHA / bot-check interstitials in fetched content.
///
/// A blocked capture parses as a page with zero auction cards, which looks
/// identical to an empty results page; callers use this to tell the two
/// apart.
pub fn is_blocked(content: &str) -> bool {
    let lower = content.to_lowercase();
    lower.contains("captcha") || lower.contains("are you a human")
}

/// Total page count from pager text like `"Page of 12"`.
pub fn total_pages(text: &str) -> Option<u32> {
    PAGER.captures(text)?.get(1)?.as_str().parse().ok()
}

/// An anchor pulled off a results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL
    pub href: String,
    /// Anchor text, whitespace-collapsed
    pub text: String,
}

/// Collects anchors whose `href` starts with `href_prefix`, absolutized
/// against `base_url`. Document order is preserved.
pub fn extract_links(html: &str, href_prefix: &str, base_url: &str) -> Vec<Link> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHORS)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            if !href.starts_with(href_prefix) {
                return None;
            }
            let text = collapse_whitespace(&anchor.text().collect::<String>());
            let href = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{}{}", base_url.trim_end_matches('/'), href)
            };
            Some(Link { href, text })
        })
        .collect()
}

/// `(NNN) NNN-NNNN` phone numbers in document order, deduplicated.
pub fn phone_numbers(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in PHONE.find_iter(text) {
        let number = m.as_str().to_string();
        if !seen.contains(&number) {
            seen.push(number);
        }
    }
    seen
}

/// Formats an address into a lookup URL slug under `base`.
///
/// Underscores and whitespace become hyphens; the remainder is
/// percent-encoded (hyphens are unreserved and survive encoding).
pub fn lookup_url(base: &str, address: &str) -> String {
    let slug = address
        .trim()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("{}/{}", base.trim_end_matches('/'), urlencoding::encode(&slug))
}

/// Validates that `url` is a slug lookup URL under `base`.
pub fn is_lookup_url(url: &str, base: &str) -> bool {
    let Some(rest) = url.strip_prefix(base.trim_end_matches('/')) else {
        return false;
    };
    let Some(slug) = rest.strip_prefix('/') else {
        return false;
    };
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '%' | '#'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b \n\n c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_fragment_text() {
        let html = "<div><b>Case Number:</b>  2024-CV-001 <span>Sold</span></div>";
        assert_eq!(fragment_text(html), "Case Number: 2024-CV-001 Sold");
    }

    #[test]
    fn test_block_texts() {
        let html = r#"
            <html><body>
                <div class="card">First   block</div>
                <div class="card">Second block</div>
                <div class="other">Ignored</div>
                <div class="card"></div>
            </body></html>
        "#;
        let blocks = block_texts(html, ".card").unwrap();
        assert_eq!(blocks, vec!["First block", "Second block"]);
    }

    #[test]
    fn test_block_texts_bad_selector() {
        let err = block_texts("<html></html>", ":::nope").unwrap_err();
        assert!(err.to_string().contains("invalid block selector"));
    }

    #[test]
    fn test_paragraph_blocks() {
        let text = "Case Number: 1\nSold\n\nCase Number: 2\nRedeemed\n\n\n  \n";
        let blocks = paragraph_blocks(text);
        assert_eq!(blocks, vec!["Case Number: 1 Sold", "Case Number: 2 Redeemed"]);
    }

    #[test]
    fn test_is_blocked() {
        assert!(is_blocked("<html>Please solve this CAPTCHA</html>"));
        assert!(is_blocked("ARE YOU A HUMAN?"));
        assert!(!is_blocked("<html>Auction results</html>"));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages("Page of 12"), Some(12));
        assert_eq!(total_pages("page of 3 — showing 1-25"), Some(3));
        assert_eq!(total_pages("PAGE OF 7"), Some(7));
        assert_eq!(total_pages("no pager here"), None);
    }

    #[test]
    fn test_extract_links() {
        let html = r#"
            <html><body>
                <a href="/find/person/abc">John   Smith</a>
                <a href="/other/xyz">Skip me</a>
                <a href="/find/person/def">Jane Doe</a>
            </body></html>
        "#;
        let links = extract_links(html, "/find/person/", "https://example.com/");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "https://example.com/find/person/abc");
        assert_eq!(links[0].text, "John Smith");
        assert_eq!(links[1].text, "Jane Doe");
    }

    #[test]
    fn test_extract_links_absolute_href() {
        let html = r#"<a href="https://example.com/find/person/abc">X</a>"#;
        let links = extract_links(html, "https://example.com/find/person/", "ignored");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "https://example.com/find/person/abc");
    }

    #[test]
    fn test_phone_numbers() {
        let text = "Call (608) 328-4626 or (608) 445-9693. Again: (608) 328-4626.";
        assert_eq!(phone_numbers(text), vec!["(608) 328-4626", "(608) 445-9693"]);
        assert!(phone_numbers("608-328-4626").is_empty());
    }

    #[test]
    fn test_lookup_url() {
        assert_eq!(
            lookup_url("https://example.com/find/address", "123 Main_St"),
            "https://example.com/find/address/123-Main-St"
        );
        assert_eq!(
            lookup_url("https://example.com/find/address/", "  123   Oak  "),
            "https://example.com/find/address/123-Oak"
        );
    }

    #[test]
    fn test_is_lookup_url() {
        let base = "https://example.com/find/address";
        assert!(is_lookup_url("https://example.com/find/address/123-Main-St", base));
        assert!(is_lookup_url("https://example.com/find/address/123-Main%20St", base));
        assert!(!is_lookup_url("https://example.com/find/address/", base));
        assert!(!is_lookup_url("https://example.com/other/123-Main-St", base));
        assert!(!is_lookup_url("https://example.com/find/address/123 Main", base));
    }
}
