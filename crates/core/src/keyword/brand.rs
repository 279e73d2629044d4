//! Lexical helpers: hostname tokens for brand exclusion and word-level
//! phrase matching for the intent and theme heuristics.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use url::Url;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").unwrap());

/// Hostname labels that say nothing about the brand.
const GENERIC_LABELS: &[&str] = &["www", "com", "net", "org"];

/// Registry and storefront labels that survive [`hostname_tokens`] but never
/// name the brand itself (`acme.co.uk`, `shop.acme.com`).
const NON_BRAND_LABELS: &[&str] = &[
    "co", "uk", "de", "fr", "es", "it", "au", "ca", "io", "us", "eu", "gov", "edu", "shop",
    "store", "online", "app", "web", "site",
];

/// Split a URL's hostname into brand tokens, e.g.
/// `https://www.acme-shoes.com` -> `["acme-shoes"]`.
///
/// A missing scheme is tolerated. Unparseable input yields no tokens.
pub fn hostname_tokens(url: &str) -> Vec<String> {
    let url = url.trim();
    if url.is_empty() {
        return Vec::new();
    }

    let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{}", url)));
    let Ok(parsed) = parsed else {
        return Vec::new();
    };
    let Some(host) = parsed.host_str() else {
        return Vec::new();
    };

    let mut tokens: Vec<String> = Vec::new();
    for label in host.to_ascii_lowercase().split('.') {
        if label.is_empty() || GENERIC_LABELS.contains(&label) {
            continue;
        }
        if !tokens.iter().any(|t| t == label) {
            tokens.push(label.to_string());
        }
    }
    tokens
}

/// Whether a hostname token is specific enough to identify a brand in
/// keyword text.
pub fn is_brand_label(label: &str) -> bool {
    label.len() >= 3 && !NON_BRAND_LABELS.contains(&label)
}

/// Lowercased words of a keyword.
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether `phrase` occurs as a contiguous run of whole words in `words`.
pub fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
}

/// Like [`contains_phrase`], but the last word of `phrase` also matches its
/// plural (`s`) or possessive (`'s`) form.
pub fn contains_term(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    let Some((last, head)) = needle.split_last() else {
        return false;
    };
    if needle.len() > words.len() {
        return false;
    }
    words.windows(needle.len()).any(|window| {
        let Some((window_last, window_head)) = window.split_last() else {
            return false;
        };
        window_head.iter().zip(head).all(|(w, n)| w == n) && inflects(window_last, last)
    })
}

fn inflects(word: &str, base: &str) -> bool {
    word == base
        || word
            .strip_prefix(base)
            .is_some_and(|rest| rest == "s" || rest == "'s")
}
