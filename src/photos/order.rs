//! Photo ordering.
//!
//! The site stores photos under content-addressed names, so a filename often
//! carries no order at all. `order_photo_urls` classifies the first filename
//! and picks a policy: hash-named lists keep the order the site listed them
//! in, numbered lists are sorted naturally, anything else lexically.

use std::cmp::Ordering;

use log::debug;

use crate::config::SortOrder;

/// How the sample filename was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Hex digest stem, or a hex segment between underscores
    HashNamed,
    /// Contains a run of two or more digits
    Numbered,
    /// Anything else
    Plain,
}

/// Last path segment of a URL without its query or fragment.
pub fn url_filename(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    path.rsplit('/').next().unwrap_or(path)
}

fn stem(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

fn is_hex_run(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Classifies a filename.
pub fn classify_filename(filename: &str) -> NameKind {
    let stem = stem(filename);
    if is_hex_run(stem, 16, 64) || stem.split('_').any(|part| is_hex_run(part, 8, usize::MAX)) {
        return NameKind::HashNamed;
    }
    let has_digit_run = stem
        .as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_digit() && w[1].is_ascii_digit());
    if has_digit_run {
        NameKind::Numbered
    } else {
        NameKind::Plain
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Text(String),
    Number(String),
}

/// Splits a filename into alternating text and digit runs.
fn natural_tokens(filename: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in filename.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            tokens.push(finish_token(std::mem::take(&mut current), in_digits));
        }
        in_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(finish_token(current, in_digits));
    }
    tokens
}

fn finish_token(raw: String, digits: bool) -> Token {
    if digits {
        Token::Number(raw)
    } else {
        Token::Text(raw.to_lowercase())
    }
}

/// Compares digit strings by value without parsing, so no length overflows.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_tokens(a: &Token, b: &Token) -> Ordering {
    match (a, b) {
        (Token::Number(x), Token::Number(y)) => compare_numbers(x, y),
        (Token::Text(x), Token::Text(y)) => x.cmp(y),
        // Numbers sort before text at the same position
        (Token::Number(_), Token::Text(_)) => Ordering::Less,
        (Token::Text(_), Token::Number(_)) => Ordering::Greater,
    }
}

/// Natural comparison of two URLs by filename.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ta = natural_tokens(url_filename(a));
    let tb = natural_tokens(url_filename(b));
    for (x, y) in ta.iter().zip(tb.iter()) {
        let ord = compare_tokens(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ta.len().cmp(&tb.len())
}

fn alphabetical_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Orders one album's photo URLs.
///
/// `Smart` classifies the first URL's filename; the other policies bypass
/// classification. `reverse` is applied after ordering. Sorting is stable,
/// and an empty list stays empty.
///
/// # Arguments
///
/// * `urls` - Photo URLs in the order the site listed them
/// * `policy` - Ordering policy
/// * `reverse` - Reverse the final order
pub fn order_photo_urls(mut urls: Vec<String>, policy: SortOrder, reverse: bool) -> Vec<String> {
    if urls.is_empty() {
        return urls;
    }

    let effective = match policy {
        SortOrder::Smart => match classify_filename(url_filename(&urls[0])) {
            NameKind::HashNamed => SortOrder::None,
            NameKind::Numbered => SortOrder::Natural,
            NameKind::Plain => SortOrder::Alphabetical,
        },
        other => other,
    };
    debug!(
        "Ordering {} photos with policy {:?} (requested {:?})",
        urls.len(),
        effective,
        policy
    );

    match effective {
        SortOrder::Natural => urls.sort_by(|a, b| natural_cmp(a, b)),
        SortOrder::Alphabetical => urls.sort_by(|a, b| alphabetical_cmp(a, b)),
        SortOrder::None | SortOrder::Smart => {}
    }
    if reverse {
        urls.reverse();
    }
    urls
}
