//! Full-text search predicate construction.

use std::collections::BTreeSet;

/// A prepared full-text search: deduplicated tokens in canonical order.
///
/// Tokens are AND-combined by `plainto_tsquery`, so `"foo bar"` and
/// `"bar foo"` match the same row set; canonicalizing the token order here
/// also makes the two render byte-identical SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPredicate {
    tokens: Vec<String>,
}

impl SearchPredicate {
    /// Tokenize raw search text on whitespace, dropping empty tokens and
    /// duplicates. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<SearchPredicate> {
        let tokens: BTreeSet<&str> = raw.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }
        Some(SearchPredicate {
            tokens: tokens.into_iter().map(str::to_string).collect(),
        })
    }

    /// The value bound into `plainto_tsquery`.
    pub fn tsquery_input(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_and_dedupe() {
        let predicate = SearchPredicate::parse("ann  maria ann").unwrap();
        assert_eq!(predicate.tokens(), &["ann", "maria"]);
        assert_eq!(predicate.tsquery_input(), "ann maria");
    }

    #[test]
    fn test_token_order_is_canonical() {
        // Token order must not affect the matched row set.
        // Canonical ordering makes equal token sets render identical SQL.
        let a = SearchPredicate::parse("foo bar").unwrap();
        let b = SearchPredicate::parse("bar   foo").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tsquery_input(), b.tsquery_input());
    }

    #[test]
    fn test_blank_input_is_none() {
        assert_eq!(SearchPredicate::parse(""), None);
        assert_eq!(SearchPredicate::parse("   \t "), None);
    }
}
