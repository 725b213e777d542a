//! Querystring parameter parsing.
//!
//! The reserved keys `order-by` and `search` are popped before anything is
//! treated as a filter, so a dataset field that happens to be called
//! "search" can never be filtered on: reserved keys win.

/// Reserved key: requested ordering.
pub const ORDER_BY_KEY: &str = "order-by";

/// Reserved key: free-text search.
pub const SEARCH_KEY: &str = "search";

/// Parsed querystring parameters, ready for the query pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Requested sort terms, lowercased, in request order. `-` prefix
    /// marks descending.
    pub order_by: Vec<String>,

    /// Raw search text, when present and non-blank.
    pub search: Option<String>,

    /// Candidate filter keys and values; blank values already removed.
    pub filters: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse raw key/value pairs as they come from a URL query string.
    ///
    /// For repeated reserved keys the first occurrence wins; for repeated
    /// filter keys the last one does (matching the usual single-value
    /// reading of a multi-valued mapping).
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut order_by_raw: Option<String> = None;
        let mut search_raw: Option<String> = None;
        let mut filters: Vec<(String, String)> = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                ORDER_BY_KEY => {
                    if order_by_raw.is_none() {
                        order_by_raw = Some(value);
                    }
                }
                SEARCH_KEY => {
                    if search_raw.is_none() {
                        search_raw = Some(value);
                    }
                }
                _ => {
                    if value.trim().is_empty() {
                        continue;
                    }
                    if let Some(existing) =
                        filters.iter_mut().find(|(existing, _)| *existing == key)
                    {
                        existing.1 = value;
                    } else {
                        filters.push((key, value));
                    }
                }
            }
        }

        let order_by = order_by_raw
            .unwrap_or_default()
            .split(',')
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();

        let search = search_raw.filter(|raw| !raw.trim().is_empty());

        Self {
            order_by,
            search,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(items: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_reserved_keys_are_popped() {
        let parsed = params(&[
            ("order-by", "-name, Age"),
            ("search", "ann"),
            ("age__gte", "18"),
        ]);
        assert_eq!(parsed.order_by, vec!["-name", "age"]);
        assert_eq!(parsed.search.as_deref(), Some("ann"));
        assert_eq!(
            parsed.filters,
            vec![("age__gte".to_string(), "18".to_string())]
        );
    }

    #[test]
    fn test_reserved_keys_never_become_filters() {
        let parsed = params(&[("search", "ann"), ("order-by", "name")]);
        assert!(parsed.filters.is_empty());
    }

    #[test]
    fn test_blank_filter_values_dropped() {
        let parsed = params(&[("age", ""), ("name", "  "), ("state", "BA")]);
        assert_eq!(
            parsed.filters,
            vec![("state".to_string(), "BA".to_string())]
        );
    }

    #[test]
    fn test_blank_search_is_none() {
        let parsed = params(&[("search", "   ")]);
        assert_eq!(parsed.search, None);
    }

    #[test]
    fn test_first_reserved_occurrence_wins() {
        let parsed = params(&[("order-by", "name"), ("order-by", "age")]);
        assert_eq!(parsed.order_by, vec!["name"]);
    }

    #[test]
    fn test_last_filter_occurrence_wins() {
        let parsed = params(&[("state", "BA"), ("state", "SP")]);
        assert_eq!(
            parsed.filters,
            vec![("state".to_string(), "SP".to_string())]
        );
    }

    #[test]
    fn test_order_by_handles_stray_commas() {
        let parsed = params(&[("order-by", ", -name,, age ,")]);
        assert_eq!(parsed.order_by, vec!["-name", "age"]);
    }
}
