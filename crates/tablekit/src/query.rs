//! The derived query handed to the fetch collaborator.

use serde::{Deserialize, Serialize};

use tablekit_filters::{FilterMode, ServerTableFilter};

use crate::error::{Result, TableError};
use crate::sorting::SortOrder;

/// A complete, self-consistent snapshot of what a table should fetch.
///
/// Serializes to camelCase JSON:
///
/// ```json
/// {"page": 1, "pageSize": 25, "search": "", "filters": [],
///  "filterMode": "all", "sortBy": "createdOnTimestamp", "sortOrder": "desc"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    /// View filters first, then quick filters.
    pub filters: Vec<ServerTableFilter>,
    pub filter_mode: FilterMode,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Query {
    /// Returns the query as ordered query-string pairs.
    ///
    /// `search` is omitted when empty and `filters` (a compact JSON array)
    /// when there are none. Values are not percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Encode`] if the filters fail to serialize.
    pub fn to_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs.push(("sortBy", self.sort_by.clone()));
        pairs.push(("sortOrder", self.sort_order.to_string()));
        if !self.filters.is_empty() {
            let filters = serde_json::to_string(&self.filters).map_err(TableError::Encode)?;
            pairs.push(("filters", filters));
        }
        pairs.push(("filterMode", self.filter_mode.to_string()));
        Ok(pairs)
    }

    /// Returns the offset of the first row on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_filters::{DateRange, Operator};

    fn sample() -> Query {
        Query {
            page: 2,
            page_size: 25,
            search: "acme".into(),
            filters: vec![
                ServerTableFilter::equals("owner", "bob"),
                ServerTableFilter::new(
                    "created",
                    Operator::DateBetween,
                    DateRange::new("2024-01-01", ""),
                ),
            ],
            filter_mode: FilterMode::All,
            sort_by: "name".into(),
            sort_order: SortOrder::Asc,
        }
    }

    fn render(pairs: &[(&str, String)]) -> String {
        pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn pairs_full() {
        let pairs = sample().to_pairs().unwrap();
        insta::assert_snapshot!(render(&pairs), @r#"
        page=2
        pageSize=25
        search=acme
        sortBy=name
        sortOrder=asc
        filters=[{"field":"owner","operator":"equals","value":"bob"},{"field":"created","operator":"dateBetween","value":{"from":"2024-01-01","to":null}}]
        filterMode=all
        "#);
    }

    #[test]
    fn pairs_omit_empty_search_and_filters() {
        let query = Query {
            search: String::new(),
            filters: vec![],
            ..sample()
        };
        let names: Vec<&str> = query.to_pairs().unwrap().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, vec!["page", "pageSize", "sortBy", "sortOrder", "filterMode"]);
    }

    #[test]
    fn encode_errors_name_the_query() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = TableError::Encode(source);
        assert!(err.to_string().starts_with("failed to encode query filters"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["pageSize"], 25);
        assert_eq!(json["sortBy"], "name");
        assert_eq!(json["filterMode"], "all");
        assert_eq!(json["filters"][0]["field"], "owner");
    }

    #[test]
    fn offset() {
        assert_eq!(sample().offset(), 25);
        assert_eq!(Query { page: 1, ..sample() }.offset(), 0);
    }
}
