//! Filter definitions.
//!
//! A [`FilterDefinition`] describes one filterable column of a table: what
//! kind of input it takes and where its choices come from. Definitions are
//! read-only; they are built once into a [`FilterRegistry`](crate::FilterRegistry).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::FilterError;

/// The semantic type of a filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Free text.
    String,
    /// Numeric input.
    Number,
    /// Yes/no.
    Boolean,
    /// A single date.
    Date,
    /// A `from|to` date range.
    Daterange,
    /// One choice from a list.
    Select,
    /// Several choices from a list.
    Multiselect,
    /// One entity picked through a search endpoint.
    Autocomplete,
}

impl FilterType {
    /// Returns the configuration name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::String => "string",
            FilterType::Number => "number",
            FilterType::Boolean => "boolean",
            FilterType::Date => "date",
            FilterType::Daterange => "daterange",
            FilterType::Select => "select",
            FilterType::Multiselect => "multiselect",
            FilterType::Autocomplete => "autocomplete",
        }
    }

    /// Returns `true` for types whose choices come from an option list.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            FilterType::Select | FilterType::Multiselect | FilterType::Autocomplete
        )
    }
}

impl FromStr for FilterType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FilterType::String),
            "number" => Ok(FilterType::Number),
            "boolean" => Ok(FilterType::Boolean),
            "date" => Ok(FilterType::Date),
            "daterange" => Ok(FilterType::Daterange),
            "select" => Ok(FilterType::Select),
            "multiselect" => Ok(FilterType::Multiselect),
            "autocomplete" => Ok(FilterType::Autocomplete),
            other => Err(FilterError::UnknownFilterType(other.to_string())),
        }
    }
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A selectable choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value sent to the server.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl FilterOption {
    /// Creates an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        FilterOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

fn default_value_field() -> String {
    "id".to_string()
}

fn default_label_field() -> String {
    "name".to_string()
}

fn default_items_path() -> String {
    "items".to_string()
}

/// Configuration of one filterable column.
///
/// # Example
///
/// ```
/// use tablekit_filters::{FilterDefinition, FilterOption, FilterType};
///
/// let status = FilterDefinition::new("status", "Status", FilterType::Select)
///     .with_static_options(vec![
///         FilterOption::new("active", "Active"),
///         FilterOption::new("archived", "Archived"),
///     ]);
/// assert_eq!(status.value_field, "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefinition {
    /// Column key; unique within a table.
    pub column_key: String,
    /// Human-readable label.
    pub label: String,
    /// Semantic type of the column.
    pub filter_type: FilterType,
    /// Endpoint returning the full option list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_endpoint: Option<String>,
    /// Options known up front.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_options: Option<Vec<FilterOption>>,
    /// Endpoint used for incremental search (autocomplete).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_endpoint: Option<String>,
    /// Endpoint resolving a selected id back to its label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_endpoint: Option<String>,
    /// Field of a remote item holding its value.
    #[serde(default = "default_value_field")]
    pub value_field: String,
    /// Field of a remote item holding its label.
    #[serde(default = "default_label_field")]
    pub label_field: String,
    /// Dotted path to the item array in a remote response.
    #[serde(default = "default_items_path")]
    pub items_path: String,
}

/// Where a column's choices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource<'a> {
    /// Choices are listed in the definition.
    Static(&'a [FilterOption]),
    /// Choices are fetched in full from an endpoint.
    Remote { endpoint: &'a str },
    /// Choices are searched incrementally; selections may be resolved back.
    Search {
        endpoint: &'a str,
        resolve_endpoint: Option<&'a str>,
    },
    /// The column takes free input.
    None,
}

impl FilterDefinition {
    /// Creates a definition with default field names and no option source.
    pub fn new(column_key: impl Into<String>, label: impl Into<String>, filter_type: FilterType) -> Self {
        FilterDefinition {
            column_key: column_key.into(),
            label: label.into(),
            filter_type,
            options_endpoint: None,
            static_options: None,
            search_endpoint: None,
            resolve_endpoint: None,
            value_field: default_value_field(),
            label_field: default_label_field(),
            items_path: default_items_path(),
        }
    }

    /// Sets a static option list.
    pub fn with_static_options(mut self, options: Vec<FilterOption>) -> Self {
        self.static_options = Some(options);
        self
    }

    /// Sets the endpoint returning all options.
    pub fn with_options_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.options_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the search endpoint (and optionally the resolve endpoint).
    pub fn with_search_endpoint(
        mut self,
        endpoint: impl Into<String>,
        resolve_endpoint: Option<String>,
    ) -> Self {
        self.search_endpoint = Some(endpoint.into());
        self.resolve_endpoint = resolve_endpoint;
        self
    }

    /// Overrides the value and label field names of remote items.
    pub fn with_fields(mut self, value_field: impl Into<String>, label_field: impl Into<String>) -> Self {
        self.value_field = value_field.into();
        self.label_field = label_field.into();
        self
    }

    /// Overrides the path to the item array in remote responses.
    pub fn with_items_path(mut self, items_path: impl Into<String>) -> Self {
        self.items_path = items_path.into();
        self
    }

    /// Returns where this column's choices come from.
    ///
    /// Static options win over a search endpoint, which wins over an options
    /// endpoint.
    pub fn option_source(&self) -> OptionSource<'_> {
        if let Some(options) = &self.static_options {
            return OptionSource::Static(options);
        }
        if let Some(endpoint) = &self.search_endpoint {
            return OptionSource::Search {
                endpoint,
                resolve_endpoint: self.resolve_endpoint.as_deref(),
            };
        }
        if let Some(endpoint) = &self.options_endpoint {
            return OptionSource::Remote { endpoint };
        }
        OptionSource::None
    }

    /// Extracts options from a fetched remote response.
    ///
    /// The item array is found at `items_path` (a dotted path), or is the
    /// response itself when the response is an array. Each item yields its
    /// `value_field` and `label_field`; numeric and boolean ids are
    /// stringified, a missing label falls back to the value, and items with
    /// no usable value are skipped. Bare strings are both value and label.
    pub fn extract_options(&self, response: &JsonValue) -> Vec<FilterOption> {
        let items = match response {
            JsonValue::Array(items) => Some(items),
            _ => lookup_path(response, &self.items_path).and_then(JsonValue::as_array),
        };
        let Some(items) = items else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| match item {
                JsonValue::String(s) => Some(FilterOption::new(s.clone(), s.clone())),
                JsonValue::Object(_) => {
                    let value = scalar_to_string(item.get(&self.value_field)?)?;
                    let label = item
                        .get(&self.label_field)
                        .and_then(scalar_to_string)
                        .unwrap_or_else(|| value.clone());
                    Some(FilterOption { value, label })
                }
                _ => None,
            })
            .collect()
    }
}

fn lookup_path<'a>(root: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, |node, key| node.get(key))
}

fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
