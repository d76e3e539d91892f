use std::fmt;

use serde::Serialize;

use crate::{KnackProxyError, Result};

/// Single record filter condition.
///
/// Serialized as `{"field": ..., "operator": ..., "value": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Filter {
    /// Field key, e.g. `field_12`.
    pub field: String,
    /// Platform operator such as `is`, `is not`, `contains`.
    pub operator: String,
    /// Value compared against.
    pub value: serde_json::Value,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Shorthand for the `is` operator.
    pub fn is(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(field, "is", value)
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Page size of a record query.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RowsPerPage {
    /// Fetch every matching record.
    #[default]
    All,
    Count(u32),
}

impl fmt::Display for RowsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Count(rows) => write!(f, "{rows}"),
        }
    }
}

impl From<u32> for RowsPerPage {
    fn from(rows: u32) -> Self {
        Self::Count(rows)
    }
}

/// Record query parameters for `find` and `delete_multiple`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FindQuery {
    pub filters: Vec<Filter>,
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub rows_per_page: RowsPerPage,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter condition.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sorts by `field` in `order`.
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    /// Limits the page size; the default fetches every record.
    pub fn rows_per_page(mut self, rows: u32) -> Self {
        self.rows_per_page = RowsPerPage::Count(rows);
        self
    }

    /// Renders the query string without the leading `?`.
    ///
    /// All four parameters are always present, in a fixed order; absent sort
    /// settings are sent as empty values.
    pub fn to_query_string(&self) -> Result<String> {
        let filters = serde_json::to_string(&self.filters)
            .map_err(|err| KnackProxyError::Encode(format!("invalid filters: {err}")))?;
        let sort_field = self.sort_field.as_deref().unwrap_or_default();
        let sort_order = self.sort_order.map(SortOrder::as_str).unwrap_or_default();

        Ok(format!(
            "rows_per_page={}&filters={}&sort_field={}&sort_order={}",
            self.rows_per_page,
            urlencoding::encode(&filters),
            urlencoding::encode(sort_field),
            urlencoding::encode(sort_order),
        ))
    }
}
