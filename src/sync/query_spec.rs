//! Builds the canonical request descriptor from raw list-view inputs.

use chrono::NaiveDate;
use serde::Serialize;

use crate::collection::Collection;

/// Grid pagination state. `page` is 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationModel {
  pub page: usize,
  pub page_size: usize,
}

impl Default for PaginationModel {
  fn default() -> Self {
    Self {
      page: 0,
      page_size: 10,
    }
  }
}

/// Per-column filter values, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFilterModel {
  pub items: Vec<ColumnFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
  pub field: String,
  pub value: String,
}

impl ColumnFilterModel {
  pub fn new<I, F, V>(items: I) -> Self
  where
    I: IntoIterator<Item = (F, V)>,
    F: Into<String>,
    V: Into<String>,
  {
    Self {
      items: items
        .into_iter()
        .map(|(field, value)| ColumnFilter {
          field: field.into(),
          value: value.into(),
        })
        .collect(),
    }
  }
}

/// One paginated, filtered request. Pages are 0-indexed here and converted
/// to the 1-indexed wire form by [`QuerySpec::to_wire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
  pub page: usize,
  pub limit: usize,
  pub search: String,
  pub status: Option<String>,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
}

impl QuerySpec {
  /// Same request apart from the page number.
  pub fn same_filters(&self, other: &QuerySpec) -> bool {
    self.limit == other.limit
      && self.search == other.search
      && self.status == other.status
      && self.start_date == other.start_date
      && self.end_date == other.end_date
  }

  #[cfg(test)]
  pub fn with_page(&self, page: usize) -> Self {
    Self {
      page,
      ..self.clone()
    }
  }

  /// Variables sent to the remote service.
  pub fn to_wire(&self) -> WireQuery {
    WireQuery {
      page: self.page + 1,
      limit: self.limit,
      search: (!self.search.is_empty()).then(|| self.search.clone()),
      status: self.status.clone(),
      start_date: self.start_date,
      end_date: self.end_date,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQuery {
  pub page: usize,
  pub limit: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_date: Option<NaiveDate>,
}

/// Raw inputs of one list view.
#[derive(Debug, Clone)]
pub struct QueryInputs {
  pub collection: Collection,
  /// Debounced free-text search
  pub search: String,
  pub column_filters: ColumnFilterModel,
  pub status_label: String,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
  pub pagination: PaginationModel,
}

impl QueryInputs {
  pub fn new(collection: Collection, page_size: usize) -> Self {
    Self {
      collection,
      search: String::new(),
      column_filters: ColumnFilterModel::default(),
      status_label: "All".to_string(),
      start_date: None,
      end_date: None,
      pagination: PaginationModel { page: 0, page_size },
    }
  }

  /// Merge all inputs into one spec.
  pub fn build(&self) -> QuerySpec {
    let search = self
      .column_filters
      .items
      .iter()
      .map(|f| f.value.trim())
      .chain(std::iter::once(self.search.trim()))
      .filter(|v| !v.is_empty())
      .collect::<Vec<_>>()
      .join(" ");

    QuerySpec {
      page: self.pagination.page,
      limit: self.pagination.page_size,
      search,
      status: self
        .collection
        .status_for_label(&self.status_label)
        .map(String::from),
      start_date: self.start_date,
      end_date: self.end_date,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn inputs() -> QueryInputs {
    QueryInputs::new(Collection::Customers, 10)
  }

  #[test]
  fn test_default_spec() {
    let spec = inputs().build();
    assert_eq!(spec.page, 0);
    assert_eq!(spec.limit, 10);
    assert_eq!(spec.search, "");
    assert_eq!(spec.status, None);
  }

  #[test]
  fn test_column_filters_and_search_are_joined() {
    let mut i = inputs();
    i.search = " john ".to_string();
    i.column_filters = ColumnFilterModel::new([("name", "ali"), ("phone", " "), ("status", "x")]);
    assert_eq!(i.build().search, "ali x john");
  }

  #[test]
  fn test_status_label_mapping() {
    let mut i = inputs();
    i.status_label = "Pending Payments".to_string();
    assert_eq!(i.build().status.as_deref(), Some("Pending"));

    i.status_label = "Whatever".to_string();
    assert_eq!(i.build().status, None);
  }

  #[test]
  fn test_wire_page_is_one_indexed() {
    let mut i = inputs();
    i.pagination.page = 2;
    let wire = i.build().to_wire();
    assert_eq!(wire.page, 3);
    assert_eq!(wire.search, None);
  }

  #[test]
  fn test_wire_serialization_uses_camel_case() {
    let mut i = inputs();
    i.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
    let value = serde_json::to_value(i.build().to_wire()).unwrap();
    assert_eq!(value["startDate"], "2024-01-01");
    assert!(value.get("endDate").is_none());
  }

  #[test]
  fn test_same_filters_ignores_page() {
    let spec = inputs().build();
    assert!(spec.same_filters(&spec.with_page(4)));

    let mut i = inputs();
    i.search = "x".into();
    assert!(!spec.same_filters(&i.build()));
  }
}
