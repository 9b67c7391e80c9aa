//! Row type shared by the page cache, offline store and remote client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form attribute set of a row, keyed by field name.
pub type Attributes = Map<String, Value>;

/// A uniquely identified row.
///
/// The id is stable across the page cache and the offline store; every
/// lookup and patch keys on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub id: String,
  #[serde(default)]
  pub attributes: Attributes,
}

impl Record {
  pub fn new(id: impl Into<String>, attributes: Attributes) -> Self {
    Self {
      id: id.into(),
      attributes,
    }
  }

  /// Build a record from a flat wire object, taking the id from `id_field`.
  ///
  /// Returns None if the object has no usable id.
  pub fn from_wire(value: Value, id_field: &str) -> Option<Self> {
    let Value::Object(attributes) = value else {
      return None;
    };
    let id = attributes.get(id_field).and_then(display_value)?;
    if id.is_empty() {
      return None;
    }
    Some(Self { id, attributes })
  }

  /// Get an attribute rendered as display text.
  pub fn text(&self, field: &str) -> String {
    self
      .attributes
      .get(field)
      .and_then(display_value)
      .unwrap_or_default()
  }

  /// Merge a partial attribute set into this record. Keys in `partial` win.
  pub fn merge(&mut self, partial: &Attributes) {
    for (key, value) in partial {
      self.attributes.insert(key.clone(), value.clone());
    }
  }
}

/// Render a scalar JSON value as plain text. Objects and arrays yield None.
pub fn display_value(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Null => Some(String::new()),
    _ => None,
  }
}

/// Build an attribute map from string pairs.
#[cfg(test)]
pub fn attributes_from_pairs<I, K, V>(pairs: I) -> Attributes
where
  I: IntoIterator<Item = (K, V)>,
  K: Into<String>,
  V: Into<String>,
{
  pairs
    .into_iter()
    .map(|(k, v)| (k.into(), Value::String(v.into())))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_from_wire_uses_id_field() {
    let record = Record::from_wire(
      json!({"name": "Ali", "phone": "0300-1234567", "status": "Pending"}),
      "phone",
    )
    .unwrap();
    assert_eq!(record.id, "0300-1234567");
    assert_eq!(record.text("name"), "Ali");
  }

  #[test]
  fn test_from_wire_numeric_id() {
    let record = Record::from_wire(json!({"id": 42, "name": "Shoes"}), "id").unwrap();
    assert_eq!(record.id, "42");
  }

  #[test]
  fn test_from_wire_missing_id() {
    assert!(Record::from_wire(json!({"name": "No id"}), "id").is_none());
    assert!(Record::from_wire(json!({"id": ""}), "id").is_none());
    assert!(Record::from_wire(json!([1, 2]), "id").is_none());
  }

  #[test]
  fn test_merge_overwrites_and_keeps_other_fields() {
    let mut record = Record::new(
      "1",
      attributes_from_pairs([("name", "Old"), ("status", "Active")]),
    );
    record.merge(&attributes_from_pairs([("name", "New")]));
    assert_eq!(record.text("name"), "New");
    assert_eq!(record.text("status"), "Active");
  }
}
