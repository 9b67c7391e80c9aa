//! GraphQL request/response shapes and document builders.
//!
//! Documents are built from a collection's operation names and field
//! selection so every collection shares one client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;

#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a> {
  pub query: &'a str,
  pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
  pub data: Option<Value>,
  #[serde(default)]
  pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
  pub message: String,
}

impl GraphqlResponse {
  /// Take the payload of a top-level field, or the joined error messages.
  pub fn into_field(self, field: &str) -> Result<Value, String> {
    if !self.errors.is_empty() {
      let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
      return Err(messages.join("; "));
    }
    self
      .data
      .and_then(|mut data| data.get_mut(field).map(Value::take))
      .filter(|v| !v.is_null())
      .ok_or_else(|| format!("Response is missing '{}'", field))
  }
}

/// Paginated list payload: `{ data: [...], total }`
#[derive(Debug, Deserialize)]
pub struct ApiPage {
  #[serde(default)]
  pub data: Vec<Value>,
  #[serde(default)]
  pub total: u64,
}

fn selection_set(collection: Collection) -> String {
  collection.selection().join(" ")
}

pub fn page_query(collection: Collection) -> String {
  let ops = collection.operations();
  format!(
    "query Page($page: Int!, $limit: Int!, $search: String, $status: String, \
     $startDate: String, $endDate: String) {{ \
     {list}(page: $page, limit: $limit, search: $search, status: $status, \
     startDate: $startDate, endDate: $endDate) {{ data {{ {fields} }} total }} }}",
    list = ops.list,
    fields = selection_set(collection),
  )
}

pub fn create_mutation(collection: Collection) -> String {
  let ops = collection.operations();
  format!(
    "mutation Create($input: {input_type}!) {{ {op}({arg}: $input) {{ {fields} }} }}",
    input_type = ops.input_type,
    op = ops.create,
    arg = ops.create_input,
    fields = selection_set(collection),
  )
}

pub fn update_mutation(collection: Collection) -> String {
  let ops = collection.operations();
  format!(
    "mutation Update($id: String!, $input: {input_type}!) {{ \
     {op}({id_field}: $id, {arg}: $input) {{ {fields} }} }}",
    input_type = ops.input_type,
    op = ops.update,
    id_field = collection.id_field(),
    arg = ops.update_input,
    fields = selection_set(collection),
  )
}

pub fn delete_mutation(collection: Collection) -> String {
  let ops = collection.operations();
  format!(
    "mutation Delete($id: String!) {{ {op}({id_field}: $id) {{ {id_field} }} }}",
    op = ops.delete,
    id_field = collection.id_field(),
  )
}
