use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::api_types::{
  create_mutation, delete_mutation, page_query, update_mutation, ApiPage, GraphqlRequest,
  GraphqlResponse,
};
use super::{PageResponse, RemoteDataService};
use crate::collection::Collection;
use crate::config::{Config, ServiceConfig};
use crate::error::{SyncError, SyncResult};
use crate::record::{display_value, Attributes, Record};
use crate::sync::QuerySpec;

/// Storefront GraphQL API client
#[derive(Clone)]
pub struct GraphqlClient {
  http: reqwest::Client,
  endpoint: Url,
}

impl GraphqlClient {
  pub fn new(service: &ServiceConfig) -> Result<Self> {
    let endpoint =
      Url::parse(&service.url).map_err(|e| eyre!("Invalid service url {}: {}", service.url, e))?;

    let mut headers = HeaderMap::new();
    if let Some(token) = Config::get_api_token() {
      let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| eyre!("Invalid API token: {}", e))?;
      headers.insert(AUTHORIZATION, value);
    }

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(service.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, endpoint })
  }

  /// POST one GraphQL document and return the named top-level field.
  async fn execute(&self, query: &str, variables: Value, field: &str) -> Result<Value, String> {
    debug!(field, "graphql request");
    let response = self
      .http
      .post(self.endpoint.clone())
      .json(&GraphqlRequest { query, variables })
      .send()
      .await
      .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(format!("{} {}", status, body.trim()));
    }

    let body: GraphqlResponse = response.json().await.map_err(|e| e.to_string())?;
    body.into_field(field)
  }

  async fn mutate_record(
    &self,
    collection: Collection,
    query: &str,
    variables: Value,
    field: &str,
  ) -> SyncResult<Record> {
    let value = self
      .execute(query, variables, field)
      .await
      .map_err(SyncError::Mutation)?;
    Record::from_wire(value, collection.id_field())
      .ok_or_else(|| SyncError::Mutation(format!("{} returned no {}", field, collection.id_field())))
  }
}

#[async_trait]
impl RemoteDataService for GraphqlClient {
  async fn query_page(&self, collection: Collection, spec: &QuerySpec) -> SyncResult<PageResponse> {
    let field = collection.operations().list;
    let variables = serde_json::to_value(spec.to_wire())
      .map_err(|e| SyncError::Network(e.to_string()))?;

    let value = self
      .execute(&page_query(collection), variables, field)
      .await
      .map_err(SyncError::Network)?;
    let page: ApiPage =
      serde_json::from_value(value).map_err(|e| SyncError::Network(e.to_string()))?;

    let rows = page
      .data
      .into_iter()
      .filter_map(|row| Record::from_wire(row, collection.id_field()))
      .collect();
    Ok(PageResponse {
      rows,
      total: page.total,
    })
  }

  async fn create(&self, collection: Collection, input: &Attributes) -> SyncResult<Record> {
    let ops = collection.operations();
    self
      .mutate_record(
        collection,
        &create_mutation(collection),
        json!({ "input": input }),
        ops.create,
      )
      .await
  }

  async fn update(
    &self,
    collection: Collection,
    id: &str,
    input: &Attributes,
  ) -> SyncResult<Record> {
    let ops = collection.operations();
    self
      .mutate_record(
        collection,
        &update_mutation(collection),
        json!({ "id": id, "input": input }),
        ops.update,
      )
      .await
  }

  async fn delete(&self, collection: Collection, id: &str) -> SyncResult<String> {
    let ops = collection.operations();
    let value = self
      .execute(&delete_mutation(collection), json!({ "id": id }), ops.delete)
      .await
      .map_err(SyncError::Mutation)?;
    Ok(
      value
        .get(collection.id_field())
        .and_then(display_value)
        .unwrap_or_else(|| id.to_string()),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::attributes_from_pairs;
  use crate::sync::query_spec::QueryInputs;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;
  use tokio::task::JoinHandle;

  /// Whether `raw` holds the full header block and the body it announces.
  fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
      return false;
    };
    let length = text[..header_end]
      .lines()
      .find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name
          .eq_ignore_ascii_case("content-length")
          .then(|| value.trim().parse::<usize>().ok())
          .flatten()
      })
      .unwrap_or(0);
    raw.len() >= header_end + 4 + length
  }

  /// Answer one request with a canned response. The handle yields the raw
  /// request text.
  async fn serve_once(status: &'static str, body: Value) -> (ServiceConfig, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
      let (mut stream, _) = listener.accept().await.unwrap();
      let mut request = Vec::new();
      let mut buf = [0u8; 4096];
      while !request_complete(&request) {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
          break;
        }
        request.extend_from_slice(&buf[..n]);
      }
      let payload = body.to_string();
      let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        payload.len(),
        payload
      );
      stream.write_all(response.as_bytes()).await.unwrap();
      let _ = stream.shutdown().await;
      String::from_utf8_lossy(&request).into_owned()
    });
    let service = ServiceConfig {
      url: format!("http://{}/graphql", addr),
      timeout_secs: 5,
    };
    (service, handle)
  }

  #[tokio::test]
  async fn test_query_page_parses_rows_and_sends_wire_page() {
    let (service, server) = serve_once(
      "200 OK",
      json!({"data": {"customersPaginated": {
        "data": [{"phone": "0300-1111111", "name": "Ali", "status": "Pending"}],
        "total": 11
      }}}),
    )
    .await;
    let client = GraphqlClient::new(&service).unwrap();
    let spec = QueryInputs::new(Collection::Customers, 10).build();

    let page = client.query_page(Collection::Customers, &spec).await.unwrap();
    assert_eq!(page.total, 11);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].id, "0300-1111111");
    assert_eq!(page.rows[0].text("name"), "Ali");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /graphql"));
    assert!(request.contains("customersPaginated(page: $page"));
    assert!(request.contains("\"page\":1"));
    assert!(request.contains("\"limit\":10"));
  }

  #[tokio::test]
  async fn test_non_success_status_is_network_error() {
    let (service, server) = serve_once("500 Internal Server Error", json!({"message": "boom"})).await;
    let client = GraphqlClient::new(&service).unwrap();
    let spec = QueryInputs::new(Collection::Brands, 10).build();

    let err = client.query_page(Collection::Brands, &spec).await.unwrap_err();
    match err {
      SyncError::Network(message) => {
        assert!(message.starts_with("500"), "{}", message);
        assert!(message.contains("boom"), "{}", message);
      }
      other => panic!("unexpected error {:?}", other),
    }
    server.await.unwrap();
  }

  #[tokio::test]
  async fn test_graphql_errors_reject_mutation() {
    let (service, server) = serve_once(
      "200 OK",
      json!({"data": null, "errors": [{"message": "Customer already exists"}]}),
    )
    .await;
    let client = GraphqlClient::new(&service).unwrap();
    let input = attributes_from_pairs([("name", "Ali"), ("phone", "0300-1111111")]);

    let err = client.create(Collection::Customers, &input).await.unwrap_err();
    assert_eq!(err, SyncError::Mutation("Customer already exists".to_string()));

    let request = server.await.unwrap();
    assert!(request.contains("createCustomer(createCustomerInput: $input)"));
    assert!(request.contains("\"phone\":\"0300-1111111\""));
  }

  #[tokio::test]
  async fn test_delete_returns_confirmed_id() {
    let (service, server) =
      serve_once("200 OK", json!({"data": {"removeVariation": {"id": 7}}})).await;
    let client = GraphqlClient::new(&service).unwrap();

    let id = client.delete(Collection::Variations, "7").await.unwrap();
    assert_eq!(id, "7");
    assert!(server.await.unwrap().contains("removeVariation(id: $id)"));
  }
}
