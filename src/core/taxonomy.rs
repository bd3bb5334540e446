use crate::core::client::UpstreamClient;
use crate::domain::model::{ApiResult, TaxonomyConcept, TaxonomyQuery, TaxonomyResults};
use crate::utils::error::{ProxyError, Result};
use serde_json::Value;

const SNIPPET_CHARS: usize = 200;

/// Looks up taxonomy concepts (by default occupation fields) by free text.
#[derive(Debug, Clone)]
pub struct TaxonomySearch {
    client: UpstreamClient,
    endpoint: String,
    query: TaxonomyQuery,
}

impl TaxonomySearch {
    pub fn new(client: UpstreamClient, endpoint: impl Into<String>, query: TaxonomyQuery) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            query,
        }
    }

    pub fn default_text(&self) -> &str {
        &self.query.default_text
    }

    pub async fn search(&self, text: &str) -> ApiResult<TaxonomyResults> {
        match self.fetch(text).await {
            Ok(results) => {
                log_concepts(&self.query.concept_type, text, &results);
                ApiResult::Success(TaxonomyResults { results })
            }
            Err(ProxyError::Decode { message, snippet }) => {
                tracing::error!("❌ {}", message);
                tracing::warn!("Raw taxonomy response: {}...", snippet);
                ApiResult::error(message)
            }
            Err(e) => {
                let detail = e.describe();
                tracing::error!("❌ Network error fetching taxonomy data: {}", detail);
                ApiResult::error(format!("Network Error: {}", detail))
            }
        }
    }

    async fn fetch(&self, text: &str) -> Result<Vec<TaxonomyConcept>> {
        let response = self
            .client
            .get(&self.endpoint, &self.query.to_params(text))
            .await?;
        let raw = response.text().await?;

        let body: Value = serde_json::from_str(&raw).map_err(|e| ProxyError::Decode {
            message: format!("Taxonomy API returned non-JSON data. Error: {}", e),
            snippet: raw.chars().take(SNIPPET_CHARS).collect(),
        })?;

        Ok(normalize_concepts(body))
    }
}

/// 上游可能回傳陣列或 `{"concepts": [...]}`，兩者都不是時回傳空清單
pub fn normalize_concepts(body: Value) -> Vec<TaxonomyConcept> {
    let concepts = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("concepts") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    concepts.into_iter().map(TaxonomyConcept).collect()
}

fn log_concepts(concept_type: &str, text: &str, concepts: &[TaxonomyConcept]) {
    if concepts.is_empty() {
        tracing::info!(
            "🔍 No {} results found for '{}'. Try a different query (e.g. 'Data')",
            concept_type,
            text
        );
        return;
    }

    tracing::info!("🔍 Taxonomy search results for '{}':", text);
    for concept in concepts {
        tracing::info!(
            "  - ID: {}, Term: {}",
            concept.id().unwrap_or("N/A"),
            concept.term().unwrap_or("N/A")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn taxonomy_search(endpoint: String) -> TaxonomySearch {
        let client = UpstreamClient::new("test-agent/1.0", None).unwrap();
        TaxonomySearch::new(client, endpoint, TaxonomyQuery::default())
    }

    fn results_of(result: ApiResult<TaxonomyResults>) -> Vec<Value> {
        match result {
            ApiResult::Success(r) => r.results.into_iter().map(|c| c.0).collect(),
            ApiResult::Error { message } => panic!("expected success, got error: {}", message),
        }
    }

    #[tokio::test]
    async fn test_bare_array_is_returned_unchanged() {
        let server = MockServer::start_async().await;
        let concepts = json!([
            {"id": "apaJ_2ja_LuF", "term": "Data/IT", "type": "occupation-field"},
            {"id": "x", "term": "Other", "deprecated_legacy_id": "3"}
        ]);
        let body = concepts.clone();
        let api_mock = server
            .mock_async(move |when, then| {
                when.method(GET)
                    .path("/concepts")
                    .query_param("text", "Data")
                    .query_param("type", "occupation-field")
                    .query_param("limit", "5");
                then.status(200).json_body(body);
            })
            .await;

        let results = results_of(taxonomy_search(server.url("/concepts")).search("Data").await);
        api_mock.assert_async().await;

        assert_eq!(Value::Array(results), concepts);
    }

    #[tokio::test]
    async fn test_nested_concepts_array_is_unwrapped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/concepts");
                then.status(200).json_body(json!({
                    "concepts": [{"id": "a1", "term": "IT"}],
                    "total": 1
                }));
            })
            .await;

        let results = results_of(taxonomy_search(server.url("/concepts")).search("IT").await);
        assert_eq!(results, vec![json!({"id": "a1", "term": "IT"})]);
    }

    #[tokio::test]
    async fn test_unexpected_shape_yields_empty_results() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/concepts");
                then.status(200).json_body(json!({"items": [{"id": "a1"}]}));
            })
            .await;

        let results = results_of(taxonomy_search(server.url("/concepts")).search("IT").await);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_body_reports_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/concepts");
                then.status(200).body("<!DOCTYPE html><html>gateway page</html>");
            })
            .await;

        let result = taxonomy_search(server.url("/concepts")).search("IT").await;
        match result {
            ApiResult::Error { message } => {
                assert!(message.starts_with("Taxonomy API returned non-JSON data. Error: "));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_reports_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/concepts");
                then.status(500);
            })
            .await;

        let result = taxonomy_search(server.url("/concepts")).search("IT").await;
        match result {
            ApiResult::Error { message } => assert!(message.starts_with("Network Error: ")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_reports_network_error() {
        let result = taxonomy_search("http://127.0.0.1:1/concepts".to_string())
            .search("IT")
            .await;
        match result {
            ApiResult::Error { message } => {
                assert!(message.starts_with("Network Error: "));
                assert!(message.to_lowercase().contains("connection refused"), "{}", message);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_decode_snippet_is_truncated_on_char_boundary() {
        // 每個字元都是多位元組，位元組切割會落在字元中間
        let raw: String = "<p>Överföring pågår ✓ — försök igen</p>".repeat(20);
        assert!(raw.chars().count() > SNIPPET_CHARS);
        let body = raw.clone();

        let server = MockServer::start_async().await;
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/concepts");
                then.status(200).body(body);
            })
            .await;

        let err = taxonomy_search(server.url("/concepts"))
            .fetch("IT")
            .await
            .unwrap_err();

        match err {
            ProxyError::Decode { message, snippet } => {
                assert!(message.starts_with("Taxonomy API returned non-JSON data. Error: "));
                assert_eq!(snippet.chars().count(), SNIPPET_CHARS);
                assert!(raw.starts_with(&snippet));
                assert!(snippet.len() < raw.len());
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_concepts_shapes() {
        assert_eq!(normalize_concepts(json!([{"id": "1"}])).len(), 1);
        assert_eq!(normalize_concepts(json!({"concepts": [{}, {}]})).len(), 2);
        assert!(normalize_concepts(json!({"concepts": "nope"})).is_empty());
        assert!(normalize_concepts(json!("text")).is_empty());
        assert!(normalize_concepts(Value::Null).is_empty());
    }
}
