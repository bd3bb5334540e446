use crate::utils::error::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Shared outbound client. Every request carries the configured
/// `User-Agent` and `Accept: application/json`.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new(user_agent: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent.to_string());

        if let Some(timeout) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// 送出 GET 請求，非 2xx 狀態一律視為錯誤
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<reqwest::Response> {
        tracing::debug!("📡 GET {} {:?}", endpoint, params);

        let response = self.client.get(endpoint).query(params).send().await?;
        tracing::debug!("📡 Upstream response status: {}", response.status());

        Ok(response.error_for_status()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ProxyError;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_sends_default_headers_and_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/echo")
                    .header("user-agent", "test-agent/1.0")
                    .header("accept", "application/json")
                    .query_param("limit", "3");
                then.status(200).body("ok");
            })
            .await;

        let client = UpstreamClient::new("test-agent/1.0", None).unwrap();
        let response = client
            .get(&server.url("/echo"), &[("limit", "3".to_string())])
            .await
            .unwrap();

        assert_eq!(response.text().await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = UpstreamClient::new("test-agent/1.0", None).unwrap();
        let err = client.get(&server.url("/missing"), &[]).await.unwrap_err();

        match err {
            ProxyError::Network(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(404)),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_user_agent_fails_to_build() {
        assert!(UpstreamClient::new("bad\nagent", None).is_err());
    }
}
