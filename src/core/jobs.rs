use crate::core::client::UpstreamClient;
use crate::domain::model::{ApiResult, JobListing, JobQuery, JobSummary};
use crate::utils::error::Result;
use serde_json::Value;

/// 查詢 JobTech jobsearch API 並縮減成 `{id, title}` 清單
#[derive(Debug, Clone)]
pub struct JobSearch {
    client: UpstreamClient,
    endpoint: String,
    query: JobQuery,
}

impl JobSearch {
    pub fn new(client: UpstreamClient, endpoint: impl Into<String>, query: JobQuery) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            query,
        }
    }

    pub fn query(&self) -> &JobQuery {
        &self.query
    }

    /// Fetches the latest ads for the configured occupation field and location.
    /// Failures are reported in the envelope, never returned as `Err`.
    pub async fn latest_jobs(&self) -> ApiResult<JobListing> {
        match self.fetch().await {
            Ok(jobs) => {
                tracing::info!(
                    "✅ Fetched {} jobs for occupation field '{}' in {}",
                    jobs.len(),
                    self.query.occupation_field,
                    self.query.location
                );
                ApiResult::Success(JobListing::new(jobs))
            }
            Err(e) => {
                let detail = e.describe();
                tracing::error!("❌ Error fetching job ads: {}", detail);
                ApiResult::error(format!("Error fetching data from JobTech API: {}", detail))
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<JobSummary>> {
        let response = self
            .client
            .get(&self.endpoint, &self.query.to_params())
            .await?;
        let body: Value = response.json().await?;

        Ok(summarize_hits(&body))
    }
}

/// `hits` 不存在或不是陣列時回傳空清單
pub fn summarize_hits(body: &Value) -> Vec<JobSummary> {
    body.get("hits")
        .and_then(Value::as_array)
        .map(|hits| hits.iter().map(JobSummary::from_hit).collect())
        .unwrap_or_default()
}
