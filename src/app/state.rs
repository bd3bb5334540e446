use crate::core::client::UpstreamClient;
use crate::core::jobs::JobSearch;
use crate::core::taxonomy::TaxonomySearch;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;

/// 每個請求共用的唯讀狀態
#[derive(Debug, Clone)]
pub struct AppState {
    pub jobs: JobSearch,
    pub taxonomy: TaxonomySearch,
}

impl AppState {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = UpstreamClient::new(config.user_agent(), config.upstream_timeout_secs())?;

        Ok(Self {
            jobs: JobSearch::new(
                client.clone(),
                config.job_search_endpoint(),
                config.job_query(),
            ),
            taxonomy: TaxonomySearch::new(
                client,
                config.taxonomy_endpoint(),
                config.taxonomy_query(),
            ),
        })
    }
}
