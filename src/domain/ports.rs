use crate::domain::model::{JobQuery, TaxonomyQuery};

/// 伺服器啟動所需的設定來源（CLI 或 TOML）
pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn allowed_origins(&self) -> &[String];
    fn user_agent(&self) -> &str;
    fn upstream_timeout_secs(&self) -> Option<u64>;
    fn job_search_endpoint(&self) -> &str;
    fn job_query(&self) -> JobQuery;
    fn taxonomy_endpoint(&self) -> &str;
    fn taxonomy_query(&self) -> TaxonomyQuery;
}
