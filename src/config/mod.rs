pub mod toml_config;

use crate::domain::model::{JobQuery, TaxonomyQuery};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_JOB_SEARCH_ENDPOINT: &str = "https://jobsearch.api.jobtechdev.se/search";
pub const DEFAULT_TAXONOMY_ENDPOINT: &str =
    "https://taxonomy.api.jobtechdev.se/v1/taxonomy/main/concepts";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "sisyphus-backend/",
    env!("CARGO_PKG_VERSION"),
    " (Job Seeker App)"
);
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Data/IT
pub const DEFAULT_OCCUPATION_FIELD: &str = "apaJ_2ja_LuF";
pub const DEFAULT_LOCATION: &str = "Stockholm";
pub const DEFAULT_JOB_LIMIT: u32 = 10;

pub const DEFAULT_CONCEPT_TYPE: &str = "occupation-field";
pub const DEFAULT_TAXONOMY_LIMIT: u32 = 5;
pub const DEFAULT_TAXONOMY_TEXT: &str = "IT";

pub(crate) const MAX_QUERY_LIMIT: u32 = 100;
pub(crate) const MAX_TIMEOUT_SECS: u64 = 300;

pub fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sisyphus-backend")]
#[command(about = "Proxy for the JobTech job-search and taxonomy APIs")]
pub struct CliConfig {
    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    #[arg(long, value_delimiter = ',', default_values_t = default_allowed_origins())]
    pub allowed_origins: Vec<String>,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, help = "Upstream request timeout in seconds (client default when unset)")]
    pub upstream_timeout_secs: Option<u64>,

    #[arg(long, default_value = DEFAULT_JOB_SEARCH_ENDPOINT)]
    pub job_search_endpoint: String,

    #[arg(long, default_value = DEFAULT_OCCUPATION_FIELD)]
    pub occupation_field: String,

    #[arg(long, default_value = DEFAULT_LOCATION)]
    pub location: String,

    #[arg(long, default_value_t = DEFAULT_JOB_LIMIT)]
    pub job_limit: u32,

    #[arg(long, default_value = DEFAULT_TAXONOMY_ENDPOINT)]
    pub taxonomy_endpoint: String,

    #[arg(long, default_value = DEFAULT_CONCEPT_TYPE)]
    pub concept_type: String,

    #[arg(long, default_value_t = DEFAULT_TAXONOMY_LIMIT)]
    pub taxonomy_limit: u32,

    #[arg(long, default_value = DEFAULT_TAXONOMY_TEXT)]
    pub taxonomy_default_text: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn bind_address(&self) -> &str {
        &self.bind_address
    }

    fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn upstream_timeout_secs(&self) -> Option<u64> {
        self.upstream_timeout_secs
    }

    fn job_search_endpoint(&self) -> &str {
        &self.job_search_endpoint
    }

    fn job_query(&self) -> JobQuery {
        JobQuery {
            occupation_field: self.occupation_field.clone(),
            location: self.location.clone(),
            limit: self.job_limit,
        }
    }

    fn taxonomy_endpoint(&self) -> &str {
        &self.taxonomy_endpoint
    }

    fn taxonomy_query(&self) -> TaxonomyQuery {
        TaxonomyQuery {
            concept_type: self.concept_type.clone(),
            limit: self.taxonomy_limit,
            default_text: self.taxonomy_default_text.clone(),
        }
    }
}

/// CLI 與 TOML 共用的驗證規則，成功時回傳解析後的監聽位址
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<SocketAddr> {
    let addr = validation::validate_socket_addr("server.bind_address", config.bind_address())?;
    for origin in config.allowed_origins() {
        validation::validate_origin("server.allowed_origins", origin)?;
    }

    validation::validate_non_empty_string("upstream.user_agent", config.user_agent())?;
    if let Some(timeout) = config.upstream_timeout_secs() {
        validation::validate_range("upstream.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECS)?;
    }

    validation::validate_url("jobs.endpoint", config.job_search_endpoint())?;
    let jobs = config.job_query();
    validation::validate_non_empty_string("jobs.occupation_field", &jobs.occupation_field)?;
    validation::validate_range("jobs.limit", jobs.limit, 1, MAX_QUERY_LIMIT)?;

    validation::validate_url("taxonomy.endpoint", config.taxonomy_endpoint())?;
    let taxonomy = config.taxonomy_query();
    validation::validate_non_empty_string("taxonomy.concept_type", &taxonomy.concept_type)?;
    validation::validate_range("taxonomy.limit", taxonomy.limit, 1, MAX_QUERY_LIMIT)?;

    Ok(addr)
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self).map(|_| ())
    }
}
