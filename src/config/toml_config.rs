use crate::config::{
    default_allowed_origins, validate_provider, DEFAULT_BIND_ADDRESS, DEFAULT_CONCEPT_TYPE,
    DEFAULT_JOB_LIMIT, DEFAULT_JOB_SEARCH_ENDPOINT, DEFAULT_LOCATION, DEFAULT_OCCUPATION_FIELD,
    DEFAULT_TAXONOMY_ENDPOINT, DEFAULT_TAXONOMY_LIMIT, DEFAULT_TAXONOMY_TEXT, DEFAULT_USER_AGENT,
};
use crate::domain::model::{JobQuery, TaxonomyQuery};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub upstream: UpstreamSection,
    pub jobs: JobsSection,
    pub taxonomy: TaxonomySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_address: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSection {
    pub user_agent: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsSection {
    pub endpoint: String,
    pub occupation_field: String,
    pub location: String,
    pub limit: u32,
}

impl Default for JobsSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_JOB_SEARCH_ENDPOINT.to_string(),
            occupation_field: DEFAULT_OCCUPATION_FIELD.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            limit: DEFAULT_JOB_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomySection {
    pub endpoint: String,
    pub concept_type: String,
    pub limit: u32,
    pub default_query: String,
}

impl Default for TaxonomySection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TAXONOMY_ENDPOINT.to_string(),
            concept_type: DEFAULT_CONCEPT_TYPE.to_string(),
            limit: DEFAULT_TAXONOMY_LIMIT,
            default_query: DEFAULT_TAXONOMY_TEXT.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProxyError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProxyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${JOBTECH_USER_AGENT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProxyError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind_address
    }

    fn allowed_origins(&self) -> &[String] {
        &self.server.allowed_origins
    }

    fn user_agent(&self) -> &str {
        &self.upstream.user_agent
    }

    fn upstream_timeout_secs(&self) -> Option<u64> {
        self.upstream.timeout_seconds
    }

    fn job_search_endpoint(&self) -> &str {
        &self.jobs.endpoint
    }

    fn job_query(&self) -> JobQuery {
        JobQuery {
            occupation_field: self.jobs.occupation_field.clone(),
            location: self.jobs.location.clone(),
            limit: self.jobs.limit,
        }
    }

    fn taxonomy_endpoint(&self) -> &str {
        &self.taxonomy.endpoint
    }

    fn taxonomy_query(&self) -> TaxonomyQuery {
        TaxonomyQuery {
            concept_type: self.taxonomy.concept_type.clone(),
            limit: self.taxonomy.limit,
            default_text: self.taxonomy.default_query.clone(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self).map(|_| ())
    }
}
