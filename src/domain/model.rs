use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 回傳給瀏覽器的職缺摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl JobSummary {
    /// 從上游 `hits` 裡的一筆紀錄取出 `id` 與 `headline`
    pub fn from_hit(hit: &Value) -> Self {
        Self {
            id: hit.get("id").and_then(scalar_to_string),
            title: hit.get("headline").and_then(scalar_to_string),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Taxonomy concept, kept exactly as upstream sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonomyConcept(pub Value);

impl TaxonomyConcept {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn term(&self) -> Option<&str> {
        self.0.get("term").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub data: Vec<JobSummary>,
    pub count: usize,
}

impl JobListing {
    pub fn new(data: Vec<JobSummary>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyResults {
    pub results: Vec<TaxonomyConcept>,
}

/// Response envelope shared by every proxy endpoint.
///
/// Serializes as `{"status": "success", ...payload}` or
/// `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResult<T> {
    Success(T),
    Error { message: String },
}

impl<T> ApiResult<T> {
    pub fn error(message: impl Into<String>) -> Self {
        ApiResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }
}

/// 職缺搜尋的固定查詢條件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobQuery {
    pub occupation_field: String,
    pub location: String,
    pub limit: u32,
}

impl JobQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("occupation-field", self.occupation_field.clone()),
            ("q", self.location.clone()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            occupation_field: crate::config::DEFAULT_OCCUPATION_FIELD.to_string(),
            location: crate::config::DEFAULT_LOCATION.to_string(),
            limit: crate::config::DEFAULT_JOB_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyQuery {
    pub concept_type: String,
    pub limit: u32,
    pub default_text: String,
}

impl TaxonomyQuery {
    pub fn to_params(&self, text: &str) -> Vec<(&'static str, String)> {
        vec![
            ("text", text.to_string()),
            ("type", self.concept_type.clone()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for TaxonomyQuery {
    fn default() -> Self {
        Self {
            concept_type: crate::config::DEFAULT_CONCEPT_TYPE.to_string(),
            limit: crate::config::DEFAULT_TAXONOMY_LIMIT,
            default_text: crate::config::DEFAULT_TAXONOMY_TEXT.to_string(),
        }
    }
}
