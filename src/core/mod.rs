pub mod client;
pub mod jobs;
pub mod taxonomy;

pub use crate::domain::model::{ApiResult, JobListing, JobSummary, TaxonomyConcept, TaxonomyResults};
pub use crate::domain::ports::ConfigProvider;
pub use crate::utils::error::Result;
