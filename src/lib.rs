pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::server::{router, serve};
pub use app::state::AppState;
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::{jobs::JobSearch, taxonomy::TaxonomySearch};
pub use utils::error::{ProxyError, Result};
