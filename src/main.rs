use clap::Parser;
use sisyphus_backend::domain::ports::ConfigProvider;
use sisyphus_backend::utils::logger;
use sisyphus_backend::{CliConfig, ProxyError, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting sisyphus-backend");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path.display());
            match TomlConfig::from_file(path) {
                Ok(config) => run(&config).await,
                Err(e) => Err(e),
            }
        }
        None => run(&cli).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run<C: ConfigProvider>(config: &C) -> Result<(), ProxyError> {
    sisyphus_backend::serve(config).await
}
