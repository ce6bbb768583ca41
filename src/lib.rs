pub mod cli;
pub mod core;
pub mod providers;

use crate::core::cache::FeedCache;
use crate::core::config::AppConfig;
use anyhow::Result;
use crate::providers::cnb::{self, CnbProvider};
use std::sync::Arc;
use tracing::debug;

/// Commands handled by the library; `setup` is handled by the binary alone.
pub enum AppCommand {
    Rates,
    Convert(cli::convert::ConvertOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache = Arc::new(FeedCache::new());
    let base_url = config
        .providers
        .cnb
        .as_ref()
        .map_or(cnb::DEFAULT_BASE_URL, |p| &p.base_url);
    let provider = CnbProvider::new(base_url, cache);

    match command {
        AppCommand::Rates => cli::rates::run(&provider).await,
        AppCommand::Convert(options) => cli::convert::run(&provider, &config, options).await,
    }
}
