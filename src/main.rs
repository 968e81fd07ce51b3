use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use greeting_service::{
    api::run_api_server, catalog::TemplateCatalog, config::Config, utils::init_tracing,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;
    init_tracing(&config.log_format)?;

    let catalog = match config.template_catalog_path.as_deref() {
        Some(path) => TemplateCatalog::from_json_file(path)?,
        None => TemplateCatalog::builtin()?,
    };

    info!(templates = catalog.len(), "Template catalog ready");

    run_api_server(config, Arc::new(catalog))
        .await
        .map_err(|e| anyhow!("Server error: {}", e))?;

    Ok(())
}
