use crate::errors::CliError;
use buildwise_core::{Catalog, EngineConfig};
use serde::Serialize;

/// `[[tasks]]` document, loadable again with `--config`.
#[derive(Serialize)]
struct CatalogDocument<'a> {
    tasks: &'a Catalog,
}

pub fn execute(config: &EngineConfig) -> Result<String, CliError> {
    toml::to_string_pretty(&CatalogDocument {
        tasks: &config.catalog,
    })
    .map_err(|e| CliError::output("toml", e))
}
