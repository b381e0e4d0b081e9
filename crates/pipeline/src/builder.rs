//! Source construction from configuration

use std::sync::Arc;

use siphon_config::Config;
use siphon_connectors::{CheckpointStore, Source, SourceImpl};
use tracing::{error, info};

use crate::error::{PipelineError, Result};

/// Build every enabled source, sorted by name
///
/// Sources whose table does not parse or that fail `validate()` are logged
/// and left out; they are not retried later.
///
/// # Errors
///
/// Returns `NoValidSources` if nothing usable remains.
pub fn build_sources(
    config: &Config,
    checkpoints: Arc<dyn CheckpointStore>,
) -> Result<Vec<SourceImpl>> {
    let mut sources = Vec::new();

    for (name, raw) in config.sources.enabled() {
        let source = match SourceImpl::from_config(
            name,
            &raw.source_type,
            &raw.config,
            Arc::clone(&checkpoints),
        ) {
            Ok(source) => source,
            Err(e) => {
                error!(source = %name, error = %e, "invalid source configuration, skipping");
                continue;
            }
        };

        if !source.validate() {
            error!(
                source = %name,
                source_type = %raw.source_type,
                "source failed validation, skipping"
            );
            continue;
        }

        info!(source = %name, source_type = %raw.source_type, "source enabled");
        sources.push(source);
    }

    if sources.is_empty() {
        return Err(PipelineError::NoValidSources);
    }
    Ok(sources)
}
