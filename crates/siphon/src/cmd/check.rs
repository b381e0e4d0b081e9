//! Check command - validate configuration and report each source

use std::sync::Arc;

use anyhow::Result;
use siphon_config::Config;
use siphon_connectors::{FileCheckpointStore, MemoryCheckpointStore, Source, SourceImpl};

/// Run the check command
pub fn run(config: &Config) -> Result<()> {
    println!("format:     {}", config.format.format_type.as_str());
    println!("forwarder:  {}", config.forwarder.target);
    let checkpoints = FileCheckpointStore::open(&config.checkpoint.path);
    let checkpoint_status = match &checkpoints {
        Ok(_) => "ok".to_string(),
        Err(e) => format!("unusable ({e})"),
    };
    println!(
        "checkpoint: {} {checkpoint_status}",
        config.checkpoint.path.display()
    );
    println!("sources:");

    let store = Arc::new(MemoryCheckpointStore::new());
    let mut valid = 0;
    for (name, raw) in config.sources.iter() {
        let status = if !raw.enabled {
            "disabled".to_string()
        } else {
            match SourceImpl::from_config(name, &raw.source_type, &raw.config, store.clone()) {
                Ok(source) if source.validate() => {
                    valid += 1;
                    "ok".to_string()
                }
                Ok(_) => "invalid (failed validation)".to_string(),
                Err(e) => format!("invalid ({e})"),
            }
        };
        println!("  {name:<20} {:<6} {status}", raw.source_type);
    }

    if valid == 0 {
        anyhow::bail!("no valid sources configured");
    }
    if let Err(e) = checkpoints {
        anyhow::bail!("checkpoint file is unusable: {e}");
    }
    println!("{valid} source(s) ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::str::FromStr;

    fn config_with(dir: &std::path::Path, checkpoint: &std::path::Path) -> Config {
        let log = dir.join("app.log");
        fs::write(&log, "").unwrap();
        Config::from_str(&format!(
            "[forwarder]\ntarget = \"127.0.0.1:514\"\n\n\
             [checkpoint]\npath = {checkpoint:?}\n\n\
             [sources.app]\ntype = \"file\"\npath = {log:?}\n"
        ))
        .unwrap()
    }

    #[test]
    fn test_check_passes_with_fresh_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(dir.path(), &dir.path().join("checkpoints.json"));
        run(&config).unwrap();
    }

    #[test]
    fn test_check_rejects_corrupt_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("checkpoints.json");
        fs::write(&checkpoint, "{not json").unwrap();

        let err = run(&config_with(dir.path(), &checkpoint)).unwrap_err();
        assert!(err.to_string().contains("checkpoint file is unusable"));
    }
}
