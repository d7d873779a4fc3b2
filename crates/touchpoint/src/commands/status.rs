use super::{format_timestamp, load_config, open_storage};
use serde_json::Value;
use touchpoint_core::{AttributionEngine, AttributionModel};
use touchpoint_storage::{Paths, StorageBackend};

pub fn status_json(paths: &Paths) -> anyhow::Result<Value> {
    let config = load_config(paths)?;
    let engine = AttributionEngine::from_config(&config, open_storage(paths))?;

    let tiers: Vec<Value> = engine
        .storage()
        .backends()
        .map(|backend| {
            serde_json::json!({
                "name": backend.name(),
                "available": backend.is_available(),
            })
        })
        .collect();

    let state = engine.load_state();
    let credited = engine.attributed_touchpoints();

    Ok(serde_json::json!({
        "root": paths.root.display().to_string(),
        "config": {
            "path": paths.config_file().display().to_string(),
            "exists": paths.config_file().exists(),
        },
        "storage_key": engine.storage_key(),
        "visit_duration": engine.visit_duration(),
        "lifetime": engine.model().lifetime(),
        "channels": engine.channels().len(),
        "tiers": tiers,
        "history": state.history.len(),
        "last_touch": state.last_touch_timestamp.map(format_timestamp),
        "credited": credited.first().map(|tp| tp.channel().id().to_string()),
    }))
}

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    println!("{}", serde_json::to_string_pretty(&status_json(&paths)?)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_status_on_empty_root() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::at(temp.path());

        let status = status_json(&paths).unwrap();
        assert_eq!(status["config"]["exists"], false);
        assert_eq!(status["storage_key"], "gktp");
        assert_eq!(status["channels"], 0);
        assert_eq!(status["history"], 0);
        assert!(status["last_touch"].is_null());
        assert_eq!(status["tiers"][0]["name"], "file");
        assert_eq!(status["tiers"][1]["name"], "cookie");
        assert_eq!(status["tiers"][0]["available"], true);
        // reporting leaves the data directory untouched
        assert!(!paths.store_dir().exists());
        assert!(!paths.cookie_jar().exists());
    }
}
