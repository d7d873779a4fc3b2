use serde_json::Value;
use touchpoint_storage::{atomic_write, Paths};

/// Starter configuration covering each matcher shape
fn sample_config() -> Value {
    serde_json::json!({
        "visit_duration": 1800,
        "lifetime": 2_592_000,
        "storage_key": "gktp",
        "channels": [
            {
                "id": "sea",
                "label": "SEA (adwords)",
                "type": "url",
                "match": "adword"
            },
            {
                "id": "aff",
                "label": "Affiliate",
                "type": "url",
                "match": { "emsrc": "aff" },
                "extract": "refID"
            },
            {
                "id": "nl",
                "label": "Newsletter",
                "type": "url",
                "match": "/(^|&)utm_medium=email($|&)/i",
                "extract": "utm_campaign"
            },
            {
                "id": "seo",
                "label": "SEO",
                "type": "search_engine",
                "options": { "canOverwrite": true }
            },
            {
                "id": "ref",
                "label": "Referral",
                "type": "referrer",
                "match": ["/^https?://(www\\.)?partner\\.example/i"],
                "options": { "canOverwrite": true, "isFirstViewOnly": true }
            }
        ]
    })
}

pub fn run(force: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    if write_sample_config(&paths, force)? {
        println!("✓ Wrote sample configuration to {}", paths.config_file().display());
    } else {
        println!(
            "{} already exists (use --force to overwrite)",
            paths.config_file().display()
        );
    }
    Ok(())
}

/// Returns false when a configuration exists and `force` is not set
pub fn write_sample_config(paths: &Paths, force: bool) -> anyhow::Result<bool> {
    let config_path = paths.config_file();
    if config_path.exists() && !force {
        return Ok(false);
    }

    std::fs::create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(&sample_config())?;
    atomic_write(&config_path, json.as_bytes())?;
    Ok(true)
}
