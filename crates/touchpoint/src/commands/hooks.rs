use super::{open_engine, touchpoint_json};
use serde_json::Value;
use std::io::{self, Read};
use touchpoint_core::PageContext;
use touchpoint_storage::Paths;

/// Read a page context from stdin, record it and report attribution
pub fn hook_page_view() -> anyhow::Result<()> {
    let mut input_str = String::new();
    io::stdin().read_to_string(&mut input_str)?;

    let paths = Paths::new()?;
    let output = process_page_view(&paths, &input_str)?;
    println!("{output}");
    Ok(())
}

pub fn process_page_view(paths: &Paths, input: &str) -> anyhow::Result<Value> {
    let context: PageContext = serde_json::from_str(input)
        .map_err(|e| anyhow::anyhow!("invalid page context: {}", e))?;

    let mut engine = open_engine(paths)?;
    let touchpoint = engine.execute(&context);
    let attributed: Vec<Value> = engine
        .attributed_touchpoints_at(context.now)
        .iter()
        .map(touchpoint_json)
        .collect();

    Ok(serde_json::json!({
        "touchpoint": touchpoint.as_ref().map_or(Value::Null, touchpoint_json),
        "attributed": attributed,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "channels": [
            {"id": "aff", "type": "url", "match": {"emsrc": "aff"}, "extract": "refID"},
            {"id": "seo", "type": "search_engine", "options": {"canOverwrite": true}}
        ]
    }"#;

    fn paths_with_config(temp: &TempDir) -> Paths {
        let paths = Paths::at(temp.path());
        std::fs::create_dir_all(&paths.root).unwrap();
        std::fs::write(paths.config_file(), CONFIG).unwrap();
        paths
    }

    #[test]
    fn test_page_view_reports_touchpoint_and_credit() {
        let temp = TempDir::new().unwrap();
        let paths = paths_with_config(&temp);

        let first = process_page_view(
            &paths,
            r#"{"url":"http://shop.com?emsrc=aff&refID=partner","referrer":"","now":100}"#,
        )
        .unwrap();
        assert_eq!(first["touchpoint"]["channel"], "aff");
        assert_eq!(first["attributed"][0]["value"], "partner");

        // search engine visit yields credit back to the affiliate
        let second = process_page_view(
            &paths,
            r#"{"url":"http://shop.com","referrer":"https://www.google.de/search?q=x","now":200}"#,
        )
        .unwrap();
        assert_eq!(second["touchpoint"]["channel"], "seo");
        assert_eq!(second["touchpoint"]["value"], "www.google.de");
        assert_eq!(second["attributed"].as_array().unwrap().len(), 1);
        assert_eq!(second["attributed"][0]["channel"], "aff");
    }

    #[test]
    fn test_page_view_without_match() {
        let temp = TempDir::new().unwrap();
        let paths = paths_with_config(&temp);

        let output = process_page_view(&paths, r#"{"url":"http://shop.com","now":100}"#).unwrap();
        assert!(output["touchpoint"].is_null());
        assert_eq!(output["attributed"], serde_json::json!([]));
    }

    #[test]
    fn test_page_view_invalid_input() {
        let temp = TempDir::new().unwrap();
        let paths = paths_with_config(&temp);
        assert!(process_page_view(&paths, "not json").is_err());
    }
}
