use super::{now_or, open_engine, touchpoint_json};
use serde_json::Value;
use touchpoint_core::PageContext;
use touchpoint_storage::Paths;

pub fn run(url: &str, referrer: &str, now: Option<i64>) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let output = execute_in(&paths, &PageContext::new(url, referrer, now_or(now)))?;
    println!("{output}");
    Ok(())
}

/// Touchpoint JSON, or `null` when the view produced none
pub fn execute_in(paths: &Paths, context: &PageContext) -> anyhow::Result<Value> {
    let mut engine = open_engine(paths)?;
    let touchpoint = engine.execute(context);
    Ok(touchpoint.as_ref().map_or(Value::Null, touchpoint_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(paths: &Paths, json: &str) {
        std::fs::create_dir_all(&paths.root).unwrap();
        std::fs::write(paths.config_file(), json).unwrap();
    }

    #[test]
    fn test_execute_records_touchpoint() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::at(temp.path());
        write_config(
            &paths,
            r#"{"channels":[{"id":"sea","label":"SEA (adwords)","type":"url","match":"adword"}]}"#,
        );

        let output = execute_in(
            &paths,
            &PageContext::new("http://example.com?adword=%2Ffoo%2Fbar%2F123", "", 100),
        )
        .unwrap();
        assert_eq!(output["channel"], "sea");
        assert_eq!(output["value"], "/foo/bar/123");
        assert!(paths.store_dir().join("gktp.json").exists());
    }

    #[test]
    fn test_execute_without_match_prints_null() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::at(temp.path());

        let output = execute_in(&paths, &PageContext::new("http://example.com", "", 100)).unwrap();
        assert!(output.is_null());
    }

    #[test]
    fn test_execute_rejects_bad_config() {
        let temp = TempDir::new().unwrap();
        let paths = Paths::at(temp.path());
        write_config(&paths, r#"{"channels":[{"id":"x","type":"url","match":42}]}"#);

        let result = execute_in(&paths, &PageContext::new("http://example.com", "", 100));
        assert!(result.is_err());
    }
}
