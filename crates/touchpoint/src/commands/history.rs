use super::{open_engine, touchpoint_json, touchpoint_line};
use touchpoint_core::Touchpoint;
use touchpoint_storage::Paths;

fn render(history: &[Touchpoint], json: bool) -> anyhow::Result<String> {
    if json {
        let entries: Vec<_> = history.iter().map(touchpoint_json).collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }
    if history.is_empty() {
        return Ok("No touchpoint history".to_string());
    }

    let mut lines = vec![
        format!("Touchpoints ({}, oldest first)", history.len()),
        "======================".to_string(),
    ];
    lines.extend(history.iter().map(touchpoint_line));
    Ok(lines.join("\n"))
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let engine = open_engine(&paths)?;
    println!("{}", render(&engine.touchpoint_history(), json)?);
    Ok(())
}
