use super::{now_or, open_engine, touchpoint_json, touchpoint_line};
use touchpoint_core::AttributionModel;
use touchpoint_storage::Paths;

pub fn run(now: Option<i64>, json: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let engine = open_engine(&paths)?;
    let now = now_or(now);
    let credited = engine.attributed_touchpoints_at(now);

    if json {
        let entries: Vec<_> = credited.iter().map(touchpoint_json).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if credited.is_empty() {
        println!("No touchpoint credited at {}", super::format_timestamp(now));
        return Ok(());
    }

    println!(
        "Credited by {} at {}",
        engine.model().name(),
        super::format_timestamp(now)
    );
    for touchpoint in &credited {
        println!("{}", touchpoint_line(touchpoint));
    }
    Ok(())
}
