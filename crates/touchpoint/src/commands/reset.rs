use super::open_engine;
use touchpoint_storage::Paths;

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let mut engine = open_engine(&paths)?;
    let entries = engine.touchpoint_history().len();
    engine.reset();
    println!("✓ Cleared attribution state ({} touchpoints)", entries);
    Ok(())
}
