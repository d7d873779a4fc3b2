pub fn run() -> anyhow::Result<()> {
    println!("touchpoint {}", env!("CARGO_PKG_VERSION"));
    println!("Last-touch marketing attribution for page views");
    Ok(())
}
