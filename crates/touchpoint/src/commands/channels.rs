use super::load_config;
use touchpoint_core::Channel;
use touchpoint_storage::Paths;

fn describe(channel: &Channel) -> String {
    let mut flags = Vec::new();
    if channel.can_overwrite() {
        flags.push("canOverwrite");
    }
    if channel.is_first_view_only() {
        flags.push("isFirstViewOnly");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    format!(
        "  {:<12} {:<14} {}{}",
        channel.id(),
        channel.kind(),
        channel.label(),
        flags
    )
}

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let channels = load_config(&paths)?.build_channels()?;

    if channels.is_empty() {
        println!("No channels configured (run `touchpoint init`)");
        return Ok(());
    }

    println!("Channels ({}, in match order)", channels.len());
    println!("======================");
    for channel in &channels {
        println!("{}", describe(channel));
    }
    Ok(())
}
