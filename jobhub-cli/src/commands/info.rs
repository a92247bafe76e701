//! Service info command

use anyhow::Result;
use colored::*;
use jobhub_client::JobsClient;

use crate::config::Config;

/// Print name, version and uptime of the registry
pub async fn handle_info_command(config: &Config) -> Result<()> {
    let client = JobsClient::new(&config.url);
    let info = client.get_info().await?;

    println!("{}", "Service Info:".bold());
    println!("  Name:    {}", info.name.cyan());
    println!("  Version: {}", info.version);
    println!("  Uptime:  {}", format_uptime(info.uptime_secs));
    Ok(())
}

fn format_uptime(secs: u64) -> String {
    let (days, rest) = (secs / 86_400, secs % 86_400);
    let (hours, rest) = (rest / 3600, rest % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0s");
        assert_eq!(format_uptime(61), "1m 1s");
        assert_eq!(format_uptime(3600), "1h 0m 0s");
        assert_eq!(format_uptime(90_061), "1d 1h 1m 1s");
    }
}
