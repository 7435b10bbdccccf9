//! `switchboard channels`

use crate::server::config::AppConfig;
use switchboard_channels::ConfigKey;

/// Print one line per configured channel
pub fn run(config: &AppConfig) {
    if config.channels.is_empty() {
        println!("No channels configured.");
        return;
    }

    for channel in &config.channels {
        let endpoint = channel
            .config_for_key(ConfigKey::BaseUrl)
            .or_else(|| channel.config_for_key(ConfigKey::SendUrl))
            .unwrap_or("-");
        println!(
            "{}  {:<8} {:<16} {}",
            channel.uuid,
            channel.kind.display_name(),
            channel.address,
            endpoint
        );
    }
}
