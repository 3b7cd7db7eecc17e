//! Display labels for menus and summaries

use crate::core::devices::DeviceEdit;
use crate::core::session::ConfigSession;
use crate::types::{ChannelEntry, ChannelResult, ConfigKey, Configuration, Device};
use colored::Colorize;

pub fn on_off(value: bool) -> String {
    if value {
        "on".green().to_string()
    } else {
        "off".dimmed().to_string()
    }
}

/// Device line for the device list
pub fn format_device_label(device: &Device) -> String {
    let name = if device.name.is_empty() {
        "Unnamed Device"
    } else {
        device.name.as_str()
    };
    format!("{} {}", name.bold(), format!("(offset {} ms)", device.offset).dimmed())
}

pub fn format_channel_label(channel: &ChannelEntry) -> String {
    let name = if channel.name.is_empty() {
        "Unnamed Channel"
    } else {
        channel.name.as_str()
    };
    format!("{} {}", name, format!("[{}]", channel.id).dimmed())
}

/// Search result line, marks channels already in the whitelist
pub fn format_result_label(result: &ChannelResult, listed: bool) -> String {
    let marker = if listed { "✓ ".green().to_string() } else { String::new() };
    format!(
        "{}{} {}",
        marker,
        result.name,
        format!("{} subscribers", result.subscribers).cyan()
    )
}

pub fn format_edit_summary(edit: &DeviceEdit) -> Vec<String> {
    vec![
        format!("Name: {}", edit.name),
        format!("Offset (ms): {}", edit.offset),
        format!("Device ID: {}", edit.displayed_screen_id()),
    ]
}

/// Short rendering of one top-level value
pub fn format_value(config: &Configuration, key: ConfigKey) -> String {
    match key {
        ConfigKey::ApiKey if config.apikey.is_empty() => "(not set)".dimmed().to_string(),
        ConfigKey::ApiKey => mask_key(&config.apikey),
        ConfigKey::SkipCategories if config.skip_categories.is_empty() => {
            "(none)".dimmed().to_string()
        }
        ConfigKey::SkipCategories => config
            .skip_categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        ConfigKey::MinimumSkipLength => format!("{} s", config.minimum_skip_length),
        ConfigKey::SkipCountTracking => on_off(config.skip_count_tracking),
        ConfigKey::MuteAds => on_off(config.mute_ads),
        ConfigKey::SkipAds => on_off(config.skip_ads),
        ConfigKey::AutoPlay => on_off(config.auto_play),
        ConfigKey::UseProxy => on_off(config.use_proxy),
        ConfigKey::Devices => format!("{} device(s)", config.devices.len()),
        ConfigKey::ChannelWhitelist => format!("{} channel(s)", config.channel_whitelist.len()),
        ConfigKey::JoinName => config
            .join_name
            .clone()
            .unwrap_or_else(|| "(default)".dimmed().to_string()),
    }
}

/// Keep the first and last few characters of a credential
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "•".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// One line per changed key: `key: committed → draft`
pub fn format_changes(session: &ConfigSession) -> Vec<String> {
    session
        .changed_keys()
        .into_iter()
        .map(|key| {
            format!(
                "{}: {} → {}",
                key.as_str().bold(),
                format_value(session.committed(), key),
                format_value(session.draft(), key)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldUpdate;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abc"), "•••");
        assert_eq!(mask_key("AIzaSyD-1234567890"), "AIza…7890");
    }

    #[test]
    fn test_format_changes_lists_changed_keys_only() {
        colored::control::set_override(false);
        let mut session = ConfigSession::from_committed(Configuration::default());
        session.update_field(FieldUpdate::MinimumSkipLength(3));

        let lines = format_changes(&session);
        assert_eq!(lines, vec!["minimum_skip_length: 0 s → 3 s".to_string()]);
    }

    #[test]
    fn test_unnamed_device_label() {
        colored::control::set_override(false);
        let device = Device {
            name: String::new(),
            offset: 15,
            screen_id: "s".into(),
        };
        assert_eq!(format_device_label(&device), "Unnamed Device (offset 15 ms)");
    }
}
