//! Field sanitizer
//!
//! Coerces raw operator input and loosely-typed stored values into the
//! typed draft. Empty or non-numeric numbers become 0 instead of errors.

use crate::error::{DashboardError, Result};
use crate::types::{ConfigKey, Configuration, FieldUpdate, SkipCategory};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeSet;

/// Parse a seconds field. Empty, negative or garbage input yields 0.
pub fn parse_seconds(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Parse a signed millisecond offset. Empty or garbage input yields 0.
pub fn parse_offset(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// Parse a boolean flag
pub fn parse_flag(key: ConfigKey, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(DashboardError::invalid_field(
            key.as_str(),
            format!("expected true or false, got '{}'", other),
        )),
    }
}

/// Parse a comma-separated category list
pub fn parse_categories(raw: &str) -> Result<BTreeSet<SkipCategory>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<SkipCategory>)
        .collect()
}

/// Strip separators from a TV link code. Returns None unless only digits remain.
pub fn normalize_pairing_code(raw: &str) -> Option<String> {
    let code: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(code)
}

/// Normalize a whole document. Idempotent.
pub fn sanitize(config: &Configuration) -> Configuration {
    let mut clean = config.clone();
    clean.apikey = clean.apikey.trim().to_string();
    for device in &mut clean.devices {
        device.name = device.name.trim().to_string();
    }
    for channel in &mut clean.channel_whitelist {
        channel.id = channel.id.trim().to_string();
        channel.name = channel.name.trim().to_string();
    }
    clean.join_name = clean
        .join_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);
    clean
}

/// Apply the same normalization as [`sanitize`] to a single field update
pub fn sanitize_update(update: FieldUpdate) -> FieldUpdate {
    let mut scratch = Configuration::default();
    let key = update.key();
    apply(&mut scratch, update);
    let clean = sanitize(&scratch);
    extract(clean, key)
}

/// Replace one top-level field
pub(crate) fn apply(config: &mut Configuration, update: FieldUpdate) {
    match update {
        FieldUpdate::ApiKey(v) => config.apikey = v,
        FieldUpdate::SkipCategories(v) => config.skip_categories = v,
        FieldUpdate::MinimumSkipLength(v) => config.minimum_skip_length = v,
        FieldUpdate::SkipCountTracking(v) => config.skip_count_tracking = v,
        FieldUpdate::MuteAds(v) => config.mute_ads = v,
        FieldUpdate::SkipAds(v) => config.skip_ads = v,
        FieldUpdate::AutoPlay(v) => config.auto_play = v,
        FieldUpdate::UseProxy(v) => config.use_proxy = v,
        FieldUpdate::Devices(v) => config.devices = v,
        FieldUpdate::ChannelWhitelist(v) => config.channel_whitelist = v,
        FieldUpdate::JoinName(v) => config.join_name = v,
    }
}

/// Read one top-level field back out as an update
pub(crate) fn extract(config: Configuration, key: ConfigKey) -> FieldUpdate {
    match key {
        ConfigKey::ApiKey => FieldUpdate::ApiKey(config.apikey),
        ConfigKey::SkipCategories => FieldUpdate::SkipCategories(config.skip_categories),
        ConfigKey::MinimumSkipLength => FieldUpdate::MinimumSkipLength(config.minimum_skip_length),
        ConfigKey::SkipCountTracking => FieldUpdate::SkipCountTracking(config.skip_count_tracking),
        ConfigKey::MuteAds => FieldUpdate::MuteAds(config.mute_ads),
        ConfigKey::SkipAds => FieldUpdate::SkipAds(config.skip_ads),
        ConfigKey::AutoPlay => FieldUpdate::AutoPlay(config.auto_play),
        ConfigKey::UseProxy => FieldUpdate::UseProxy(config.use_proxy),
        ConfigKey::Devices => FieldUpdate::Devices(config.devices),
        ConfigKey::ChannelWhitelist => FieldUpdate::ChannelWhitelist(config.channel_whitelist),
        ConfigKey::JoinName => FieldUpdate::JoinName(config.join_name),
    }
}

// ============================================
// Lenient deserializers for stored documents
// ============================================

fn value_to_i64(value: Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_offset(&s),
        _ => 0,
    }
}

pub(crate) fn de_seconds<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    let n = value_to_i64(Value::deserialize(d)?);
    Ok(n.clamp(0, u32::MAX as i64) as u32)
}

pub(crate) fn de_offset<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<i64, D::Error> {
    Ok(value_to_i64(Value::deserialize(d)?))
}

/// `null` reads as the type's default
pub(crate) fn de_or_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

pub(crate) fn de_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelEntry, Device};

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds(""), 0);
        assert_eq!(parse_seconds(" 12 "), 12);
        assert_eq!(parse_seconds("-3"), 0);
        assert_eq!(parse_seconds("abc"), 0);
    }

    #[test]
    fn test_parse_offset_keeps_sign() {
        assert_eq!(parse_offset("-250"), -250);
        assert_eq!(parse_offset(""), 0);
        assert_eq!(parse_offset("1.5"), 0);
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag(ConfigKey::MuteAds, "YES").unwrap());
        assert!(!parse_flag(ConfigKey::MuteAds, "0").unwrap());
        assert!(parse_flag(ConfigKey::MuteAds, "maybe").is_err());
    }

    #[test]
    fn test_parse_categories() {
        let cats = parse_categories("sponsor, intro,,sponsor").unwrap();
        assert_eq!(cats.len(), 2);
        assert!(parse_categories("sponsor,bogus").is_err());
        assert!(parse_categories("").unwrap().is_empty());
    }

    #[test]
    fn test_normalize_pairing_code() {
        assert_eq!(normalize_pairing_code("123 456-789").as_deref(), Some("123456789"));
        assert_eq!(normalize_pairing_code(" - "), None);
        assert_eq!(normalize_pairing_code("12a"), None);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let cfg = Configuration {
            apikey: " key ".into(),
            devices: vec![Device {
                name: " Living Room ".into(),
                offset: 100,
                screen_id: "s1".into(),
            }],
            channel_whitelist: vec![ChannelEntry {
                id: " UC1 ".into(),
                name: "One".into(),
            }],
            join_name: Some("   ".into()),
            ..Configuration::default()
        };
        let once = sanitize(&cfg);
        assert_eq!(once.apikey, "key");
        assert_eq!(once.devices[0].name, "Living Room");
        assert_eq!(once.devices[0].screen_id, "s1");
        assert_eq!(once.channel_whitelist[0].id, "UC1");
        assert_eq!(once.join_name, None);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_sanitize_update_matches_document_sanitize() {
        assert_eq!(
            sanitize_update(FieldUpdate::ApiKey("  abc ".into())),
            FieldUpdate::ApiKey("abc".into())
        );
        assert_eq!(
            sanitize_update(FieldUpdate::MuteAds(true)),
            FieldUpdate::MuteAds(true)
        );
    }
}
