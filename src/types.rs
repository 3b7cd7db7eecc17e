//! Type definitions for sbtv-console
//!
//! Source of truth for all data structures.

use crate::core::sanitize;
use crate::error::{DashboardError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================
// Configuration Document
// ============================================

/// SponsorBlock segment category the device service can skip
///
/// Stored documents may carry categories this client does not know; those
/// are kept verbatim as [`SkipCategory::Other`] and written back on save.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipCategory {
    Sponsor,
    Selfpromo,
    Intro,
    Outro,
    MusicOfftopic,
    Interaction,
    ExclusiveAccess,
    PoiHighlight,
    Preview,
    Filler,
    Other(String),
}

impl SkipCategory {
    pub const ALL: [SkipCategory; 10] = [
        Self::Sponsor,
        Self::Selfpromo,
        Self::Intro,
        Self::Outro,
        Self::MusicOfftopic,
        Self::Interaction,
        Self::ExclusiveAccess,
        Self::PoiHighlight,
        Self::Preview,
        Self::Filler,
    ];

    /// Categories offered as toggles in the settings screen
    pub const COMMON: [SkipCategory; 6] = [
        Self::Sponsor,
        Self::Intro,
        Self::Outro,
        Self::Interaction,
        Self::Selfpromo,
        Self::MusicOfftopic,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Sponsor => "sponsor",
            Self::Selfpromo => "selfpromo",
            Self::Intro => "intro",
            Self::Outro => "outro",
            Self::MusicOfftopic => "music_offtopic",
            Self::Interaction => "interaction",
            Self::ExclusiveAccess => "exclusive_access",
            Self::PoiHighlight => "poi_highlight",
            Self::Preview => "preview",
            Self::Filler => "filler",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Self::Sponsor => "Sponsor",
            Self::Selfpromo => "Self Promotion",
            Self::Intro => "Intro",
            Self::Outro => "Outro",
            Self::MusicOfftopic => "Music Offtopic",
            Self::Interaction => "Interaction",
            Self::ExclusiveAccess => "Exclusive Access",
            Self::PoiHighlight => "POI Highlight",
            Self::Preview => "Preview",
            Self::Filler => "Filler",
            Self::Other(raw) => raw,
        }
    }

    fn known(s: &str) -> Option<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }

    /// Map a stored string to a category, keeping unknown ones as-is
    pub fn from_stored(s: &str) -> Self {
        Self::known(s).unwrap_or_else(|| Self::Other(s.to_string()))
    }
}

/// Operator input is checked against the catalog
impl FromStr for SkipCategory {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::known(s).ok_or_else(|| {
            DashboardError::invalid_field("skip_categories", format!("unknown category '{}'", s.trim()))
        })
    }
}

impl Serialize for SkipCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SkipCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_stored(&raw))
    }
}

/// A paired TV or streaming device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "sanitize::de_string")]
    pub name: String,
    /// Playback offset in milliseconds
    #[serde(default, deserialize_with = "sanitize::de_offset")]
    pub offset: i64,
    /// Issued by the pairing service, never edited locally
    #[serde(default, deserialize_with = "sanitize::de_string")]
    pub screen_id: String,
}

/// A whitelisted YouTube channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub id: String,
    #[serde(default, deserialize_with = "sanitize::de_string")]
    pub name: String,
}

/// The root configuration document shared with the device service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(deserialize_with = "sanitize::de_string")]
    pub apikey: String,
    #[serde(deserialize_with = "sanitize::de_or_default")]
    pub skip_categories: BTreeSet<SkipCategory>,
    /// Seconds
    #[serde(deserialize_with = "sanitize::de_seconds")]
    pub minimum_skip_length: u32,
    pub skip_count_tracking: bool,
    pub mute_ads: bool,
    pub skip_ads: bool,
    pub auto_play: bool,
    pub use_proxy: bool,
    #[serde(deserialize_with = "sanitize::de_or_default")]
    pub devices: Vec<Device>,
    #[serde(deserialize_with = "sanitize::de_or_default")]
    pub channel_whitelist: Vec<ChannelEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_name: Option<String>,
    /// Keys this client does not manage, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            apikey: String::new(),
            skip_categories: BTreeSet::new(),
            minimum_skip_length: 0,
            skip_count_tracking: true,
            mute_ads: false,
            skip_ads: false,
            auto_play: true,
            use_proxy: false,
            devices: Vec::new(),
            channel_whitelist: Vec::new(),
            join_name: None,
            extra: serde_json::Map::new(),
        }
    }
}

// ============================================
// Field Updates
// ============================================

/// Top-level keys of the configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ApiKey,
    SkipCategories,
    MinimumSkipLength,
    SkipCountTracking,
    MuteAds,
    SkipAds,
    AutoPlay,
    UseProxy,
    Devices,
    ChannelWhitelist,
    JoinName,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 11] = [
        Self::ApiKey,
        Self::SkipCategories,
        Self::MinimumSkipLength,
        Self::SkipCountTracking,
        Self::MuteAds,
        Self::SkipAds,
        Self::AutoPlay,
        Self::UseProxy,
        Self::Devices,
        Self::ChannelWhitelist,
        Self::JoinName,
    ];

    /// JSON key in the stored document
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApiKey => "apikey",
            Self::SkipCategories => "skip_categories",
            Self::MinimumSkipLength => "minimum_skip_length",
            Self::SkipCountTracking => "skip_count_tracking",
            Self::MuteAds => "mute_ads",
            Self::SkipAds => "skip_ads",
            Self::AutoPlay => "auto_play",
            Self::UseProxy => "use_proxy",
            Self::Devices => "devices",
            Self::ChannelWhitelist => "channel_whitelist",
            Self::JoinName => "join_name",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| DashboardError::invalid_field(s.trim(), "unknown configuration key"))
    }
}

/// Replacement value for exactly one top-level field of the draft
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    ApiKey(String),
    SkipCategories(BTreeSet<SkipCategory>),
    MinimumSkipLength(u32),
    SkipCountTracking(bool),
    MuteAds(bool),
    SkipAds(bool),
    AutoPlay(bool),
    UseProxy(bool),
    Devices(Vec<Device>),
    ChannelWhitelist(Vec<ChannelEntry>),
    JoinName(Option<String>),
}

impl FieldUpdate {
    pub fn key(&self) -> ConfigKey {
        match self {
            Self::ApiKey(_) => ConfigKey::ApiKey,
            Self::SkipCategories(_) => ConfigKey::SkipCategories,
            Self::MinimumSkipLength(_) => ConfigKey::MinimumSkipLength,
            Self::SkipCountTracking(_) => ConfigKey::SkipCountTracking,
            Self::MuteAds(_) => ConfigKey::MuteAds,
            Self::SkipAds(_) => ConfigKey::SkipAds,
            Self::AutoPlay(_) => ConfigKey::AutoPlay,
            Self::UseProxy(_) => ConfigKey::UseProxy,
            Self::Devices(_) => ConfigKey::Devices,
            Self::ChannelWhitelist(_) => ConfigKey::ChannelWhitelist,
            Self::JoinName(_) => ConfigKey::JoinName,
        }
    }

    /// Flip a boolean field. None for keys that are not flags.
    pub fn toggle(config: &Configuration, key: ConfigKey) -> Option<Self> {
        let update = match key {
            ConfigKey::SkipCountTracking => Self::SkipCountTracking(!config.skip_count_tracking),
            ConfigKey::MuteAds => Self::MuteAds(!config.mute_ads),
            ConfigKey::SkipAds => Self::SkipAds(!config.skip_ads),
            ConfigKey::AutoPlay => Self::AutoPlay(!config.auto_play),
            ConfigKey::UseProxy => Self::UseProxy(!config.use_proxy),
            ConfigKey::ApiKey
            | ConfigKey::SkipCategories
            | ConfigKey::MinimumSkipLength
            | ConfigKey::Devices
            | ConfigKey::ChannelWhitelist
            | ConfigKey::JoinName => return None,
        };
        Some(update)
    }

    /// Build an update from raw operator text, coercing numerics the same
    /// way the draft expects them
    pub fn parse(key: &str, raw: &str) -> Result<Self> {
        let key: ConfigKey = key.parse()?;
        let update = match key {
            ConfigKey::ApiKey => Self::ApiKey(raw.trim().to_string()),
            ConfigKey::SkipCategories => Self::SkipCategories(sanitize::parse_categories(raw)?),
            ConfigKey::MinimumSkipLength => Self::MinimumSkipLength(sanitize::parse_seconds(raw)),
            ConfigKey::SkipCountTracking => Self::SkipCountTracking(sanitize::parse_flag(key, raw)?),
            ConfigKey::MuteAds => Self::MuteAds(sanitize::parse_flag(key, raw)?),
            ConfigKey::SkipAds => Self::SkipAds(sanitize::parse_flag(key, raw)?),
            ConfigKey::AutoPlay => Self::AutoPlay(sanitize::parse_flag(key, raw)?),
            ConfigKey::UseProxy => Self::UseProxy(sanitize::parse_flag(key, raw)?),
            ConfigKey::JoinName => {
                let name = raw.trim();
                Self::JoinName((!name.is_empty()).then(|| name.to_string()))
            }
            ConfigKey::Devices | ConfigKey::ChannelWhitelist => {
                return Err(DashboardError::invalid_field(
                    key.as_str(),
                    "edit this list through its own menu",
                ));
            }
        };
        Ok(update)
    }
}

// ============================================
// Channel Search Types
// ============================================

/// Subscriber count as reported by the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberCount {
    Count(u64),
    Hidden,
}

impl fmt::Display for SubscriberCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("Hidden"),
            Self::Count(n) => {
                let digits = n.to_string();
                let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
                for (i, ch) in digits.chars().enumerate() {
                    if i > 0 && (digits.len() - i) % 3 == 0 {
                        grouped.push(',');
                    }
                    grouped.push(ch);
                }
                f.write_str(&grouped)
            }
        }
    }
}

impl Serialize for SubscriberCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u64(*n),
            Self::Hidden => serializer.serialize_str("Hidden"),
        }
    }
}

impl<'de> Deserialize<'de> for SubscriberCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Self::Count(n),
            // The backend groups digits with '_' ("1_234_567")
            Raw::Text(s) => s
                .chars()
                .filter(|c| *c != '_' && *c != ',')
                .collect::<String>()
                .parse()
                .map(Self::Count)
                .unwrap_or(Self::Hidden),
        })
    }
}

/// A channel returned by the search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelResult {
    pub id: String,
    pub name: String,
    pub subscribers: SubscriberCount,
}

impl ChannelResult {
    pub fn to_entry(&self) -> ChannelEntry {
        ChannelEntry {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

// ============================================
// Selector Types
// ============================================

/// Item displayed in selector menu
#[derive(Debug, Clone)]
pub struct MenuItem<T> {
    /// Display text
    pub label: String,
    /// Underlying value
    pub value: T,
}

// ============================================
// State Machine Types
// ============================================

/// Interactive screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Main menu
    Menu,
    /// Toggles and scalar settings
    Settings,
    /// Paired devices and pairing
    Devices,
    /// API key and channel whitelist
    Whitelist,
    /// Show pending changes
    Review,
    /// Push the draft to the store
    Save,
    /// Drop the draft
    Discard,
    /// Exit application
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let cfg: Configuration = serde_json::from_str(r#"{"apikey": "k"}"#).unwrap();
        assert_eq!(cfg.apikey, "k");
        assert!(cfg.devices.is_empty());
        assert!(cfg.channel_whitelist.is_empty());
        assert!(cfg.skip_count_tracking);
        assert!(cfg.auto_play);
        assert_eq!(cfg.join_name, None);
    }

    #[test]
    fn test_unknown_keys_survive_a_round_trip() {
        let cfg: Configuration =
            serde_json::from_str(r#"{"apikey": "", "future_flag": {"a": 1}}"#).unwrap();
        let out = serde_json::to_value(&cfg).unwrap();
        assert_eq!(out["future_flag"]["a"], 1);
    }

    #[test]
    fn test_lenient_numerics_at_load() {
        let cfg: Configuration = serde_json::from_str(
            r#"{"minimum_skip_length": "", "devices": [{"name": "TV", "offset": "250", "screen_id": "s"}, {"name": null, "offset": "", "screen_id": "t"}]}"#,
        )
        .unwrap();
        assert_eq!(cfg.minimum_skip_length, 0);
        assert_eq!(cfg.devices[0].offset, 250);
        assert_eq!(cfg.devices[1].offset, 0);
        assert_eq!(cfg.devices[1].name, "");
    }

    #[test]
    fn test_skip_categories_are_a_set() {
        let cfg: Configuration =
            serde_json::from_str(r#"{"skip_categories": ["intro", "sponsor", "intro"]}"#).unwrap();
        assert_eq!(cfg.skip_categories.len(), 2);
        assert!(cfg.skip_categories.contains(&SkipCategory::Sponsor));
    }

    #[test]
    fn test_unknown_categories_are_kept_through_save() {
        let cfg: Configuration =
            serde_json::from_str(r#"{"skip_categories": ["sponsor", "chapter"]}"#).unwrap();
        assert!(cfg.skip_categories.contains(&SkipCategory::Sponsor));
        assert!(cfg.skip_categories.contains(&SkipCategory::Other("chapter".into())));

        let out = serde_json::to_value(&cfg).unwrap();
        assert_eq!(out["skip_categories"], serde_json::json!(["sponsor", "chapter"]));
        assert!("chapter".parse::<SkipCategory>().is_err());
    }

    #[test]
    fn test_null_lists_load_as_empty() {
        let cfg: Configuration = serde_json::from_str(
            r#"{"skip_categories": null, "devices": null, "channel_whitelist": null}"#,
        )
        .unwrap();
        assert!(cfg.skip_categories.is_empty());
        assert!(cfg.devices.is_empty());
        assert!(cfg.channel_whitelist.is_empty());
    }

    #[test]
    fn test_subscriber_count_variants() {
        let results: Vec<ChannelResult> = serde_json::from_str(
            r#"[{"id": "a", "name": "A", "subscribers": 12},
                {"id": "b", "name": "B", "subscribers": "1_234_567"},
                {"id": "c", "name": "C", "subscribers": "Hidden"}]"#,
        )
        .unwrap();
        assert_eq!(results[0].subscribers, SubscriberCount::Count(12));
        assert_eq!(results[1].subscribers, SubscriberCount::Count(1_234_567));
        assert_eq!(results[2].subscribers, SubscriberCount::Hidden);
        assert_eq!(results[1].subscribers.to_string(), "1,234,567");
    }

    #[test]
    fn test_toggle_flips_only_flags() {
        let cfg = Configuration::default();
        assert_eq!(
            FieldUpdate::toggle(&cfg, ConfigKey::UseProxy),
            Some(FieldUpdate::UseProxy(true))
        );
        assert_eq!(
            FieldUpdate::toggle(&cfg, ConfigKey::AutoPlay),
            Some(FieldUpdate::AutoPlay(false))
        );
        for key in ConfigKey::ALL {
            if let Some(update) = FieldUpdate::toggle(&cfg, key) {
                assert_eq!(update.key(), key);
            }
        }
        assert_eq!(FieldUpdate::toggle(&cfg, ConfigKey::JoinName), None);
        assert_eq!(FieldUpdate::toggle(&cfg, ConfigKey::MinimumSkipLength), None);
    }

    #[test]
    fn test_common_categories_are_in_the_catalog() {
        for category in SkipCategory::COMMON {
            assert!(SkipCategory::ALL.contains(&category));
        }
    }

    #[test]
    fn test_field_update_parse() {
        assert_eq!(
            FieldUpdate::parse("minimum_skip_length", "").unwrap(),
            FieldUpdate::MinimumSkipLength(0)
        );
        assert_eq!(FieldUpdate::parse("mute_ads", "on").unwrap(), FieldUpdate::MuteAds(true));
        assert_eq!(FieldUpdate::parse("join_name", "  ").unwrap(), FieldUpdate::JoinName(None));
        assert!(FieldUpdate::parse("devices", "[]").is_err());
        assert!(FieldUpdate::parse("nope", "1").is_err());
    }
}
