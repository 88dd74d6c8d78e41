use anyhow::{bail, Result};
use tracing::info;

/// Environment variable holding the bot token.
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the primary destination (channel) chat id.
pub const CHANNEL_ID: &str = "CHANNEL_ID";
/// Environment variable holding the optional secondary destination (group) chat id.
pub const GROUP_ID: &str = "GROUP_ID";

/// A single posting target: a chat id (numeric or `@username`) plus a
/// human-readable label used in log lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub chat_id: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub destinations: Vec<Destination>,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `TELEGRAM_TOKEN` and `CHANNEL_ID` are required; every missing or empty
    /// required key is named in the error. `GROUP_ID` is optional and, when
    /// set, adds a second destination after the channel.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let bot_token = get(TELEGRAM_TOKEN);
        let channel_id = get(CHANNEL_ID);
        let group_id = get(GROUP_ID);

        let missing: Vec<&str> = [
            (TELEGRAM_TOKEN, bot_token.is_none()),
            (CHANNEL_ID, channel_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        if !missing.is_empty() {
            bail!(
                "missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let bot_token = bot_token.unwrap_or_default();
        let channel_id = channel_id.unwrap_or_default();

        let mut destinations = vec![Destination {
            chat_id: channel_id,
            label: "Channel".to_string(),
        }];
        if let Some(group_id) = group_id {
            destinations.push(Destination {
                chat_id: group_id,
                label: "Group".to_string(),
            });
        }

        info!("{} loaded: Yes", TELEGRAM_TOKEN);
        for dest in &destinations {
            info!("Destination {}: {}", dest.label, dest.chat_id);
        }

        Ok(Self {
            bot_token,
            destinations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_channel_only_config() {
        let config = load(&[(TELEGRAM_TOKEN, "123:abc"), (CHANNEL_ID, "@mychannel")]).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.destinations.len(), 1);
        assert_eq!(config.destinations[0].chat_id, "@mychannel");
        assert_eq!(config.destinations[0].label, "Channel");
    }

    #[test]
    fn test_group_id_adds_second_destination() {
        let config = load(&[
            (TELEGRAM_TOKEN, "123:abc"),
            (CHANNEL_ID, "-1001"),
            (GROUP_ID, "-2002"),
        ])
        .unwrap();
        assert_eq!(config.destinations.len(), 2);
        assert_eq!(config.destinations[0].label, "Channel");
        assert_eq!(config.destinations[1].label, "Group");
        assert_eq!(config.destinations[1].chat_id, "-2002");
    }

    #[test]
    fn test_missing_token_is_named() {
        let err = load(&[(CHANNEL_ID, "-1001")]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(TELEGRAM_TOKEN));
        assert!(!msg.contains(CHANNEL_ID));
    }

    #[test]
    fn test_all_missing_keys_are_enumerated() {
        let err = load(&[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(TELEGRAM_TOKEN));
        assert!(msg.contains(CHANNEL_ID));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = load(&[(TELEGRAM_TOKEN, ""), (CHANNEL_ID, "-1001")]).unwrap_err();
        assert!(err.to_string().contains(TELEGRAM_TOKEN));
    }

    #[test]
    fn test_empty_group_id_is_ignored() {
        let config = load(&[
            (TELEGRAM_TOKEN, "123:abc"),
            (CHANNEL_ID, "-1001"),
            (GROUP_ID, ""),
        ])
        .unwrap();
        assert_eq!(config.destinations.len(), 1);
    }
}
