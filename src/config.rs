//! Bot configuration from environment variables (a `.env` file is honoured).
//!
//! Required: DISCORD_TOKEN, HOST_CHANNEL_ID, RESULTS_CHANNEL_ID, LEAGUE_HOSTER_ROLE_ID.
//! Optional: HOST (default 0.0.0.0) and PORT (default 8080) for the status server.

use crate::models::{ChannelId, RoleId};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Channels and role the league flow is pinned to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeagueSettings {
    /// The only channel `/hostleague` is accepted in.
    pub hosting_channel: ChannelId,
    /// Where final results are published.
    pub results_channel: ChannelId,
    /// Role required to host.
    pub hoster_role: RoleId,
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub league: LeagueSettings,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("league", &self.league)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl BotConfig {
    /// Load from the process environment after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, "DISCORD_TOKEN")?;
        let league = LeagueSettings {
            hosting_channel: required_id(&lookup, "HOST_CHANNEL_ID")?,
            results_channel: required_id(&lookup, "RESULTS_CHANNEL_ID")?,
            hoster_role: required_id(&lookup, "LEAGUE_HOSTER_ROLE_ID")?,
        };
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(default_host);
        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: p.clone(),
            })?,
            None => default_port(),
        };
        Ok(Self {
            token,
            league,
            host,
            port,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn required_id<F>(lookup: &F, key: &'static str) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, key)?;
    raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn full() -> HashMap<String, String> {
        env(&[
            ("DISCORD_TOKEN", "secret"),
            ("HOST_CHANNEL_ID", "100"),
            ("RESULTS_CHANNEL_ID", "200"),
            ("LEAGUE_HOSTER_ROLE_ID", "300"),
        ])
    }

    #[test]
    fn loads_required_and_defaults() {
        let vars = full();
        let cfg = BotConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(cfg.token, "secret");
        assert_eq!(
            cfg.league,
            LeagueSettings {
                hosting_channel: 100,
                results_channel: 200,
                hoster_role: 300
            }
        );
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn missing_token_is_reported() {
        let mut vars = full();
        vars.remove("DISCORD_TOKEN");
        let err = BotConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DISCORD_TOKEN"));
    }

    #[test]
    fn non_numeric_id_is_invalid() {
        let mut vars = full();
        vars.insert("RESULTS_CHANNEL_ID".into(), "results".into());
        let err = BotConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RESULTS_CHANNEL_ID", .. }));
    }

    #[test]
    fn debug_hides_token() {
        let vars = full();
        let cfg = BotConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert!(!format!("{cfg:?}").contains("secret"));
    }
}
