use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;

pub const DEV_SEARCH_URL: &str = "http://localhost:8000";
pub const PROD_SEARCH_URL: &str = "https://chatiaecla-production.up.railway.app";
pub const DEFAULT_ADMIN_URL: &str = "http://localhost:8001";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Deployment profile, chosen explicitly at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    fn search_base_url(&self) -> &'static str {
        match self {
            Profile::Development => DEV_SEARCH_URL,
            Profile::Production => PROD_SEARCH_URL,
        }
    }
}

/// Options of the chat client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub search_base_url: String,
    /// Restrict search results to one document type (e.g. "appartement")
    pub search_type: Option<String>,
}

/// Runtime configuration injected into the clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub profile: Profile,
    pub search_base_url: String,
    pub admin_base_url: String,
    pub timeout: Duration,
}

/// Values given on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<Profile>,
    pub search_base_url: Option<String>,
    pub admin_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Defaults of a profile, no environment involved
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            search_base_url: profile.search_base_url().to_string(),
            admin_base_url: DEFAULT_ADMIN_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Profile defaults, then environment, then command line
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    fn resolve(overrides: Overrides, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let profile = match overrides.profile {
            Some(profile) => profile,
            None => match lookup("RENTAL_PROFILE") {
                Some(raw) => Profile::from_str(&raw, true)
                    .map_err(|e| anyhow::anyhow!(e))
                    .with_context(|| format!("Invalid RENTAL_PROFILE: {}", raw))?,
                None => Profile::default(),
            },
        };

        let mut config = Self::for_profile(profile);

        if let Some(url) = overrides.search_base_url.or_else(|| lookup("SEARCH_BASE_URL")) {
            config.search_base_url = url;
        }
        if let Some(url) = overrides.admin_base_url.or_else(|| lookup("ADMIN_BASE_URL")) {
            config.admin_base_url = url;
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => lookup("REQUEST_TIMEOUT_SECS")
                .map(|raw| raw.parse::<u64>().context("Invalid REQUEST_TIMEOUT_SECS"))
                .transpose()?,
        };
        if let Some(secs) = timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }

        config.search_base_url = trim_base_url(&config.search_base_url);
        config.admin_base_url = trim_base_url(&config.admin_base_url);

        Ok(config)
    }

    pub fn chat(&self, search_type: Option<String>) -> ChatConfig {
        ChatConfig {
            search_base_url: self.search_base_url.clone(),
            search_type,
        }
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn development_is_the_default_profile() {
        let config = Config::resolve(Overrides::default(), env_of(&[])).unwrap();
        assert_eq!(config.profile, Profile::Development);
        assert_eq!(config.search_base_url, DEV_SEARCH_URL);
        assert_eq!(config.admin_base_url, DEFAULT_ADMIN_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn production_profile_from_env() {
        let config =
            Config::resolve(Overrides::default(), env_of(&[("RENTAL_PROFILE", "production")]))
                .unwrap();
        assert_eq!(config.search_base_url, PROD_SEARCH_URL);
    }

    #[test]
    fn command_line_beats_environment() {
        let overrides = Overrides {
            search_base_url: Some("http://cli:9000/".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let config = Config::resolve(
            overrides,
            env_of(&[
                ("SEARCH_BASE_URL", "http://env:8000"),
                ("ADMIN_BASE_URL", "http://admin.env:8001/"),
                ("REQUEST_TIMEOUT_SECS", "60"),
            ]),
        )
        .unwrap();
        assert_eq!(config.search_base_url, "http://cli:9000");
        assert_eq!(config.admin_base_url, "http://admin.env:8001");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(Config::resolve(Overrides::default(), env_of(&[("RENTAL_PROFILE", "staging")])).is_err());
        assert!(
            Config::resolve(Overrides::default(), env_of(&[("REQUEST_TIMEOUT_SECS", "soon")])).is_err()
        );
    }
}
