//! Optional on-disk settings for a [`Client`](crate::Client), enabled by
//! the `config` feature. Credential storage stays explicitly out of
//! scope (§1 Non-goals): this only remembers where a server lives.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub project: String,
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let config =
            ClientConfig { base_url: "https://example.test".to_string(), project: "demo".to_string() };
        let text = config.to_toml_string().unwrap();
        assert_eq!(ClientConfig::from_toml_str(&text).unwrap(), config);
    }
}
