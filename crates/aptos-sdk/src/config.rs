//! Client configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SdkError;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header
pub const DEFAULT_USER_AGENT: &str = concat!("aptos-lite-sdk/", env!("CARGO_PKG_VERSION"));

/// Well-known networks, or a custom node URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    /// Mainnet
    Mainnet,
    /// Testnet
    Testnet,
    /// Devnet
    Devnet,
    /// Node on localhost
    Localnet,
    /// Any other fullnode REST endpoint
    Custom(String),
}

impl Network {
    /// REST base URL, including the `/v1` prefix
    pub fn node_url(&self) -> &str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.aptoslabs.com/v1",
            Network::Testnet => "https://fullnode.testnet.aptoslabs.com/v1",
            Network::Devnet => "https://fullnode.devnet.aptoslabs.com/v1",
            Network::Localnet => "http://127.0.0.1:8080/v1",
            Network::Custom(url) => url,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
            Network::Devnet => f.write_str("devnet"),
            Network::Localnet => f.write_str("localnet"),
            Network::Custom(url) => f.write_str(url),
        }
    }
}

impl FromStr for Network {
    type Err = SdkError;

    /// Network name, or an `http(s)://` URL for a custom node
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            _ if s.starts_with("http://") || s.starts_with("https://") => {
                Ok(Network::Custom(s.to_string()))
            }
            _ => Err(SdkError::InvalidOptions(format!("unknown network: {s}"))),
        }
    }
}

impl Serialize for Network {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// REST base URL, including `/v1`
    pub node_url: String,
    /// Per-request timeout
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,
    /// `User-Agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ClientConfig {
    /// Config for an explicit node URL
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Config for a network
    pub fn for_network(network: &Network) -> Self {
        Self::new(network.node_url())
    }

    /// Mainnet config
    pub fn mainnet() -> Self {
        Self::for_network(&Network::Mainnet)
    }

    /// Testnet config
    pub fn testnet() -> Self {
        Self::for_network(&Network::Testnet)
    }

    /// Devnet config
    pub fn devnet() -> Self {
        Self::for_network(&Network::Devnet)
    }

    /// Localnet config
    pub fn localnet() -> Self {
        Self::for_network(&Network::Localnet)
    }

    /// Override the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::devnet()
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
