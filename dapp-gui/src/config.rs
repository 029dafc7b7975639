//! Front-end configuration
//!
//! The dapp only needs to know:
//! - Where the wallet JSON-RPC endpoint lives
//! - Which contract to talk to, and optionally which ABI to bind it with
//! - How long to wait for things

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dapp::{Abi, Address, DEFAULT_CONTRACT_ADDRESS, DONATION_ABI};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Wallet JSON-RPC endpoint.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Address of the donation contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// JSON ABI file to bind the contract with. The built-in ABI is used when unset.
    #[serde(default)]
    pub abi_path: Option<PathBuf>,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on a whole wallet round-trip, receipt wait included.
    /// 0 disables it.
    #[serde(default = "default_action_timeout_secs")]
    pub action_timeout_secs: u64,

    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    #[serde(default = "default_success_toast_ms")]
    pub success_toast_ms: u64,

    #[serde(default = "default_error_toast_ms")]
    pub error_toast_ms: u64,
}

fn default_provider_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_action_timeout_secs() -> u64 {
    120
}

fn default_receipt_poll_interval_ms() -> u64 {
    1000
}

fn default_success_toast_ms() -> u64 {
    2000
}

fn default_error_toast_ms() -> u64 {
    4000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            contract_address: default_contract_address(),
            abi_path: None,
            request_timeout_secs: default_request_timeout_secs(),
            action_timeout_secs: default_action_timeout_secs(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            success_toast_ms: default_success_toast_ms(),
            error_toast_ms: default_error_toast_ms(),
        }
    }
}

impl Config {
    /// Load configuration from disk, writing the defaults on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            log::info!("📁 Loading config from: {}", config_path.display());
            let config = Self::load_from(&config_path)?;
            log::info!(
                "✅ Config loaded: provider={}, contract={}",
                config.provider_url,
                config.contract_address
            );
            Ok(config)
        } else {
            log::info!("📝 Creating default config");
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Parse and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;
        log::info!("💾 Config saved to: {}", config_path.display());
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let mut path = Self::data_dir()?;
        path.push("config.toml");
        Ok(path)
    }

    /// Get base data directory
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        let mut path = home;
        path.push(".donation-dapp");
        Ok(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.provider_url.starts_with("http://") && !self.provider_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidEndpoint(self.provider_url.clone()));
        }

        self.contract()?;

        if self.receipt_poll_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }

    pub fn contract(&self) -> Result<Address, ConfigError> {
        self.contract_address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.contract_address.clone()))
    }

    /// The configured ABI, or the built-in one.
    pub fn load_abi(&self) -> Result<Abi, ConfigError> {
        match self.abi_path {
            Some(ref path) => {
                log::info!("📜 Loading contract ABI from: {}", path.display());
                let json = fs::read_to_string(path)
                    .map_err(|e| ConfigError::Abi(format!("{}: {}", path.display(), e)))?;
                Abi::from_json(&json).map_err(|e| ConfigError::Abi(e.to_string()))
            }
            None => Abi::from_json(DONATION_ABI).map_err(|e| ConfigError::Abi(e.to_string())),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn action_timeout(&self) -> Option<Duration> {
        match self.action_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn success_toast(&self) -> Duration {
        Duration::from_millis(self.success_toast_ms)
    }

    pub fn error_toast(&self) -> Duration {
        Duration::from_millis(self.error_toast_ms)
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Invalid endpoint: {0} (must start with http:// or https://)")]
    InvalidEndpoint(String),

    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    #[error("Receipt poll interval must be non-zero")]
    InvalidInterval,

    #[error("Request timeout must be non-zero")]
    InvalidTimeout,

    #[error("Invalid contract ABI: {0}")]
    Abi(String),
}
