//! Configuration management for ChainSentinel

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SentinelError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Dual-provider chat settings
    pub chat: ChatConfig,

    /// EternalAI completions provider
    pub eternal_ai: EternalAiConfig,

    /// Deepseek chat-completions provider
    pub deepseek: DeepseekConfig,

    /// Custodial wallet vendor
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Per-provider deadline in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EternalAiConfig {
    /// API endpoint URL
    pub endpoint: String,

    /// API key (can be env var reference like $ETERNALAI_API_KEY)
    pub api_key: String,

    /// Model to use
    pub model: String,

    /// Chain the completion is billed against
    pub chain_id: String,

    /// Max tokens for chat responses
    pub max_tokens: u32,

    /// Temperature for chat responses
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepseekConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Vendor API base URL
    pub endpoint: String,

    /// API key (can be env var reference like $CROSSMINT_API_KEY)
    pub api_key: String,

    /// Chain used for transactions and NFT lookups
    pub chain: String,

    /// Contract targeted by wallet transactions
    pub contract_address: String,

    /// Deadline for one vendor call in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Default for EternalAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.eternalai.org/v1".to_string(),
            api_key: "$ETERNALAI_API_KEY".to_string(),
            model: "unsloth/Llama-3.3-70B-Instruct-bnb-4bit".to_string(),
            chain_id: "45762".to_string(),
            max_tokens: 500,
            temperature: 0.4,
        }
    }
}

impl Default for DeepseekConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://integrate.api.nvidia.com/v1".to_string(),
            api_key: "$NVIDIA_API_KEY".to_string(),
            model: "deepseek-ai/deepseek-r1".to_string(),
            max_tokens: 1000,
            temperature: 0.4,
            top_p: 0.85,
            presence_penalty: 0.2,
            frequency_penalty: 0.3,
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://staging.crossmint.com/api/2022-06-09".to_string(),
            api_key: "$CROSSMINT_API_KEY".to_string(),
            chain: "polygon-amoy".to_string(),
            contract_address: "0x5c030a01e9d2c4bb78212d06f88b7724b494b755".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl WalletConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it does not exist
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SentinelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chainsentinel")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.chat.timeout_secs == 0 {
            return Err(SentinelError::Config(
                "chat.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.wallet.timeout_secs == 0 {
            return Err(SentinelError::Config(
                "wallet.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve an API key value (handles env var references)
pub fn resolve_api_key(raw: &str) -> Option<String> {
    if let Some(var) = raw.strip_prefix('$') {
        std::env::var(var).ok().filter(|v| !v.is_empty())
    } else if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
