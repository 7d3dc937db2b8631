//! Instance configuration

use serde::{Deserialize, Serialize};

use crate::network::{self, NetworkConfig};

/// SDK version constant
pub const VERSION: &str = "1.0.0";

/// User-supplied configuration for creating an instance.
///
/// Explicit `gateway_url` / `acl_address` / `kms_verifier_address` always
/// take precedence over the preset named by `network`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FhevmConfig {
    /// Ethereum chain ID (e.g. 11155111 for Sepolia)
    pub chain_id: u64,
    /// Registry key of a network preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Gateway base URL for decryption requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
    /// ACL contract address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl_address: Option<String>,
    /// KMS verifier contract address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_verifier_address: Option<String>,
}

impl FhevmConfig {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    /// Config for a registry preset, using the preset's chain id
    pub fn for_network(preset: &NetworkConfig) -> Self {
        Self::new(preset.chain_id).with_network(preset.key)
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    pub fn with_acl_address(mut self, address: impl Into<String>) -> Self {
        self.acl_address = Some(address.into());
        self
    }

    pub fn with_kms_verifier_address(mut self, address: impl Into<String>) -> Self {
        self.kms_verifier_address = Some(address.into());
        self
    }

    /// Preset named by `network`, if any and if known
    pub fn preset(&self) -> Option<&'static NetworkConfig> {
        self.network.as_deref().and_then(network::lookup_by_name)
    }

    /// Merge explicit fields over the preset.
    ///
    /// No validation happens here; the result may still lack a gateway URL or
    /// ACL address.
    pub fn resolve(&self) -> FhevmConfig {
        let preset = self.preset();
        FhevmConfig {
            chain_id: self.chain_id,
            network: self.network.clone(),
            gateway_url: self
                .gateway_url
                .clone()
                .or_else(|| preset.map(|p| p.gateway_url.to_string())),
            acl_address: self
                .acl_address
                .clone()
                .or_else(|| preset.map(|p| p.acl_address.to_string())),
            kms_verifier_address: self
                .kms_verifier_address
                .clone()
                .or_else(|| preset.and_then(|p| p.kms_verifier_address.map(str::to_string))),
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
