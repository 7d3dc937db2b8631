//! Gateway configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use fhevm_core::network;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Chain the gateway serves
    pub chain_id: u64,
    /// ACL contract that scopes permission checks on `/decrypt`
    pub acl_address: String,
    /// Reject `/decrypt` calls naming a user without a matching grant
    #[serde(default = "default_enforce_acl")]
    pub enforce_acl: bool,
}

fn default_enforce_acl() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        match network::lookup_by_name("hardhat") {
            Some(preset) => Self::for_network(preset),
            None => Self {
                chain_id: 31337,
                acl_address: String::new(),
                enforce_acl: true,
            },
        }
    }
}

impl GatewayConfig {
    pub fn for_network(preset: &network::NetworkConfig) -> Self {
        Self {
            chain_id: preset.chain_id,
            acl_address: preset.acl_address.to_string(),
            enforce_acl: true,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
