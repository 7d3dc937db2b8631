//! Network presets: static gateway and ACL addresses per supported network

use serde::Serialize;

/// Preset for one supported network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Registry key (lower-case)
    #[serde(skip)]
    pub key: &'static str,
    pub chain_id: u64,
    /// Human-readable name
    pub name: &'static str,
    /// Gateway base URL for decryption requests
    pub gateway_url: &'static str,
    /// ACL contract address
    pub acl_address: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_verifier_address: Option<&'static str>,
    pub rpc_urls: &'static [&'static str],
}

const ACL_ADDRESS: &str = "0x9D6891A6240D6130c54ae243d8005063D05fE14b";
const KMS_VERIFIER_ADDRESS: &str = "0x33347831500F1e73f102B789773FBb27Fe321808";

/// Registry contents, in lookup order
pub static NETWORKS: &[NetworkConfig] = &[
    NetworkConfig {
        key: "sepolia",
        chain_id: 11155111,
        name: "Sepolia",
        gateway_url: "https://gateway.sepolia.zama.ai",
        acl_address: ACL_ADDRESS,
        kms_verifier_address: Some(KMS_VERIFIER_ADDRESS),
        rpc_urls: &[
            "https://ethereum-sepolia-rpc.publicnode.com",
            "https://rpc.sepolia.org",
            "https://eth-sepolia.g.alchemy.com/v2/demo",
        ],
    },
    NetworkConfig {
        key: "localhost",
        chain_id: 31337,
        name: "Localhost",
        gateway_url: "http://localhost:8545/gateway",
        acl_address: ACL_ADDRESS,
        kms_verifier_address: Some(KMS_VERIFIER_ADDRESS),
        rpc_urls: &["http://127.0.0.1:8545"],
    },
    NetworkConfig {
        key: "hardhat",
        chain_id: 31337,
        name: "Hardhat",
        gateway_url: "http://localhost:8545/gateway",
        acl_address: ACL_ADDRESS,
        kms_verifier_address: Some(KMS_VERIFIER_ADDRESS),
        rpc_urls: &["http://127.0.0.1:8545"],
    },
];

/// Look up a preset by registry key, ignoring case
pub fn lookup_by_name(name: &str) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.key.eq_ignore_ascii_case(name))
}

/// First preset registered for `chain_id`
pub fn lookup_by_chain_id(chain_id: u64) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

pub fn is_supported(name: &str) -> bool {
    lookup_by_name(name).is_some()
}

pub fn list_names() -> Vec<&'static str> {
    NETWORKS.iter().map(|n| n.key).collect()
}

/// Distinct chain ids in registry order.
///
/// One entry per chain, not per preset: `localhost` and `hardhat` share 31337
/// and it is listed once.
pub fn list_chain_ids() -> Vec<u64> {
    let mut ids = Vec::new();
    for network in NETWORKS {
        if !ids.contains(&network.chain_id) {
            ids.push(network.chain_id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate_address, validate_url};

    #[test]
    fn test_lookup_by_name_ignores_case() {
        let sepolia = lookup_by_name("sepolia").unwrap();
        assert_eq!(sepolia.chain_id, 11155111);
        assert_eq!(lookup_by_name("SePoLiA"), Some(sepolia));
        assert!(lookup_by_name("mainnet").is_none());
        assert!(lookup_by_name("").is_none());
    }

    #[test]
    fn test_lookup_by_chain_id_returns_first() {
        assert_eq!(lookup_by_chain_id(31337).unwrap().key, "localhost");
        assert_eq!(lookup_by_chain_id(11155111).unwrap().name, "Sepolia");
        assert!(lookup_by_chain_id(1).is_none());
    }

    #[test]
    fn test_listing() {
        assert_eq!(list_names(), vec!["sepolia", "localhost", "hardhat"]);
        assert_eq!(list_chain_ids(), vec![11155111, 31337]);
        assert!(is_supported("Hardhat"));
        assert!(!is_supported("goerli"));
    }

    #[test]
    fn test_presets_are_well_formed() {
        for network in NETWORKS {
            assert!(validate_url(network.gateway_url), "{}", network.key);
            assert!(validate_address(network.acl_address), "{}", network.key);
            if let Some(kms) = network.kms_verifier_address {
                assert!(validate_address(kms));
            }
            assert_eq!(network.key, network.key.to_ascii_lowercase());
        }
    }

    #[test]
    fn test_preset_serializes_camel_case() {
        let json = serde_json::to_value(lookup_by_name("sepolia").unwrap()).unwrap();
        assert_eq!(json["chainId"], 11155111);
        assert_eq!(json["gatewayUrl"], "https://gateway.sepolia.zama.ai");
        assert!(json.get("key").is_none());
    }
}
