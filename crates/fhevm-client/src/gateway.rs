//! HTTP client for the decryption gateway

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use fhevm_core::{AccessChange, AccessControl, LibraryError};

use crate::error::{ClientError, Result};

/// Body of `POST /decrypt`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    /// Raw ciphertext bytes, serialized as a JSON number array
    pub ciphertext: Vec<u8>,
    pub contract_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_address: Option<String>,
}

/// Response from `POST /decrypt`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub value: serde_json::Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
}

/// Response from `GET /acl/check`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCheckResponse {
    pub allowed: bool,
}

/// Thin wrapper over one gateway base URL
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a decryption request. Non-2xx is a hard failure carrying the status.
    pub async fn decrypt(&self, request: &DecryptRequest) -> Result<DecryptResponse> {
        let url = format!("{}/decrypt", self.base_url);
        let resp = self.http.post(&url).json(request).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::GatewayRequestFailed {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let decrypt_resp: DecryptResponse = resp.json().await?;
        Ok(decrypt_resp)
    }

    async fn post_acl(&self, action: &str, change: &AccessChange) -> Result<()> {
        let url = format!("{}/acl/{}", self.base_url, action);
        let resp = self.http.post(&url).json(change).send().await?;

        if !resp.status().is_success() {
            return Err(ClientError::GatewayRequestFailed {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    pub async fn grant(&self, change: &AccessChange) -> Result<()> {
        self.post_acl("grant", change).await
    }

    pub async fn revoke(&self, change: &AccessChange) -> Result<()> {
        self.post_acl("revoke", change).await
    }

    pub async fn check(&self, change: &AccessChange) -> Result<bool> {
        let url = format!("{}/acl/check", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("aclAddress", change.acl_address.to_string()),
                ("contractAddress", change.contract_address.to_string()),
                ("userAddress", change.user_address.to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::GatewayRequestFailed {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let check: AccessCheckResponse = resp.json().await?;
        Ok(check.allowed)
    }
}

/// Permission store backed by the gateway's `/acl/*` routes
#[derive(Debug, Clone)]
pub struct GatewayAccessControl {
    gateway: GatewayClient,
}

impl GatewayAccessControl {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl AccessControl for GatewayAccessControl {
    async fn grant(&self, change: AccessChange) -> std::result::Result<(), LibraryError> {
        self.gateway
            .grant(&change)
            .await
            .map_err(|e| LibraryError::new(e.to_string()))
    }

    async fn revoke(&self, change: AccessChange) -> std::result::Result<(), LibraryError> {
        self.gateway
            .revoke(&change)
            .await
            .map_err(|e| LibraryError::new(e.to_string()))
    }

    async fn check(&self, change: AccessChange) -> std::result::Result<bool, LibraryError> {
        self.gateway
            .check(&change)
            .await
            .map_err(|e| LibraryError::new(e.to_string()))
    }
}
