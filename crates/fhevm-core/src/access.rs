//! Decryption-permission store capability

use std::collections::HashSet;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::LibraryError;

/// One permission entry: `user` may decrypt data held by `contract`, scoped
/// to the ACL contract at `acl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessChange {
    pub acl_address: Address,
    pub contract_address: Address,
    pub user_address: Address,
}

/// Backing store for decryption permissions
#[async_trait]
pub trait AccessControl: Send + Sync {
    async fn grant(&self, change: AccessChange) -> Result<(), LibraryError>;

    async fn revoke(&self, change: AccessChange) -> Result<(), LibraryError>;

    async fn check(&self, change: AccessChange) -> Result<bool, LibraryError>;
}

/// In-process permission store
#[derive(Debug, Default)]
pub struct MemoryAccessControl {
    grants: RwLock<HashSet<AccessChange>>,
}

impl MemoryAccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.grants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.grants.read().await.is_empty()
    }
}

#[async_trait]
impl AccessControl for MemoryAccessControl {
    async fn grant(&self, change: AccessChange) -> Result<(), LibraryError> {
        self.grants.write().await.insert(change);
        Ok(())
    }

    async fn revoke(&self, change: AccessChange) -> Result<(), LibraryError> {
        self.grants.write().await.remove(&change);
        Ok(())
    }

    async fn check(&self, change: AccessChange) -> Result<bool, LibraryError> {
        Ok(self.grants.read().await.contains(&change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(user: u8) -> AccessChange {
        AccessChange {
            acl_address: Address::repeat_byte(0x01),
            contract_address: Address::repeat_byte(0x02),
            user_address: Address::repeat_byte(user),
        }
    }

    #[tokio::test]
    async fn test_grant_check_revoke() {
        let store = MemoryAccessControl::new();
        assert!(!store.check(change(0xaa)).await.unwrap());

        store.grant(change(0xaa)).await.unwrap();
        assert!(store.check(change(0xaa)).await.unwrap());
        assert!(!store.check(change(0xbb)).await.unwrap());

        store.revoke(change(0xaa)).await.unwrap();
        assert!(!store.check(change(0xaa)).await.unwrap());
        assert!(store.is_empty().await);
    }
}
