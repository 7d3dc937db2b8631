//! Instance management: binds a resolved network config to a library instance

use std::fmt;
use std::sync::Arc;

use reqwest::Client;

use fhevm_core::{
    parse_address, validate_address, validate_chain_id, validate_url, AccessControl, Address,
    FhevmConfig, FhevmLibrary, InstanceParams, LibraryInstance,
};

use crate::error::{ClientError, Result};
use crate::gateway::{GatewayAccessControl, GatewayClient};

/// Live binding between a resolved configuration and a library instance.
///
/// Only [`InstanceManager::create`] builds one, and only once every step
/// succeeded, so a caller never sees a half-initialized instance. Refreshing
/// produces a new value; nothing here mutates after construction.
pub struct Instance {
    pub(crate) handle: Arc<dyn LibraryInstance>,
    pub(crate) config: FhevmConfig,
    pub(crate) acl_address: Address,
    pub(crate) gateway: GatewayClient,
    pub(crate) access: Arc<dyn AccessControl>,
    pub(crate) manager: InstanceManager,
    pub(crate) ready: bool,
}

impl Instance {
    /// Configuration after merging explicit fields over the network preset
    pub fn resolved_config(&self) -> &FhevmConfig {
        &self.config
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    pub fn acl_address(&self) -> Address {
        self.acl_address
    }

    pub fn gateway_url(&self) -> &str {
        self.gateway.base_url()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn library_instance(&self) -> &Arc<dyn LibraryInstance> {
        &self.handle
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("config", &self.config)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

/// Creates instances against one encryption library
#[derive(Clone)]
pub struct InstanceManager {
    library: Arc<dyn FhevmLibrary>,
    http: Client,
    access: Option<Arc<dyn AccessControl>>,
}

impl InstanceManager {
    pub fn new(library: Arc<dyn FhevmLibrary>) -> Self {
        Self {
            library,
            http: Client::new(),
            access: None,
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies) for gateway calls
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Use a specific permission store instead of the gateway's `/acl` routes
    pub fn with_access_control(mut self, access: Arc<dyn AccessControl>) -> Self {
        self.access = Some(access);
        self
    }

    /// Resolve `config`, validate it, then build a ready instance.
    ///
    /// Validation failures keep their own kind and happen before the library
    /// is touched. Library failures become `InstanceCreationFailed`.
    pub async fn create(&self, config: &FhevmConfig) -> Result<Instance> {
        if let Some(name) = config.network.as_deref() {
            if config.preset().is_none() {
                tracing::warn!(network = name, "Unknown network preset, using explicit config only");
            }
        }

        let resolved = config.resolve();

        if !validate_chain_id(resolved.chain_id) {
            return Err(ClientError::InvalidChainId(resolved.chain_id));
        }

        let gateway_url = resolved
            .gateway_url
            .clone()
            .ok_or(ClientError::MissingGatewayUrl)?;
        let acl = resolved
            .acl_address
            .clone()
            .ok_or(ClientError::MissingAclAddress)?;

        if !validate_url(&gateway_url) {
            return Err(ClientError::InvalidGatewayUrl(gateway_url));
        }
        if !validate_address(&acl) {
            return Err(ClientError::InvalidAddress(acl));
        }
        let acl_address = parse_address(&acl)?;

        self.library
            .init()
            .await
            .map_err(|e| ClientError::InstanceCreationFailed(e.to_string()))?;

        let params = InstanceParams {
            chain_id: resolved.chain_id,
            gateway_url: gateway_url.clone(),
            acl_address,
            public_key: Vec::new(),
        };
        let handle = self
            .library
            .create_instance(params)
            .await
            .map_err(|e| ClientError::InstanceCreationFailed(e.to_string()))?;

        let gateway = GatewayClient::new(self.http.clone(), &gateway_url);
        let access = match &self.access {
            Some(access) => access.clone(),
            None => Arc::new(GatewayAccessControl::new(gateway.clone())),
        };

        tracing::info!(
            chain_id = resolved.chain_id,
            gateway = %gateway_url,
            library = self.library.name(),
            "FHEVM instance created"
        );

        Ok(Instance {
            handle,
            config: resolved,
            acl_address,
            gateway,
            access,
            manager: self.clone(),
            ready: true,
        })
    }

    /// Build a brand-new instance from `instance`'s resolved config.
    /// The old instance is left untouched for the caller to discard.
    pub async fn refresh(&self, instance: &Instance) -> Result<Instance> {
        self.create(&instance.config).await
    }
}

/// Create an instance for `config` using `library`
pub async fn create_fhevm_instance(
    library: Arc<dyn FhevmLibrary>,
    config: &FhevmConfig,
) -> Result<Instance> {
    InstanceManager::new(library).create(config).await
}

/// Re-create `instance` with the manager that built it
pub async fn refresh_fhevm_instance(instance: &Instance) -> Result<Instance> {
    instance.manager.refresh(instance).await
}

/// `true` iff an instance is present and ready
pub fn is_fhevm_ready(instance: Option<&Instance>) -> bool {
    instance.map(|i| i.ready).unwrap_or(false)
}

/// Guard used by every dispatcher operation
pub(crate) fn require_ready(instance: Option<&Instance>) -> Result<&Instance> {
    match instance {
        Some(i) if i.ready => Ok(i),
        _ => Err(ClientError::NotReady),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use fhevm_core::mock::MockLibrary;
    use fhevm_core::{LibraryError, MemoryAccessControl};

    pub(crate) async fn test_instance() -> Instance {
        InstanceManager::new(Arc::new(MockLibrary::new()))
            .with_access_control(Arc::new(MemoryAccessControl::new()))
            .create(&FhevmConfig::new(31337).with_network("hardhat"))
            .await
            .unwrap()
    }

    pub(crate) async fn unready_instance() -> Instance {
        let mut instance = test_instance().await;
        instance.ready = false;
        instance
    }

    struct BrokenLibrary;

    #[async_trait]
    impl FhevmLibrary for BrokenLibrary {
        async fn init(&self) -> std::result::Result<(), LibraryError> {
            Err(LibraryError::new("wasm module failed to load"))
        }

        async fn create_instance(
            &self,
            _params: InstanceParams,
        ) -> std::result::Result<Arc<dyn LibraryInstance>, LibraryError> {
            unreachable!("init always fails")
        }
    }

    #[tokio::test]
    async fn test_create_from_preset() {
        let instance = create_fhevm_instance(
            Arc::new(MockLibrary::new()),
            &FhevmConfig::new(11155111).with_network("sepolia"),
        )
        .await
        .unwrap();

        assert!(is_fhevm_ready(Some(&instance)));
        assert_eq!(instance.gateway_url(), "https://gateway.sepolia.zama.ai");
        let config = instance.resolved_config();
        assert_eq!(
            config.acl_address.as_deref(),
            Some("0x9D6891A6240D6130c54ae243d8005063D05fE14b")
        );
        assert!(config.kms_verifier_address.is_some());
    }

    #[tokio::test]
    async fn test_missing_gateway_url() {
        let err = create_fhevm_instance(Arc::new(MockLibrary::new()), &FhevmConfig::new(11155111))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingGatewayUrl));
    }

    #[tokio::test]
    async fn test_missing_acl_address() {
        let config = FhevmConfig::new(11155111).with_gateway_url("http://localhost:3000");
        let err = create_fhevm_instance(Arc::new(MockLibrary::new()), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingAclAddress));
    }

    #[tokio::test]
    async fn test_invalid_acl_address_fails_before_library() {
        let library = Arc::new(MockLibrary::new());
        let config = FhevmConfig::new(31337)
            .with_network("hardhat")
            .with_acl_address("0x1234");
        let err = create_fhevm_instance(library.clone(), &config).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidAddress(_)));
        assert_eq!(library.init_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_chain_and_gateway() {
        let library: Arc<dyn FhevmLibrary> = Arc::new(MockLibrary::new());
        let err = create_fhevm_instance(library.clone(), &FhevmConfig::new(0).with_network("hardhat"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidChainId(0)));

        let config = FhevmConfig::new(31337)
            .with_network("hardhat")
            .with_gateway_url("not a url");
        let err = create_fhevm_instance(library, &config).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidGatewayUrl(_)));
    }

    #[tokio::test]
    async fn test_library_failure_is_wrapped() {
        let err = create_fhevm_instance(
            Arc::new(BrokenLibrary),
            &FhevmConfig::new(31337).with_network("hardhat"),
        )
        .await
        .unwrap_err();
        match err {
            ClientError::InstanceCreationFailed(msg) => assert!(msg.contains("wasm module")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_builds_new_instance() {
        let library = Arc::new(MockLibrary::new());
        let config = FhevmConfig::new(31337)
            .with_network("hardhat")
            .with_gateway_url("http://127.0.0.1:9999/gateway");
        let first = create_fhevm_instance(library.clone(), &config).await.unwrap();
        let second = refresh_fhevm_instance(&first).await.unwrap();

        assert!(first.is_ready());
        assert!(second.is_ready());
        assert_eq!(first.resolved_config(), second.resolved_config());
        assert!(!Arc::ptr_eq(first.library_instance(), second.library_instance()));
        assert_eq!(library.init_calls(), 2);
    }

    #[tokio::test]
    async fn test_is_ready_guard() {
        assert!(!is_fhevm_ready(None));
        let unready = unready_instance().await;
        assert!(!is_fhevm_ready(Some(&unready)));
        assert!(matches!(require_ready(Some(&unready)), Err(ClientError::NotReady)));
        let ready = test_instance().await;
        assert!(require_ready(Some(&ready)).is_ok());
    }
}
