//! S3-compatible object storage client (Tencent COS by default).
//!
//! `init` only assembles SDK configuration; no request is sent until the
//! client is used. Static credentials are optional; without them the SDK's
//! default provider chain applies.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::domain::ports::{LifecycleError, ManagedClient};
use crate::outbound::slot::ClientSlot;

const COMPONENT: &str = "object_store";
const CREDENTIALS_SOURCE: &str = "minimus-settings";

/// Region, scheme, endpoint and credentials for the object store.
#[derive(Debug)]
pub struct ObjectStoreConfig {
    region: String,
    scheme: String,
    endpoint: Option<String>,
    secret_id: Option<SecretString>,
    secret_key: Option<SecretString>,
}

impl ObjectStoreConfig {
    /// Create a configuration for `region` reached over `scheme`.
    pub fn new(region: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            scheme: scheme.into(),
            endpoint: None,
            secret_id: None,
            secret_key: None,
        }
    }

    /// Use static credentials instead of the default provider chain.
    pub fn with_credentials(mut self, secret_id: SecretString, secret_key: SecretString) -> Self {
        self.secret_id = Some(secret_id);
        self.secret_key = Some(secret_key);
        self
    }

    /// Override the derived COS endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Configured region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Endpoint URL: the override, or `{scheme}://cos.{region}.myqcloud.com`.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("{}://cos.{}.myqcloud.com", self.scheme, self.region))
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.secret_id, &self.secret_key) {
            (Some(id), Some(key)) => Some(Credentials::new(
                id.expose_secret(),
                key.expose_secret(),
                None,
                None,
                CREDENTIALS_SOURCE,
            )),
            _ => None,
        }
    }
}

/// Object storage client owning one SDK client for the process.
pub struct ObjectStore {
    config: ObjectStoreConfig,
    slot: ClientSlot<Client>,
}

impl ObjectStore {
    /// Create an uninitialised client.
    pub fn new(config: ObjectStoreConfig) -> Self {
        Self {
            config,
            slot: ClientSlot::new(COMPONENT),
        }
    }

    /// Live SDK client.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::Uninitialised` before `init` or after
    /// `shutdown`.
    pub fn client(&self) -> Result<Client, LifecycleError> {
        self.slot.get()
    }

    async fn build(&self) -> Result<Client, LifecycleError> {
        if self.config.region.trim().is_empty() {
            return Err(LifecycleError::configuration(
                COMPONENT,
                "region must not be empty",
            ));
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.config.region.clone()));
        if let Some(credentials) = self.config.credentials() {
            loader = loader.credentials_provider(credentials);
        }
        let sdk_config = loader.load().await;

        let endpoint = self.config.endpoint();
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .endpoint_url(endpoint.as_str())
            .build();
        info!(component = COMPONENT, %endpoint, "object store client configured");
        Ok(Client::from_conf(s3_config))
    }
}

#[async_trait]
impl ManagedClient for ObjectStore {
    fn component(&self) -> &'static str {
        self.slot.component()
    }

    async fn init(&self) -> Result<(), LifecycleError> {
        self.slot.init_with(|| self.build()).await.map(drop)
    }

    async fn shutdown(&self) {
        drop(self.slot.take());
    }

    fn is_initialised(&self) -> bool {
        self.slot.is_initialised()
    }
}
