use serde::Deserialize;

use crate::adapters::outbound::storage::s3::{DEFAULT_REGION, ObjectHandle};

/// Connection settings for one object handle
#[derive(Clone, Deserialize, bon::Builder)]
pub struct HandleConfig {
    #[builder(into)]
    pub endpoint: String,
    #[builder(into)]
    pub access_key: String,
    #[builder(into)]
    pub secret_key: String,
    #[builder(into, default = DEFAULT_REGION.to_string())]
    #[serde(default = "default_region")]
    pub region: String,
    #[builder(into)]
    pub bucket: String,
    #[builder(into)]
    pub key: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl std::fmt::Debug for HandleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .finish()
    }
}

impl HandleConfig {
    /// Read the configuration from `S3_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, AppError> {
        // Missing .env is fine; real environment variables still apply
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| AppError::Configuration {
                message: format!("{} environment variable required", name),
            })
        };

        Ok(Self {
            endpoint: required("S3_ENDPOINT")?,
            access_key: required("S3_ACCESS_KEY")?,
            secret_key: required("S3_SECRET_KEY")?,
            region: lookup("S3_REGION").unwrap_or_else(default_region),
            bucket: required("S3_BUCKET")?,
            key: required("S3_KEY")?,
        })
    }

    /// Build the handle; no network traffic happens until first use
    pub fn into_handle(self) -> ObjectHandle {
        ObjectHandle::new(
            &self.endpoint,
            &self.access_key,
            &self.secret_key,
            &self.region,
            &self.bucket,
            &self.key,
        )
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
