use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{
        BehaviorVersion, Credentials, Region, RequestChecksumCalculation,
        ResponseChecksumValidation, retry::RetryConfig,
    },
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::{
    adapters::outbound::storage::error::classify_sdk_error,
    domain::{
        errors::{ConditionalWriteError, ErrorCode, WriteResult, codes},
        value_objects::{ETag, ObjectIdentity, Precondition, PriorVersion},
    },
    ports::storage::ConditionalObjectStore,
};

/// Region that accepts bucket creation without a location constraint
pub const DEFAULT_REGION: &str = "us-east-1";

const CREDENTIALS_PROVIDER_NAME: &str = "conditional-write-static";

/// Conditional-write handle for one object in an S3-compatible store
#[derive(Clone, Debug)]
pub struct ObjectHandle {
    client: Client,
    identity: ObjectIdentity,
}

impl ObjectHandle {
    /// Configure an S3 client for `endpoint` and bind it to `bucket`/`key`.
    ///
    /// No request is made here; bad endpoints or credentials only show up on
    /// the first call.
    pub fn new(
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
        bucket: &str,
        key: &str,
    ) -> Self {
        let credentials = Credentials::new(
            access_key,
            secret_key,
            None, // session token
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            // Addressed by explicit endpoint, not virtual-host DNS
            .force_path_style(true)
            .request_checksum_calculation(RequestChecksumCalculation::WhenSupported)
            .response_checksum_validation(ResponseChecksumValidation::WhenSupported)
            .retry_config(RetryConfig::standard())
            .build();

        Self::from_client(Client::from_conf(config), bucket, key)
    }

    /// Bind an already configured SDK client to `bucket`/`key`
    pub fn from_client(client: Client, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            identity: ObjectIdentity::new(bucket, key),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        let region = self.client.config().region()?.as_ref();
        if region == DEFAULT_REGION {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build(),
        )
    }
}

#[async_trait]
impl ConditionalObjectStore for ObjectHandle {
    fn identity(&self) -> &ObjectIdentity {
        &self.identity
    }

    #[tracing::instrument(
        skip(self, content, previous),
        fields(bucket = %self.identity.bucket(), key = %self.identity.key(), previous = %previous)
    )]
    async fn set(&self, content: Bytes, previous: &PriorVersion) -> WriteResult<ETag> {
        let request = self
            .client
            .put_object()
            .bucket(self.identity.bucket())
            .key(self.identity.key())
            .body(ByteStream::from(content));

        let request = match previous.precondition() {
            Precondition::IfNoneMatch(value) => request.if_none_match(value),
            Precondition::IfMatch(value) => request.if_match(value),
        };

        let output = match request.send().await {
            Ok(output) => output,
            Err(err) => {
                let err = classify_sdk_error(err, &self.identity);
                if err.is_precondition_failed() {
                    debug!("conditional write rejected: {}", err);
                }
                return Err(err);
            }
        };

        match output.e_tag().map(ETag::new) {
            Some(Ok(etag)) => {
                debug!(etag = %etag, "conditional write accepted");
                Ok(etag)
            }
            Some(Err(e)) => {
                warn!("write accepted with unusable ETag: {}", e);
                Err(self.missing_etag())
            }
            None => {
                warn!("write accepted without an ETag");
                Err(self.missing_etag())
            }
        }
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.identity.bucket()))]
    async fn create_bucket(&self) -> WriteResult<()> {
        let request = self
            .client
            .create_bucket()
            .bucket(self.identity.bucket())
            .set_create_bucket_configuration(self.location_constraint());

        match request.send().await {
            Ok(_) => {
                debug!("bucket created");
                Ok(())
            }
            Err(err) if err.error_code() == Some(codes::BUCKET_ALREADY_OWNED_BY_YOU) => {
                debug!("bucket already owned by these credentials");
                Ok(())
            }
            Err(err) => Err(classify_sdk_error(err, &self.identity)),
        }
    }
}

impl ObjectHandle {
    fn missing_etag(&self) -> ConditionalWriteError {
        ConditionalWriteError::MissingETag {
            bucket: self.identity.bucket().to_string(),
            key: self.identity.key().to_string(),
        }
    }
}
