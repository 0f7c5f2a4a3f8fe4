use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    domain::{
        errors::{ConditionalWriteError, WriteResult, codes},
        value_objects::{ETag, ObjectIdentity, PriorVersion},
    },
    ports::storage::ConditionalObjectStore,
};

/// In-process stand-in for an S3-compatible store, for testing and development.
///
/// Clones share state, so handles created from the same backend race against
/// each other exactly like independent clients of one remote store.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<RwLock<BackendData>>,
}

#[derive(Default)]
struct BackendData {
    buckets: HashMap<String, StoredBucket>,
    revoked: HashSet<String>,
    // Bumped on every accepted write so identical content still gets a new tag
    generation: u64,
}

struct StoredBucket {
    owner: String,
    objects: HashMap<String, StoredObject>,
}

#[derive(Clone)]
struct StoredObject {
    content: Bytes,
    etag: ETag,
}

impl BackendData {
    fn authorize(&self, access_key: &str) -> WriteResult<()> {
        if self.revoked.contains(access_key) {
            return Err(ConditionalWriteError::backend(
                codes::INVALID_ACCESS_KEY_ID,
                403,
                format!("The access key '{}' does not exist", access_key),
            ));
        }
        Ok(())
    }

    fn issue_etag(&mut self, content: &[u8]) -> WriteResult<ETag> {
        self.generation += 1;
        let mut ctx = md5::Context::new();
        ctx.consume(self.generation.to_be_bytes());
        ctx.consume(content);
        ETag::new(format!("\"{:x}\"", ctx.compute())).map_err(|e| ConditionalWriteError::Backend {
            code: None,
            status: None,
            message: e.to_string(),
            source: Some(Box::new(e)),
        })
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle acting with `access_key` on `bucket`/`key`
    pub fn handle(
        &self,
        access_key: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> InMemoryObjectHandle {
        InMemoryObjectHandle {
            backend: self.clone(),
            access_key: access_key.into(),
            identity: ObjectIdentity::new(bucket, key),
        }
    }

    /// Current content and tag of an object, if it exists
    pub async fn get(&self, bucket: &str, key: &str) -> Option<(Bytes, ETag)> {
        let data = self.data.read().await;
        data.buckets
            .get(bucket)?
            .objects
            .get(key)
            .map(|obj| (obj.content.clone(), obj.etag.clone()))
    }

    /// Reject every later request made with `access_key`
    pub async fn revoke(&self, access_key: &str) {
        self.data.write().await.revoked.insert(access_key.to_string());
    }
}

/// [`ConditionalObjectStore`] bound to one object of an [`InMemoryBackend`]
#[derive(Clone)]
pub struct InMemoryObjectHandle {
    backend: InMemoryBackend,
    access_key: String,
    identity: ObjectIdentity,
}

impl InMemoryObjectHandle {
    pub fn backend(&self) -> &InMemoryBackend {
        &self.backend
    }
}

#[async_trait]
impl ConditionalObjectStore for InMemoryObjectHandle {
    fn identity(&self) -> &ObjectIdentity {
        &self.identity
    }

    #[tracing::instrument(
        skip(self, content, previous),
        fields(bucket = %self.identity.bucket(), key = %self.identity.key(), previous = %previous)
    )]
    async fn set(&self, content: Bytes, previous: &PriorVersion) -> WriteResult<ETag> {
        let mut guard = self.backend.data.write().await;
        guard.authorize(&self.access_key)?;

        let bucket_name = self.identity.bucket();
        let key = self.identity.key();

        let Some(bucket) = guard.buckets.get(bucket_name) else {
            return Err(ConditionalWriteError::backend(
                codes::NO_SUCH_BUCKET,
                404,
                format!("The specified bucket does not exist: {}", bucket_name),
            ));
        };

        if bucket.owner != self.access_key {
            return Err(ConditionalWriteError::backend(codes::ACCESS_DENIED, 403, "Access Denied"));
        }

        let holds = match (previous, bucket.objects.get(key)) {
            (PriorVersion::Absent, current) => current.is_none(),
            (PriorVersion::Version(_), None) => false,
            (PriorVersion::Version(expected), Some(current)) => expected.matches(&current.etag),
        };

        if !holds {
            debug!("conditional write rejected");
            return Err(ConditionalWriteError::PreconditionFailed {
                bucket: bucket_name.to_string(),
                key: key.to_string(),
                code: codes::PRECONDITION_FAILED.to_string(),
                status: Some(412),
                message: "At least one of the pre-conditions you specified did not hold"
                    .to_string(),
            });
        }

        let etag = guard.issue_etag(&content)?;
        if let Some(bucket) = guard.buckets.get_mut(bucket_name) {
            bucket.objects.insert(
                key.to_string(),
                StoredObject {
                    content,
                    etag: etag.clone(),
                },
            );
        }

        debug!(etag = %etag, "conditional write accepted");
        Ok(etag)
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.identity.bucket()))]
    async fn create_bucket(&self) -> WriteResult<()> {
        let mut data = self.backend.data.write().await;
        data.authorize(&self.access_key)?;

        match data.buckets.get(self.identity.bucket()) {
            Some(bucket) if bucket.owner == self.access_key => {
                debug!("bucket already owned by these credentials");
                Ok(())
            }
            Some(_) => Err(ConditionalWriteError::backend(
                codes::BUCKET_ALREADY_EXISTS,
                409,
                format!(
                    "The requested bucket name is not available: {}",
                    self.identity.bucket()
                ),
            )),
            None => {
                data.buckets.insert(
                    self.identity.bucket().to_string(),
                    StoredBucket {
                        owner: self.access_key.clone(),
                        objects: HashMap::new(),
                    },
                );
                debug!("bucket created");
                Ok(())
            }
        }
    }
}
