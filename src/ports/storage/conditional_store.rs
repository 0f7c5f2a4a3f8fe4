use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::domain::{
    errors::WriteResult,
    value_objects::{ETag, ObjectIdentity, PriorVersion},
};

/// Port for optimistic-concurrency writes to a single object.
///
/// Implementations bind to one (bucket, key) for their whole lifetime and keep
/// no ETag between calls; callers carry the tag from one write to the next.
#[async_trait]
pub trait ConditionalObjectStore: Send + Sync + 'static {
    /// The object this handle writes to
    fn identity(&self) -> &ObjectIdentity;

    /// Write `content` only if the stored object still matches `previous`.
    ///
    /// Returns the tag the backend assigned to the new content. A lost race
    /// surfaces as [`ConditionalWriteError::PreconditionFailed`]; nothing is
    /// retried. Dropping the future abandons the request, after which the
    /// object's state is unknown and must be re-observed.
    ///
    /// [`ConditionalWriteError::PreconditionFailed`]: crate::domain::ConditionalWriteError::PreconditionFailed
    async fn set(&self, content: Bytes, previous: &PriorVersion) -> WriteResult<ETag>;

    /// Ensure the configured bucket exists and is owned by these credentials
    async fn create_bucket(&self) -> WriteResult<()>;

    /// Drain `reader` and write its bytes as with [`set`](Self::set).
    ///
    /// Nothing is sent if reading fails.
    async fn set_from_reader(
        &self,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        previous: &PriorVersion,
    ) -> WriteResult<ETag> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        self.set(Bytes::from(buf), previous).await
    }
}
