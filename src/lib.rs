//! Optimistic-concurrency writes to a single object in S3-compatible storage.
//!
//! Writers coordinate through the backend's `If-Match` / `If-None-Match`
//! support; no lock service is involved.
//!
//! ```no_run
//! use bytes::Bytes;
//! use conditional_write::prelude::*;
//!
//! # async fn run() -> Result<(), ConditionalWriteError> {
//! let handle = ObjectHandle::new(
//!     "http://localhost:9000", "admin", "password", "us-east-1", "test", "text.txt",
//! );
//! handle.create_bucket().await?;
//!
//! let etag = handle.set(Bytes::from("one"), &PriorVersion::Absent).await?;
//! match handle.set(Bytes::from("two"), &PriorVersion::Version(etag)).await {
//!     Ok(_) => {}
//!     Err(e) if e.is_precondition_failed() => { /* re-read and retry */ }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

// Domain types
pub use domain::{
    ConditionalWriteError, DomainValidationError, ETag, ErrorCode, ObjectIdentity, Precondition,
    PriorVersion, WriteResult, error_code, is_precondition_failed,
};

// Port types
pub use ports::ConditionalObjectStore;

// Adapter types
pub use adapters::outbound::storage::{InMemoryBackend, InMemoryObjectHandle, ObjectHandle};

// Configuration
pub use app::{AppError, HandleConfig};

pub mod prelude {
    pub use crate::{
        ConditionalObjectStore, ConditionalWriteError, ETag, HandleConfig, InMemoryBackend,
        ObjectHandle, PriorVersion, is_precondition_failed,
    };
}
