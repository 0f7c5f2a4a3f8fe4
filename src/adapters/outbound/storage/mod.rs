// SDK error classification
pub mod error;

// Storage implementations
pub mod memory;
pub mod s3;

// Re-export key types
pub use memory::{InMemoryBackend, InMemoryObjectHandle};
pub use s3::ObjectHandle;
