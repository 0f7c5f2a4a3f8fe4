mod s3_adapter;

pub use s3_adapter::{DEFAULT_REGION, ObjectHandle};
