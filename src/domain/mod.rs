pub mod errors;
pub mod value_objects;

// Re-export commonly used types
pub use errors::{
    ConditionalWriteError, ErrorCode, ValidationError as DomainValidationError, WriteResult,
    error_code, is_precondition_failed,
};
pub use value_objects::*;
