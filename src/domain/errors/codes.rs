//! Machine-readable error codes reported by S3-compatible backends.

/// A conditional header did not hold (HTTP 412).
pub const PRECONDITION_FAILED: &str = "PreconditionFailed";

/// Another conditional write to the same key was in flight (HTTP 409).
pub const CONDITIONAL_REQUEST_CONFLICT: &str = "ConditionalRequestConflict";

/// The bucket exists and is owned by the requesting credentials.
pub const BUCKET_ALREADY_OWNED_BY_YOU: &str = "BucketAlreadyOwnedByYou";

/// The bucket exists and is owned by someone else.
pub const BUCKET_ALREADY_EXISTS: &str = "BucketAlreadyExists";

/// The credentials may not act on the bucket.
pub const ACCESS_DENIED: &str = "AccessDenied";

pub const NO_SUCH_BUCKET: &str = "NoSuchBucket";

pub const INVALID_ACCESS_KEY_ID: &str = "InvalidAccessKeyId";

/// Whether `code` reports a lost conditional-write race.
pub fn is_precondition_code(code: &str) -> bool {
    code == PRECONDITION_FAILED || code == CONDITIONAL_REQUEST_CONFLICT
}
