mod etag;
mod object_identity;
mod prior_version;

pub use etag::ETag;
pub use object_identity::ObjectIdentity;
pub use prior_version::{ANY_OBJECT, Precondition, PriorVersion};
