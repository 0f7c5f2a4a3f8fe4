pub mod storage;

pub use storage::ConditionalObjectStore;
