mod conditional_store;

pub use conditional_store::ConditionalObjectStore;
