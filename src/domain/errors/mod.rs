pub mod codes;
mod validation_errors;
mod write_errors;

pub use validation_errors::*;
pub use write_errors::*;
