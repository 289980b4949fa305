//! Payload validation and the reference in-memory provider.

mod memory;
mod validation;
pub use memory::{MemoryProvider, ID_FIELD};
pub use validation::RequestValidator;
