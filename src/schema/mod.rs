//! Validation of persisted settings documents.

pub mod validate;
