//! Editing session: state synchronization, persistence, notices, and template fetches.

/// Synchronization engine.
pub mod engine;
/// Template image fetching.
pub mod fetch;
/// Transient user notices.
pub mod notice;
/// Two-tier save and load.
pub mod persist;
/// Live visual tree of the active format.
pub mod preview;
