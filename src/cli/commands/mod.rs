//! Command implementations.

/// One-shot MediaWiki:Lang provisioning run.
pub mod setup;
