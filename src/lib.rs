//! # intlang - MediaWiki:Lang provisioning CLI
//!
//! `intlang` is a one-shot command-line tool that creates the
//! `MediaWiki:Lang` system-message pages a wiki needs for `{{int:lang}}`
//! to resolve in every language the wiki supports.
//!
//! ## Quick start
//!
//! ```bash
//! # OAuth 2 bearer token with edit + bot grants
//! export ACCESS_TOKEN=...
//!
//! intlang www.wikifunctions.org
//! ```
//!
//! The tool fetches the wiki's supported language codes and its content
//! language, then issues one create-only edit per code: `MediaWiki:Lang`
//! for the content language itself, `MediaWiki:Lang/xx` for every other
//! code, each page containing just the code. Pages that already exist are
//! skipped, so re-running against the same wiki is harmless.

/// MediaWiki action API client session.
pub mod api;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Global output configuration (quiet mode, stderr/stdout routing).
pub mod output;

/// Page title derivation and the creation loop.
pub mod provision;

/// Terminal UI components (spinner, colors).
pub mod ui;
