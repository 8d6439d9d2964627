//! # Vinedex
//!
//! A harvester for comic book metadata from the ComicVine catalog API.
//!
//! ComicVine serves bibliographic records (volumes, issues, story arcs) through
//! a paginated, rate-limited JSON API. This crate assembles those scattered
//! responses into flat domain records, driving the pagination loop, the
//! inter-page rate-limit pause, and the per-child detail fetches that a story
//! arc requires.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Flat domain records (`VolumeMetadata`, `IssueDetailsMetadata`, etc.)
//! - [`harvest`]: The paginated fetch-and-aggregate engine (query builder,
//!   transport, pager, cancellation)
//! - [`comicvine`]: The ComicVine client built on top of the engine
//! - [`config`]: Configuration management

pub mod comicvine;
pub mod config;
pub mod harvest;
pub mod models;

// Re-export commonly used types
pub use comicvine::ComicVineClient;
pub use config::HarvestConfig;
pub use harvest::{CancelToken, HarvestError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
