//! # tubebrief-youtube
//!
//! YouTube Data API gateway for tubebrief.
//!
//! This crate provides:
//! - [`YouTubeGateway`], the production [`MetadataGateway`] backed by the
//!   Data API v3 and an optional caption source
//! - [`MockMetadataGateway`] for deterministic tests
//!
//! Lookup strategy follows the identifier's shape: canonical `UC` IDs query
//! by `id`, handles by `forHandle` (without the `@`), everything else by
//! `forUsername`.

pub mod gateway;
pub mod mock;
pub mod wire;

pub use gateway::YouTubeGateway;
pub use mock::{MockCall, MockMetadataGateway};

// Re-export the trait and core types callers need alongside the gateway.
pub use tubebrief_core::resolve::ChannelLookup;
pub use tubebrief_core::{ChannelMetadata, MetadataGateway, VideoMetadata};
