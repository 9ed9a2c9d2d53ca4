//! # tubebrief-core
//!
//! Core types, traits, and abstractions for the tubebrief video-summary
//! pipeline.
//!
//! This crate provides the foundational data structures, identifier
//! resolvers, and trait definitions that other tubebrief crates depend on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod resolve;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, GenerationConfig, MindmapConfig, SpeechConfig, StorageConfig, WorkerConfig,
    YouTubeConfig,
};
pub use error::{Error, Result};
pub use models::*;
pub use resolve::{
    extract_video_id, resolve_channel_reference, resolve_video_reference, ChannelLookup,
};
pub use traits::*;
