//! # tubebrief-pipeline
//!
//! Processing orchestration for tubebrief.
//!
//! This crate provides:
//! - [`VideoProcessor`], the synchronous end-to-end pipeline for one video
//!   reference (resolve, fetch, persist, summarize, render, finalize)
//! - [`SubscriptionService`] for subscribing users to channels
//! - [`JobWorker`], a polling worker that drains the durable job queue
//!   through the processor
//! - the `tubebrief-workerd` binary entry point
//!
//! The processor is queue-agnostic: it never retries and never spawns work
//! of its own; the worker layer owns retries and concurrency.

pub mod processor;
pub mod subscriptions;
pub mod worker;

pub use processor::VideoProcessor;
pub use subscriptions::SubscriptionService;
pub use worker::{JobWorker, WorkerHandle};
