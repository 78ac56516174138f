//! HTTP client for the shelfmove Move Service.
//!
//! Provides an async client for the four service calls the batch
//! orchestrator relies on: single-shot moves, streamed moves, directory
//! file counts and directory sizes.

pub mod client;

pub use client::{Client, Error, MoveStream};
