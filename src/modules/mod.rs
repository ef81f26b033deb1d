//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the session cache, the local blob storage and the thumbnail job queue.

pub mod cache;
pub mod queue;
pub mod storage;
