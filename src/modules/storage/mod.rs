//! Storage module for file contents
//!
//! Uploaded bytes live on the local filesystem under a configurable root,
//! one randomly named file per upload.

mod local_storage;

pub use local_storage::LocalStorage;
