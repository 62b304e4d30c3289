//! Provider abstraction for status document sources.
//!
//! This module defines the `StatusProvider` trait that lets the sampler
//! work with different sources through a unified interface:
//! - `MongoProvider`: live `serverStatus` from a MongoDB server
//! - `FileProvider`: a JSON status document re-read from disk every tick
//! - `MockProvider`: scripted replies for tests

mod file;
pub mod mock;
mod mongo;

pub use file::FileProvider;
pub use mock::MockProvider;
pub use mongo::{MongoProvider, redact_uri};

use thiserror::Error;

use crate::snapshot::StatusSnapshot;

/// Error types that can occur while fetching a status document.
///
/// None of them are fatal: the sampler drops the tick and tries again on the
/// next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Could not reach or configure the server.
    #[error("connection error: {0}")]
    Connect(String),
    /// The status command itself failed.
    #[error("command error: {0}")]
    Command(String),
    /// I/O error while reading a status file.
    #[error("I/O error: {0}")]
    Io(String),
    /// The reply could not be decoded into a document.
    #[error("decode error: {0}")]
    Decode(String),
    /// A scripted provider ran out of replies.
    #[error("no more scripted replies")]
    Exhausted,
}

/// Source of status documents, polled once per tick.
pub trait StatusProvider: Send {
    /// Fetches one status document.
    ///
    /// Errors are transient from the caller's point of view: the sampler
    /// logs them and retries on the next tick.
    fn fetch_status(&mut self) -> Result<StatusSnapshot, ProviderError>;

    /// Short human-readable description of the source, safe to log.
    fn describe(&self) -> String;
}

impl<P: StatusProvider + ?Sized> StatusProvider for Box<P> {
    fn fetch_status(&mut self) -> Result<StatusSnapshot, ProviderError> {
        (**self).fetch_status()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
