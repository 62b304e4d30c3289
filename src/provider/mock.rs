//! Scripted provider for testing the sampler without a server.

use std::collections::VecDeque;

use crate::snapshot::StatusSnapshot;

use super::{ProviderError, StatusProvider};

/// Replays a fixed sequence of replies, then fails with
/// [`ProviderError::Exhausted`].
#[derive(Debug, Default)]
pub struct MockProvider {
    replies: VecDeque<Result<StatusSnapshot, ProviderError>>,
    fetches: usize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider replaying `snapshots` in order.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = StatusSnapshot>) -> Self {
        Self {
            replies: snapshots.into_iter().map(Ok).collect(),
            fetches: 0,
        }
    }

    /// Queues a successful reply.
    pub fn push(mut self, snapshot: StatusSnapshot) -> Self {
        self.replies.push_back(Ok(snapshot));
        self
    }

    /// Queues a failed reply.
    pub fn push_error(mut self, error: ProviderError) -> Self {
        self.replies.push_back(Err(error));
        self
    }

    /// Number of fetches served so far, including failed ones.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl StatusProvider for MockProvider {
    fn fetch_status(&mut self) -> Result<StatusSnapshot, ProviderError> {
        self.fetches += 1;
        self.replies
            .pop_front()
            .unwrap_or(Err(ProviderError::Exhausted))
    }

    fn describe(&self) -> String {
        format!("mock ({} replies queued)", self.replies.len())
    }
}
