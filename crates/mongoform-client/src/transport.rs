//! HTTP transports.
//!
//! The client only needs a blocking `GET` that returns a status and a text
//! body. [`UreqTransport`] does that over the network; [`MockTransport`]
//! records requests and answers from a queue for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a blocking `GET`.
///
/// Non-success statuses are replies, not errors; only a request that never
/// completes is an error.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<Reply>;
}

/// Network transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<Reply> {
        let failed = |e: ureq::Error| ClientError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.agent.get(url).call().map_err(failed)?;
        let status = response.status().as_u16();
        let body = response.into_body().read_to_string().map_err(failed)?;
        Ok(Reply { status, body })
    }
}

/// In-memory transport for tests.
///
/// Replies are served in the order they were queued. Once the queue is empty
/// every request fails with a transport error.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn with_reply(self, reply: Reply) -> Self {
        self.push(reply);
        self
    }

    pub fn push(&self, reply: Reply) {
        lock(&self.replies).push_back(reply);
    }

    /// URLs requested so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<String> {
        lock(&self.requests).last().cloned()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<Reply> {
        lock(&self.requests).push(url.to_string());
        lock(&self.replies)
            .pop_front()
            .ok_or_else(|| ClientError::Transport {
                url: url.to_string(),
                message: "no reply queued".to_string(),
            })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
