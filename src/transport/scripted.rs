use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Request, Response, Transport};
use crate::error::TransportError;

/// One pre-defined outcome for a [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(Response),
    Fail(String),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Respond(Response::new(200, body))
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Respond(Response::new(status, body))
    }

    pub fn fail(message: &str) -> Self {
        Reply::Fail(message.to_string())
    }
}

/// A scripted transport for tests. Returns pre-defined replies in order and
/// records every request it receives.
pub struct ScriptedTransport {
    replies: Vec<Reply>,
    index: AtomicUsize,
    seen: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Number of requests sent so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// Copies of every request sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(i) {
            Some(Reply::Respond(resp)) => Ok(resp.clone()),
            Some(Reply::Fail(message)) => Err(TransportError::Network(message.clone())),
            None => Err(TransportError::Network(format!(
                "ScriptedTransport: no more replies (called {} times)",
                i + 1
            ))),
        }
    }
}
