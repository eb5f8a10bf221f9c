//! Scripted transport for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

use super::transport::{HttpRequest, HttpResponse, Transport, TransportError};

type Reply = Result<HttpResponse, TransportError>;

/// Replays canned replies in order and records what was sent
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    /// Returned once the script runs out
    fallback: Option<Reply>,
    sent: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    /// Answers every request with the same reply
    pub fn repeating(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            fallback: Some(reply),
            ..Self::default()
        })
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn sent_at(&self) -> Vec<Instant> {
        self.sent.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push((Instant::now(), request.clone()));
        let next = self.replies.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Err(TransportError::new("script exhausted")))
    }
}
