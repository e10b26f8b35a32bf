//! Scripted chat model for exercising agent flows without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatModel, ChatReply, ChatRequest};
use crate::error::{Result, SkydeskError};

/// Mock [`ChatModel`] that hands out pre-scripted replies in order.
///
/// Every request is recorded so tests can assert on what the runner
/// actually sent (system prompt, history, tool definitions).
#[derive(Default)]
pub struct MockModel {
    replies: Mutex<VecDeque<ChatReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockModel {
    /// Create a mock that will reply with `replies`, first to last.
    pub fn new(replies: Vec<ChatReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SkydeskError::OpenAI("Mock model has no reply scripted".to_string()))
    }
}
