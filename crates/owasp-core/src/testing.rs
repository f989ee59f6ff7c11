//! Test doubles shared by this crate's unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use textgen::{GenerationRequest, TextGenError, TextGenerator};

/// Replays canned replies in order and records every request it sees.
/// `None` entries simulate an unreachable service.
pub struct Scripted {
    replies: Mutex<VecDeque<Option<String>>>,
    pub seen: Mutex<Vec<GenerationRequest>>,
}

impl Scripted {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(Into::into)).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new([Some(text)])
    }

    pub fn unreachable() -> Self {
        Self::new([None::<String>])
    }

    pub fn last_request(&self) -> GenerationRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate(&self, request: &GenerationRequest) -> textgen::Result<String> {
        self.seen.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text),
            _ => Err(TextGenError::Offline),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
