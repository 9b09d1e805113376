//! Scripted `Collaborator` double for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Collaborator, GenerationOptions, LlmError};

/// `Err(())` surfaces as a collaborator failure.
pub type Reply = Result<String, ()>;

type Responder = Box<dyn Fn(&str) -> Reply + Send + Sync>;

/// Replays queued replies in order, then answers through a responder
/// that sees the prompt. Records every prompt it receives.
pub struct ScriptedCollaborator {
    queue: Mutex<VecDeque<Reply>>,
    responder: Responder,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCollaborator {
    pub fn always(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::responding(move |_| Ok(reply.clone()))
    }

    pub fn failing() -> Self {
        Self::responding(|_| Err(()))
    }

    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues replies that take priority over the responder.
    pub fn then(self, replies: Vec<Reply>) -> Self {
        self.queue.lock().unwrap().extend(replies);
        self
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

pub fn ok(reply: &str) -> Reply {
    Ok(reply.to_string())
}

#[async_trait]
impl Collaborator for ScriptedCollaborator {
    async fn generate(&self, prompt: &str, _options: GenerationOptions) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let queued = self.queue.lock().unwrap().pop_front();
        let reply = match queued {
            Some(reply) => reply,
            None => (self.responder)(prompt),
        };
        reply.map_err(|()| LlmError::EmptyContent)
    }
}
