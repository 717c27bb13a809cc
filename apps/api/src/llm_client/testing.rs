//! In-memory `ChatBackend` that replays scripted replies and records every call.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{CallOptions, ChatBackend, Endpoint, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub options: CallOptions,
}

pub struct ScriptedBackend {
    endpoint: Endpoint,
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_results(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    pub fn with_results(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            endpoint: Endpoint::Local {
                base_url: "http://localhost:11434/v1".to_string(),
            },
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        options: CallOptions,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            options,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 599,
                    message: "scripted backend ran out of replies".to_string(),
                })
            })
    }
}
