//! Push messenger that records instead of delivering.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    MulticastPushMessage, MulticastReport, PushMessage, PushMessenger, PushMessengerError,
};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentPush {
    /// A single-device send.
    Single(PushMessage),
    /// A multicast send.
    Multicast(MulticastPushMessage),
}

#[derive(Default)]
struct State {
    sent: Vec<SentPush>,
    rejected_tokens: BTreeSet<String>,
    failure: Option<PushMessengerError>,
}

/// Messenger recording every call.
#[derive(Default)]
pub struct RecordingPushMessenger {
    state: Mutex<State>,
}

impl RecordingPushMessenger {
    /// Messenger accepting every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call with `error`.
    pub fn fail_with(&self, error: PushMessengerError) {
        self.lock().failure = Some(error);
    }

    /// Count `raw` as a failed token in multicast reports.
    pub fn reject_token(&self, raw: &str) {
        self.lock().rejected_tokens.insert(raw.to_owned());
    }

    /// Every recorded call, in order.
    pub fn sent(&self) -> Vec<SentPush> {
        self.lock().sent.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("push messenger mutex"),
        }
    }
}

#[async_trait]
impl PushMessenger for RecordingPushMessenger {
    async fn send(&self, message: &PushMessage) -> Result<(), PushMessengerError> {
        let mut state = self.lock();
        state.sent.push(SentPush::Single(message.clone()));
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn send_multicast(
        &self,
        message: &MulticastPushMessage,
    ) -> Result<MulticastReport, PushMessengerError> {
        let mut state = self.lock();
        state.sent.push(SentPush::Multicast(message.clone()));
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        let failure_count = message
            .tokens
            .iter()
            .filter(|token| state.rejected_tokens.contains(token.expose()))
            .count();
        Ok(MulticastReport {
            success_count: message.tokens.len() - failure_count,
            failure_count,
        })
    }
}
