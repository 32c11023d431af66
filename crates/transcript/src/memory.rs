//! In-process transcript

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{Message, NewMessage, Result, TranscriptStore};

#[derive(Default)]
struct Inner {
    messages: Vec<Message>,
    next_id: u64,
}

/// Transcript held in memory, lost on exit
#[derive(Default)]
pub struct MemoryTranscript {
    inner: Mutex<Inner>,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscript {
    async fn append(&self, message: NewMessage) -> Result<Message> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let stored = message.into_message(inner.next_id);
        inner.messages.push(stored.clone());
        debug!("◆ LOGGED #{} [{}]", stored.id, stored.role);
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Message>> {
        Ok(self.inner.lock().await.messages.clone())
    }

    async fn clear_all(&self) -> Result<()> {
        // ids keep counting so a cleared id is never handed out again
        self.inner.lock().await.messages.clear();
        debug!("◆ TRANSCRIPT CLEARED");
        Ok(())
    }
}
