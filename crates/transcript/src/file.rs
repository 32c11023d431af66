//! JSONL-backed transcript
//!
//! One JSON object per line, appended as entries arrive. The whole log is
//! loaded once on open; after that the file is only ever appended to or
//! truncated. Clearing records the highest issued id in a `.seq` file next
//! to the log so ids keep climbing across processes.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{Message, NewMessage, Result, TranscriptStore};

struct Inner {
    messages: Vec<Message>,
    next_id: u64,
    /// The log ends in a partial line
    torn: bool,
}

struct Loaded {
    messages: Vec<Message>,
    torn: bool,
}

/// Transcript persisted to a JSON-lines file
pub struct FileTranscript {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl FileTranscript {
    /// Open the log at `path`, creating parent directories and loading any
    /// existing entries
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let Loaded { messages, torn } = Self::load(&path).await?;
        let logged = messages.iter().map(|m| m.id).max().unwrap_or(0);
        let next_id = logged.max(Self::read_seq(&seq_path(&path)).await?);
        info!("◆ TRANSCRIPT OPEN: {:?} ({} ENTRIES)", path, messages.len());

        Ok(Self {
            path,
            inner: Mutex::new(Inner {
                messages,
                next_id,
                torn,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_seq(path: &Path) -> Result<u64> {
        if !path.exists() {
            return Ok(0);
        }
        let content = tokio::fs::read_to_string(path).await?;
        match content.trim().parse::<u64>() {
            Ok(id) => Ok(id),
            Err(e) => {
                warn!("◆ IGNORING BAD SEQUENCE FILE {:?}: {}", path, e);
                Ok(0)
            }
        }
    }

    async fn load(path: &Path) -> Result<Loaded> {
        if !path.exists() {
            return Ok(Loaded {
                messages: Vec::new(),
                torn: false,
            });
        }

        let content = tokio::fs::read_to_string(path).await?;
        let torn = !content.is_empty() && !content.ends_with('\n');
        let mut messages = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Message>(line) {
                Ok(message) => messages.push(message),
                Err(e) => warn!("◆ SKIPPING CORRUPT TRANSCRIPT LINE {}: {}", n + 1, e),
            }
        }
        messages.sort_by_key(|m| m.id);
        Ok(Loaded { messages, torn })
    }
}

fn seq_path(path: &Path) -> PathBuf {
    path.with_extension("seq")
}

async fn write_line(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

#[async_trait]
impl TranscriptStore for FileTranscript {
    async fn append(&self, message: NewMessage) -> Result<Message> {
        let mut inner = self.inner.lock().await;
        let stored = message.into_message(inner.next_id + 1);

        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');
        if inner.torn {
            line.insert(0, '\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let len = file.metadata().await?.len();
        if let Err(e) = write_line(&mut file, line.as_bytes()).await {
            if let Err(rollback) = file.set_len(len).await {
                warn!("◆ COULD NOT ROLL BACK PARTIAL LINE: {}", rollback);
                inner.torn = true;
            }
            return Err(e.into());
        }

        inner.torn = false;
        inner.next_id = stored.id;
        inner.messages.push(stored.clone());
        debug!("◆ LOGGED #{} [{}]", stored.id, stored.role);
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Message>> {
        Ok(self.inner.lock().await.messages.clone())
    }

    async fn clear_all(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        tokio::fs::write(seq_path(&self.path), inner.next_id.to_string()).await?;
        tokio::fs::write(&self.path, b"").await?;
        inner.messages.clear();
        inner.torn = false;
        debug!("◆ TRANSCRIPT CLEARED: {:?}", self.path);
        Ok(())
    }
}
