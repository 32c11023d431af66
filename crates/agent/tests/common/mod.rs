//! Test doubles shared by the orchestrator tests
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use overwatch_agent::{AgentSettings, Orchestrator};
use overwatch_provider::{ChatParams, ChatResponse, Completer, Provider, ProviderError};
use overwatch_toolhost::{ToolDescriptor, ToolHostError, ToolProvider};
use overwatch_transcript::{
    MemoryTranscript, Message, NewMessage, TranscriptError, TranscriptStore,
};

/// Provider that replays canned replies and records every request
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ChatResponse, ProviderError>>>,
    requests: Mutex<Vec<ChatParams>>,
    unconfigured: bool,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        let provider = Self::default();
        for reply in replies {
            provider.push(Ok(ChatResponse::text(*reply)));
        }
        provider
    }

    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    pub fn push(&self, reply: Result<ChatResponse, ProviderError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<ChatParams> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse, ProviderError> {
        self.requests.lock().unwrap().push(params);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatResponse::text("(script exhausted)")))
    }

    fn default_model(&self) -> String {
        "openai/gpt-4o".to_string()
    }

    fn is_configured(&self) -> bool {
        !self.unconfigured
    }
}

/// Tool host with canned results
#[derive(Default)]
pub struct FakeTools {
    tools: Vec<ToolDescriptor>,
    results: HashMap<String, Result<String, String>>,
    connect_error: Option<String>,
    list_error: Option<String>,
    connects: AtomicUsize,
    closes: AtomicUsize,
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl FakeTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, name: &str, description: &str, result: Result<&str, &str>) -> Self {
        self.tools.push(ToolDescriptor::new(
            name,
            description,
            serde_json::json!({ "type": "object" }),
        ));
        self.results.insert(
            name.to_string(),
            result.map(str::to_string).map_err(str::to_string),
        );
        self
    }

    pub fn failing_connect(mut self, message: &str) -> Self {
        self.connect_error = Some(message.to_string());
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolProvider for FakeTools {
    async fn connect(&self) -> overwatch_toolhost::Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.connect_error {
            Some(message) => Err(ToolHostError::Spawn(message.clone())),
            None => Ok(()),
        }
    }

    async fn list_tools(&self) -> overwatch_toolhost::Result<Vec<ToolDescriptor>> {
        match &self.list_error {
            Some(message) => Err(ToolHostError::Protocol(message.clone())),
            None => Ok(self.tools.clone()),
        }
    }

    async fn call_tool(
        &self,
        name: &str,
        args: Map<String, Value>,
    ) -> overwatch_toolhost::Result<String> {
        self.calls.lock().unwrap().push((name.to_string(), args));
        match self.results.get(name) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(ToolHostError::ToolReported(message.clone())),
            None => Err(ToolHostError::UnknownTool(name.to_string())),
        }
    }

    async fn close(&self) -> overwatch_toolhost::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Transcript that can be told to fail
#[derive(Default)]
pub struct FlakyTranscript {
    inner: MemoryTranscript,
    fail_list: bool,
    /// Appends that succeed before every later one fails
    appends_allowed: Option<usize>,
    appends: AtomicUsize,
}

impl FlakyTranscript {
    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::default()
        }
    }

    pub fn failing_after(appends: usize) -> Self {
        Self {
            appends_allowed: Some(appends),
            ..Self::default()
        }
    }

    /// Stored entries, bypassing the injected failures
    pub async fn entries(&self) -> Vec<Message> {
        self.inner.list_all().await.unwrap()
    }

    fn outage() -> TranscriptError {
        TranscriptError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "store offline",
        ))
    }
}

#[async_trait]
impl TranscriptStore for FlakyTranscript {
    async fn append(&self, message: NewMessage) -> overwatch_transcript::Result<Message> {
        let n = self.appends.fetch_add(1, Ordering::SeqCst);
        if matches!(self.appends_allowed, Some(limit) if n >= limit) {
            return Err(Self::outage());
        }
        self.inner.append(message).await
    }

    async fn list_all(&self) -> overwatch_transcript::Result<Vec<Message>> {
        if self.fail_list {
            return Err(Self::outage());
        }
        self.inner.list_all().await
    }

    async fn clear_all(&self) -> overwatch_transcript::Result<()> {
        self.inner.clear_all().await
    }
}

/// Orchestrator over the given doubles with default settings
pub fn orchestrator(
    provider: Arc<ScriptedProvider>,
    tools: Arc<FakeTools>,
    transcript: Arc<dyn TranscriptStore>,
) -> Orchestrator {
    Orchestrator::new(
        Completer::new(provider),
        tools,
        transcript,
        AgentSettings::default(),
    )
}
