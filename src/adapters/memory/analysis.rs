//! Analysis service that answers from a script.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::model::Analysis;
use crate::ports::{
    AnalysisFuture, AnalysisRequest, AnalysisService, ChatReply, ChatRequest, PortError,
    ReplyRequest, ReplyResponse,
};

#[derive(Debug, Default)]
struct Script {
    analyses: VecDeque<Result<Analysis, String>>,
    chats: VecDeque<Result<ChatReply, String>>,
    replies: VecDeque<Result<ReplyResponse, String>>,
    analysis_requests: Vec<AnalysisRequest>,
    chat_requests: Vec<ChatRequest>,
    reply_requests: Vec<ReplyRequest>,
}

/// Serves queued responses in order and records every request.
///
/// A call with nothing queued fails, which shows up as an upstream error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnalysisService {
    script: Arc<Mutex<Script>>,
}

impl ScriptedAnalysisService {
    /// Creates a service with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result of the next `analyze` call.
    pub fn push_analysis(&self, result: Result<Analysis, String>) {
        self.lock().analyses.push_back(result);
    }

    /// Queues the result of the next `chat` call.
    pub fn push_chat(&self, result: Result<ChatReply, String>) {
        self.lock().chats.push_back(result);
    }

    /// Queues the result of the next `process_reply` call.
    pub fn push_reply(&self, result: Result<ReplyResponse, String>) {
        self.lock().replies.push_back(result);
    }

    /// `analyze` requests received so far.
    #[must_use]
    pub fn analysis_requests(&self) -> Vec<AnalysisRequest> {
        self.lock().analysis_requests.clone()
    }

    /// `chat` requests received so far.
    #[must_use]
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.lock().chat_requests.clone()
    }

    /// `process_reply` requests received so far.
    #[must_use]
    pub fn reply_requests(&self) -> Vec<ReplyRequest> {
        self.lock().reply_requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().expect("script lock poisoned")
    }
}

fn next<T>(queue: &mut VecDeque<Result<T, String>>, method: &str) -> Result<T, PortError> {
    match queue.pop_front() {
        Some(result) => result.map_err(PortError::from),
        None => Err(format!("no scripted response for {method}").into()),
    }
}

impl AnalysisService for ScriptedAnalysisService {
    fn analyze(&self, request: &AnalysisRequest) -> AnalysisFuture<'_, Analysis> {
        let result = {
            let mut script = self.lock();
            script.analysis_requests.push(request.clone());
            next(&mut script.analyses, "analyze")
        };
        Box::pin(async move { result })
    }

    fn chat(&self, request: &ChatRequest) -> AnalysisFuture<'_, ChatReply> {
        let result = {
            let mut script = self.lock();
            script.chat_requests.push(request.clone());
            next(&mut script.chats, "chat")
        };
        Box::pin(async move { result })
    }

    fn process_reply(&self, request: &ReplyRequest) -> AnalysisFuture<'_, ReplyResponse> {
        let result = {
            let mut script = self.lock();
            script.reply_requests.push(request.clone());
            next(&mut script.replies, "process_reply")
        };
        Box::pin(async move { result })
    }
}
