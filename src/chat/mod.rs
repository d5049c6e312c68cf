//! Open-ended discussion about the document and replies in comment threads.

use tracing::{debug, info};

use crate::context::ServiceContext;
use crate::error::{Result, ReviewError};
use crate::ports::{ChatReply, ChatRequest, ReplyRequest};
use crate::store::IssueStore;

/// Key holding the chat session identifier for the document.
pub const SESSION_KEY: &str = "chat_session_id";

/// Sends `message` with the current document as context.
///
/// Continues the document's previous chat session if there is one and
/// remembers the session the service answers under.
///
/// # Errors
///
/// Returns an error if the message is blank, the document cannot be read,
/// the service fails, or the session id cannot be stored.
pub async fn send(ctx: &ServiceContext, message: &str) -> Result<ChatReply> {
    if message.trim().is_empty() {
        return Err(ReviewError::EmptyMessage("Message"));
    }

    let document_context = ctx
        .document
        .read_full_text()
        .await
        .map_err(|e| ReviewError::DocumentUnavailable(e.to_string()))?;
    let session_id = ctx
        .state
        .get(SESSION_KEY)
        .map_err(|e| ReviewError::Store(format!("Failed to read {SESSION_KEY}: {e}")))?
        .filter(|id| !id.is_empty());
    debug!(
        session = session_id.as_deref().unwrap_or("<new>"),
        "sending chat message"
    );

    let request = ChatRequest {
        message: message.to_string(),
        document_context,
        session_id,
    };
    let reply = ctx
        .analysis
        .chat(&request)
        .await
        .map_err(|e| ReviewError::Upstream(e.to_string()))?;

    ctx.state
        .set(SESSION_KEY, &reply.session_id)
        .map_err(|e| ReviewError::Store(format!("Failed to write {SESSION_KEY}: {e}")))?;
    info!(session = %reply.session_id, "chat reply received");
    Ok(reply)
}

/// Sends a user's reply in the comment thread of an applied issue.
///
/// # Errors
///
/// Returns an error if the reply is blank, the issue was never applied,
/// or the service fails.
pub async fn reply(ctx: &ServiceContext, issue_id: &str, user_reply: &str) -> Result<String> {
    if user_reply.trim().is_empty() {
        return Err(ReviewError::EmptyMessage("Reply"));
    }

    let records = IssueStore::new(ctx).get()?;
    let record = records
        .get(issue_id)
        .ok_or_else(|| ReviewError::UnknownIssue(issue_id.to_string()))?;

    let request = ReplyRequest {
        thread_context: record.comment.anchor_text.clone(),
        user_reply: user_reply.to_string(),
        issue_type: record.comment.issue_type.clone(),
        original_comment: record.comment.comment_body.clone(),
    };
    let response = ctx
        .analysis
        .process_reply(&request)
        .await
        .map_err(|e| ReviewError::Upstream(e.to_string()))?;
    Ok(response.reply)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::adapters::memory::{InMemoryStore, ScriptedAnalysisService};
    use crate::model::{Comment, IssueRecord};
    use crate::ports::{KeyValueStore, ReplyResponse};

    fn context() -> (ServiceContext, ScriptedAnalysisService, InMemoryStore) {
        let service = ScriptedAnalysisService::new();
        let state = InMemoryStore::new();
        let mut ctx = ServiceContext::in_memory("Lessons Learned\n- Load test database changes");
        ctx.analysis = Box::new(service.clone());
        ctx.state = Box::new(state.clone());
        (ctx, service, state)
    }

    fn chat_reply(session: &str) -> ChatReply {
        ChatReply {
            reply: "The root cause stops at the trigger.".into(),
            session_id: session.into(),
        }
    }

    #[tokio::test]
    async fn first_message_starts_a_session_and_stores_it() {
        let (ctx, service, state) = context();
        service.push_chat(Ok(chat_reply("sess-1")));

        let reply = send(&ctx, "Summarize for leadership").await.unwrap();

        assert_eq!(reply.session_id, "sess-1");
        let request = &service.chat_requests()[0];
        assert_eq!(request.session_id, None);
        assert!(request.document_context.contains("Lessons Learned"));
        assert_eq!(state.raw(SESSION_KEY).as_deref(), Some("sess-1"));
    }

    #[tokio::test]
    async fn later_messages_continue_the_session() {
        let (ctx, service, _state) = context();
        service.push_chat(Ok(chat_reply("sess-1")));
        service.push_chat(Ok(chat_reply("sess-1")));

        send(&ctx, "first").await.unwrap();
        send(&ctx, "second").await.unwrap();

        let second = &service.chat_requests()[1];
        assert_eq!(second.session_id.as_deref(), Some("sess-1"));
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_the_service() {
        let (ctx, service, _state) = context();
        let err = send(&ctx, "   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Message is empty");
        assert!(service.chat_requests().is_empty());
    }

    #[tokio::test]
    async fn chat_failure_keeps_previous_session() {
        let (ctx, service, state) = context();
        state.set(SESSION_KEY, "sess-old").unwrap();
        service.push_chat(Err("Chat failed: upstream 500".into()));

        let err = send(&ctx, "hello").await.unwrap_err();

        assert!(matches!(err, ReviewError::Upstream(_)));
        assert_eq!(state.raw(SESSION_KEY).as_deref(), Some("sess-old"));
    }

    #[tokio::test]
    async fn reply_uses_the_recorded_comment_thread() {
        let (ctx, service, _state) = context();
        let comment = Comment::new(
            "a1",
            "Action item not preventive",
            "Load test",
            "Make it a gate.",
        );
        let record = IssueRecord {
            comment,
            applied_at: Utc::now(),
        };
        IssueStore::new(&ctx).put("a1", record).unwrap();
        service.push_reply(Ok(ReplyResponse {
            reply: "Acknowledged.".into(),
        }));

        let answer = reply(&ctx, "a1", "Added a CI gate").await.unwrap();

        assert_eq!(answer, "Acknowledged.");
        let request = &service.reply_requests()[0];
        assert_eq!(request.thread_context, "Load test");
        assert_eq!(request.issue_type, "Action item not preventive");
        assert_eq!(request.original_comment, "Make it a gate.");
        assert_eq!(request.user_reply, "Added a CI gate");
    }

    #[tokio::test]
    async fn reply_to_unknown_issue_fails() {
        let (ctx, service, _state) = context();
        let err = reply(&ctx, "nope", "fixed").await.unwrap_err();
        assert!(matches!(err, ReviewError::UnknownIssue(ref id) if id == "nope"));
        assert!(service.reply_requests().is_empty());
    }
}
