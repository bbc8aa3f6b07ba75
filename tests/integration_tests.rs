//! Integration tests for the parley library.
//! These tests drive a panel session end-to-end over a recording fake
//! backend; no network access is required.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use parley::{
    ChatBackend, ChatRequest, Error, FALLBACK_FILE_PROMPT, PanelConfig, PanelSession,
    PendingUpload, Phase, Result, Role, StreamingReply, Submission, classify_file_error,
};

/// A backend that records every request and serves canned replies.
struct FakeBackend {
    calls: Arc<Mutex<Vec<ChatRequest>>>,
    replies: Mutex<VecDeque<Result<StreamingReply>>>,
}

impl FakeBackend {
    fn new(replies: Vec<Result<StreamingReply>>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn submit(&self, request: ChatRequest) -> Result<StreamingReply> {
        self.calls.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(StreamingReply::from_text("ok")))
    }
}

type Calls = Arc<Mutex<Vec<ChatRequest>>>;

fn session_with(replies: Vec<Result<StreamingReply>>) -> (PanelSession<FakeBackend>, Calls) {
    let backend = FakeBackend::new(replies);
    let calls = Arc::clone(&backend.calls);
    (
        PanelSession::with_backend(backend, PanelConfig::default()),
        calls,
    )
}

#[tokio::test]
async fn text_happy_path() {
    let (mut session, _) = session_with(vec![Ok(StreamingReply::from_text("hi there"))]);
    session.set_input("hello");

    assert_eq!(session.submit().await, Submission::Completed);

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "hi there");
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.input().is_empty());
}

#[tokio::test]
async fn text_request_carries_trimmed_query_and_prior_context() {
    let (mut session, calls) = session_with(vec![
        Ok(StreamingReply::from_text("first")),
        Ok(StreamingReply::from_text("second")),
    ]);
    session.set_input("one");
    session.submit().await;
    session.set_input("  two  ");
    session.submit().await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        ChatRequest::Text(text) => {
            assert_eq!(text.query, "one");
            assert!(text.messages.is_empty());
        }
        ChatRequest::File(_) => panic!("expected the JSON shape"),
    }
    match &calls[1] {
        ChatRequest::Text(text) => {
            assert_eq!(text.query, "two");
            // Context is the transcript before the second optimistic append.
            assert_eq!(text.messages.len(), 2);
            assert_eq!(text.messages[0].content, "one");
            assert_eq!(text.messages[1].content, "first");
        }
        ChatRequest::File(_) => panic!("expected the JSON shape"),
    }
}

#[tokio::test]
async fn file_success_with_empty_input_uses_fallback_prompt() {
    let (mut session, _) = session_with(vec![Ok(StreamingReply::from_text("it is a report"))]);
    let upload = PendingUpload::new("report.pdf", "application/pdf", vec![0u8; 4096]);
    session.attach_file(upload).unwrap();

    assert_eq!(session.submit().await, Submission::Completed);

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert!(messages[0].content.contains("report.pdf"));
    assert!(messages[0].content.contains(FALLBACK_FILE_PROMPT));
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "it is a report");
    assert!(session.pending_upload().is_none());
    assert_eq!(session.phase(), Phase::Idle);
}

#[tokio::test]
async fn file_request_shape_and_fields() {
    let (mut session, calls) = session_with(vec![Ok(StreamingReply::from_text("done"))]);
    let upload = PendingUpload::new("data.csv", "text/csv", vec![b'a', b',', b'b']);
    session.attach_file(upload).unwrap();
    session.set_input("sum the rows");

    session.submit().await;

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        ChatRequest::File(file) => {
            assert_eq!(file.query, "sum the rows");
            assert_eq!(file.upload.name, "data.csv");
            assert_eq!(file.upload.media_type, "text/csv");
            assert!(file.messages.is_empty());
        }
        ChatRequest::Text(_) => panic!("expected the multipart shape"),
    }
}

#[tokio::test]
async fn oversized_file_never_reaches_the_network() {
    let (mut session, calls) = session_with(vec![]);

    let upload = PendingUpload::new("big.pdf", "application/pdf", vec![0u8; 11_000_000]);
    assert!(session.attach_file(upload).is_err());
    let warning = session.file_error().expect("inline warning recorded");
    assert!(warning.contains("exceeds limit"));

    // The rejected file was never staged, so submission has nothing to send.
    assert_eq!(session.submit().await, Submission::Ignored);
    assert!(session.messages().is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn backend_error_with_code_lands_in_the_transcript() {
    let classified = classify_file_error(400, r#"{"error":"bad type","code":"INVALID_FILE_TYPE"}"#);
    let (mut session, _) = session_with(vec![Err(classified)]);
    let upload = PendingUpload::new("report.pdf", "application/pdf", vec![0u8; 16]);
    session.attach_file(upload).unwrap();

    assert_eq!(session.submit().await, Submission::Completed);

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(
        messages[1]
            .content
            .contains("File type not supported. bad type")
    );
    assert!(session.pending_upload().is_none());
    assert_eq!(session.phase(), Phase::Idle);
}

#[tokio::test]
async fn connection_failure_is_recovered_locally() {
    let (mut session, _) = session_with(vec![Err(Error::connection("refused", None))]);
    session.set_input("hello?");

    assert_eq!(session.submit().await, Submission::Completed);

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert!(
        messages[1]
            .content
            .starts_with("❌ **Error processing query**:")
    );
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.input().is_empty());
}

#[tokio::test]
async fn chunked_reply_is_assembled_even_mid_character() {
    let full = "résumé 🦀 reviewed";
    let bytes = full.as_bytes();
    let chunks = bytes
        .chunks(3)
        .map(Bytes::copy_from_slice)
        .collect::<Vec<_>>();
    let (mut session, _) = session_with(vec![Ok(StreamingReply::from_chunks(chunks))]);
    session.set_input("review my resume");

    session.submit().await;

    let messages = session.messages();
    assert_eq!(messages[1].content, full);
}

#[tokio::test]
async fn bodyless_reply_is_recovered_as_stream_error() {
    let (mut session, _) = session_with(vec![Ok(StreamingReply::without_body())]);
    session.set_input("hello");

    session.submit().await;

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].content.contains("no readable body"));
    assert_eq!(session.phase(), Phase::Idle);
}

#[tokio::test]
async fn session_is_reusable_after_a_failure() {
    let (mut session, _) = session_with(vec![
        Err(Error::connection("refused", None)),
        Ok(StreamingReply::from_text("back online")),
    ]);
    session.set_input("first");
    session.submit().await;
    assert!(session.input().is_empty());
    session.set_input("second");
    session.submit().await;

    let messages = session.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[3].content, "back online");
}
