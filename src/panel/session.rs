//! Core panel session management.
//!
//! This module provides the `PanelSession` struct which owns the draft
//! input, the pending upload, and the conversation transcript, and drives
//! one submission at a time through the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::{ChatBackend, ChatClient};
use crate::observability::{PANEL_FAILURES, PANEL_SUBMISSIONS, PANEL_UPLOAD_REJECTIONS};
use crate::panel::config::PanelConfig;
use crate::request::ChatRequest;
use crate::text_stream::{collect_text, collect_text_with_interrupt};
use crate::types::{ConversationMessage, PendingUpload, Role};
use crate::upload::{UploadPolicy, UploadRejection};

/// Where the session is in the submission lifecycle.
///
/// A single value replaces the pair of in-flight booleans the lifecycle
/// would otherwise need, so the text and file paths cannot both be active.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No submission in progress.
    Idle,

    /// A submission is being prepared.
    Validating,

    /// A text submission is awaiting its streamed reply.
    TextInFlight,

    /// A file submission is awaiting its streamed reply.
    FileInFlight,
}

/// Outcome of a [`PanelSession::submit`] call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The guard refused the submission; nothing changed.
    Ignored,

    /// The submission ran to a terminal outcome and the session is idle
    /// again.
    Completed,
}

/// A panel session owning transcript, draft input, and submission state.
///
/// Every submission terminates in either an appended assistant message or an
/// inline validation warning; failures never propagate to the host.
pub struct PanelSession<B: ChatBackend> {
    backend: B,
    config: PanelConfig,
    policy: UploadPolicy,
    messages: Vec<ConversationMessage>,
    input: String,
    pending: Option<PendingUpload>,
    file_error: Option<String>,
    phase: Phase,
    interrupted: Arc<AtomicBool>,
}

impl PanelSession<ChatClient> {
    /// Creates a new panel session with the given client and configuration.
    pub fn new(client: ChatClient, config: PanelConfig) -> Self {
        Self::with_backend(client, config)
    }
}

impl<B: ChatBackend> PanelSession<B> {
    /// Creates a new panel session over a custom backend.
    pub fn with_backend(backend: B, config: PanelConfig) -> Self {
        Self {
            backend,
            config,
            policy: UploadPolicy::default(),
            messages: Vec::new(),
            input: String::new(),
            pending: None,
            file_error: None,
            phase: Phase::Idle,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// The conversation transcript.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The draft input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the draft input.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// The file staged for the next submission, if any.
    pub fn pending_upload(&self) -> Option<&PendingUpload> {
        self.pending.as_ref()
    }

    /// The inline upload warning, if one is showing.
    pub fn file_error(&self) -> Option<&str> {
        self.file_error.as_deref()
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a text submission is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::TextInFlight
    }

    /// True while a file submission is in flight.
    pub fn is_file_processing(&self) -> bool {
        self.phase == Phase::FileInFlight
    }

    /// True when a submit call would be accepted.
    pub fn can_submit(&self) -> bool {
        (!self.input.trim().is_empty() || self.pending.is_some()) && self.phase == Phase::Idle
    }

    /// Validates a candidate upload and stages it for the next submission.
    ///
    /// Rejection leaves any previously staged file in place and records the
    /// warning returned by the policy; acceptance replaces the staged file.
    pub fn attach_file(&mut self, upload: PendingUpload) -> Result<(), UploadRejection> {
        self.file_error = None;
        if let Err(rejection) = self.policy.check(&upload) {
            PANEL_UPLOAD_REJECTIONS.click();
            self.file_error = Some(rejection.to_string());
            return Err(rejection);
        }
        self.pending = Some(upload);
        Ok(())
    }

    /// Clears the staged file and any inline warning. No-op when nothing is
    /// staged.
    pub fn remove_file(&mut self) {
        self.pending = None;
        self.file_error = None;
    }

    /// Clears the transcript and all transient submission state.
    pub fn new_conversation(&mut self) {
        self.messages.clear();
        self.pending = None;
        self.file_error = None;
    }

    /// The host-side abort hook for in-flight text generation.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    /// Requests that the in-flight text generation stop at the next chunk.
    pub fn stop(&self) {
        self.interrupted.store(true, Ordering::Relaxed);
    }

    /// Runs one submission to a terminal outcome.
    ///
    /// The guard ignores the call when there is nothing to send or a
    /// submission is already in flight. Otherwise the user message is
    /// appended before the request goes out, the draft input is cleared
    /// immediately, and exactly one assistant message (reply or recovered
    /// error) is appended once the outcome is resolved. The session is idle
    /// again when this returns.
    pub async fn submit(&mut self) -> Submission {
        if self.input.trim().is_empty() && self.pending.is_none() {
            return Submission::Ignored;
        }
        if self.phase != Phase::Idle {
            return Submission::Ignored;
        }
        self.phase = Phase::Validating;
        self.interrupted.store(false, Ordering::Relaxed);
        PANEL_SUBMISSIONS.click();

        match self.pending.take() {
            Some(upload) => self.submit_file(upload).await,
            None => self.submit_text().await,
        }

        self.phase = Phase::Idle;
        Submission::Completed
    }

    async fn submit_file(&mut self, upload: PendingUpload) {
        self.phase = Phase::FileInFlight;

        let input = std::mem::take(&mut self.input);
        let summary = upload.transcript_summary(&input);
        // Context snapshots the transcript before the optimistic append.
        let request = ChatRequest::new(&input, Some(upload), &self.messages);
        self.push_message(Role::User, summary);

        let result = match self.backend.submit(request).await {
            Ok(reply) => collect_text(reply).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(text) => self.push_message(Role::Assistant, text),
            Err(err) => {
                PANEL_FAILURES.click();
                self.push_message(
                    Role::Assistant,
                    format!(
                        "❌ **Error processing file**: {err}\n\nPlease try again with a \
                         different file or check if the file format is supported."
                    ),
                );
            }
        }

        // The upload was consumed above; any stale inline warning goes too.
        self.file_error = None;
    }

    async fn submit_text(&mut self) {
        self.phase = Phase::TextInFlight;

        let input = std::mem::take(&mut self.input);
        let request = ChatRequest::new(&input, None, &self.messages);
        self.push_message(Role::User, input.trim().to_string());

        let interrupted = Arc::clone(&self.interrupted);
        let result = match self.backend.submit(request).await {
            Ok(reply) => collect_text_with_interrupt(reply, interrupted).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(text) => self.push_message(Role::Assistant, text),
            Err(err) => {
                PANEL_FAILURES.click();
                self.push_message(
                    Role::Assistant,
                    format!("❌ **Error processing query**: {err}\n\nPlease try again."),
                );
            }
        }
    }

    fn push_message(&mut self, role: Role, content: String) {
        self.messages.push(ConversationMessage::new(role, content));
    }
}

#[cfg(test)]
impl<B: ChatBackend> PanelSession<B> {
    fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}
