//! Outbound request construction.
//!
//! A submission becomes exactly one of two request shapes aimed at the same
//! endpoint: a JSON body for plain text, or a multipart form when a file is
//! attached. Both carry the trailing slice of the conversation as context.

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{ConversationMessage, PendingUpload};

/// Number of trailing conversation messages forwarded as context.
pub const CONTEXT_MESSAGES: usize = 5;

/// Query sent in place of empty input when a file is attached.
pub const FALLBACK_FILE_PROMPT: &str = "Please analyze this file";

/// JSON body for a plain text submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextRequest {
    /// The user's query, trimmed.
    pub query: String,

    /// Trailing conversation context.
    pub messages: Vec<ConversationMessage>,
}

/// Multipart submission carrying a file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRequest {
    /// The user's query, or the fallback prompt when input was empty.
    pub query: String,

    /// The file being uploaded.
    pub upload: PendingUpload,

    /// Trailing conversation context, JSON-encoded into the form.
    pub messages: Vec<ConversationMessage>,
}

/// One outbound request, shaped by whether a file is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatRequest {
    /// JSON text submission.
    Text(TextRequest),

    /// Multipart file submission.
    File(FileRequest),
}

/// The HTTP body a [`ChatRequest`] lowers to.
pub enum RequestBody {
    /// A JSON value, sent with a JSON content type.
    Json(serde_json::Value),

    /// A multipart form with `query`, `file`, and `messages` fields.
    Multipart(Form),
}

impl ChatRequest {
    /// Build the request for one submission.
    ///
    /// The text shape trims the input; the file shape sends the input
    /// verbatim, substituting the fallback prompt only when it is empty.
    /// Context is the trailing [`CONTEXT_MESSAGES`] entries of `history`.
    pub fn new(input: &str, upload: Option<PendingUpload>, history: &[ConversationMessage]) -> Self {
        let messages = trailing_context(history);
        match upload {
            Some(upload) => {
                let query = if input.is_empty() {
                    FALLBACK_FILE_PROMPT.to_string()
                } else {
                    input.to_string()
                };
                ChatRequest::File(FileRequest {
                    query,
                    upload,
                    messages,
                })
            }
            None => ChatRequest::Text(TextRequest {
                query: input.trim().to_string(),
                messages,
            }),
        }
    }

    /// Returns true for the multipart file shape.
    pub fn is_file(&self) -> bool {
        matches!(self, ChatRequest::File(_))
    }

    /// Lower the request into its HTTP body.
    pub fn into_body(self) -> Result<RequestBody> {
        match self {
            ChatRequest::Text(request) => {
                let value = serde_json::to_value(&request)?;
                Ok(RequestBody::Json(value))
            }
            ChatRequest::File(request) => {
                let part = Part::bytes(request.upload.data.to_vec())
                    .file_name(request.upload.name.clone())
                    .mime_str(&request.upload.media_type)
                    .map_err(|e| {
                        Error::http_client(
                            format!("invalid MIME type for multipart part: {e}"),
                            Some(Box::new(e)),
                        )
                    })?;
                let form = Form::new()
                    .text("query", request.query)
                    .part("file", part)
                    .text("messages", serde_json::to_string(&request.messages)?);
                Ok(RequestBody::Multipart(form))
            }
        }
    }
}

/// The trailing slice of the conversation forwarded on every request.
pub fn trailing_context(history: &[ConversationMessage]) -> Vec<ConversationMessage> {
    let start = history.len().saturating_sub(CONTEXT_MESSAGES);
    history[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use serde_json::json;

    fn history(len: usize) -> Vec<ConversationMessage> {
        (0..len)
            .map(|i| {
                ConversationMessage::with_id(
                    format!("msg-{i}"),
                    if i % 2 == 0 { Role::User } else { Role::Assistant },
                    format!("message {i}"),
                )
            })
            .collect()
    }

    #[test]
    fn text_request_trims_input() {
        let request = ChatRequest::new("  hello  ", None, &[]);
        match request {
            ChatRequest::Text(text) => assert_eq!(text.query, "hello"),
            ChatRequest::File(_) => panic!("expected text shape"),
        }
    }

    #[test]
    fn text_request_json_shape() {
        let request = ChatRequest::new("hello", None, &history(1));
        let RequestBody::Json(value) = request.into_body().unwrap() else {
            panic!("expected JSON body");
        };
        assert_eq!(
            value,
            json!({
                "query": "hello",
                "messages": [
                    {"id": "msg-0", "role": "user", "content": "message 0"}
                ]
            })
        );
    }

    #[test]
    fn file_request_uses_fallback_prompt_for_empty_input() {
        let upload = PendingUpload::new("a.pdf", "application/pdf", vec![1u8, 2, 3]);
        let request = ChatRequest::new("", Some(upload), &[]);
        match request {
            ChatRequest::File(file) => assert_eq!(file.query, FALLBACK_FILE_PROMPT),
            ChatRequest::Text(_) => panic!("expected file shape"),
        }
    }

    #[test]
    fn file_request_keeps_nonempty_input_verbatim() {
        let upload = PendingUpload::new("a.pdf", "application/pdf", vec![1u8]);
        let request = ChatRequest::new("summarize this ", Some(upload), &[]);
        match request {
            ChatRequest::File(file) => assert_eq!(file.query, "summarize this "),
            ChatRequest::Text(_) => panic!("expected file shape"),
        }
    }

    #[test]
    fn file_request_lowers_to_multipart() {
        let upload = PendingUpload::new("a.pdf", "application/pdf", vec![1u8]);
        let request = ChatRequest::new("", Some(upload), &history(2));
        assert!(request.is_file());
        assert!(matches!(
            request.into_body().unwrap(),
            RequestBody::Multipart(_)
        ));
    }

    #[test]
    fn context_is_capped_at_five_trailing_messages() {
        let all = history(7);
        let context = trailing_context(&all);
        assert_eq!(context.len(), CONTEXT_MESSAGES);
        assert_eq!(context[0].id, "msg-2");
        assert_eq!(context[4].id, "msg-6");
    }

    #[test]
    fn short_history_is_forwarded_whole() {
        let all = history(3);
        assert_eq!(trailing_context(&all), all);
        assert!(trailing_context(&[]).is_empty());
    }
}
