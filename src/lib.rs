// Public modules
pub mod client;
pub mod error;
pub mod observability;
pub mod panel;
pub mod render;
pub mod request;
pub mod text_stream;
pub mod types;
pub mod upload;

// Re-exports
pub use client::{ChatBackend, ChatClient, classify_file_error, classify_text_error};
pub use error::{BackendErrorCode, Error, Result};
pub use panel::{PanelArgs, PanelCommand, PanelConfig, PanelSession, Phase, Submission};
pub use render::{PlainTextRenderer, Renderer};
pub use request::{CONTEXT_MESSAGES, ChatRequest, FALLBACK_FILE_PROMPT, RequestBody};
pub use text_stream::{ByteStream, StreamingReply, collect_text, collect_text_with_interrupt};
pub use types::*;
pub use upload::{ALLOWED_MEDIA_TYPES, MAX_UPLOAD_BYTES, UploadPolicy, UploadRejection};
