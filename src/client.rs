use std::env;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use url::Url;

use crate::error::{BackendErrorCode, Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::request::{ChatRequest, RequestBody};
use crate::text_stream::StreamingReply;

const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/chat";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The transport seam between the panel and the chat backend.
///
/// The production implementation is [`ChatClient`]; tests substitute fakes.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one submission and return its streamed reply.
    async fn submit(&self, request: ChatRequest) -> Result<StreamingReply>;
}

/// HTTP client for the chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    endpoint: Url,
    timeout: Duration,
}

impl ChatClient {
    /// Create a new client.
    ///
    /// The endpoint can be provided directly or read from the
    /// PARLEY_ENDPOINT environment variable; otherwise a localhost default
    /// is used.
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        Self::with_options(endpoint, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(endpoint: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = endpoint
            .or_else(|| env::var("PARLEY_ENDPOINT").ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// The endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Process a non-2xx response and convert it to our Error type.
    async fn process_error_response(response: Response, is_file: bool) -> Error {
        let status = response.status().as_u16();

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        if is_file {
            classify_file_error(status, &error_body)
        } else {
            classify_text_error(status, &error_body)
        }
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn submit(&self, request: ChatRequest) -> Result<StreamingReply> {
        let is_file = request.is_file();

        let builder = match request.into_body()? {
            RequestBody::Json(value) => self.client.post(self.endpoint.clone()).json(&value),
            RequestBody::Multipart(form) => self.client.post(self.endpoint.clone()).multipart(form),
        };

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let sent = builder.send().await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = sent.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response, is_file).await);
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e)))
            })
        });
        Ok(StreamingReply::new(Box::pin(stream)))
    }
}

/// Error body shape the backend uses for non-2xx responses.
///
/// The code arrives as a plain string so that codes this crate does not know
/// about degrade to the body's error text instead of a parse failure.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    code: Option<String>,
}

impl ErrorBody {
    fn known_code(&self) -> Option<BackendErrorCode> {
        let code = self.code.as_deref()?;
        serde_json::from_value(serde_json::Value::String(code.to_string())).ok()
    }
}

/// Classify a non-2xx file-upload response into a user-facing error.
///
/// Known backend codes get a prefixed message; an unparseable body falls
/// back to a status-based message.
pub fn classify_file_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let code = parsed.known_code();
            let detail = parsed
                .error
                .unwrap_or_else(|| format!("Upload failed ({status})"));
            let message = match code {
                Some(BackendErrorCode::InvalidFileType) => {
                    format!("File type not supported. {detail}")
                }
                Some(BackendErrorCode::FileTooLarge) => {
                    format!("File is too large. {detail}")
                }
                Some(BackendErrorCode::ExtractionFailed) => {
                    format!("Could not extract content from file. {detail}")
                }
                Some(BackendErrorCode::FileProcessingError) => {
                    format!("Error processing file. {detail}")
                }
                None => detail,
            };
            Error::api(status, code, message)
        }
        Err(_) => {
            let message = match status {
                413 => "File too large - please use a smaller file".to_string(),
                400 => "Invalid file or request".to_string(),
                _ => format!("Upload failed ({status})"),
            };
            Error::api(status, None, message)
        }
    }
}

/// Classify a non-2xx text-query response into a user-facing error.
pub fn classify_text_error(status: u16, body: &str) -> Error {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .unwrap_or_else(|| format!("Request failed ({status})")),
        Err(_) => format!("Text query failed ({status})"),
    };
    Error::api(status, None, message)
}
