use bytes::Bytes;

use crate::error::{Error, Result};
use crate::request::FALLBACK_FILE_PROMPT;
use crate::types::FileCategory;

/// The single file staged for the next submission.
///
/// At most one instance exists per panel session; attaching another file
/// replaces it, and every terminal submission outcome clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    /// File name shown in the transcript and sent as the multipart filename.
    pub name: String,

    /// MIME type of the file.
    pub media_type: String,

    /// Raw file contents.
    pub data: Bytes,
}

impl PendingUpload {
    /// Create a new `PendingUpload` from in-memory bytes.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    ///
    /// Unrecognized extensions map to `application/octet-stream`, which the
    /// upload policy will reject with a useful message.
    pub fn load(path: &utf8path::Path<'_>) -> Result<Self> {
        let data = std::fs::read(path.as_str())
            .map_err(|err| Error::io(format!("failed to read {path}"), err))?;
        let name = path
            .as_str()
            .rsplit('/')
            .next()
            .unwrap_or(path.as_str())
            .to_string();
        let media_type = media_type_for_name(&name).to_string();
        Ok(Self {
            name,
            media_type,
            data: Bytes::from(data),
        })
    }

    /// Size of the file in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Category of the file, derived from its MIME type.
    pub fn category(&self) -> FileCategory {
        FileCategory::from_media_type(&self.media_type)
    }

    /// The transcript entry summarizing this upload, appended optimistically
    /// before the network call resolves.
    pub fn transcript_summary(&self, input: &str) -> String {
        let prompt = if input.is_empty() {
            FALLBACK_FILE_PROMPT
        } else {
            input
        };
        format!(
            "📎 **{}** ({})\n{:.1}KB\n\n{}",
            self.name,
            self.category().description(),
            self.size_bytes() as f64 / 1024.0,
            prompt,
        )
    }
}

/// Infer a MIME type from a file name's extension.
fn media_type_for_name(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_fallback_prompt_when_input_empty() {
        let upload = PendingUpload::new("report.pdf", "application/pdf", vec![0u8; 2048]);
        let summary = upload.transcript_summary("");
        assert!(summary.contains("report.pdf"));
        assert!(summary.contains("PDF Document"));
        assert!(summary.contains("2.0KB"));
        assert!(summary.contains(FALLBACK_FILE_PROMPT));
    }

    #[test]
    fn summary_keeps_user_text() {
        let upload = PendingUpload::new("data.csv", "text/csv", vec![b'a'; 512]);
        let summary = upload.transcript_summary("what is the median?");
        assert!(summary.contains("what is the median?"));
        assert!(!summary.contains(FALLBACK_FILE_PROMPT));
        assert!(summary.contains("CSV Data"));
    }

    #[test]
    fn media_type_inference() {
        assert_eq!(media_type_for_name("notes.txt"), "text/plain");
        assert_eq!(media_type_for_name("deck.PPTX"),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation");
        assert_eq!(media_type_for_name("photo.jpeg"), "image/jpeg");
        assert_eq!(media_type_for_name("mystery.bin"), "application/octet-stream");
        assert_eq!(media_type_for_name("no_extension"), "application/octet-stream");
    }

    #[test]
    fn size_reflects_data_len() {
        let upload = PendingUpload::new("a.txt", "text/plain", vec![0u8; 10]);
        assert_eq!(upload.size_bytes(), 10);
    }
}
