//! Upload policy enforced before a file is staged for submission.
//!
//! Every candidate file is checked against a fixed MIME allow-list and a size
//! cap before it becomes the pending upload. Rejections never reach the
//! network; they surface as an inline warning on the panel.

use std::fmt;

use crate::types::PendingUpload;

/// Maximum upload size, matching the backend's limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The exact set of MIME types the backend accepts.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    // Text files
    "text/plain",
    "text/markdown",
    "text/csv",
    "application/json",
    "text/html",
    "text/xml",
    "application/xml",
    // Document files
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    // Image files
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/tiff",
    "image/webp",
    // Archive files
    "application/zip",
    "application/x-zip-compressed",
];

/// Why a candidate upload was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    /// The MIME type is not in the allowed set.
    UnsupportedType {
        /// The offending MIME type.
        media_type: String,
    },

    /// The file exceeds the size cap.
    TooLarge {
        /// Size of the offending file in bytes.
        size_bytes: usize,
    },
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadRejection::UnsupportedType { media_type } => {
                write!(
                    f,
                    "File type \"{media_type}\" is not supported. Supported types include: \
                     text, images, PDF, Word, Excel, PowerPoint, CSV, JSON, and archives."
                )
            }
            UploadRejection::TooLarge { size_bytes } => {
                write!(
                    f,
                    "File size ({:.2}MB) exceeds limit of {}MB",
                    *size_bytes as f64 / 1024.0 / 1024.0,
                    MAX_UPLOAD_BYTES / 1024 / 1024,
                )
            }
        }
    }
}

/// Immutable validation policy: the allowed MIME set and the size cap.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_types: &'static [&'static str],
    max_bytes: usize,
}

impl UploadPolicy {
    /// Returns true if the MIME type is in the allowed set.
    pub fn allows(&self, media_type: &str) -> bool {
        self.allowed_types.contains(&media_type)
    }

    /// The size cap in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check a candidate upload. Rules run in order: type, then size.
    pub fn check(&self, upload: &PendingUpload) -> Result<(), UploadRejection> {
        if !self.allows(&upload.media_type) {
            return Err(UploadRejection::UnsupportedType {
                media_type: upload.media_type.clone(),
            });
        }
        if upload.size_bytes() > self.max_bytes {
            return Err(UploadRejection::TooLarge {
                size_bytes: upload.size_bytes(),
            });
        }
        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_types: ALLOWED_MEDIA_TYPES,
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(media_type: &str, size: usize) -> PendingUpload {
        PendingUpload::new("candidate", media_type, vec![0u8; size])
    }

    #[test]
    fn accepts_every_allowed_type() {
        let policy = UploadPolicy::default();
        for media_type in ALLOWED_MEDIA_TYPES {
            assert!(
                policy.check(&upload(media_type, 1024)).is_ok(),
                "{media_type} should be accepted"
            );
        }
    }

    #[test]
    fn rejects_unsupported_type() {
        let policy = UploadPolicy::default();
        let rejection = policy
            .check(&upload("video/mp4", 1024))
            .expect_err("mp4 is not allowed");
        assert_eq!(
            rejection,
            UploadRejection::UnsupportedType {
                media_type: "video/mp4".to_string()
            }
        );
        assert!(rejection.to_string().contains("video/mp4"));
        assert!(rejection.to_string().contains("PowerPoint"));
    }

    #[test]
    fn rejects_oversize_allowed_type() {
        let policy = UploadPolicy::default();
        let rejection = policy
            .check(&upload("application/pdf", 11_000_000))
            .expect_err("11MB exceeds the cap");
        assert_eq!(
            rejection,
            UploadRejection::TooLarge {
                size_bytes: 11_000_000
            }
        );
        assert_eq!(
            rejection.to_string(),
            "File size (10.49MB) exceeds limit of 10MB"
        );
    }

    #[test]
    fn type_check_runs_before_size_check() {
        let policy = UploadPolicy::default();
        let rejection = policy
            .check(&upload("video/mp4", MAX_UPLOAD_BYTES + 1))
            .expect_err("both rules violated");
        assert!(matches!(rejection, UploadRejection::UnsupportedType { .. }));
    }

    #[test]
    fn boundary_size_is_accepted() {
        let policy = UploadPolicy::default();
        assert!(policy.check(&upload("text/plain", MAX_UPLOAD_BYTES)).is_ok());
        assert!(policy
            .check(&upload("text/plain", MAX_UPLOAD_BYTES + 1))
            .is_err());
    }
}
