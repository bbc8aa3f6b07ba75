/// Category of an uploaded file, derived from its MIME type.
///
/// The categories form a closed set so that the icon and description lookups
/// are total functions rather than chains of substring checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Plain text, markdown, HTML, and XML.
    Text,

    /// Comma-separated values.
    Csv,

    /// JSON data.
    Json,

    /// Raster images.
    Image,

    /// PDF documents.
    Pdf,

    /// Word documents (`.doc`/`.docx`).
    Word,

    /// Excel spreadsheets (`.xls`/`.xlsx`).
    Excel,

    /// PowerPoint presentations (`.ppt`/`.pptx`).
    PowerPoint,

    /// ZIP archives.
    Archive,

    /// Anything that does not match a more specific category.
    Document,
}

impl FileCategory {
    /// Classify a MIME type into its category.
    pub fn from_media_type(media_type: &str) -> Self {
        match media_type {
            "text/plain" | "text/markdown" | "text/html" | "text/xml" | "application/xml" => {
                FileCategory::Text
            }
            "text/csv" => FileCategory::Csv,
            "application/json" => FileCategory::Json,
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" | "image/bmp"
            | "image/tiff" | "image/webp" => FileCategory::Image,
            "application/pdf" => FileCategory::Pdf,
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                FileCategory::Word
            }
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                FileCategory::Excel
            }
            "application/vnd.ms-powerpoint"
            | "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                FileCategory::PowerPoint
            }
            "application/zip" | "application/x-zip-compressed" => FileCategory::Archive,
            other if other.starts_with("text/") => FileCategory::Text,
            _ => FileCategory::Document,
        }
    }

    /// Human-readable description shown next to the file name.
    pub fn description(self) -> &'static str {
        match self {
            FileCategory::Text => "Text File",
            FileCategory::Csv => "CSV Data",
            FileCategory::Json => "JSON Data",
            FileCategory::Image => "Image (OCR supported)",
            FileCategory::Pdf => "PDF Document",
            FileCategory::Word => "Word Document",
            FileCategory::Excel => "Excel Spreadsheet",
            FileCategory::PowerPoint => "PowerPoint Presentation",
            FileCategory::Archive => "ZIP Archive",
            FileCategory::Document => "Document",
        }
    }

    /// Glyph used when listing the file in terminal output.
    pub fn icon(self) -> &'static str {
        match self {
            FileCategory::Image => "🖼",
            FileCategory::Pdf | FileCategory::Word | FileCategory::Text => "📄",
            FileCategory::Excel | FileCategory::Csv => "📊",
            FileCategory::PowerPoint => "🎞",
            FileCategory::Archive => "🗜",
            FileCategory::Json | FileCategory::Document => "📎",
        }
    }
}
