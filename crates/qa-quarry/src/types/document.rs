//! Document types shared across the pipeline

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Supported source formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// Unknown file type
    Unknown,
}

impl SourceFormat {
    /// Detect format from a file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    /// Check whether the format is accepted when collecting input files.
    /// Unknown extensions are still readable as plain text when named directly.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// A document that has been read and chunked, ready for extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path the document was read from
    pub file_path: PathBuf,
    /// File name including extension
    pub file_name: String,
    /// Lowercased extension without the dot, empty if none
    pub file_extension: String,
    /// Content hash for deduplication
    pub content_hash: String,
    /// Full extracted text
    pub file_content: String,
    /// Text chunks in document order
    pub chunks: Vec<String>,
}

impl Document {
    /// Format derived from the file extension
    pub fn format(&self) -> SourceFormat {
        SourceFormat::from_extension(&self.file_extension)
    }

    /// Path relative to `base`, used to mirror the input layout in the
    /// output tree. Paths outside `base` are returned whole.
    pub fn relative_path(&self, base: &Path) -> &Path {
        self.file_path.strip_prefix(base).unwrap_or(&self.file_path)
    }
}

/// A section of a markdown document, split at heading boundaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSection {
    /// Heading level (number of `#` markers, 0 for synthetic sections)
    pub level: usize,
    /// Heading text, or a synthetic label for un-headed content
    pub heading: String,
    /// Section body without the heading line
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("pdf"), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_extension("PDF"), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_extension("docx"), SourceFormat::Docx);
        assert_eq!(SourceFormat::from_extension("md"), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_extension("markdown"), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_extension("txt"), SourceFormat::Txt);
        assert_eq!(SourceFormat::from_extension("exe"), SourceFormat::Unknown);
    }

    #[test]
    fn test_supported_formats() {
        assert!(SourceFormat::Pdf.is_supported());
        assert!(SourceFormat::Markdown.is_supported());
        assert!(!SourceFormat::Unknown.is_supported());
    }

    #[test]
    fn test_relative_path_strips_base() {
        let doc = Document {
            file_path: PathBuf::from("docs/manuals/printer.txt"),
            file_name: "printer.txt".to_string(),
            file_extension: "txt".to_string(),
            content_hash: String::new(),
            file_content: String::new(),
            chunks: Vec::new(),
        };
        assert_eq!(
            doc.relative_path(Path::new("docs")),
            Path::new("manuals/printer.txt")
        );
        assert_eq!(
            doc.relative_path(Path::new("elsewhere")),
            Path::new("docs/manuals/printer.txt")
        );
    }
}
