//! Multi-format document reading
//!
//! Extracts plain text from PDF, DOCX, text and markdown files, gates
//! each extraction through the mojibake detector, and assembles chunked
//! [`Document`] values ready for QA extraction.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::ingest::chunker::ChunkSplitter;
use crate::ingest::garble::is_garbled;
use crate::types::{Document, SourceFormat};

/// Reads files into chunked documents
pub struct DocumentReader {
    splitter: ChunkSplitter,
}

impl DocumentReader {
    /// Create a reader that chunks content under the given character budget
    pub fn new(max_chunk_size: usize) -> Result<Self> {
        Ok(Self {
            splitter: ChunkSplitter::new(max_chunk_size)?,
        })
    }

    /// Read and chunk a document from disk
    pub fn read_file(&self, path: &Path) -> Result<Document> {
        let data = std::fs::read(path)?;
        self.read_bytes(path, &data)
    }

    /// Read and chunk a document from raw bytes; the path supplies the
    /// name and extension used for format dispatch
    pub fn read_bytes(&self, path: &Path, data: &[u8]) -> Result<Document> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let content = match SourceFormat::from_extension(&extension) {
            SourceFormat::Pdf => self.extract_pdf(&file_name, data)?,
            SourceFormat::Docx => self.extract_docx(&file_name, data)?,
            SourceFormat::Txt | SourceFormat::Markdown => self.extract_plain(&file_name, data),
            SourceFormat::Unknown => {
                tracing::warn!(
                    "unknown extension '{}', reading {} as plain text",
                    extension,
                    file_name
                );
                self.extract_plain(&file_name, data)
            }
        };

        if content.trim().is_empty() {
            return Err(Error::file_parse(file_name, "file produced no text content"));
        }

        let chunks = self.splitter.split(&content);
        tracing::info!(
            "read {} ({} chars, {} chunks)",
            file_name,
            content.chars().count(),
            chunks.len()
        );

        Ok(Document {
            file_path: path.to_path_buf(),
            file_name,
            file_extension: extension,
            content_hash: hash_content(&content),
            file_content: content,
            chunks,
        })
    }

    /// Extract PDF text, falling back to raw content-stream scanning when
    /// the primary extractor produces nothing usable
    fn extract_pdf(&self, filename: &str, data: &[u8]) -> Result<String> {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => {
                let cleaned = normalize_extracted(&text);
                if !cleaned.is_empty() && !is_garbled(&cleaned) {
                    return Ok(cleaned);
                }
                tracing::warn!(
                    "primary PDF extraction for {} was empty or garbled, trying fallback",
                    filename
                );
            }
            Err(e) => {
                tracing::warn!("pdf-extract failed for {}: {}, trying fallback", filename, e);
            }
        }

        let fallback = normalize_extracted(&extract_pdf_content_streams(filename, data)?);
        if !fallback.is_empty() && !is_garbled(&fallback) {
            return Ok(fallback);
        }
        Err(Error::file_parse(
            filename,
            "no readable text could be extracted from PDF",
        ))
    }

    /// Extract DOCX text by walking paragraph runs; blank paragraphs are
    /// dropped and the rest joined with newlines
    fn extract_docx(&self, filename: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut line = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                line.push_str(&t.text);
                            }
                        }
                    }
                }
                if !line.trim().is_empty() {
                    paragraphs.push(line);
                }
            }
        }
        Ok(paragraphs.join("\n"))
    }

    /// Decode bytes as UTF-8, lossily if needed
    fn extract_plain(&self, filename: &str, data: &[u8]) -> String {
        match std::str::from_utf8(data) {
            Ok(text) => text.to_string(),
            Err(_) => {
                tracing::warn!("{} is not valid UTF-8, decoding lossily", filename);
                String::from_utf8_lossy(data).into_owned()
            }
        }
    }
}

/// Collect input files for a run. A directory is scanned for supported
/// extensions (top level only unless `recursive`); a single file is
/// accepted if its extension is supported. Results are sorted.
pub fn collect_files(input: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        let ext = input
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if SourceFormat::from_extension(&ext).is_supported() {
            return Ok(vec![input.to_path_buf()]);
        }
        tracing::warn!("skipping unsupported file type: {}", input.display());
        return Ok(Vec::new());
    }

    if !input.is_dir() {
        return Err(Error::config(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    let walker = if recursive {
        WalkDir::new(input)
    } else {
        WalkDir::new(input).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if SourceFormat::from_extension(&ext).is_supported() {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Strip nulls, trim lines and drop the empty ones
fn normalize_extracted(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fallback PDF text extraction reading content streams directly
fn extract_pdf_content_streams(filename: &str, data: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::file_parse(filename, format!("failed to load PDF: {}", e)))?;

    let mut all_text = String::new();
    for (page_num, page_id) in doc.get_pages() {
        match doc.get_page_content(page_id) {
            Ok(content) => {
                let text = extract_text_operators(&content);
                if !text.is_empty() {
                    all_text.push_str(&text);
                    all_text.push('\n');
                }
            }
            Err(e) => {
                tracing::debug!("no content stream for page {}: {}", page_num, e);
            }
        }
    }
    Ok(all_text)
}

/// Pull string arguments of text-show operators out of a PDF content
/// stream, honoring BT/ET blocks and basic string escapes
fn extract_text_operators(content: &[u8]) -> String {
    let content_str = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;

    for line in content_str.lines() {
        let line = line.trim();

        if line == "BT" {
            in_text_block = true;
            continue;
        }
        if line == "ET" {
            in_text_block = false;
            if !text.is_empty() && !text.ends_with(' ') {
                text.push(' ');
            }
            continue;
        }

        if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) {
            if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                if start < end {
                    let decoded = line[start + 1..end]
                        .replace("\\n", "\n")
                        .replace("\\r", "\r")
                        .replace("\\t", "\t")
                        .replace("\\(", "(")
                        .replace("\\)", ")")
                        .replace("\\\\", "\\");
                    text.push_str(&decoded);
                }
            }
        }
    }

    text
}

/// Hex-encoded SHA-256 of document text, used for duplicate detection
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
