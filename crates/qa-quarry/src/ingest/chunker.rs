//! Hierarchical text chunking
//!
//! Splits document text into chunks under a character budget. Paragraph
//! boundaries are preferred; a paragraph that exceeds the budget on its
//! own is split at sentence boundaries, and a single oversized sentence
//! is hard-sliced into fixed-size windows.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::types::DocumentSection;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph pattern"));

/// Sentence-terminal punctuation, ASCII and CJK
const SENTENCE_TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// Splits text into chunks no longer than a fixed number of characters
pub struct ChunkSplitter {
    /// Maximum chunk size in characters
    max_size: usize,
}

impl ChunkSplitter {
    /// Create a splitter with the given character budget.
    /// A zero budget is rejected as a configuration error.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(Error::InvalidChunkSize(max_size));
        }
        Ok(Self { max_size })
    }

    /// The character budget chunks are held under
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Split text into chunks of at most `max_size` characters.
    ///
    /// Paragraphs (blank-line separated) are packed greedily and joined
    /// with a blank line. A paragraph that does not fit alone falls back
    /// to sentence packing, and a sentence longer than the budget is
    /// sliced into exact windows, the last of which seeds the next chunk.
    /// Returns an empty vector for empty or whitespace-only input.
    pub fn split(&self, content: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        // running char count of `current`, trailing separator included
        let mut current_len = 0usize;

        for paragraph in PARAGRAPH_BREAK.split(content) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            let para_len = paragraph.chars().count();

            if current_len + para_len <= self.max_size {
                current.push_str(paragraph);
                current.push_str("\n\n");
                current_len += para_len + 2;
                continue;
            }

            flush(&mut chunks, &mut current, &mut current_len);

            if para_len <= self.max_size {
                current.push_str(paragraph);
                current.push_str("\n\n");
                current_len = para_len + 2;
            } else {
                self.pack_sentences(paragraph, &mut chunks, &mut current, &mut current_len);
            }
        }

        flush(&mut chunks, &mut current, &mut current_len);
        chunks
    }

    /// Pack the sentences of an oversized paragraph into the accumulator,
    /// hard-slicing any sentence that exceeds the budget by itself.
    fn pack_sentences(
        &self,
        paragraph: &str,
        chunks: &mut Vec<String>,
        current: &mut String,
        current_len: &mut usize,
    ) {
        for sentence in split_sentences(paragraph) {
            let sent_len = sentence.chars().count();

            if *current_len + sent_len <= self.max_size {
                current.push_str(sentence);
                current.push(' ');
                *current_len += sent_len + 1;
                continue;
            }

            flush(chunks, current, current_len);

            if sent_len > self.max_size {
                let windows = slice_chars(sentence, self.max_size);
                // every window but the last is a complete chunk; the last
                // seeds the accumulator and may be extended
                let last = windows.len() - 1;
                for window in &windows[..last] {
                    if !window.trim().is_empty() {
                        chunks.push((*window).to_string());
                    }
                }
                current.push_str(windows[last]);
                current.push(' ');
                *current_len = windows[last].chars().count() + 1;
            } else {
                current.push_str(sentence);
                current.push(' ');
                *current_len = sent_len + 1;
            }
        }
    }
}

/// Flush the accumulator into the chunk list, trimmed, skipping whitespace
fn flush(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    current.clear();
    *current_len = 0;
}

/// Split text at sentence-terminal punctuation followed by whitespace.
/// The whitespace run is consumed; terminators stay with their sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut after_terminator = false;

    let mut iter = text.char_indices().peekable();
    while let Some((idx, c)) = iter.next() {
        if after_terminator && c.is_whitespace() {
            sentences.push(&text[start..idx]);
            let mut next_start = idx + c.len_utf8();
            while let Some(&(peek_idx, peek_c)) = iter.peek() {
                if peek_c.is_whitespace() {
                    iter.next();
                    next_start = peek_idx + peek_c.len_utf8();
                } else {
                    next_start = peek_idx;
                    break;
                }
            }
            start = next_start;
            after_terminator = false;
            continue;
        }
        after_terminator = SENTENCE_TERMINATORS.contains(&c);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Slice text into windows of exactly `window` characters; the final
/// window holds the remainder. Offsets follow char boundaries.
fn slice_chars(text: &str, window: usize) -> Vec<&str> {
    let mut slices = Vec::new();
    let mut start = 0usize;
    let mut count = 0usize;

    for (idx, _) in text.char_indices() {
        if count == window {
            slices.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        slices.push(&text[start..]);
    }
    slices
}

/// Split markdown into sections at heading lines.
///
/// A line whose first non-whitespace character is `#` starts a new
/// section. Sections whose first line parses as `#+ title` carry that
/// level and title; anything else, including content before the first
/// heading, becomes a level-0 section with a synthetic label.
pub fn split_by_headings(markdown: &str) -> Vec<DocumentSection> {
    let trimmed = markdown.trim();
    let mut sections = Vec::new();
    if trimmed.is_empty() {
        return sections;
    }

    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in trimmed.lines() {
        if blocks.is_empty() || line.trim_start().starts_with('#') {
            blocks.push(Vec::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    for block in blocks {
        let text = block.join("\n");
        if text.trim().is_empty() {
            continue;
        }
        match block.first().and_then(|line| parse_heading(line)) {
            Some((level, title)) => {
                let content = block[1..].join("\n").trim().to_string();
                sections.push(DocumentSection {
                    level,
                    heading: title.to_string(),
                    content,
                });
            }
            None => {
                sections.push(DocumentSection {
                    level: 0,
                    heading: format!("Section {}", sections.len() + 1),
                    content: text.trim().to_string(),
                });
            }
        }
    }
    sections
}

/// Parse `#+ title` at the start of a line; requires whitespace between
/// the markers and a non-empty title
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_start();
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(|c: char| c == ' ' || c == '\t') {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some((level, title))
}
