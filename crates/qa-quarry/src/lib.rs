//! qa-quarry: QA dataset extraction from documents with LLM assistance
//!
//! This crate reads PDF, DOCX, plain text and Markdown files, splits them
//! into model-sized chunks, asks a chat model for question-answer pairs
//! chunk by chunk, and repairs the almost-JSON models tend to return.
//! Results are written as a dated JSON tree mirroring the input layout.

pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod llm;
pub mod output;
pub mod recovery;
pub mod types;

pub use config::QuarryConfig;
pub use error::{Error, Result};
pub use extract::{interpret, QaExtractor, DEFAULT_PROMPT};
pub use ingest::{collect_files, is_garbled, ChunkSplitter, DocumentReader};
pub use llm::{ChatModel, OpenAiClient};
pub use output::{DocumentReport, OutputWriter, RunSummary};
pub use recovery::recover;
pub use types::{Document, QaPair};
