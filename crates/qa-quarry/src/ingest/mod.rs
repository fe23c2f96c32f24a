//! Document loading and chunking

pub mod chunker;
pub mod garble;
pub mod reader;

pub use chunker::{split_by_headings, ChunkSplitter};
pub use garble::is_garbled;
pub use reader::{collect_files, DocumentReader};
