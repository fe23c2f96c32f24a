//! Core types for the extraction pipeline

pub mod document;
pub mod qa;

pub use document::{Document, DocumentSection, SourceFormat};
pub use qa::QaPair;
