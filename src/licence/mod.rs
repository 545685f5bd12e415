//! Licence document engine - turns a player record into a one-page PDF.
//!
//! - `record` / `resolver` - input fields and their typed defaults
//! - `cursor` / `section` / `layout` - vertical flow of the fixed sections
//! - `embedder` - QR code generation and placement
//! - `drawing` / `pdf` / `recording` - rendering backends
//! - `assembler` - the ordered build of one document

pub mod assembler;
pub mod cursor;
pub mod drawing;
pub mod embedder;
pub mod filename;
pub mod handlers;
pub mod layout;
pub mod pdf;
pub mod record;
pub mod recording;
pub mod resolver;
pub mod section;

pub use assembler::{BuildReport, BuildState, DocumentAssembler};
pub use embedder::{CodeEmbedder, CodeRasterizer, EmbedFailed, QrRasterizer};
pub use pdf::PdfBackend;
pub use record::{DefaultTable, Field, Record};
pub use resolver::{FieldResolver, FieldSource, ResolvedField};

use thiserror::Error;

use drawing::BackendError;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Fatal build errors. No partial artifact exists when one of these is returned.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("failed to serialize document: {0}")]
    SerializationFailed(String),
}

impl From<BackendError> for AssemblyError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(reason) => AssemblyError::BackendUnavailable(reason),
            BackendError::Serialization(reason) => AssemblyError::SerializationFailed(reason),
        }
    }
}

/// A finished document, ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct Artifact {
    filename: String,
    bytes: Vec<u8>,
    issued_on: String,
    report: BuildReport,
}

impl Artifact {
    pub(crate) fn new(filename: String, bytes: Vec<u8>, issued_on: String, report: BuildReport) -> Self {
        Self {
            filename,
            bytes,
            issued_on,
            report,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    /// Issue date as printed on the document.
    pub fn issued_on(&self) -> &str {
        &self.issued_on
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}
