use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use licence_docs_server::licence::embedder::{CodeRaster, CodeRasterizer, RasterError};
use licence_docs_server::licence::layout::Letterhead;
use licence_docs_server::licence::recording::RecordingBackend;
use licence_docs_server::licence::{DefaultTable, DocumentAssembler, QrRasterizer};
use std::sync::Arc;

/// Rasterizer that fails for selected payloads and delegates the rest.
pub struct SelectiveFailRasterizer {
    pub fail_on: Vec<String>,
    inner: QrRasterizer,
}

impl SelectiveFailRasterizer {
    pub fn failing(payloads: &[&str]) -> Self {
        Self {
            fail_on: payloads.iter().map(|p| p.to_string()).collect(),
            inner: QrRasterizer::default(),
        }
    }
}

#[async_trait]
impl CodeRasterizer for SelectiveFailRasterizer {
    async fn rasterize(&self, payload: &str, pixel_width: u32) -> Result<CodeRaster, RasterError> {
        if self.fail_on.iter().any(|p| p == payload) {
            return Err(RasterError::Encode(format!("refusing '{payload}'")));
        }
        self.inner.rasterize(payload, pixel_width).await
    }
}

pub fn recording_assembler(
    rasterizer: Arc<dyn CodeRasterizer>,
) -> DocumentAssembler<RecordingBackend> {
    DocumentAssembler::new(
        RecordingBackend::new(),
        Arc::new(DefaultTable::builtin()),
        rasterizer,
        Letterhead::default(),
    )
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap()
}
