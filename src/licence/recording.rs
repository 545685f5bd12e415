//! In-memory backend that records draw calls instead of rendering them.
//!
//! Used by the test suite to inspect layout without parsing PDF output, and
//! to simulate a backend that cannot start.

use std::sync::{Arc, Mutex};

use super::drawing::{BackendError, PageDrawer, PageSpec, Paint, Rect, RenderBackend, TextStyle};
use super::embedder::CodeRaster;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        paint: Paint,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
    Image {
        rect: Rect,
        width_px: u32,
        height_px: u32,
    },
}

/// Everything drawn on one page, shared with the backend after `finish`.
pub type PageLog = Arc<Mutex<Vec<DrawOp>>>;

#[derive(Debug, Default)]
pub struct RecordingBackend {
    unavailable: bool,
    fail_serialization: bool,
    pages: Mutex<Vec<PageLog>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `open_page` always fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// A backend whose pages fail when serialized.
    pub fn failing_serialization() -> Self {
        Self {
            fail_serialization: true,
            ..Self::default()
        }
    }

    pub fn pages_opened(&self) -> usize {
        self.pages.lock().map(|pages| pages.len()).unwrap_or(0)
    }

    /// Draw calls of the most recently opened page.
    pub fn last_page(&self) -> Vec<DrawOp> {
        self.pages
            .lock()
            .ok()
            .and_then(|pages| pages.last().cloned())
            .and_then(|log| log.lock().ok().map(|ops| ops.clone()))
            .unwrap_or_default()
    }
}

impl RenderBackend for RecordingBackend {
    type Drawer = RecordingDrawer;

    fn open_page(&self, spec: &PageSpec) -> Result<RecordingDrawer, BackendError> {
        if self.unavailable {
            return Err(BackendError::Unavailable(format!(
                "recording backend disabled for '{}'",
                spec.title
            )));
        }
        let log = PageLog::default();
        if let Ok(mut pages) = self.pages.lock() {
            pages.push(log.clone());
        }
        Ok(RecordingDrawer {
            log,
            fail_serialization: self.fail_serialization,
        })
    }
}

#[derive(Debug)]
pub struct RecordingDrawer {
    log: PageLog,
    fail_serialization: bool,
}

impl RecordingDrawer {
    fn push(&mut self, op: DrawOp) {
        if let Ok(mut ops) = self.log.lock() {
            ops.push(op);
        }
    }
}

impl PageDrawer for RecordingDrawer {
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        self.push(DrawOp::Rect { rect, paint });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        self.push(DrawOp::RoundedRect {
            rect,
            radius,
            paint,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), _thickness: f32) {
        self.push(DrawOp::Line { from, to });
    }

    fn image(&mut self, raster: &CodeRaster, rect: Rect) {
        self.push(DrawOp::Image {
            rect,
            width_px: raster.width,
            height_px: raster.height,
        });
    }

    fn finish(self) -> Result<Vec<u8>, BackendError> {
        if self.fail_serialization {
            return Err(BackendError::Serialization(
                "recording backend refused to serialize".into(),
            ));
        }
        let count = self.log.lock().map(|ops| ops.len()).unwrap_or(0);
        Ok(format!("RECORDED {count} OPS").into_bytes())
    }
}

/// Helpers for asserting against recorded pages.
pub fn texts(ops: &[DrawOp]) -> Vec<&str> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

pub fn images(ops: &[DrawOp]) -> Vec<Rect> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Image { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect()
}
