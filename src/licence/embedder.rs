//! Scannable-code generation and placement.
//!
//! Raster generation is the only step of a build that suspends. It goes
//! through the [`CodeRasterizer`] capability so tests can swap in a generator
//! that fails on demand. Placement is synchronous and happens on the caller's
//! drawer, which keeps it serialized with the rest of the layout.

use async_trait::async_trait;
use image::Luma;
use qrcode::{EcLevel, QrCode};
use std::sync::Arc;
use thiserror::Error;

use super::drawing::{fit_text, PageDrawer, Rect, TextStyle};

/// Pixels generated per millimetre of target rectangle, roughly 300 dpi.
pub const RASTER_PX_PER_MM: f32 = 12.0;

/// Gap between the bottom of a code and its caption baseline.
pub const CAPTION_GAP: f32 = 3.2;
pub const CAPTION_STYLE: TextStyle = TextStyle::regular(6.5).centered();

/// How far a caption may run past each side of its code.
const CAPTION_OVERHANG: f32 = 4.0;

/// 8-bit greyscale raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRaster {
    pub width: u32,
    pub height: u32,
    pub luma: Vec<u8>,
}

impl CodeRaster {
    /// Expand to packed RGB triples for backends without greyscale images.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.luma.iter().flat_map(|&v| [v, v, v]).collect()
    }

    /// Luma at (`x`, `y`), or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + x as usize;
        self.luma.get(index).copied()
    }
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("cannot encode payload: {0}")]
    Encode(String),
    #[error("raster worker failed: {0}")]
    Worker(String),
}

/// Turns a payload into an image at least `pixel_width` pixels wide.
#[async_trait]
pub trait CodeRasterizer: Send + Sync {
    async fn rasterize(&self, payload: &str, pixel_width: u32) -> Result<CodeRaster, RasterError>;
}

/// QR code generator backed by the `qrcode` crate.
#[derive(Debug, Clone)]
pub struct QrRasterizer {
    ec_level: EcLevel,
}

impl QrRasterizer {
    pub fn new(ec_level: EcLevel) -> Self {
        Self { ec_level }
    }

    fn encode(payload: &str, pixel_width: u32, ec_level: EcLevel) -> Result<CodeRaster, RasterError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ec_level)
            .map_err(|e| RasterError::Encode(e.to_string()))?;

        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .min_dimensions(pixel_width, pixel_width)
            .build();

        let (width, height) = image.dimensions();
        Ok(CodeRaster {
            width,
            height,
            luma: image.into_raw(),
        })
    }
}

impl Default for QrRasterizer {
    fn default() -> Self {
        Self::new(EcLevel::M)
    }
}

#[async_trait]
impl CodeRasterizer for QrRasterizer {
    async fn rasterize(&self, payload: &str, pixel_width: u32) -> Result<CodeRaster, RasterError> {
        let payload = payload.to_string();
        let ec_level = self.ec_level;
        tokio::task::spawn_blocking(move || Self::encode(&payload, pixel_width, ec_level))
            .await
            .map_err(|e| RasterError::Worker(e.to_string()))?
    }
}

/// One code to place: what to encode and where.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeEmbedRequest {
    pub payload: String,
    pub rect: Rect,
}

impl CodeEmbedRequest {
    pub fn new(payload: impl Into<String>, rect: Rect) -> Self {
        Self {
            payload: payload.into(),
            rect,
        }
    }

    /// Pixel width requested from the rasterizer, oversampled from `rect`.
    pub fn pixel_width(&self) -> u32 {
        (self.rect.width * RASTER_PX_PER_MM).ceil().max(1.0) as u32
    }

    /// Baseline of the caption written under the code.
    pub fn caption_baseline(&self) -> f32 {
        self.rect.bottom() + CAPTION_GAP
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedOk {
    pub payload: String,
    pub rect: Rect,
}

/// A code that could not be generated; its rectangle stays blank.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("embedding '{payload}' failed: {reason}")]
pub struct EmbedFailed {
    pub payload: String,
    pub rect: Rect,
    pub reason: String,
}

pub type EmbedResult = Result<EmbedOk, EmbedFailed>;

#[derive(Clone)]
pub struct CodeEmbedder {
    rasterizer: Arc<dyn CodeRasterizer>,
}

impl CodeEmbedder {
    pub fn new(rasterizer: Arc<dyn CodeRasterizer>) -> Self {
        Self { rasterizer }
    }

    /// Generate the raster for `request` without touching the page.
    pub async fn rasterize(&self, request: &CodeEmbedRequest) -> Result<CodeRaster, EmbedFailed> {
        self.rasterizer
            .rasterize(&request.payload, request.pixel_width())
            .await
            .map_err(|e| EmbedFailed {
                payload: request.payload.clone(),
                rect: request.rect,
                reason: e.to_string(),
            })
    }

    /// Splice a generated raster (or nothing, on failure) into the page.
    pub fn place<D: PageDrawer>(
        &self,
        drawer: &mut D,
        request: &CodeEmbedRequest,
        raster: Result<CodeRaster, EmbedFailed>,
    ) -> EmbedResult {
        match raster {
            Ok(raster) => {
                drawer.image(&raster, request.rect);
                drawer.text(
                    &fit_text(
                        &request.payload,
                        request.rect.width + 2.0 * CAPTION_OVERHANG,
                        CAPTION_STYLE,
                    ),
                    request.rect.center_x(),
                    request.caption_baseline(),
                    CAPTION_STYLE,
                );
                Ok(EmbedOk {
                    payload: request.payload.clone(),
                    rect: request.rect,
                })
            }
            Err(failed) => {
                log::warn!("{}; leaving code area blank", failed);
                Err(failed)
            }
        }
    }

    /// Rasterize then place.
    pub async fn embed<D: PageDrawer>(&self, drawer: &mut D, request: &CodeEmbedRequest) -> EmbedResult {
        let raster = self.rasterize(request).await;
        self.place(drawer, request, raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_qr_raster_is_at_least_requested_width() {
        let raster = QrRasterizer::default()
            .rasterize("DEM-2024-0042", 300)
            .await
            .unwrap();
        assert!(raster.width >= 300);
        assert_eq!(raster.width, raster.height);
        assert_eq!(raster.luma.len(), (raster.width * raster.height) as usize);
    }

    #[tokio::test]
    async fn test_qr_rejects_oversized_payload() {
        let payload = "X".repeat(8000);
        let result = QrRasterizer::default().rasterize(&payload, 100).await;
        assert!(matches!(result, Err(RasterError::Encode(_))));
    }

    #[test]
    fn test_pixel_width_is_oversampled() {
        let request = CodeEmbedRequest::new("A", Rect::new(0.0, 0.0, 25.0, 25.0));
        assert_eq!(request.pixel_width(), 300);
        assert!((request.caption_baseline() - 28.2).abs() < 1e-4);
    }

    #[test]
    fn test_to_rgb_triples_each_pixel() {
        let raster = CodeRaster {
            width: 2,
            height: 1,
            luma: vec![0, 255],
        };
        assert_eq!(raster.to_rgb(), vec![0, 0, 0, 255, 255, 255]);
        assert_eq!(raster.pixel(1, 0), Some(255));
    }

    #[test]
    fn test_pixel_outside_raster_is_none() {
        let raster = CodeRaster {
            width: 2,
            height: 2,
            luma: vec![0, 255, 255],
        };
        assert_eq!(raster.pixel(0, 0), Some(0));
        assert_eq!(raster.pixel(2, 0), None);
        assert_eq!(raster.pixel(0, 2), None);
        assert_eq!(raster.pixel(u32::MAX, u32::MAX), None);
        // Short buffer: the last pixel is declared but missing.
        assert_eq!(raster.pixel(1, 1), None);
    }
}
