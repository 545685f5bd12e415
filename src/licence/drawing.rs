//! Capability traits for the page-drawing backend.
//!
//! All coordinates are millimetres with the origin at the top-left corner of
//! the page and `y` growing downwards, matching [`super::cursor::LayoutCursor`].
//! Backends translate to their own coordinate system.

use thiserror::Error;

use super::embedder::CodeRaster;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Grey level, `0.0` black to `1.0` white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gray(pub f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Stroke,
    Fill(Gray),
    FillStroke(Gray),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    pub bold: bool,
    pub align: Align,
}

impl TextStyle {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            bold: false,
            align: Align::Left,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            bold: true,
            align: Align::Left,
        }
    }

    pub const fn centered(self) -> Self {
        Self {
            align: Align::Center,
            ..self
        }
    }
}

/// Fixed page geometry handed to a backend when a page is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("rendering backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize page: {0}")]
    Serialization(String),
}

/// Opens pages on a concrete rendering backend.
pub trait RenderBackend {
    type Drawer: PageDrawer;

    fn open_page(&self, spec: &PageSpec) -> Result<Self::Drawer, BackendError>;
}

/// Drawing primitives for a single open page.
///
/// Primitive calls are infallible once the page is open; only opening and
/// finishing can fail.
pub trait PageDrawer {
    /// Draw `text` with its baseline at `y`. For [`Align::Center`], `x` is the
    /// horizontal centre.
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    fn rect(&mut self, rect: Rect, paint: Paint);

    fn rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32);

    /// Place a raster scaled to fill `rect`.
    fn image(&mut self, raster: &CodeRaster, rect: Rect);

    /// Serialize the page into document bytes, consuming the drawer.
    fn finish(self) -> Result<Vec<u8>, BackendError>;
}

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Cap height as a fraction of the font size.
const CAP_HEIGHT: f32 = 0.72;

const ELLIPSIS: &str = "...";

fn char_advance(size_pt: f32, bold: bool) -> f32 {
    let em = if bold { 0.58 } else { 0.53 };
    size_pt * em * PT_TO_MM
}

/// Rough Helvetica advance width in millimetres, used for centring text.
pub fn estimate_text_width(text: &str, size_pt: f32, bold: bool) -> f32 {
    text.chars().count() as f32 * char_advance(size_pt, bold)
}

/// Estimated box covered by `text` drawn at (`x`, baseline `y`).
pub fn text_extent(text: &str, x: f32, y: f32, style: TextStyle) -> Rect {
    let width = estimate_text_width(text, style.size, style.bold);
    let height = style.size * CAP_HEIGHT * PT_TO_MM;
    let left = match style.align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
    };
    Rect::new(left, y - height, width, height)
}

/// Shorten `text` with a trailing ellipsis so it is at most `max_width` wide.
pub fn fit_text(text: &str, max_width: f32, style: TextStyle) -> String {
    if estimate_text_width(text, style.size, style.bold) <= max_width {
        return text.to_string();
    }

    let max_chars = (max_width.max(0.0) / char_advance(style.size, style.bold)).floor() as usize;
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }

    let kept: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, 12.0, 5.0, 5.0)));
    }

    #[test]
    fn test_text_width_grows_with_length() {
        let short = estimate_text_width("AB", 10.0, false);
        let long = estimate_text_width("ABCD", 10.0, false);
        assert!(long > short);
        assert!(estimate_text_width("AB", 10.0, true) > short);
    }

    #[test]
    fn test_fit_text_keeps_short_and_ellipsizes_long() {
        let style = TextStyle::regular(9.0);
        assert_eq!(fit_text("TUNIS", 30.0, style), "TUNIS");

        let fitted = fit_text("SIDI BOUZID GOUVERNORAT", 26.0, style);
        assert!(fitted.ends_with("..."));
        assert!(estimate_text_width(&fitted, style.size, style.bold) <= 26.0);

        assert_eq!(fit_text("ABCDEF", 0.0, style), "");
    }

    #[test]
    fn test_text_extent_for_centered_text() {
        let style = TextStyle::regular(10.0).centered();
        let extent = text_extent("ABCD", 100.0, 50.0, style);
        assert!((extent.center_x() - 100.0).abs() < 1e-4);
        assert!(extent.bottom() <= 50.0 + 1e-4);
        assert!(extent.y < 50.0);
    }
}
