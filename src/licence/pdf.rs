//! printpdf-backed rendering backend.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Greyscale, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
    Polygon, Px,
};

use super::drawing::{
    text_extent, BackendError, PageDrawer, PageSpec, Paint, Rect, RenderBackend, TextStyle,
};
use super::embedder::CodeRaster;

/// Outline thickness in points.
const OUTLINE_PT: f32 = 0.8;

/// Line segments per rounded corner.
const ARC_SEGMENTS: usize = 6;

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfBackend;

impl RenderBackend for PdfBackend {
    type Drawer = PdfPageDrawer;

    fn open_page(&self, spec: &PageSpec) -> Result<PdfPageDrawer, BackendError> {
        let (doc, page, layer) = PdfDocument::new(
            spec.title.as_str(),
            Mm(spec.width),
            Mm(spec.height),
            "Layer 1",
        );

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        let layer = doc.get_page(page).get_layer(layer);
        layer.set_outline_color(Color::Greyscale(Greyscale::new(0.0, None)));
        layer.set_outline_thickness(OUTLINE_PT);

        Ok(PdfPageDrawer {
            doc,
            layer,
            regular,
            bold,
            page_height: spec.height,
        })
    }
}

pub struct PdfPageDrawer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page_height: f32,
}

impl PdfPageDrawer {
    /// Top-left page millimetres to a PDF point (bottom-left origin).
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(Mm(x), Mm(self.page_height - y))
    }

    fn paint_polygon(&self, points: Vec<(Point, bool)>, paint: Paint) {
        let mode = match paint {
            Paint::Stroke => PaintMode::Stroke,
            Paint::Fill(gray) => {
                self.layer
                    .set_fill_color(Color::Greyscale(Greyscale::new(gray.0, None)));
                PaintMode::Fill
            }
            Paint::FillStroke(gray) => {
                self.layer
                    .set_fill_color(Color::Greyscale(Greyscale::new(gray.0, None)));
                PaintMode::FillStroke
            }
        };

        self.layer.add_polygon(Polygon {
            rings: vec![points],
            mode,
            winding_order: WindingOrder::NonZero,
        });

        // Text is drawn with the fill colour, so reset it to black.
        self.layer
            .set_fill_color(Color::Greyscale(Greyscale::new(0.0, None)));
    }
}

impl PageDrawer for PdfPageDrawer {
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let font = if style.bold { &self.bold } else { &self.regular };
        let left = text_extent(text, x, y, style).x;
        self.layer.use_text(
            text,
            style.size,
            Mm(left),
            Mm(self.page_height - y),
            font,
        );
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        let points = vec![
            (self.point(rect.x, rect.y), false),
            (self.point(rect.right(), rect.y), false),
            (self.point(rect.right(), rect.bottom()), false),
            (self.point(rect.x, rect.bottom()), false),
        ];
        self.paint_polygon(points, paint);
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        let r = radius.max(0.0).min(rect.width / 2.0).min(rect.height / 2.0);
        if r <= f32::EPSILON {
            self.rect(rect, paint);
            return;
        }

        // Corner centres clockwise from top-left, with the start angle of each
        // quarter arc in page space (y down).
        let corners = [
            (rect.x + r, rect.y + r, std::f32::consts::PI),
            (rect.right() - r, rect.y + r, 1.5 * std::f32::consts::PI),
            (rect.right() - r, rect.bottom() - r, 0.0),
            (rect.x + r, rect.bottom() - r, 0.5 * std::f32::consts::PI),
        ];

        let mut points = Vec::with_capacity(corners.len() * (ARC_SEGMENTS + 1));
        for (cx, cy, start) in corners {
            for step in 0..=ARC_SEGMENTS {
                let angle = start + (step as f32 / ARC_SEGMENTS as f32) * std::f32::consts::FRAC_PI_2;
                points.push((self.point(cx + r * angle.cos(), cy + r * angle.sin()), false));
            }
        }
        self.paint_polygon(points, paint);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32) {
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (self.point(from.0, from.1), false),
                (self.point(to.0, to.1), false),
            ],
            is_closed: false,
        });
        self.layer.set_outline_thickness(OUTLINE_PT);
    }

    fn image(&mut self, raster: &CodeRaster, rect: Rect) {
        let image = Image::from(ImageXObject {
            width: Px(raster.width as usize),
            height: Px(raster.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: raster.to_rgb(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // DPI that maps the raster width onto the rectangle width.
        let dpi = raster.width as f32 / (rect.width / 25.4);

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(rect.x)),
                translate_y: Some(Mm(self.page_height - rect.bottom())),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    fn finish(self) -> Result<Vec<u8>, BackendError> {
        let PdfPageDrawer { doc, layer, .. } = self;
        drop(layer);
        doc.save_to_bytes()
            .map_err(|e| BackendError::Serialization(e.to_string()))
    }
}
