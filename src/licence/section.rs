//! Renders one labelled section band and its field rows.

use super::cursor::LayoutCursor;
use super::drawing::{fit_text, Gray, PageDrawer, Paint, Rect, TextStyle};
use super::layout::{
    BAND_HEIGHT, BAND_SHADE, COLUMN_GUTTER, CONTENT_WIDTH, CONTENT_X, LABEL_WIDTH, MIDLINE,
    ROW_HEIGHT, SECTION_GAP, SECTION_PADDING,
};
use super::record::{Field, Record};
use super::resolver::{FieldResolver, ResolutionReport};

const TITLE_STYLE: TextStyle = TextStyle::bold(10.0);
pub const LABEL_STYLE: TextStyle = TextStyle::bold(8.5);
pub const VALUE_STYLE: TextStyle = TextStyle::regular(9.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    pub fn of(x: f32) -> Self {
        if x < MIDLINE {
            Column::Left
        } else {
            Column::Right
        }
    }
}

/// One "label: value" line at an explicit page x offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRow {
    pub label: &'static str,
    pub field: Field,
    pub column_offset: f32,
}

impl FieldRow {
    pub const fn new(label: &'static str, field: Field, column_offset: f32) -> Self {
        Self {
            label,
            field,
            column_offset,
        }
    }

    pub fn column(&self) -> Column {
        Column::of(self.column_offset)
    }
}

/// A fixed section: title plus ordered rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpec {
    pub title: &'static str,
    pub rows: &'static [FieldRow],
    /// Reserved body height, for sections that host other content.
    pub min_body_height: f32,
    /// Right edge available to right-column values.
    pub right_value_limit: f32,
}

impl SectionSpec {
    /// Rows in the tallest column.
    pub fn line_count(&self) -> usize {
        let left = self
            .rows
            .iter()
            .filter(|row| row.column() == Column::Left)
            .count();
        left.max(self.rows.len() - left)
    }

    pub fn body_height(&self) -> f32 {
        (self.line_count() as f32 * ROW_HEIGHT + SECTION_PADDING).max(self.min_body_height)
    }

    /// Width a row's value may take before it is cut with an ellipsis.
    pub fn value_width(&self, row: &FieldRow) -> f32 {
        let limit = match row.column() {
            Column::Left => MIDLINE - COLUMN_GUTTER,
            Column::Right => self.right_value_limit,
        };
        (limit - (row.column_offset + LABEL_WIDTH)).max(0.0)
    }

    /// Height consumed on the page, including the gap before the next section.
    pub fn consumed_height(&self) -> f32 {
        BAND_HEIGHT + self.body_height() + SECTION_GAP
    }
}

/// Where a section ended up on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionPlacement {
    pub band: Rect,
    pub body: Rect,
}

pub struct SectionRenderer<'a> {
    resolver: &'a FieldResolver,
    record: &'a Record,
}

impl<'a> SectionRenderer<'a> {
    pub fn new(resolver: &'a FieldResolver, record: &'a Record) -> Self {
        Self { resolver, record }
    }

    /// Draw `spec` at the cursor and advance the cursor past it.
    pub fn render<D: PageDrawer>(
        &self,
        drawer: &mut D,
        spec: &SectionSpec,
        cursor: &mut LayoutCursor,
        report: &mut ResolutionReport,
    ) -> SectionPlacement {
        let top = cursor.position();
        let band = Rect::new(CONTENT_X, top, CONTENT_WIDTH, BAND_HEIGHT);
        let body = Rect::new(CONTENT_X, band.bottom(), CONTENT_WIDTH, spec.body_height());

        drawer.rect(band, Paint::FillStroke(Gray(BAND_SHADE)));
        drawer.text(spec.title, band.x + 3.0, band.y + 5.0, TITLE_STYLE);
        drawer.rect(body, Paint::Stroke);

        let mut left_rows = 0usize;
        let mut right_rows = 0usize;
        for row in spec.rows {
            let line = match row.column() {
                Column::Left => &mut left_rows,
                Column::Right => &mut right_rows,
            };
            *line += 1;
            let baseline = body.y + *line as f32 * ROW_HEIGHT - 1.5;

            let resolved = self.resolver.resolve(self.record, row.field);
            report.record(&resolved);

            drawer.text(
                &format!("{}:", row.label),
                row.column_offset,
                baseline,
                LABEL_STYLE,
            );
            drawer.text(
                &fit_text(&resolved.value, spec.value_width(row), VALUE_STYLE),
                row.column_offset + LABEL_WIDTH,
                baseline,
                VALUE_STYLE,
            );
        }

        cursor.advance(spec.consumed_height());
        SectionPlacement { band, body }
    }
}
