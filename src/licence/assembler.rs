//! Orchestrates one licence document build.
//!
//! A build walks `Init → FrameDrawn → HeaderEmbedded → SectionsRendered(n/N)
//! → FooterEmbedded → Finalized`. Only opening the page and serializing it can
//! fail; field resolution and code embedding degrade instead.

use chrono::{DateTime, Local, TimeZone};
use std::fmt;
use std::sync::Arc;

use super::cursor::LayoutCursor;
use super::drawing::{
    fit_text, BackendError, Gray, PageDrawer, PageSpec, Paint, RenderBackend, TextStyle,
};
use super::embedder::{CodeEmbedRequest, CodeEmbedder, CodeRasterizer, EmbedResult};
use super::filename::artifact_filename;
use super::layout::{
    identity_code_rect, signature_area, Letterhead, BODY_TOP, CONTENT_WIDTH, CONTENT_X,
    FOOTER_TOP, FRAME, HEADER_CODE, IDENTITY_INDEX, LETTERHEAD, PAGE_HEIGHT, PAGE_WIDTH,
    SECTIONS, SECTION_GAP, SIGNATURE_RADIUS,
};
use super::record::{DefaultTable, Field, Record};
use super::resolver::{FieldResolver, ResolutionReport, ResolvedField, DISPLAY_DATE_FORMAT};
use super::section::{SectionPlacement, SectionRenderer};
use super::{Artifact, AssemblyError};

const ARTIFACT_PREFIX: &str = "licence";

const ORGANISATION_STYLE: TextStyle = TextStyle::bold(13.0);
const TITLE_STYLE: TextStyle = TextStyle::bold(11.0);
const SEASON_STYLE: TextStyle = TextStyle::regular(9.0);
const ISSUED_STYLE: TextStyle = TextStyle::regular(8.0);
const FOOTER_STYLE: TextStyle = TextStyle::regular(7.0).centered();

/// Left inset of letterhead text.
const LETTERHEAD_INSET: f32 = 4.0;
/// Width reserved at the right of the letterhead for the issue date.
const ISSUED_WIDTH: f32 = 40.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Init,
    FrameDrawn,
    HeaderEmbedded,
    SectionsRendered { done: usize, total: usize },
    FooterEmbedded,
    Finalized,
    Failed(String),
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Init => write!(f, "init"),
            BuildState::FrameDrawn => write!(f, "frame drawn"),
            BuildState::HeaderEmbedded => write!(f, "header embedded"),
            BuildState::SectionsRendered { done, total } => {
                write!(f, "sections rendered ({done}/{total})")
            }
            BuildState::FooterEmbedded => write!(f, "footer embedded"),
            BuildState::Finalized => write!(f, "finalized"),
            BuildState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// What happened during a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub states: Vec<BuildState>,
    /// One entry per code, in issue order: header, identity, footer.
    pub embeds: Vec<EmbedResult>,
    pub resolution: ResolutionReport,
}

impl BuildReport {
    fn new() -> Self {
        Self {
            states: vec![BuildState::Init],
            embeds: Vec::with_capacity(3),
            resolution: ResolutionReport::default(),
        }
    }

    fn enter(&mut self, state: BuildState) {
        log::debug!("licence build: {}", state);
        self.states.push(state);
    }

    /// Record the terminal `Failed` state and turn the backend error into the
    /// build error.
    fn fail(&mut self, request_id: &str, error: BackendError) -> AssemblyError {
        self.enter(BuildState::Failed(error.to_string()));
        let trail: Vec<String> = self.states.iter().map(ToString::to_string).collect();
        log::error!(
            "licence document {} failed: {} (states: {})",
            request_id,
            error,
            trail.join(" -> ")
        );
        AssemblyError::from(error)
    }

    pub fn final_state(&self) -> Option<&BuildState> {
        self.states.last()
    }

    pub fn embed_failures(&self) -> usize {
        self.embeds.iter().filter(|result| result.is_err()).count()
    }
}

pub struct DocumentAssembler<B: RenderBackend> {
    backend: B,
    resolver: FieldResolver,
    embedder: CodeEmbedder,
    letterhead: Letterhead,
}

impl<B: RenderBackend> DocumentAssembler<B> {
    pub fn new(
        backend: B,
        defaults: Arc<DefaultTable>,
        rasterizer: Arc<dyn CodeRasterizer>,
        letterhead: Letterhead,
    ) -> Self {
        Self {
            backend,
            resolver: FieldResolver::new(defaults),
            embedder: CodeEmbedder::new(rasterizer),
            letterhead,
        }
    }

    pub fn resolver(&self) -> &FieldResolver {
        &self.resolver
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn build(&self, record: &Record) -> Result<Artifact, AssemblyError> {
        self.build_at(record, &Local::now()).await
    }

    /// Build with an explicit issue time, which drives the printed date and
    /// the artifact filename.
    pub async fn build_at<Tz: TimeZone>(
        &self,
        record: &Record,
        at: &DateTime<Tz>,
    ) -> Result<Artifact, AssemblyError>
    where
        Tz::Offset: fmt::Display,
    {
        let unknown = record.unknown_keys();
        if !unknown.is_empty() {
            log::debug!("ignoring unknown record keys: {}", unknown.join(", "));
        }

        let mut report = BuildReport::new();
        let issued_on = at.format(DISPLAY_DATE_FORMAT).to_string();

        let request_id = self.resolve(record, Field::RequestId, &mut report.resolution);
        let season = self.resolve(record, Field::Season, &mut report.resolution);

        let page = PageSpec {
            title: format!("{} {}", self.letterhead.title, request_id.value),
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
        };
        let mut drawer = self
            .backend
            .open_page(&page)
            .map_err(|e| report.fail(&request_id.value, e))?;

        self.draw_frame(&mut drawer, &season.value, &issued_on);
        report.enter(BuildState::FrameDrawn);

        let header = CodeEmbedRequest::new(request_id.value.clone(), HEADER_CODE);
        let embedded = self.embedder.embed(&mut drawer, &header).await;
        report.embeds.push(embedded);
        report.enter(BuildState::HeaderEmbedded);

        let mut cursor = LayoutCursor::new(BODY_TOP);
        let renderer = SectionRenderer::new(&self.resolver, record);
        let mut placements: Vec<SectionPlacement> = Vec::with_capacity(SECTIONS.len());
        for (index, section) in SECTIONS.iter().enumerate() {
            placements.push(renderer.render(&mut drawer, section, &mut cursor, &mut report.resolution));
            report.enter(BuildState::SectionsRendered {
                done: index + 1,
                total: SECTIONS.len(),
            });
        }

        let id_number = self.resolve(record, Field::IdNumber, &mut report.resolution);
        let licence_number = self.resolve(record, Field::LicenceNumber, &mut report.resolution);
        let (player_box, club_box, footer_rect) = signature_area(cursor.position());

        let identity = CodeEmbedRequest::new(
            id_number.value,
            identity_code_rect(&placements[IDENTITY_INDEX].body),
        );
        let footer = CodeEmbedRequest::new(licence_number.value, footer_rect);

        // Disjoint rectangles: generate both rasters together, then place them
        // one after the other on the single drawer.
        let (identity_raster, footer_raster) = futures::join!(
            self.embedder.rasterize(&identity),
            self.embedder.rasterize(&footer)
        );
        report
            .embeds
            .push(self.embedder.place(&mut drawer, &identity, identity_raster));

        for (signature, caption) in [
            (player_box, "Signature du joueur"),
            (club_box, "Cachet et signature du club"),
        ] {
            drawer.rounded_rect(signature, SIGNATURE_RADIUS, Paint::Stroke);
            drawer.text(
                caption,
                signature.center_x(),
                signature.y + 5.0,
                TextStyle::bold(8.0).centered(),
            );
        }
        report
            .embeds
            .push(self.embedder.place(&mut drawer, &footer, footer_raster));

        let end = cursor.advance(player_box.bottom() - cursor.position() + SECTION_GAP);
        if end > FOOTER_TOP {
            log::warn!(
                "licence body ends at {:.1}mm, past the footer strip at {:.1}mm",
                end,
                FOOTER_TOP
            );
        }
        self.draw_footer(&mut drawer, &request_id.value, &issued_on);
        report.enter(BuildState::FooterEmbedded);

        let bytes = drawer
            .finish()
            .map_err(|e| report.fail(&request_id.value, e))?;
        report.enter(BuildState::Finalized);

        let last_name = self.resolver.resolve(record, Field::LastName);
        let filename = artifact_filename(ARTIFACT_PREFIX, &last_name.value, at, "pdf");

        if report.embed_failures() > 0 {
            log::warn!(
                "licence document {} built with {} missing code(s)",
                filename,
                report.embed_failures()
            );
        }
        log::info!("licence document {} built ({} bytes)", filename, bytes.len());

        Ok(Artifact::new(filename, bytes, issued_on, report))
    }

    fn resolve(&self, record: &Record, field: Field, report: &mut ResolutionReport) -> ResolvedField {
        let resolved = self.resolver.resolve(record, field);
        report.record(&resolved);
        resolved
    }

    fn draw_frame(&self, drawer: &mut B::Drawer, season: &str, issued_on: &str) {
        let x = LETTERHEAD.x + LETTERHEAD_INSET;
        let full_width = LETTERHEAD.width - 2.0 * LETTERHEAD_INSET;
        let issued_x = LETTERHEAD.right() - ISSUED_WIDTH;

        drawer.rect(FRAME, Paint::Stroke);
        drawer.rounded_rect(LETTERHEAD, 3.0, Paint::FillStroke(Gray(0.96)));
        drawer.text(
            &fit_text(&self.letterhead.organisation, full_width, ORGANISATION_STYLE),
            x,
            LETTERHEAD.y + 8.0,
            ORGANISATION_STYLE,
        );
        drawer.text(
            &fit_text(&self.letterhead.title, full_width, TITLE_STYLE),
            x,
            LETTERHEAD.y + 15.0,
            TITLE_STYLE,
        );
        drawer.text(
            &fit_text(&format!("Saison {season}"), issued_x - x - 2.0, SEASON_STYLE),
            x,
            LETTERHEAD.y + 21.5,
            SEASON_STYLE,
        );
        drawer.text(
            &fit_text(
                &format!("Edite le {issued_on}"),
                ISSUED_WIDTH - LETTERHEAD_INSET,
                ISSUED_STYLE,
            ),
            issued_x,
            LETTERHEAD.y + 21.5,
            ISSUED_STYLE,
        );
    }

    fn draw_footer(&self, drawer: &mut B::Drawer, request_id: &str, issued_on: &str) {
        let y = FOOTER_TOP + 3.0;
        drawer.line((CONTENT_X, y), (CONTENT_X + CONTENT_WIDTH, y), 0.5);
        drawer.text(
            &fit_text(
                &format!("Document genere le {issued_on} - Ref. {request_id}"),
                CONTENT_WIDTH,
                FOOTER_STYLE,
            ),
            CONTENT_X + CONTENT_WIDTH / 2.0,
            y + 6.0,
            FOOTER_STYLE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::licence::embedder::QrRasterizer;
    use crate::licence::recording::RecordingBackend;
    use chrono::Utc;

    fn assembler(backend: RecordingBackend) -> DocumentAssembler<RecordingBackend> {
        DocumentAssembler::new(
            backend,
            Arc::new(DefaultTable::builtin()),
            Arc::new(QrRasterizer::default()),
            Letterhead::default(),
        )
    }

    #[tokio::test]
    async fn test_build_walks_every_state_in_order() {
        let at = Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap();
        let artifact = assembler(RecordingBackend::new())
            .build_at(&Record::new(), &at)
            .await
            .unwrap();

        let states = &artifact.report().states;
        assert_eq!(states.first(), Some(&BuildState::Init));
        assert_eq!(states[1], BuildState::FrameDrawn);
        assert_eq!(states[2], BuildState::HeaderEmbedded);
        for n in 1..=SECTIONS.len() {
            assert_eq!(
                states[2 + n],
                BuildState::SectionsRendered {
                    done: n,
                    total: SECTIONS.len()
                }
            );
        }
        assert_eq!(states[states.len() - 2], BuildState::FooterEmbedded);
        assert_eq!(artifact.report().final_state(), Some(&BuildState::Finalized));
        assert_eq!(artifact.issued_on(), "01/07/2025");
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_before_layout() {
        let result = assembler(RecordingBackend::unavailable())
            .build(&Record::new())
            .await;
        assert!(matches!(result, Err(AssemblyError::BackendUnavailable(_))));
    }

    #[test]
    fn test_failure_is_recorded_as_final_state() {
        let mut report = BuildReport::new();
        report.enter(BuildState::FrameDrawn);

        let error = report.fail(
            "DEM-1",
            BackendError::Serialization("disk full".to_string()),
        );

        assert!(matches!(error, AssemblyError::SerializationFailed(_)));
        assert_eq!(
            report.final_state(),
            Some(&BuildState::Failed(
                "failed to serialize page: disk full".to_string()
            ))
        );
        assert_eq!(report.states.len(), 3);
    }

    #[tokio::test]
    async fn test_serialization_failure_returns_no_artifact() {
        let result = assembler(RecordingBackend::failing_serialization())
            .build(&Record::new())
            .await;
        assert!(matches!(result, Err(AssemblyError::SerializationFailed(_))));
    }
}
