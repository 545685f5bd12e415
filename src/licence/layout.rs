//! Fixed page geometry and section definitions of the licence document.
//!
//! All values are millimetres on an A4 portrait page, top-left origin.

use serde::{Deserialize, Serialize};

use super::drawing::Rect;
use super::record::Field;
use super::section::{FieldRow, SectionSpec};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;

pub const FRAME: Rect = Rect::new(MARGIN, MARGIN, PAGE_WIDTH - 2.0 * MARGIN, PAGE_HEIGHT - 2.0 * MARGIN);
pub const CONTENT_X: f32 = MARGIN + 4.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * CONTENT_X;
pub const MIDLINE: f32 = PAGE_WIDTH / 2.0;

pub const LEFT_COLUMN: f32 = CONTENT_X + 2.0;
pub const RIGHT_COLUMN: f32 = MIDLINE + 3.0;
pub const LABEL_WIDTH: f32 = 33.0;
/// Clearance kept between a value and whatever sits to its right.
pub const COLUMN_GUTTER: f32 = 2.0;
pub const VALUE_LIMIT: f32 = CONTENT_X + CONTENT_WIDTH - COLUMN_GUTTER;

pub const BAND_HEIGHT: f32 = 7.0;
pub const BAND_SHADE: f32 = 0.85;
pub const ROW_HEIGHT: f32 = 6.0;
pub const SECTION_PADDING: f32 = 3.0;
pub const SECTION_GAP: f32 = 4.0;

pub const CODE_SIZE: f32 = 24.0;
pub const HEADER_CODE: Rect = Rect::new(CONTENT_X + CONTENT_WIDTH - CODE_SIZE, MARGIN + 3.0, CODE_SIZE, CODE_SIZE);
pub const IDENTITY_CODE_X: f32 = CONTENT_X + CONTENT_WIDTH - CODE_SIZE - 3.0;
pub const LETTERHEAD: Rect = Rect::new(CONTENT_X, MARGIN + 3.0, CONTENT_WIDTH - CODE_SIZE - 6.0, 26.0);

/// First cursor position below the letterhead and header code caption.
pub const BODY_TOP: f32 = MARGIN + 36.0;

pub const SIGNATURE_WIDTH: f32 = 70.0;
pub const SIGNATURE_HEIGHT: f32 = 34.0;
pub const SIGNATURE_RADIUS: f32 = 2.5;

/// Top of the footer strip; nothing from the body flow may reach it.
pub const FOOTER_TOP: f32 = PAGE_HEIGHT - MARGIN - 14.0;

static LICENCE_ROWS: [FieldRow; 6] = [
    FieldRow::new("Licence No", Field::LicenceNumber, LEFT_COLUMN),
    FieldRow::new("Club", Field::ClubName, LEFT_COLUMN),
    FieldRow::new("Code club", Field::ClubCode, LEFT_COLUMN),
    FieldRow::new("Ligue", Field::League, RIGHT_COLUMN),
    FieldRow::new("Categorie", Field::Category, RIGHT_COLUMN),
    FieldRow::new("Regime", Field::Regime, RIGHT_COLUMN),
];

static IDENTITY_ROWS: [FieldRow; 7] = [
    FieldRow::new("Nom", Field::LastName, LEFT_COLUMN),
    FieldRow::new("Prenom", Field::FirstName, LEFT_COLUMN),
    FieldRow::new("Date de naissance", Field::DateOfBirth, LEFT_COLUMN),
    FieldRow::new("Adresse", Field::Address, LEFT_COLUMN),
    FieldRow::new("Lieu de naissance", Field::PlaceOfBirth, RIGHT_COLUMN),
    FieldRow::new("Nationalite", Field::Nationality, RIGHT_COLUMN),
    FieldRow::new("Piece d'identite", Field::IdNumber, RIGHT_COLUMN),
];

static CONTRACT_ROWS: [FieldRow; 4] = [
    FieldRow::new("Type", Field::ContractType, LEFT_COLUMN),
    FieldRow::new("Debut", Field::ContractStart, LEFT_COLUMN),
    FieldRow::new("Signe le", Field::SignatureDate, RIGHT_COLUMN),
    FieldRow::new("Fin", Field::ContractEnd, RIGHT_COLUMN),
];

static MEDICAL_ROWS: [FieldRow; 4] = [
    FieldRow::new("Medecin", Field::MedicalReviewer, LEFT_COLUMN),
    FieldRow::new("Date visite", Field::MedicalExamDate, LEFT_COLUMN),
    FieldRow::new("Resultat", Field::MedicalResult, RIGHT_COLUMN),
    FieldRow::new("Groupe sanguin", Field::BloodGroup, RIGHT_COLUMN),
];

pub static LICENCE_SECTION: SectionSpec = SectionSpec {
    title: "LICENCE / AFFILIATION",
    rows: &LICENCE_ROWS,
    min_body_height: 0.0,
    right_value_limit: VALUE_LIMIT,
};

/// Hosts the identity code on its right edge, so the body is at least as tall
/// as the code and its caption, and right-column values stop short of it.
pub static IDENTITY_SECTION: SectionSpec = SectionSpec {
    title: "IDENTITE DU JOUEUR",
    rows: &IDENTITY_ROWS,
    min_body_height: CODE_SIZE + 8.0,
    right_value_limit: IDENTITY_CODE_X - COLUMN_GUTTER,
};

pub static CONTRACT_SECTION: SectionSpec = SectionSpec {
    title: "CONTRAT",
    rows: &CONTRACT_ROWS,
    min_body_height: 0.0,
    right_value_limit: VALUE_LIMIT,
};

pub static MEDICAL_SECTION: SectionSpec = SectionSpec {
    title: "CONTROLE MEDICAL",
    rows: &MEDICAL_ROWS,
    min_body_height: 0.0,
    right_value_limit: VALUE_LIMIT,
};

/// Body sections in rendering order.
pub static SECTIONS: [&SectionSpec; 4] = [
    &LICENCE_SECTION,
    &IDENTITY_SECTION,
    &CONTRACT_SECTION,
    &MEDICAL_SECTION,
];

/// Index of the identity block within [`SECTIONS`].
pub const IDENTITY_INDEX: usize = 1;

/// Code area inside the identity block body.
pub fn identity_code_rect(body: &Rect) -> Rect {
    Rect::new(IDENTITY_CODE_X, body.y + 2.0, CODE_SIZE, CODE_SIZE)
}

/// The two signature boxes and the footer code between them, below `top`.
pub fn signature_area(top: f32) -> (Rect, Rect, Rect) {
    let y = top + 2.0;
    let player = Rect::new(CONTENT_X, y, SIGNATURE_WIDTH, SIGNATURE_HEIGHT);
    let club = Rect::new(
        CONTENT_X + CONTENT_WIDTH - SIGNATURE_WIDTH,
        y,
        SIGNATURE_WIDTH,
        SIGNATURE_HEIGHT,
    );
    let code = Rect::new(MIDLINE - CODE_SIZE / 2.0, y + 3.0, CODE_SIZE, CODE_SIZE);
    (player, club, code)
}

/// Organisation text printed in the letterhead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letterhead {
    pub organisation: String,
    pub title: String,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            organisation: "FEDERATION SPORTIVE".to_string(),
            title: "LICENCE JOUEUR".to_string(),
        }
    }
}
