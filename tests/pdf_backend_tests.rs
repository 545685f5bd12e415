mod common;

use common::fixed_time;
use licence_docs_server::licence::layout::Letterhead;
use licence_docs_server::licence::{
    DefaultTable, DocumentAssembler, Field, PdfBackend, QrRasterizer, Record,
};
use std::sync::Arc;

fn pdf_assembler() -> DocumentAssembler<PdfBackend> {
    DocumentAssembler::new(
        PdfBackend,
        Arc::new(DefaultTable::builtin()),
        Arc::new(QrRasterizer::default()),
        Letterhead::default(),
    )
}

#[tokio::test]
async fn test_pdf_backend_produces_pdf_bytes() {
    let record = Record::new()
        .with(Field::LastName, "Ben Salah")
        .with(Field::FirstName, "Youssef")
        .with(Field::DateOfBirth, "2009-06-01")
        .with(Field::RequestId, "DEM-2025-0042");

    let artifact = pdf_assembler().build_at(&record, &fixed_time()).await.unwrap();

    assert!(artifact.bytes().starts_with(b"%PDF"));
    assert_eq!(artifact.mime_type(), "application/pdf");
    assert_eq!(artifact.filename(), "licence_Ben_Salah_20250701_093000.pdf");
    assert_eq!(artifact.report().embed_failures(), 0);
}

#[tokio::test]
async fn test_artifact_can_be_written_by_caller() {
    let artifact = pdf_assembler()
        .build_at(&Record::new(), &fixed_time())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(artifact.filename());
    std::fs::write(&path, artifact.bytes()).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, artifact.into_bytes());
}
