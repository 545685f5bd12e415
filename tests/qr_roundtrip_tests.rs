use licence_docs_server::licence::drawing::Rect;
use licence_docs_server::licence::embedder::{CodeEmbedRequest, CodeRaster, CodeRasterizer};
use licence_docs_server::licence::layout::CODE_SIZE;
use licence_docs_server::licence::QrRasterizer;

fn scan(raster: &CodeRaster) -> String {
    let mut image = rqrr::PreparedImage::prepare_from_greyscale(
        raster.width as usize,
        raster.height as usize,
        |x, y| raster.pixel(x as u32, y as u32).unwrap_or(255),
    );
    let grids = image.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one code in raster");
    let (_meta, content) = grids[0].decode().expect("decodable code");
    content
}

#[tokio::test]
async fn test_embedded_payloads_scan_back_exactly() {
    let rasterizer = QrRasterizer::default();
    let rect = Rect::new(0.0, 0.0, CODE_SIZE, CODE_SIZE);

    for payload in ["DEM-2025-0001", "00000000", "LIC-123456", "12345678901234567890"] {
        let request = CodeEmbedRequest::new(payload, rect);
        let raster = rasterizer
            .rasterize(&request.payload, request.pixel_width())
            .await
            .unwrap();
        assert!(raster.width >= request.pixel_width());
        assert_eq!(scan(&raster), payload);
    }
}
