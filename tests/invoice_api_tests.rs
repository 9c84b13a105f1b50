use std::path::Path;
use std::sync::Arc;

use actix_web::{http::header, http::StatusCode, test, web, App};
use image::{Rgb, RgbImage};
use proforma_invoice_server::invoice::handlers::json_config;
use proforma_invoice_server::invoice::render::{load_font, FALLBACK_FONTS};
use proforma_invoice_server::invoice::{
    GeneratedDocument, Generator, GeneratorError, InvoiceCounter, InvoiceData, InvoiceRenderEngine,
};
use proforma_invoice_server::{configure, AppState};
use serde_json::Value;
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/invoice.json");
const STUB_PDF: &[u8] = b"%PDF-1.5 stub";

struct StubGenerator;

impl Generator<InvoiceData> for StubGenerator {
    fn generate(&self, _request: &InvoiceData) -> Result<GeneratedDocument, GeneratorError> {
        Ok(GeneratedDocument {
            pdf: STUB_PDF.to_vec(),
            width: 10,
            height: 10,
        })
    }
}

struct FailingGenerator;

impl Generator<InvoiceData> for FailingGenerator {
    fn generate(&self, _request: &InvoiceData) -> Result<GeneratedDocument, GeneratorError> {
        Err(GeneratorError::Pdf("page tree rejected".to_string()))
    }
}

fn fixture() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

fn state(generator: Arc<dyn Generator<InvoiceData> + Send + Sync>, dir: &TempDir) -> AppState {
    AppState::new(generator, InvoiceCounter::new(dir.path().join("counter.txt")))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(json_config(1024 * 1024))
                .configure(configure),
        )
        .await
    };
}

fn counter_contents(dir: &TempDir) -> Option<String> {
    std::fs::read_to_string(dir.path().join("counter.txt")).ok()
}

fn content_disposition(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[actix_web::test]
async fn test_generate_invoice_returns_numbered_pdf() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    for expected in 1..=2 {
        let req = test::TestRequest::post()
            .uri("/generate-invoice/")
            .set_json(fixture())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            content_disposition(&resp),
            format!("attachment; filename=invoice_{}.pdf", expected)
        );
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), STUB_PDF);
    }

    assert_eq!(counter_contents(&dir).as_deref(), Some("3"));
}

#[actix_web::test]
async fn test_path_without_trailing_slash() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let req = test::TestRequest::post()
        .uri("/generate-invoice")
        .set_json(fixture())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_disposition(&resp), "attachment; filename=invoice_1.pdf");
}

#[actix_web::test]
async fn test_mismatched_item_lists_rejected_without_consuming_number() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let mut payload = fixture();
    payload["Rates"] = serde_json::json!([12.5]);
    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"Error: All item lists must have the same length.");
    assert_eq!(counter_contents(&dir), None);
}

#[actix_web::test]
async fn test_empty_item_lists_are_accepted() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let mut payload = fixture();
    for field in ["HS_Codes", "Marks_and_Nos", "Packages", "Descriptions", "Quantities", "Rates"] {
        payload[field] = serde_json::json!([]);
    }
    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_generator_failure_is_plain_500() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(FailingGenerator), &dir));

    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(fixture())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Error: "));
    assert!(text.contains("page tree rejected"));
    assert_eq!(counter_contents(&dir), None);
}

#[actix_web::test]
async fn test_corrupt_counter_is_plain_500() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("counter.txt"), "not a number").unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(fixture())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"Error: "));
    assert_eq!(counter_contents(&dir).as_deref(), Some("not a number"));
}

#[actix_web::test]
async fn test_whole_float_quantities_are_accepted() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let mut payload = fixture();
    payload["Quantities"] = serde_json::json!([10.0, 3.0]);
    payload["Total_Quantity"] = serde_json::json!(13.0);
    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_disposition(&resp), "attachment; filename=invoice_1.pdf");
}

#[actix_web::test]
async fn test_fractional_quantity_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let mut payload = fixture();
    payload["Quantities"] = serde_json::json!([10.5, 3]);
    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(counter_contents(&dir), None);
}

#[actix_web::test]
async fn test_zero_counter_issues_invoice_zero() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("counter.txt"), "0").unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(fixture())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_disposition(&resp), "attachment; filename=invoice_0.pdf");
    assert_eq!(counter_contents(&dir).as_deref(), Some("1"));
}

#[actix_web::test]
async fn test_exhausted_counter_is_plain_500() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("counter.txt"), u64::MAX.to_string()).unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(fixture())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"Error: "));
    assert_eq!(counter_contents(&dir), Some(u64::MAX.to_string()));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ \"Exporter\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
}

#[actix_web::test]
async fn test_missing_field_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let mut payload = fixture();
    payload.as_object_mut().unwrap().remove("Exporter");
    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("Exporter"));
}

#[actix_web::test]
async fn test_openapi_document_lists_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = app!(state(Arc::new(StubGenerator), &dir));

    let req = test::TestRequest::get().uri("/api-doc/openapi.json").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["paths"]["/generate-invoice/"]["post"].is_object());
    assert!(body["components"]["schemas"]["InvoiceData"].is_object());
}

#[actix_web::test]
async fn test_real_engine_produces_pdf() {
    let Some(font) = FALLBACK_FONTS
        .iter()
        .find_map(|candidate| load_font(Path::new(candidate)).ok())
    else {
        eprintln!("skipping: no system font available");
        return;
    };

    let dir = TempDir::new().unwrap();
    let template = RgbImage::from_pixel(1800, 2600, Rgb([255, 255, 255]));
    let engine = InvoiceRenderEngine::new(template, font, 30.0);
    let app = app!(state(Arc::new(engine), &dir));

    let req = test::TestRequest::post()
        .uri("/generate-invoice/")
        .set_json(fixture())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));

    let document = lopdf::Document::load_mem(&body).unwrap();
    assert_eq!(document.get_pages().len(), 1);
}
