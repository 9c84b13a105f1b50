use actix_web::{error, http::header, web, HttpResponse, Responder};
use std::fmt::Display;

use super::models::InvoiceData;
use super::traits::Validator;
use super::validation::ITEM_LENGTH_MISMATCH;
use crate::{AppState, ErrorResponse};

/// Filename handed to the client for invoice `number`.
pub fn invoice_filename(number: u64) -> String {
    format!("invoice_{}.pdf", number)
}

fn plain_error(message: impl Display) -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/plain")
        .body(format!("Error: {}", message))
}

#[utoipa::path(
    post,
    path = "/generate-invoice/",
    tag = "Invoice",
    request_body = InvoiceData,
    responses(
        (status = 200, description = "Invoice rendered as a PDF attachment", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Item lists differ in length, or the payload is malformed", content_type = "text/plain", body = String),
        (status = 500, description = "Rendering or counter failure", content_type = "text/plain", body = String)
    )
)]
pub async fn generate_invoice(
    state: web::Data<AppState>,
    payload: web::Json<InvoiceData>,
) -> impl Responder {
    let data = payload.into_inner();

    if let Err(errors) = data.validate() {
        log::warn!("Rejected invoice payload: {}", errors);
        return HttpResponse::BadRequest()
            .content_type("text/plain")
            .body(ITEM_LENGTH_MISMATCH);
    }

    let rows = data.item_count();
    let generator = state.generator.clone();
    let document = match web::block(move || generator.generate(&data)).await {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => {
            log::error!("Failed to render invoice: {}", e);
            return plain_error(e);
        }
        Err(e) => {
            log::error!("Invoice render task failed: {}", e);
            return plain_error(e);
        }
    };

    let counter = state.counter.clone();
    let number = match web::block(move || counter.next()).await {
        Ok(Ok(number)) => number,
        Ok(Err(e)) => {
            log::error!("Failed to advance invoice counter: {}", e);
            return plain_error(e);
        }
        Err(e) => {
            log::error!("Invoice counter task failed: {}", e);
            return plain_error(e);
        }
    };

    let filename = invoice_filename(number);
    log::info!(
        "Generated {} ({} item rows, {}x{} pt page, {} bytes)",
        filename,
        rows,
        document.width,
        document.height,
        document.pdf.len()
    );

    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", filename),
        ))
        .body(document.pdf)
}

/// JSON extractor settings: payload size cap and a JSON error body for
/// payloads that do not deserialize.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            log::warn!("Invalid invoice payload: {}", err);
            let body = ErrorResponse::bad_request(&err.to_string());
            error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/generate-invoice/", "/generate-invoice"])
            .route(web::post().to(generate_invoice)),
    );
}
