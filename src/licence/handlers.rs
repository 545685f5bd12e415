//! HTTP endpoints for licence documents.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use std::collections::BTreeMap;

use super::record::Record;
use super::AssemblyError;
use crate::{AppState, ErrorResponse};

/// Response header carrying the number of codes left blank.
pub const EMBED_FAILURES_HEADER: &str = "X-Embed-Failures";

#[utoipa::path(
    post,
    path = "/api/licences/document",
    tag = "Licence",
    request_body = Record,
    responses(
        (status = 200, description = "Generated licence document", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Malformed record"),
        (status = 500, description = "Document could not be serialized", body = ErrorResponse),
        (status = 503, description = "Rendering backend unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_document(
    state: web::Data<AppState>,
    record: web::Json<Record>,
) -> impl Responder {
    let record = record.into_inner();

    match state.assembler.build(&record).await {
        Ok(artifact) => {
            let failures = artifact.report().embed_failures();
            HttpResponse::Ok()
                .content_type(artifact.mime_type())
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(artifact.filename().to_string())],
                })
                .insert_header((EMBED_FAILURES_HEADER, failures.to_string()))
                .body(artifact.into_bytes())
        }
        Err(AssemblyError::BackendUnavailable(reason)) => {
            HttpResponse::ServiceUnavailable().json(ErrorResponse::service_unavailable(&reason))
        }
        Err(err @ AssemblyError::SerializationFailed(_)) => {
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/licences/defaults",
    tag = "Licence",
    responses(
        (status = 200, description = "Fallback value of every field", body = BTreeMap<String, String>)
    )
)]
pub async fn get_defaults(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.assembler.resolver().defaults().to_map())
}

/// Register licence routes under the caller's scope.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/licences/document").route(web::post().to(generate_document)))
        .service(web::resource("/licences/defaults").route(web::get().to(get_defaults)));
}
