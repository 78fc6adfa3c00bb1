//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use dataroom_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dataroom Upload API",
        version = "0.1.0",
        description = "Anonymous file uploads returning public URLs, raw object writes and public object serving."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::upload::upload_investment_logo,
        handlers::object::write_object,
        handlers::object::get_public_object,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::ObjectWriteResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Multipart uploads (same-origin and edge-function paths)"),
        (name = "objects", description = "Direct object writes and public object reads")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
