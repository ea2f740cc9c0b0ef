//! OpenAPI document for the HTTP API.

use crate::error::ErrorResponse;
use crate::handlers;
use sharebox_core::models::{FileRecordResponse, PublicFileResponse, ShareLinkResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::file_upload::upload_file,
        handlers::file_list::list_files,
        handlers::file_get::get_file,
        handlers::file_download::download_file,
        handlers::file_delete::delete_file,
        handlers::share_create::create_share_link,
        handlers::share_get::get_shared_file,
        handlers::share_download::download_shared_file,
    ),
    components(schemas(
        FileRecordResponse,
        ShareLinkResponse,
        PublicFileResponse,
        ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "files", description = "Owner-scoped file operations"),
        (name = "share", description = "Share links and anonymous access"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
