//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video and thumbnail uploads with fast-start processing and signed playback URLs"
    ),
    paths(
        handlers::video_create::create_video,
        handlers::video_get::list_videos,
        handlers::video_get::get_video,
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::thumbnail_get::get_thumbnail,
    ),
    components(schemas(
        models::CreateVideoRequest,
        models::VideoResponse,
        error::ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags((name = "videos", description = "Video records and media uploads"))
)]
pub struct ApiDoc;

pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_upload_paths() {
        let spec = openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/video_upload/{videoID}"));
        assert!(spec.paths.paths.contains_key("/api/thumbnail_upload/{videoID}"));
        assert!(spec.paths.paths.contains_key("/api/videos"));
    }
}
