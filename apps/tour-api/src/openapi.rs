//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tour API",
        version = "0.1.0",
        description = "REST API for 360-degree virtual tours: tours, scenes and hotspots",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_tours::ApiDoc)
    ),
    tags(
        (name = "Tours", description = "Virtual tour management"),
        (name = "Scenes", description = "Panoramic scenes with hosted images"),
        (name = "Hotspots", description = "Scene navigation markers"),
        (name = "Import", description = "Interchange document import")
    )
)]
pub struct ApiDoc;
