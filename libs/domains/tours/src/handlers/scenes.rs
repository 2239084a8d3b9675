use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::Field},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::errors::responses::{
    BadGatewayResponse, BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
};
use std::sync::Arc;

use crate::error::{TourError, TourResult};
use crate::models::{
    CreateScene, DeleteResponse, InitialView, ItemsWithTotal, ListScenesQuery, Page, PageRequest,
    Scene, SceneFilter, SceneWithHotspots, UpdateScene,
};
use crate::repository::{HotspotRepository, SceneRepository};
use crate::service::{SceneService, UploadedImage};

const DEFAULT_PAGE_SIZE: i64 = 20;

/// Create the scenes router with all HTTP endpoints
pub fn router<S, H>(service: SceneService<S, H>) -> Router
where
    S: SceneRepository + 'static,
    H: HotspotRepository + 'static,
{
    Router::new()
        .route("/", get(list_scenes).post(create_scene))
        .route("/by-tour/{tour_id}", get(list_by_tour))
        .route(
            "/{id}",
            get(get_scene).patch(update_scene).delete(delete_scene),
        )
        .route("/{id}/full", get(get_scene_full))
        .with_state(Arc::new(service))
}

/// Multipart form fields accepted by scene create/update
#[derive(Default)]
pub(crate) struct SceneForm {
    tour_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    initial_view: Option<InitialView>,
    image: Option<UploadedImage>,
}

pub(crate) async fn field_text(field: Field<'_>) -> TourResult<String> {
    field
        .text()
        .await
        .map_err(|e| TourError::Validation(e.to_string()))
}

pub(crate) async fn parse_scene_form(mut multipart: Multipart) -> TourResult<SceneForm> {
    let mut form = SceneForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TourError::Validation(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "tour_id" => form.tour_id = Some(field_text(field).await?),
            "name" => form.name = Some(field_text(field).await?),
            "description" => form.description = Some(field_text(field).await?),
            "image_url" => form.image_url = Some(field_text(field).await?),
            "initial_view" => {
                let raw = field_text(field).await?;
                let view = serde_json::from_str(&raw).map_err(|e| {
                    TourError::Validation(format!("Invalid initial_view JSON: {e}"))
                })?;
                form.initial_view = Some(view);
            }
            "image" => {
                let is_image = field
                    .content_type()
                    .is_some_and(|ct| ct.starts_with("image/"));
                if !is_image {
                    return Err(TourError::Validation(
                        "Uploaded file must be an image".to_string(),
                    ));
                }

                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| TourError::Validation(e.to_string()))?
                    .to_vec();
                form.image = Some(UploadedImage { bytes, filename });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// List scenes, optionally filtered by tour
#[utoipa::path(
    get,
    path = "/scenes",
    tag = "Scenes",
    params(ListScenesQuery),
    responses(
        (status = 200, description = "One page of scenes", body = Page<Scene>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn list_scenes<S, H>(
    State(service): State<Arc<SceneService<S, H>>>,
    Query(query): Query<ListScenesQuery>,
) -> TourResult<Json<Page<Scene>>>
where
    S: SceneRepository,
    H: HotspotRepository,
{
    let page = PageRequest::normalize(query.page, query.page_size, DEFAULT_PAGE_SIZE);
    let filter = SceneFilter {
        tour_id: query.tour_id,
    };
    let scenes = service.list_scenes(filter, page).await?;
    Ok(Json(scenes))
}

/// List every scene of a tour
#[utoipa::path(
    get,
    path = "/scenes/by-tour/{tour_id}",
    tag = "Scenes",
    params(("tour_id" = String, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Scenes of the tour", body = ItemsWithTotal<Scene>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn list_by_tour<S, H>(
    State(service): State<Arc<SceneService<S, H>>>,
    Path(tour_id): Path<String>,
) -> TourResult<Json<ItemsWithTotal<Scene>>>
where
    S: SceneRepository,
    H: HotspotRepository,
{
    let scenes = service.list_by_tour(&tour_id).await?;
    Ok(Json(scenes))
}

/// Get a scene by id
#[utoipa::path(
    get,
    path = "/scenes/{id}",
    tag = "Scenes",
    params(("id" = String, Path, description = "Scene ID")),
    responses(
        (status = 200, description = "Scene found", body = Scene),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn get_scene<S, H>(
    State(service): State<Arc<SceneService<S, H>>>,
    Path(id): Path<String>,
) -> TourResult<Json<Scene>>
where
    S: SceneRepository,
    H: HotspotRepository,
{
    let scene = service.get_scene(&id).await?;
    Ok(Json(scene))
}

/// Get a scene with its hotspots resolved
#[utoipa::path(
    get,
    path = "/scenes/{id}/full",
    tag = "Scenes",
    params(("id" = String, Path, description = "Scene ID")),
    responses(
        (status = 200, description = "Scene with hotspots", body = SceneWithHotspots),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn get_scene_full<S, H>(
    State(service): State<Arc<SceneService<S, H>>>,
    Path(id): Path<String>,
) -> TourResult<Json<SceneWithHotspots>>
where
    S: SceneRepository,
    H: HotspotRepository,
{
    let scene = service.get_with_hotspots(&id).await?;
    Ok(Json(scene))
}

/// Create a scene from a multipart form
///
/// Accepts `tour_id`, `name`, `description`, `initial_view` (JSON string),
/// `image_url` and an `image` file. An uploaded image is hosted first and
/// wins over `image_url`.
#[utoipa::path(
    post,
    path = "/scenes",
    tag = "Scenes",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Scene created", body = Scene),
        (status = 400, response = BadRequestResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn create_scene<S, H>(
    State(service): State<Arc<SceneService<S, H>>>,
    multipart: Multipart,
) -> TourResult<impl IntoResponse>
where
    S: SceneRepository,
    H: HotspotRepository,
{
    let form = parse_scene_form(multipart).await?;

    let tour_id = form
        .tour_id
        .ok_or_else(|| TourError::Validation("tour_id is required".to_string()))?;
    let name = form
        .name
        .ok_or_else(|| TourError::Validation("name is required".to_string()))?;

    let input = CreateScene {
        tour_id,
        name,
        description: form.description,
        image_url: form.image_url,
        image_public_id: None,
        initial_view: form.initial_view.unwrap_or_default(),
    };

    let scene = service.create_scene(input, form.image).await?;
    Ok((StatusCode::CREATED, Json(scene)))
}

/// Patch a scene from a multipart form
///
/// A form with no recognized fields is rejected. Uploading a new image
/// replaces the hosted one.
#[utoipa::path(
    patch,
    path = "/scenes/{id}",
    tag = "Scenes",
    params(("id" = String, Path, description = "Scene ID")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Scene updated", body = Scene),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn update_scene<S, H>(
    State(service): State<Arc<SceneService<S, H>>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> TourResult<Json<Scene>>
where
    S: SceneRepository,
    H: HotspotRepository,
{
    let form = parse_scene_form(multipart).await?;

    let patch = UpdateScene {
        name: form.name,
        description: form.description,
        image_url: form.image_url,
        image_public_id: None,
        initial_view: form.initial_view,
    };

    let scene = service.update_scene(&id, patch, form.image).await?;
    Ok(Json(scene))
}

/// Delete a scene with its hotspots and hosted image
#[utoipa::path(
    delete,
    path = "/scenes/{id}",
    tag = "Scenes",
    params(("id" = String, Path, description = "Scene ID")),
    responses(
        (status = 200, description = "Scene deleted", body = DeleteResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn delete_scene<S, H>(
    State(service): State<Arc<SceneService<S, H>>>,
    Path(id): Path<String>,
) -> TourResult<Json<DeleteResponse>>
where
    S: SceneRepository,
    H: HotspotRepository,
{
    service.delete_scene_cascade(&id).await?;
    Ok(Json(DeleteResponse::new("Scene deleted successfully")))
}
