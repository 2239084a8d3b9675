use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use std::sync::Arc;

use crate::error::{TourError, TourResult};

/// Well-formed requests with undeserializable bodies fail as validation
/// errors, keeping every bad-input path on a 400.
fn reject_json<T>(payload: Result<Json<T>, JsonRejection>) -> TourResult<T> {
    let Json(value) = payload.map_err(|rejection| TourError::Validation(rejection.body_text()))?;
    Ok(value)
}
use crate::models::{
    CreateHotspot, DeleteResponse, Hotspot, HotspotFilter, ItemsWithTotal, ListHotspotsQuery,
    Page, PageRequest, Position, UpdateHotspot,
};
use crate::repository::{HotspotRepository, SceneRepository};
use crate::service::HotspotService;

const DEFAULT_PAGE_SIZE: i64 = 50;

/// Create the hotspots router with all HTTP endpoints
pub fn router<H, S>(service: HotspotService<H, S>) -> Router
where
    H: HotspotRepository + 'static,
    S: SceneRepository + 'static,
{
    Router::new()
        .route("/", get(list_hotspots).post(create_hotspot))
        .route("/bulk", post(bulk_create_hotspots))
        .route(
            "/by-scene/{scene_id}",
            get(list_by_scene).delete(delete_by_scene),
        )
        .route(
            "/{id}",
            get(get_hotspot).patch(update_hotspot).delete(delete_hotspot),
        )
        .route("/{id}/position", axum::routing::patch(update_position))
        .with_state(Arc::new(service))
}

/// List hotspots, optionally filtered by scene and kind
#[utoipa::path(
    get,
    path = "/hotspots",
    tag = "Hotspots",
    params(ListHotspotsQuery),
    responses(
        (status = 200, description = "One page of hotspots", body = Page<Hotspot>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn list_hotspots<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    Query(query): Query<ListHotspotsQuery>,
) -> TourResult<Json<Page<Hotspot>>>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let page = PageRequest::normalize(query.page, query.page_size, DEFAULT_PAGE_SIZE);
    let filter = HotspotFilter {
        scene_id: query.scene_id,
        kind: query.kind,
    };
    let hotspots = service.list_hotspots(filter, page).await?;
    Ok(Json(hotspots))
}

/// List every hotspot of a scene
#[utoipa::path(
    get,
    path = "/hotspots/by-scene/{scene_id}",
    tag = "Hotspots",
    params(("scene_id" = String, Path, description = "Scene ID")),
    responses(
        (status = 200, description = "Hotspots of the scene", body = ItemsWithTotal<Hotspot>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn list_by_scene<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    Path(scene_id): Path<String>,
) -> TourResult<Json<ItemsWithTotal<Hotspot>>>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let hotspots = service.list_by_scene(&scene_id).await?;
    Ok(Json(hotspots))
}

/// Get a hotspot by id
#[utoipa::path(
    get,
    path = "/hotspots/{id}",
    tag = "Hotspots",
    params(("id" = String, Path, description = "Hotspot ID")),
    responses(
        (status = 200, description = "Hotspot found", body = Hotspot),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn get_hotspot<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    Path(id): Path<String>,
) -> TourResult<Json<Hotspot>>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let hotspot = service.get_hotspot(&id).await?;
    Ok(Json(hotspot))
}

/// Create a new hotspot
#[utoipa::path(
    post,
    path = "/hotspots",
    tag = "Hotspots",
    request_body = CreateHotspot,
    responses(
        (status = 201, description = "Hotspot created", body = Hotspot),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn create_hotspot<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    ValidatedJson(input): ValidatedJson<CreateHotspot>,
) -> TourResult<impl IntoResponse>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let hotspot = service.create_hotspot(input).await?;
    Ok((StatusCode::CREATED, Json(hotspot)))
}

/// Create several hotspots in one call
///
/// Hotspots are created sequentially; the first failure aborts the request
/// and earlier creations remain.
#[utoipa::path(
    post,
    path = "/hotspots/bulk",
    tag = "Hotspots",
    request_body = Vec<CreateHotspot>,
    responses(
        (status = 201, description = "Hotspots created", body = ItemsWithTotal<Hotspot>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn bulk_create_hotspots<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    payload: Result<Json<Vec<CreateHotspot>>, JsonRejection>,
) -> TourResult<impl IntoResponse>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let created = service.bulk_create(reject_json(payload)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Patch a hotspot
#[utoipa::path(
    patch,
    path = "/hotspots/{id}",
    tag = "Hotspots",
    params(("id" = String, Path, description = "Hotspot ID")),
    request_body = UpdateHotspot,
    responses(
        (status = 200, description = "Hotspot updated", body = Hotspot),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn update_hotspot<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateHotspot>,
) -> TourResult<Json<Hotspot>>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let hotspot = service.update_hotspot(&id, patch).await?;
    Ok(Json(hotspot))
}

/// Replace a hotspot's position
#[utoipa::path(
    patch,
    path = "/hotspots/{id}/position",
    tag = "Hotspots",
    params(("id" = String, Path, description = "Hotspot ID")),
    request_body = Position,
    responses(
        (status = 200, description = "Position updated", body = Hotspot),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn update_position<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    Path(id): Path<String>,
    payload: Result<Json<Position>, JsonRejection>,
) -> TourResult<Json<Hotspot>>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let hotspot = service.update_position(&id, reject_json(payload)?).await?;
    Ok(Json(hotspot))
}

/// Delete a hotspot
#[utoipa::path(
    delete,
    path = "/hotspots/{id}",
    tag = "Hotspots",
    params(("id" = String, Path, description = "Hotspot ID")),
    responses(
        (status = 200, description = "Hotspot deleted", body = DeleteResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn delete_hotspot<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    Path(id): Path<String>,
) -> TourResult<Json<DeleteResponse>>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    service.delete_hotspot(&id).await?;
    Ok(Json(DeleteResponse::new("Hotspot deleted successfully")))
}

/// Delete every hotspot of a scene
#[utoipa::path(
    delete,
    path = "/hotspots/by-scene/{scene_id}",
    tag = "Hotspots",
    params(("scene_id" = String, Path, description = "Scene ID")),
    responses(
        (status = 200, description = "Hotspots deleted", body = DeleteResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn delete_by_scene<H, S>(
    State(service): State<Arc<HotspotService<H, S>>>,
    Path(scene_id): Path<String>,
) -> TourResult<Json<DeleteResponse>>
where
    H: HotspotRepository,
    S: SceneRepository,
{
    let deleted = service.delete_by_scene(&scene_id).await?;
    Ok(Json(DeleteResponse::new(format!(
        "Deleted {deleted} hotspots"
    ))))
}
