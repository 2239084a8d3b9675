use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use std::sync::Arc;

use crate::error::TourResult;
use crate::interchange::TourDocument;
use crate::models::{
    CreateTour, DeleteResponse, ListToursQuery, Page, PageRequest, Tour, TourFilter,
    TourWithScenes, UpdateTour,
};
use crate::repository::{HotspotRepository, SceneRepository, TourRepository};
use crate::service::TourService;

const DEFAULT_PAGE_SIZE: i64 = 20;

/// Create the tours router with all HTTP endpoints
pub fn router<T, S, H>(service: TourService<T, S, H>) -> Router
where
    T: TourRepository + 'static,
    S: SceneRepository + 'static,
    H: HotspotRepository + 'static,
{
    Router::new()
        .route("/", get(list_tours).post(create_tour))
        .route(
            "/{id}",
            get(get_tour).patch(update_tour).delete(delete_tour),
        )
        .route("/{id}/full", get(get_tour_full))
        .route("/{id}/export", get(export_tour))
        .with_state(Arc::new(service))
}

/// List tours, newest-created last, optionally filtered by name
#[utoipa::path(
    get,
    path = "/tours",
    tag = "Tours",
    params(ListToursQuery),
    responses(
        (status = 200, description = "One page of tours", body = Page<Tour>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn list_tours<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    Query(query): Query<ListToursQuery>,
) -> TourResult<Json<Page<Tour>>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let page = PageRequest::normalize(query.page, query.page_size, DEFAULT_PAGE_SIZE);
    let filter = TourFilter { name: query.name };
    let tours = service.list_tours(filter, page).await?;
    Ok(Json(tours))
}

/// Create a new tour
#[utoipa::path(
    post,
    path = "/tours",
    tag = "Tours",
    request_body = CreateTour,
    responses(
        (status = 201, description = "Tour created", body = Tour),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn create_tour<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    ValidatedJson(input): ValidatedJson<CreateTour>,
) -> TourResult<impl IntoResponse>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let tour = service.create_tour(input).await?;
    Ok((StatusCode::CREATED, Json(tour)))
}

/// Get a tour by id
#[utoipa::path(
    get,
    path = "/tours/{id}",
    tag = "Tours",
    params(("id" = String, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Tour found", body = Tour),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn get_tour<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    Path(id): Path<String>,
) -> TourResult<Json<Tour>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let tour = service.get_tour(&id).await?;
    Ok(Json(tour))
}

/// Get a tour with all scenes and their hotspots
#[utoipa::path(
    get,
    path = "/tours/{id}/full",
    tag = "Tours",
    params(("id" = String, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Resolved tour tree", body = TourWithScenes),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn get_tour_full<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    Path(id): Path<String>,
) -> TourResult<Json<TourWithScenes>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let tree = service.get_with_scenes(&id).await?;
    Ok(Json(tree))
}

/// Export a tour as a self-contained interchange document
#[utoipa::path(
    get,
    path = "/tours/{id}/export",
    tag = "Tours",
    params(("id" = String, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Interchange document", body = TourDocument),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn export_tour<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    Path(id): Path<String>,
) -> TourResult<Json<TourDocument>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let doc = service.export(&id).await?;
    Ok(Json(doc))
}

/// Patch a tour
#[utoipa::path(
    patch,
    path = "/tours/{id}",
    tag = "Tours",
    params(("id" = String, Path, description = "Tour ID")),
    request_body = UpdateTour,
    responses(
        (status = 200, description = "Tour updated", body = Tour),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn update_tour<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateTour>,
) -> TourResult<Json<Tour>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let tour = service.update_tour(&id, patch).await?;
    Ok(Json(tour))
}

/// Delete a tour together with its scenes and hotspots
#[utoipa::path(
    delete,
    path = "/tours/{id}",
    tag = "Tours",
    params(("id" = String, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Tour deleted", body = DeleteResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn delete_tour<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    Path(id): Path<String>,
) -> TourResult<Json<DeleteResponse>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    service.delete_tour_cascade(&id).await?;
    Ok(Json(DeleteResponse::new("Tour deleted successfully")))
}
