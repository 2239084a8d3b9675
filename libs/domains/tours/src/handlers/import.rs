use axum::{
    Json, Router,
    extract::{Multipart, State, rejection::JsonRejection},
    routing::post,
};
use axum_helpers::errors::responses::{BadRequestResponse, InternalServerErrorResponse};
use std::sync::Arc;

use crate::error::{TourError, TourResult};
use crate::interchange::{ImportResponse, TourDocument};
use crate::repository::{HotspotRepository, SceneRepository, TourRepository};
use crate::service::TourService;

/// Create the import router
pub fn router<T, S, H>(service: TourService<T, S, H>) -> Router
where
    T: TourRepository + 'static,
    S: SceneRepository + 'static,
    H: HotspotRepository + 'static,
{
    Router::new()
        .route("/tour-json", post(import_tour_json))
        .route("/tour-file", post(import_tour_file))
        .with_state(Arc::new(service))
}

/// Any import failure surfaces as a 400 carrying the underlying message;
/// there is no rollback of partially imported records.
fn as_bad_request(err: TourError) -> TourError {
    TourError::Validation(err.to_string())
}

/// Import a tour from an interchange JSON body
#[utoipa::path(
    post,
    path = "/import/tour-json",
    tag = "Import",
    request_body = TourDocument,
    responses(
        (status = 200, description = "Tour imported", body = ImportResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn import_tour_json<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    payload: Result<Json<TourDocument>, JsonRejection>,
) -> TourResult<Json<ImportResponse>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let Json(doc) =
        payload.map_err(|rejection| TourError::Validation(rejection.body_text()))?;
    let response = service.import(doc).await.map_err(as_bad_request)?;
    Ok(Json(response))
}

/// Import a tour from an uploaded `.json` file
#[utoipa::path(
    post,
    path = "/import/tour-file",
    tag = "Import",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Tour imported", body = ImportResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn import_tour_file<T, S, H>(
    State(service): State<Arc<TourService<T, S, H>>>,
    mut multipart: Multipart,
) -> TourResult<Json<ImportResponse>>
where
    T: TourRepository,
    S: SceneRepository,
    H: HotspotRepository,
{
    let mut doc: Option<TourDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TourError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let is_json = field
            .file_name()
            .is_some_and(|name| name.ends_with(".json"));
        if !is_json {
            return Err(TourError::Validation(
                "Uploaded file must be a .json file".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| TourError::Validation(e.to_string()))?;
        doc = Some(serde_json::from_slice(&bytes).map_err(|e| {
            TourError::Validation(format!("Invalid tour JSON: {e}"))
        })?);
    }

    let doc = doc.ok_or_else(|| TourError::Validation("file field is required".to_string()))?;

    let response = service.import(doc).await.map_err(as_bad_request)?;
    Ok(Json(response))
}
