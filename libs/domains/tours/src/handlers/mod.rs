//! HTTP endpoints for the tour domain

pub mod hotspots;
pub mod import;
pub mod scenes;
pub mod tours;

use axum_helpers::errors::responses::{
    BadGatewayResponse, BadRequestResponse, ConflictResponse, InternalServerErrorResponse,
    NotFoundResponse,
};
use utoipa::OpenApi;

use crate::interchange::{HotspotDocument, ImportResponse, SceneDocument, TourDocument};
use crate::models::{
    CreateHotspot, CreateScene, CreateTour, DeleteResponse, Hotspot, HotspotKind, HotspotView,
    InitialView, Position, Scene, SceneWithHotspots, SearchOptions, Tour, TourWithScenes,
    UpdateHotspot, UpdateScene, UpdateTour,
};

/// OpenAPI documentation for the tour domain
#[derive(OpenApi)]
#[openapi(
    paths(
        tours::list_tours,
        tours::create_tour,
        tours::get_tour,
        tours::get_tour_full,
        tours::export_tour,
        tours::update_tour,
        tours::delete_tour,
        scenes::list_scenes,
        scenes::list_by_tour,
        scenes::get_scene,
        scenes::get_scene_full,
        scenes::create_scene,
        scenes::update_scene,
        scenes::delete_scene,
        hotspots::list_hotspots,
        hotspots::list_by_scene,
        hotspots::get_hotspot,
        hotspots::create_hotspot,
        hotspots::bulk_create_hotspots,
        hotspots::update_hotspot,
        hotspots::update_position,
        hotspots::delete_hotspot,
        hotspots::delete_by_scene,
        import::import_tour_json,
        import::import_tour_file,
    ),
    components(
        schemas(
            Tour,
            CreateTour,
            UpdateTour,
            Scene,
            CreateScene,
            UpdateScene,
            InitialView,
            Hotspot,
            CreateHotspot,
            UpdateHotspot,
            HotspotKind,
            HotspotView,
            Position,
            SceneWithHotspots,
            TourWithScenes,
            SearchOptions,
            DeleteResponse,
            TourDocument,
            SceneDocument,
            HotspotDocument,
            ImportResponse,
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            ConflictResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Tours", description = "Virtual tour management"),
        (name = "Scenes", description = "Panoramic scenes with hosted images"),
        (name = "Hotspots", description = "Scene navigation markers"),
        (name = "Import", description = "Interchange document import")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use media::{ImageHost, MockImageHost};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::models::{Hotspot, HotspotKind, Position, Tour};
    use crate::repository::{
        MockHotspotRepository, MockSceneRepository, MockTourRepository,
    };
    use crate::service::{HotspotService, SceneService, TourService};

    fn sample_tour(id: &str, name: &str) -> Tour {
        Tour {
            id: id.to_string(),
            name: name.to_string(),
            entry_scene: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tours_router(tours: MockTourRepository) -> Router {
        let tours = Arc::new(tours);
        let scenes = Arc::new(MockSceneRepository::new());
        let hotspots = Arc::new(MockHotspotRepository::new());
        let images: Arc<dyn ImageHost> = Arc::new(MockImageHost::new());

        let scene_service = SceneService::new(
            Arc::clone(&scenes),
            Arc::clone(&hotspots),
            images,
        );
        let hotspot_service = HotspotService::new(hotspots, scenes);
        super::tours::router(TourService::new(tours, scene_service, hotspot_service))
    }

    fn import_router(tours: MockTourRepository) -> Router {
        let tours = Arc::new(tours);
        let scenes = Arc::new(MockSceneRepository::new());
        let hotspots = Arc::new(MockHotspotRepository::new());
        let images: Arc<dyn ImageHost> = Arc::new(MockImageHost::new());

        let scene_service = SceneService::new(
            Arc::clone(&scenes),
            Arc::clone(&hotspots),
            images,
        );
        let hotspot_service = HotspotService::new(hotspots, scenes);
        super::import::router(TourService::new(tours, scene_service, hotspot_service))
    }

    fn hotspots_router(hotspots: MockHotspotRepository) -> Router {
        let service =
            HotspotService::new(Arc::new(hotspots), Arc::new(MockSceneRepository::new()));
        super::hotspots::router(service)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_tour_returns_404_body() {
        let mut tours = MockTourRepository::new();
        tours.expect_get_by_id().returning(|_| Ok(None));

        let response = tours_router(tours)
            .oneshot(
                Request::builder()
                    .uri("/not-a-real-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "NotFound");
    }

    #[tokio::test]
    async fn test_list_tours_clamps_page_size() {
        let mut tours = MockTourRepository::new();
        tours
            .expect_list()
            .withf(|_, skip, limit| *skip == 100 && *limit == 100)
            .returning(|_, _, _| Ok(vec![sample_tour("a", "A")]));
        tours.expect_count().returning(|_| Ok(1));

        let response = tours_router(tours)
            .oneshot(
                Request::builder()
                    .uri("/?page=2&page_size=500")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["search_options"]["page"], 2);
        assert_eq!(json["search_options"]["page_size"], 100);
        assert_eq!(json["search_options"]["total_count"], 1);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_tour_returns_201() {
        let mut tours = MockTourRepository::new();
        tours
            .expect_create()
            .returning(|input| Ok(sample_tour("64b64c680000000000000001", &input.name)));

        let response = tours_router(tours)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "Show flat"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["name"], "Show flat");
        assert_eq!(json["_id"], "64b64c680000000000000001");
    }

    #[tokio::test]
    async fn test_create_tour_empty_name_is_rejected() {
        let response = tours_router(MockTourRepository::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "BadRequest");
    }

    #[tokio::test]
    async fn test_create_hotspot_missing_fields_is_400() {
        let response = hotspots_router(MockHotspotRepository::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "BadRequest");
    }

    #[tokio::test]
    async fn test_bulk_create_malformed_body_is_400() {
        let response = hotspots_router(MockHotspotRepository::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bulk")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"not": "an array"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "BadRequest");
    }

    #[tokio::test]
    async fn test_update_position_malformed_body_is_400() {
        let response = hotspots_router(MockHotspotRepository::new())
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/abc/position")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"x": "not a number"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_by_scene_reports_count() {
        let mut hotspots = MockHotspotRepository::new();
        hotspots.expect_delete_by_scene().returning(|_| Ok(3));

        let service =
            HotspotService::new(Arc::new(hotspots), Arc::new(MockSceneRepository::new()));

        let response = super::hotspots::router(service)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/by-scene/64b64c680000000000000002")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Deleted 3 hotspots");
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn test_import_malformed_document_is_400() {
        let response = import_router(MockTourRepository::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tour-json")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "T", "scenes": []}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "BadRequest");
    }

    #[tokio::test]
    async fn test_import_failure_surfaces_as_400() {
        let mut tours = MockTourRepository::new();
        tours.expect_create().returning(|_| {
            Err(crate::error::TourError::Database(
                "write failed".to_string(),
            ))
        });

        let response = import_router(tours)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tour-json")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "Broken", "scenes": {}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "BadRequest");
    }

    #[tokio::test]
    async fn test_bulk_create_returns_items_with_total() {
        let mut hotspots = MockHotspotRepository::new();
        hotspots.expect_create().times(2).returning(|input| {
            Ok(Hotspot {
                id: "h".to_string(),
                scene_id: input.scene_id,
                kind: HotspotKind::Click,
                position: Position::default(),
                target_scene: input.target_scene,
                label: input.label,
                fov_trigger: None,
            })
        });

        let service =
            HotspotService::new(Arc::new(hotspots), Arc::new(MockSceneRepository::new()));

        let body = r#"[
            {"scene_id": "s1", "position": {"x": 0, "y": 0, "z": 0}, "target_scene": "s2", "label": "a"},
            {"scene_id": "s1", "position": {"x": 1, "y": 0, "z": 0}, "target_scene": "s3", "label": "b"}
        ]"#;

        let response = super::hotspots::router(service)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bulk")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["total"], 2);
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }
}
