//! API routes module
//!
//! Wires the tour domain to HTTP routes with its MongoDB repositories and
//! the Cloudinary image host.

pub mod health;

use axum::Router;
use std::sync::Arc;

use domain_tours::{
    HotspotService, MongoHotspotRepository, MongoSceneRepository, MongoTourRepository,
    SceneService, TourService, handlers,
};
use media::{CloudinaryProvider, ImageHost};

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let tours = Arc::new(MongoTourRepository::new(state.db.clone()));
    let scenes = Arc::new(MongoSceneRepository::new(state.db.clone()));
    let hotspots = Arc::new(MongoHotspotRepository::new(state.db.clone()));
    let images: Arc<dyn ImageHost> =
        Arc::new(CloudinaryProvider::new(state.config.cloudinary.clone()));

    let scene_service = SceneService::new(Arc::clone(&scenes), Arc::clone(&hotspots), images);
    let hotspot_service = HotspotService::new(hotspots, scenes);
    let tour_service = TourService::new(tours, scene_service.clone(), hotspot_service.clone());

    Router::new()
        .nest("/tours", handlers::tours::router(tour_service.clone()))
        .nest("/scenes", handlers::scenes::router(scene_service))
        .nest("/hotspots", handlers::hotspots::router(hotspot_service))
        .nest("/import", handlers::import::router(tour_service))
        .merge(health::router(state.clone()))
}
