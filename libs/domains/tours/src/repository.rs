use async_trait::async_trait;

use crate::error::TourResult;
use crate::models::{
    CreateHotspot, CreateScene, CreateTour, Hotspot, HotspotFilter, Position, Scene, SceneFilter,
    Tour, TourFilter, UpdateHotspot, UpdateScene, UpdateTour,
};

/// Repository trait for Tour persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Create a new tour with a freshly assigned id
    async fn create(&self, input: CreateTour) -> TourResult<Tour>;

    /// Get a tour by id; unknown or malformed ids yield `None`
    async fn get_by_id(&self, id: &str) -> TourResult<Option<Tour>>;

    /// List one insertion-ordered page of tours
    async fn list(&self, filter: TourFilter, skip: u64, limit: i64) -> TourResult<Vec<Tour>>;

    /// Count tours matching a filter
    async fn count(&self, filter: TourFilter) -> TourResult<u64>;

    /// Patch a tour; an empty patch returns the current state
    async fn update(&self, id: &str, patch: UpdateTour) -> TourResult<Tour>;

    /// Delete a tour by id
    async fn delete(&self, id: &str) -> TourResult<()>;
}

/// Repository trait for Scene persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SceneRepository: Send + Sync {
    async fn create(&self, input: CreateScene) -> TourResult<Scene>;

    async fn get_by_id(&self, id: &str) -> TourResult<Option<Scene>>;

    async fn list(&self, filter: SceneFilter, skip: u64, limit: i64) -> TourResult<Vec<Scene>>;

    async fn count(&self, filter: SceneFilter) -> TourResult<u64>;

    /// All scenes of a tour, unpaged; feeds aggregation and cascades
    async fn list_by_tour(&self, tour_id: &str) -> TourResult<Vec<Scene>>;

    async fn update(&self, id: &str, patch: UpdateScene) -> TourResult<Scene>;

    async fn delete(&self, id: &str) -> TourResult<()>;

    /// Delete every scene of a tour, returning the deleted count
    async fn delete_by_tour(&self, tour_id: &str) -> TourResult<u64>;
}

/// Repository trait for Hotspot persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotspotRepository: Send + Sync {
    async fn create(&self, input: CreateHotspot) -> TourResult<Hotspot>;

    async fn get_by_id(&self, id: &str) -> TourResult<Option<Hotspot>>;

    async fn list(&self, filter: HotspotFilter, skip: u64, limit: i64)
        -> TourResult<Vec<Hotspot>>;

    async fn count(&self, filter: HotspotFilter) -> TourResult<u64>;

    /// All hotspots of a scene, unpaged; feeds aggregation and cascades
    async fn list_by_scene(&self, scene_id: &str) -> TourResult<Vec<Hotspot>>;

    async fn update(&self, id: &str, patch: UpdateHotspot) -> TourResult<Hotspot>;

    /// Replace only a hotspot's position
    async fn update_position(&self, id: &str, position: Position) -> TourResult<Hotspot>;

    async fn delete(&self, id: &str) -> TourResult<()>;

    /// Delete every hotspot of a scene, returning the deleted count
    async fn delete_by_scene(&self, scene_id: &str) -> TourResult<u64>;
}
