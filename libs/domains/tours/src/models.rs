use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Tour entity - a virtual tour grouping a set of panoramic scenes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Tour {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Tour name
    pub name: String,
    /// Scene the viewer opens on; soft reference, may dangle
    pub entry_scene: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new tour
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTour {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub entry_scene: Option<String>,
}

/// DTO for patching an existing tour; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTour {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub entry_scene: Option<String>,
}

impl UpdateTour {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.entry_scene.is_none()
    }
}

/// Initial camera orientation for a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InitialView {
    #[serde(default)]
    pub yaw: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default = "default_fov")]
    pub fov: f64,
}

fn default_fov() -> f64 {
    100.0
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fov: 100.0,
        }
    }
}

/// Scene entity - one panoramic view within a tour
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Scene {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Owning tour; soft reference
    pub tour_id: String,
    /// Scene name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Hosted panorama URL
    pub image_url: Option<String>,
    /// Image host identifier, kept for later deletion
    pub image_public_id: Option<String>,
    /// Initial camera orientation
    #[serde(default)]
    pub initial_view: InitialView,
}

/// DTO for creating a new scene
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateScene {
    #[validate(length(min = 1))]
    pub tour_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    /// Pre-hosted image URL, used when no file is uploaded
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_public_id: Option<String>,
    #[serde(default)]
    pub initial_view: InitialView,
}

/// DTO for patching an existing scene; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateScene {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub initial_view: Option<InitialView>,
}

impl UpdateScene {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.image_public_id.is_none()
            && self.initial_view.is_none()
    }
}

/// Hotspot kind
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HotspotKind {
    /// Navigates to the target scene on click
    #[default]
    Click,
    /// Navigates once the viewer zooms past `fov_trigger`
    Zoom,
}

/// 3D position of a hotspot on the panorama sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default, ToSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Hotspot entity - a navigation marker inside a scene
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Hotspot {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Owning scene; soft reference
    pub scene_id: String,
    #[serde(rename = "type", default)]
    pub kind: HotspotKind,
    pub position: Position,
    /// Scene the hotspot navigates to; soft reference, may dangle
    pub target_scene: String,
    pub label: String,
    /// Zoom threshold, only meaningful for `zoom` hotspots
    pub fov_trigger: Option<f64>,
}

/// DTO for creating a new hotspot
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateHotspot {
    #[validate(length(min = 1))]
    pub scene_id: String,
    #[serde(rename = "type", default)]
    pub kind: HotspotKind,
    pub position: Position,
    #[validate(length(min = 1))]
    pub target_scene: String,
    pub label: String,
    pub fov_trigger: Option<f64>,
}

/// DTO for patching an existing hotspot; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateHotspot {
    #[serde(rename = "type")]
    pub kind: Option<HotspotKind>,
    pub position: Option<Position>,
    #[validate(length(min = 1))]
    pub target_scene: Option<String>,
    pub label: Option<String>,
    pub fov_trigger: Option<f64>,
}

impl UpdateHotspot {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.position.is_none()
            && self.target_scene.is_none()
            && self.label.is_none()
            && self.fov_trigger.is_none()
    }
}

/// Query filters for listing tours
#[derive(Debug, Clone, Default)]
pub struct TourFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
}

/// Query filters for listing scenes
#[derive(Debug, Clone, Default)]
pub struct SceneFilter {
    pub tour_id: Option<String>,
}

/// Query filters for listing hotspots
#[derive(Debug, Clone, Default)]
pub struct HotspotFilter {
    pub scene_id: Option<String>,
    pub kind: Option<HotspotKind>,
}

/// Normalized pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: i64,
}

impl PageRequest {
    pub const MAX_PAGE_SIZE: i64 = 100;

    /// Clamp raw query values: page is at least 1, page_size lands in
    /// `[1, 100]` with a per-resource default.
    pub fn normalize(page: Option<u64>, page_size: Option<i64>, default_size: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(default_size).clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.page_size as u64
    }
}

/// Pagination metadata echoed back on every list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchOptions {
    pub page: u64,
    pub page_size: i64,
    pub total_count: u64,
}

/// A page of results with its pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub search_options: SearchOptions,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            search_options: SearchOptions {
                page: request.page,
                page_size: request.page_size,
                total_count,
            },
        }
    }
}

/// An unpaged item set with its total, used by `by-tour`/`by-scene` lookups
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemsWithTotal<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> ItemsWithTotal<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self { items, total }
    }
}

/// Acknowledgement body for delete endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub success: bool,
}

impl DeleteResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}

/// List query for tours
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListToursQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Page size, clamped to [1, 100]
    pub page_size: Option<i64>,
    /// Case-insensitive name substring filter
    pub name: Option<String>,
}

/// List query for scenes
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListScenesQuery {
    pub page: Option<u64>,
    pub page_size: Option<i64>,
    /// Filter by owning tour
    pub tour_id: Option<String>,
}

/// List query for hotspots
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListHotspotsQuery {
    pub page: Option<u64>,
    pub page_size: Option<i64>,
    /// Filter by owning scene
    pub scene_id: Option<String>,
    /// Filter by hotspot kind
    #[serde(rename = "type")]
    pub kind: Option<HotspotKind>,
}

/// Hotspot as rendered inside nested tour/scene trees
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotspotView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HotspotKind,
    pub position: Position,
    pub target_scene: String,
    pub label: String,
    pub fov_trigger: Option<f64>,
}

impl From<Hotspot> for HotspotView {
    fn from(h: Hotspot) -> Self {
        Self {
            id: h.id,
            kind: h.kind,
            position: h.position,
            target_scene: h.target_scene,
            label: h.label,
            fov_trigger: h.fov_trigger,
        }
    }
}

/// Scene with its hotspots resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SceneWithHotspots {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Hosted panorama URL; the viewer reads this as `image`
    #[serde(rename = "image")]
    pub image_url: Option<String>,
    pub initial_view: InitialView,
    pub hotspots: Vec<HotspotView>,
}

impl SceneWithHotspots {
    pub fn new(scene: Scene, hotspots: Vec<Hotspot>) -> Self {
        Self {
            id: scene.id,
            name: scene.name,
            description: scene.description,
            image_url: scene.image_url,
            initial_view: scene.initial_view,
            hotspots: hotspots.into_iter().map(HotspotView::from).collect(),
        }
    }
}

/// Fully resolved tour tree, scenes keyed by their id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourWithScenes {
    pub id: String,
    pub name: String,
    pub entry_scene: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub scenes: BTreeMap<String, SceneWithHotspots>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::normalize(None, None, 20);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 20);
        assert_eq!(req.skip(), 0);
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::normalize(Some(0), Some(1000), 20);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 100);

        let req = PageRequest::normalize(Some(3), Some(0), 50);
        assert_eq!(req.page_size, 1);
        assert_eq!(req.skip(), 2);
    }

    #[test]
    fn test_initial_view_defaults() {
        let view: InitialView = serde_json::from_str("{}").unwrap();
        assert_eq!(view, InitialView::default());
        assert_eq!(view.fov, 100.0);
    }

    #[test]
    fn test_hotspot_kind_serializes_as_type() {
        let hotspot = Hotspot {
            id: "64b64c680000000000000001".to_string(),
            scene_id: "64b64c680000000000000002".to_string(),
            kind: HotspotKind::Zoom,
            position: Position { x: 1.0, y: 2.0, z: 3.0 },
            target_scene: "64b64c680000000000000003".to_string(),
            label: "Next room".to_string(),
            fov_trigger: Some(40.0),
        };

        let json = serde_json::to_value(&hotspot).unwrap();
        assert_eq!(json["type"], "zoom");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_update_tour_is_empty() {
        assert!(UpdateTour::default().is_empty());
        assert!(!UpdateTour {
            name: Some("Lobby".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
