//! Interchange format for tour import/export
//!
//! A tour travels as a single camelCase JSON document with scenes keyed by an
//! arbitrary string. On export the keys are the current scene ids; on import
//! they are whatever the source file used, and every scene gets a fresh id
//! with intra-tour references remapped through the old-key to new-id map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::{HotspotKind, InitialView, Position, TourWithScenes};

/// A complete tour in interchange form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourDocument {
    pub name: String,
    #[serde(default)]
    pub entry_scene: Option<String>,
    #[serde(default)]
    pub scenes: BTreeMap<String, SceneDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    /// Current scene id on export; ignored on import, where fresh ids are
    /// assigned and the map key is what references resolve through
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hosted panorama URL; the viewer reads this as `image`
    #[serde(rename = "image", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub initial_view: InitialView,
    #[serde(default)]
    pub hotspots: Vec<HotspotDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotspotDocument {
    /// Current hotspot id on export; ignored on import
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: HotspotKind,
    #[serde(default)]
    pub position: Position,
    pub target_scene: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub fov_trigger: Option<f64>,
}

/// Import outcome returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub tour_id: String,
    /// Source scene key to newly assigned scene id
    pub scene_id_map: BTreeMap<String, String>,
    pub scenes_count: u64,
}

/// Build the interchange document from a fully resolved tour tree.
pub fn to_document(tree: &TourWithScenes) -> TourDocument {
    let scenes = tree
        .scenes
        .iter()
        .map(|(key, scene)| {
            let hotspots = scene
                .hotspots
                .iter()
                .map(|h| HotspotDocument {
                    id: h.id.clone(),
                    kind: h.kind,
                    position: h.position,
                    target_scene: h.target_scene.clone(),
                    label: h.label.clone(),
                    fov_trigger: h.fov_trigger,
                })
                .collect();

            (
                key.clone(),
                SceneDocument {
                    id: scene.id.clone(),
                    name: scene.name.clone(),
                    description: scene.description.clone(),
                    image_url: scene.image_url.clone(),
                    initial_view: scene.initial_view,
                    hotspots,
                },
            )
        })
        .collect();

    TourDocument {
        name: tree.name.clone(),
        entry_scene: tree.entry_scene.clone(),
        scenes,
    }
}

/// Resolve a scene reference through the old-key to new-id map. Unknown keys
/// pass through untouched so cross-tour references survive import.
pub fn remap_reference(map: &BTreeMap<String, String>, key: &str) -> String {
    map.get(key).cloned().unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HotspotView, SceneWithHotspots};
    use chrono::Utc;

    fn sample_tree() -> TourWithScenes {
        let mut scenes = BTreeMap::new();
        scenes.insert(
            "64b64c680000000000000002".to_string(),
            SceneWithHotspots {
                id: "64b64c680000000000000002".to_string(),
                name: "Lobby".to_string(),
                description: None,
                image_url: Some("https://images.example.com/lobby.jpg".to_string()),
                initial_view: InitialView::default(),
                hotspots: vec![HotspotView {
                    id: "64b64c680000000000000003".to_string(),
                    kind: HotspotKind::Click,
                    position: Position { x: 1.0, y: 0.0, z: -1.0 },
                    target_scene: "64b64c680000000000000004".to_string(),
                    label: "To hallway".to_string(),
                    fov_trigger: None,
                }],
            },
        );

        TourWithScenes {
            id: "64b64c680000000000000001".to_string(),
            name: "Show flat".to_string(),
            entry_scene: Some("64b64c680000000000000002".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            scenes,
        }
    }

    #[test]
    fn test_export_uses_camel_case_keys() {
        let doc = to_document(&sample_tree());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["name"], "Show flat");
        assert_eq!(json["entryScene"], "64b64c680000000000000002");

        let scene = &json["scenes"]["64b64c680000000000000002"];
        assert_eq!(scene["id"], "64b64c680000000000000002");
        assert_eq!(scene["image"], "https://images.example.com/lobby.jpg");
        assert!(scene.get("imageUrl").is_none());
        assert_eq!(scene["initialView"]["fov"], 100.0);

        let hotspot = &scene["hotspots"][0];
        assert_eq!(hotspot["id"], "64b64c680000000000000003");
        assert_eq!(hotspot["type"], "click");
        assert_eq!(hotspot["targetScene"], "64b64c680000000000000004");
        assert!(hotspot["fovTrigger"].is_null());
    }

    #[test]
    fn test_import_document_applies_defaults() {
        let json = r#"{
            "name": "Minimal",
            "scenes": {
                "start": {
                    "name": "Start",
                    "hotspots": [
                        { "targetScene": "other" }
                    ]
                }
            }
        }"#;

        let doc: TourDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.entry_scene, None);

        let scene = &doc.scenes["start"];
        assert_eq!(scene.initial_view, InitialView::default());
        assert_eq!(scene.hotspots[0].kind, HotspotKind::Click);
        assert_eq!(scene.hotspots[0].position, Position::default());
        assert_eq!(scene.hotspots[0].label, "");
    }

    #[test]
    fn test_import_reads_image_key() {
        let json = r#"{
            "name": "T",
            "scenes": {
                "s1": { "name": "S", "image": "https://cdn.example.com/pano.jpg" }
            }
        }"#;

        let doc: TourDocument = serde_json::from_str(json).unwrap();
        assert_eq!(
            doc.scenes["s1"].image_url.as_deref(),
            Some("https://cdn.example.com/pano.jpg")
        );
    }

    #[test]
    fn test_remap_reference_falls_back_to_raw_key() {
        let mut map = BTreeMap::new();
        map.insert("old".to_string(), "new".to_string());

        assert_eq!(remap_reference(&map, "old"), "new");
        assert_eq!(remap_reference(&map, "elsewhere"), "elsewhere");
    }
}
