//! Business logic for tours, scenes and hotspots
//!
//! Services are generic over the repository traits and composed by the app.
//! Cascading deletes and bulk imports are sequential best-effort operations;
//! there is no transactional rollback.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use media::ImageHost;

use crate::error::{TourError, TourResult};
use crate::interchange::{self, ImportResponse, TourDocument};
use crate::models::{
    CreateHotspot, CreateScene, CreateTour, Hotspot, HotspotFilter, ItemsWithTotal, Page,
    PageRequest, Position, Scene, SceneFilter, SceneWithHotspots, Tour, TourFilter,
    TourWithScenes, UpdateHotspot, UpdateScene, UpdateTour,
};
use crate::repository::{HotspotRepository, SceneRepository, TourRepository};

/// An image file received from a client, ready for hosting
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
}

fn validation_error(e: validator::ValidationErrors) -> TourError {
    TourError::Validation(e.to_string())
}

/// Hotspot service
pub struct HotspotService<H: HotspotRepository, S: SceneRepository> {
    hotspots: Arc<H>,
    scenes: Arc<S>,
}

impl<H: HotspotRepository, S: SceneRepository> HotspotService<H, S> {
    pub fn new(hotspots: Arc<H>, scenes: Arc<S>) -> Self {
        Self { hotspots, scenes }
    }

    #[instrument(skip(self))]
    pub async fn list_hotspots(
        &self,
        filter: HotspotFilter,
        page: PageRequest,
    ) -> TourResult<Page<Hotspot>> {
        let items = self
            .hotspots
            .list(filter.clone(), page.skip(), page.page_size)
            .await?;
        let total = self.hotspots.count(filter).await?;
        Ok(Page::new(items, page, total))
    }

    #[instrument(skip(self))]
    pub async fn list_by_scene(&self, scene_id: &str) -> TourResult<ItemsWithTotal<Hotspot>> {
        let items = self.hotspots.list_by_scene(scene_id).await?;
        Ok(ItemsWithTotal::new(items))
    }

    #[instrument(skip(self))]
    pub async fn get_hotspot(&self, id: &str) -> TourResult<Hotspot> {
        self.hotspots
            .get_by_id(id)
            .await?
            .ok_or_else(|| TourError::not_found("Hotspot", id))
    }

    #[instrument(skip(self, input), fields(scene_id = %input.scene_id))]
    pub async fn create_hotspot(&self, input: CreateHotspot) -> TourResult<Hotspot> {
        input.validate().map_err(validation_error)?;
        self.hotspots.create(input).await
    }

    /// Create hotspots one by one, aborting on the first failure. Hotspots
    /// created before the failure remain.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn bulk_create(
        &self,
        inputs: Vec<CreateHotspot>,
    ) -> TourResult<ItemsWithTotal<Hotspot>> {
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(self.create_hotspot(input).await?);
        }
        Ok(ItemsWithTotal::new(created))
    }

    #[instrument(skip(self, patch))]
    pub async fn update_hotspot(&self, id: &str, patch: UpdateHotspot) -> TourResult<Hotspot> {
        patch.validate().map_err(validation_error)?;
        self.hotspots.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn update_position(&self, id: &str, position: Position) -> TourResult<Hotspot> {
        self.hotspots.update_position(id, position).await
    }

    #[instrument(skip(self))]
    pub async fn delete_hotspot(&self, id: &str) -> TourResult<()> {
        self.hotspots.delete(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_by_scene(&self, scene_id: &str) -> TourResult<u64> {
        self.hotspots.delete_by_scene(scene_id).await
    }

    /// Delete the hotspots of every scene in a tour, returning the total
    /// deleted count.
    #[instrument(skip(self))]
    pub async fn delete_by_tour(&self, tour_id: &str) -> TourResult<u64> {
        let scenes = self.scenes.list_by_tour(tour_id).await?;
        let mut deleted = 0;
        for scene in scenes {
            deleted += self.hotspots.delete_by_scene(&scene.id).await?;
        }
        Ok(deleted)
    }
}

impl<H: HotspotRepository, S: SceneRepository> Clone for HotspotService<H, S> {
    fn clone(&self) -> Self {
        Self {
            hotspots: Arc::clone(&self.hotspots),
            scenes: Arc::clone(&self.scenes),
        }
    }
}

/// Scene service, orchestrating persistence and image hosting
pub struct SceneService<S: SceneRepository, H: HotspotRepository> {
    scenes: Arc<S>,
    hotspots: Arc<H>,
    images: Arc<dyn ImageHost>,
}

impl<S: SceneRepository, H: HotspotRepository> SceneService<S, H> {
    pub fn new(scenes: Arc<S>, hotspots: Arc<H>, images: Arc<dyn ImageHost>) -> Self {
        Self {
            scenes,
            hotspots,
            images,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_scenes(
        &self,
        filter: SceneFilter,
        page: PageRequest,
    ) -> TourResult<Page<Scene>> {
        let items = self
            .scenes
            .list(filter.clone(), page.skip(), page.page_size)
            .await?;
        let total = self.scenes.count(filter).await?;
        Ok(Page::new(items, page, total))
    }

    #[instrument(skip(self))]
    pub async fn list_by_tour(&self, tour_id: &str) -> TourResult<ItemsWithTotal<Scene>> {
        let items = self.scenes.list_by_tour(tour_id).await?;
        Ok(ItemsWithTotal::new(items))
    }

    #[instrument(skip(self))]
    pub async fn get_scene(&self, id: &str) -> TourResult<Scene> {
        self.scenes
            .get_by_id(id)
            .await?
            .ok_or_else(|| TourError::not_found("Scene", id))
    }

    #[instrument(skip(self))]
    pub async fn get_with_hotspots(&self, id: &str) -> TourResult<SceneWithHotspots> {
        let scene = self.get_scene(id).await?;
        let hotspots = self.hotspots.list_by_scene(&scene.id).await?;
        Ok(SceneWithHotspots::new(scene, hotspots))
    }

    /// Create a scene, hosting the uploaded image first when one is given.
    /// An uploaded image wins over a pre-hosted `image_url`.
    #[instrument(skip(self, input, image), fields(scene_name = %input.name))]
    pub async fn create_scene(
        &self,
        mut input: CreateScene,
        image: Option<UploadedImage>,
    ) -> TourResult<Scene> {
        input.validate().map_err(validation_error)?;

        if let Some(image) = image {
            let hosted = self
                .images
                .upload(image.bytes, &image.filename, &input.tour_id)
                .await?;
            input.image_url = Some(hosted.url);
            input.image_public_id = Some(hosted.public_id);
        }

        self.scenes.create(input).await
    }

    /// Patch a scene. A new image replaces the hosted one, deleting the old
    /// upload best-effort after the record is updated.
    #[instrument(skip(self, patch, image))]
    pub async fn update_scene(
        &self,
        id: &str,
        mut patch: UpdateScene,
        image: Option<UploadedImage>,
    ) -> TourResult<Scene> {
        patch.validate().map_err(validation_error)?;

        if patch.is_empty() && image.is_none() {
            return Err(TourError::Validation("No fields to update".to_string()));
        }

        let existing = self.get_scene(id).await?;
        let old_public_id = existing.image_public_id.clone();

        let replacing_image = image.is_some();
        if let Some(image) = image {
            let hosted = self
                .images
                .upload(image.bytes, &image.filename, &existing.tour_id)
                .await?;
            patch.image_url = Some(hosted.url);
            patch.image_public_id = Some(hosted.public_id);
        }

        let updated = self.scenes.update(id, patch).await?;

        if replacing_image {
            if let Some(public_id) = old_public_id {
                self.remove_hosted_image(&public_id).await;
            }
        }

        Ok(updated)
    }

    /// Delete a scene with its hotspots and hosted image. Image deletion is
    /// best-effort; a host failure never blocks the cascade.
    #[instrument(skip(self))]
    pub async fn delete_scene_cascade(&self, id: &str) -> TourResult<u64> {
        let scene = self.get_scene(id).await?;

        if let Some(public_id) = &scene.image_public_id {
            self.remove_hosted_image(public_id).await;
        }

        let hotspots_deleted = self.hotspots.delete_by_scene(&scene.id).await?;
        self.scenes.delete(&scene.id).await?;

        Ok(hotspots_deleted)
    }

    /// Delete a hosted image, swallowing host failures.
    async fn remove_hosted_image(&self, public_id: &str) -> bool {
        match self.images.delete(public_id).await {
            Ok(removed) => removed,
            Err(err) => {
                tracing::warn!(public_id = %public_id, error = %err, "Hosted image deletion failed");
                false
            }
        }
    }
}

impl<S: SceneRepository, H: HotspotRepository> Clone for SceneService<S, H> {
    fn clone(&self) -> Self {
        Self {
            scenes: Arc::clone(&self.scenes),
            hotspots: Arc::clone(&self.hotspots),
            images: Arc::clone(&self.images),
        }
    }
}

/// Tour service, composing scene and hotspot services for aggregation,
/// cascades and interchange import/export
pub struct TourService<T: TourRepository, S: SceneRepository, H: HotspotRepository> {
    tours: Arc<T>,
    scenes: SceneService<S, H>,
    hotspots: HotspotService<H, S>,
}

impl<T: TourRepository, S: SceneRepository, H: HotspotRepository> TourService<T, S, H> {
    pub fn new(
        tours: Arc<T>,
        scenes: SceneService<S, H>,
        hotspots: HotspotService<H, S>,
    ) -> Self {
        Self {
            tours,
            scenes,
            hotspots,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_tours(
        &self,
        filter: TourFilter,
        page: PageRequest,
    ) -> TourResult<Page<Tour>> {
        let items = self
            .tours
            .list(filter.clone(), page.skip(), page.page_size)
            .await?;
        let total = self.tours.count(filter).await?;
        Ok(Page::new(items, page, total))
    }

    #[instrument(skip(self))]
    pub async fn get_tour(&self, id: &str) -> TourResult<Tour> {
        self.tours
            .get_by_id(id)
            .await?
            .ok_or_else(|| TourError::not_found("Tour", id))
    }

    #[instrument(skip(self, input), fields(tour_name = %input.name))]
    pub async fn create_tour(&self, input: CreateTour) -> TourResult<Tour> {
        input.validate().map_err(validation_error)?;
        self.tours.create(input).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_tour(&self, id: &str, patch: UpdateTour) -> TourResult<Tour> {
        patch.validate().map_err(validation_error)?;
        self.tours.update(id, patch).await
    }

    /// Resolve the full tour tree: every scene with its hotspots, keyed by
    /// scene id.
    #[instrument(skip(self))]
    pub async fn get_with_scenes(&self, id: &str) -> TourResult<TourWithScenes> {
        let tour = self.get_tour(id).await?;
        let scenes = self.scenes.list_by_tour(&tour.id).await?.items;

        let mut tree = BTreeMap::new();
        for scene in scenes {
            let hotspots = self.hotspots.list_by_scene(&scene.id).await?.items;
            tree.insert(scene.id.clone(), SceneWithHotspots::new(scene, hotspots));
        }

        Ok(TourWithScenes {
            id: tour.id,
            name: tour.name,
            entry_scene: tour.entry_scene,
            created_at: tour.created_at,
            updated_at: tour.updated_at,
            scenes: tree,
        })
    }

    /// Export a tour as a self-contained interchange document.
    #[instrument(skip(self))]
    pub async fn export(&self, id: &str) -> TourResult<TourDocument> {
        let tree = self.get_with_scenes(id).await?;
        Ok(interchange::to_document(&tree))
    }

    /// Delete a tour and everything beneath it, hotspots first, then scenes
    /// (with their hosted images), then the tour itself.
    #[instrument(skip(self))]
    pub async fn delete_tour_cascade(&self, id: &str) -> TourResult<()> {
        let tour = self.get_tour(id).await?;

        let scenes = self.scenes.list_by_tour(&tour.id).await?.items;
        for scene in scenes {
            self.scenes.delete_scene_cascade(&scene.id).await?;
        }

        self.tours.delete(&tour.id).await
    }

    /// Import an interchange document as a brand-new tour. Scenes get fresh
    /// ids; `entryScene` and `targetScene` references are remapped through the
    /// old-key to new-id map, unknown keys passing through untouched.
    #[instrument(skip(self, doc), fields(tour_name = %doc.name, scene_count = doc.scenes.len()))]
    pub async fn import(&self, doc: TourDocument) -> TourResult<ImportResponse> {
        let tour = self
            .create_tour(CreateTour {
                name: doc.name.clone(),
                entry_scene: None,
            })
            .await?;

        let mut scene_id_map = BTreeMap::new();
        for (old_key, scene_doc) in &doc.scenes {
            let scene = self
                .scenes
                .create_scene(
                    CreateScene {
                        tour_id: tour.id.clone(),
                        name: scene_doc.name.clone(),
                        description: scene_doc.description.clone(),
                        image_url: scene_doc.image_url.clone(),
                        image_public_id: None,
                        initial_view: scene_doc.initial_view,
                    },
                    None,
                )
                .await?;
            scene_id_map.insert(old_key.clone(), scene.id);
        }

        // entryScene only sticks when the document actually defines that scene
        if let Some(ref entry) = doc.entry_scene {
            if let Some(new_id) = scene_id_map.get(entry) {
                self.tours
                    .update(
                        &tour.id,
                        UpdateTour {
                            name: None,
                            entry_scene: Some(new_id.clone()),
                        },
                    )
                    .await?;
            }
        }

        for (old_key, scene_doc) in &doc.scenes {
            let scene_id = interchange::remap_reference(&scene_id_map, old_key);
            for hotspot in &scene_doc.hotspots {
                self.hotspots
                    .create_hotspot(CreateHotspot {
                        scene_id: scene_id.clone(),
                        kind: hotspot.kind,
                        position: hotspot.position,
                        target_scene: interchange::remap_reference(
                            &scene_id_map,
                            &hotspot.target_scene,
                        ),
                        label: hotspot.label.clone(),
                        fov_trigger: hotspot.fov_trigger,
                    })
                    .await?;
            }
        }

        let scenes_count = scene_id_map.len() as u64;
        Ok(ImportResponse {
            success: true,
            message: "Tour imported successfully".to_string(),
            tour_id: tour.id,
            scene_id_map,
            scenes_count,
        })
    }
}

impl<T: TourRepository, S: SceneRepository, H: HotspotRepository> Clone for TourService<T, S, H> {
    fn clone(&self) -> Self {
        Self {
            tours: Arc::clone(&self.tours),
            scenes: self.scenes.clone(),
            hotspots: self.hotspots.clone(),
        }
    }
}
