//! MongoDB implementations of the tour, scene and hotspot repositories

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc, oid::ObjectId, to_bson},
};
use tracing::instrument;

use crate::error::{TourError, TourResult};
use crate::models::{
    CreateHotspot, CreateScene, CreateTour, Hotspot, HotspotFilter, Position, Scene, SceneFilter,
    Tour, TourFilter, UpdateHotspot, UpdateScene, UpdateTour,
};
use crate::repository::{HotspotRepository, SceneRepository, TourRepository};

fn to_bson_value<T: serde::Serialize>(value: &T) -> TourResult<Bson> {
    to_bson(value).map_err(|e| TourError::Database(e.to_string()))
}

fn find_options(skip: u64, limit: i64) -> mongodb::options::FindOptions {
    mongodb::options::FindOptions::builder()
        .skip(skip)
        .limit(limit)
        .sort(doc! { "_id": 1 })
        .build()
}

/// MongoDB implementation of the TourRepository
pub struct MongoTourRepository {
    collection: Collection<Tour>,
}

impl MongoTourRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<Tour>("tours"),
        }
    }

    fn build_filter(filter: &TourFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref name) = filter.name {
            doc.insert("name", doc! { "$regex": name, "$options": "i" });
        }

        doc
    }
}

#[async_trait]
impl TourRepository for MongoTourRepository {
    #[instrument(skip(self, input), fields(tour_name = %input.name))]
    async fn create(&self, input: CreateTour) -> TourResult<Tour> {
        let now = Utc::now();
        let tour = Tour {
            id: ObjectId::new().to_hex(),
            name: input.name,
            entry_scene: input.entry_scene,
            created_at: now,
            updated_at: now,
        };

        self.collection.insert_one(&tour).await?;

        tracing::info!(tour_id = %tour.id, "Tour created");
        Ok(tour)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> TourResult<Option<Tour>> {
        let tour = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(tour)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: TourFilter, skip: u64, limit: i64) -> TourResult<Vec<Tour>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(find_options(skip, limit))
            .await?;
        let tours = cursor.try_collect().await?;
        Ok(tours)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: TourFilter) -> TourResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: UpdateTour) -> TourResult<Tour> {
        let mut set = doc! {};
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(entry_scene) = patch.entry_scene {
            set.insert("entry_scene", entry_scene);
        }

        if !set.is_empty() {
            set.insert("updated_at", to_bson_value(&Utc::now())?);
            let result = self
                .collection
                .update_one(doc! { "_id": id }, doc! { "$set": set })
                .await?;
            if result.matched_count == 0 {
                return Err(TourError::not_found("Tour", id));
            }
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| TourError::not_found("Tour", id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> TourResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(TourError::not_found("Tour", id));
        }

        tracing::info!(tour_id = %id, "Tour deleted");
        Ok(())
    }
}

/// MongoDB implementation of the SceneRepository
pub struct MongoSceneRepository {
    collection: Collection<Scene>,
}

impl MongoSceneRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<Scene>("scenes"),
        }
    }

    fn build_filter(filter: &SceneFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref tour_id) = filter.tour_id {
            doc.insert("tour_id", tour_id);
        }

        doc
    }
}

#[async_trait]
impl SceneRepository for MongoSceneRepository {
    #[instrument(skip(self, input), fields(scene_name = %input.name, tour_id = %input.tour_id))]
    async fn create(&self, input: CreateScene) -> TourResult<Scene> {
        let scene = Scene {
            id: ObjectId::new().to_hex(),
            tour_id: input.tour_id,
            name: input.name,
            description: input.description,
            image_url: input.image_url,
            image_public_id: input.image_public_id,
            initial_view: input.initial_view,
        };

        self.collection.insert_one(&scene).await?;

        tracing::info!(scene_id = %scene.id, "Scene created");
        Ok(scene)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> TourResult<Option<Scene>> {
        let scene = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(scene)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: SceneFilter, skip: u64, limit: i64) -> TourResult<Vec<Scene>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(find_options(skip, limit))
            .await?;
        let scenes = cursor.try_collect().await?;
        Ok(scenes)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: SceneFilter) -> TourResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list_by_tour(&self, tour_id: &str) -> TourResult<Vec<Scene>> {
        let cursor = self
            .collection
            .find(doc! { "tour_id": tour_id })
            .sort(doc! { "_id": 1 })
            .await?;
        let scenes = cursor.try_collect().await?;
        Ok(scenes)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: UpdateScene) -> TourResult<Scene> {
        let mut set = doc! {};
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(description) = patch.description {
            set.insert("description", description);
        }
        if let Some(image_url) = patch.image_url {
            set.insert("image_url", image_url);
        }
        if let Some(image_public_id) = patch.image_public_id {
            set.insert("image_public_id", image_public_id);
        }
        if let Some(ref initial_view) = patch.initial_view {
            set.insert("initial_view", to_bson_value(initial_view)?);
        }

        if !set.is_empty() {
            let result = self
                .collection
                .update_one(doc! { "_id": id }, doc! { "$set": set })
                .await?;
            if result.matched_count == 0 {
                return Err(TourError::not_found("Scene", id));
            }
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| TourError::not_found("Scene", id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> TourResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(TourError::not_found("Scene", id));
        }

        tracing::info!(scene_id = %id, "Scene deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_tour(&self, tour_id: &str) -> TourResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "tour_id": tour_id })
            .await?;
        Ok(result.deleted_count)
    }
}

/// MongoDB implementation of the HotspotRepository
pub struct MongoHotspotRepository {
    collection: Collection<Hotspot>,
}

impl MongoHotspotRepository {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection::<Hotspot>("hotspots"),
        }
    }

    fn build_filter(filter: &HotspotFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref scene_id) = filter.scene_id {
            doc.insert("scene_id", scene_id);
        }

        if let Some(ref kind) = filter.kind {
            doc.insert("type", kind.to_string());
        }

        doc
    }
}

#[async_trait]
impl HotspotRepository for MongoHotspotRepository {
    #[instrument(skip(self, input), fields(scene_id = %input.scene_id))]
    async fn create(&self, input: CreateHotspot) -> TourResult<Hotspot> {
        let hotspot = Hotspot {
            id: ObjectId::new().to_hex(),
            scene_id: input.scene_id,
            kind: input.kind,
            position: input.position,
            target_scene: input.target_scene,
            label: input.label,
            fov_trigger: input.fov_trigger,
        };

        self.collection.insert_one(&hotspot).await?;

        tracing::info!(hotspot_id = %hotspot.id, "Hotspot created");
        Ok(hotspot)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> TourResult<Option<Hotspot>> {
        let hotspot = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(hotspot)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: HotspotFilter,
        skip: u64,
        limit: i64,
    ) -> TourResult<Vec<Hotspot>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(find_options(skip, limit))
            .await?;
        let hotspots = cursor.try_collect().await?;
        Ok(hotspots)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: HotspotFilter) -> TourResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(&filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list_by_scene(&self, scene_id: &str) -> TourResult<Vec<Hotspot>> {
        let cursor = self
            .collection
            .find(doc! { "scene_id": scene_id })
            .sort(doc! { "_id": 1 })
            .await?;
        let hotspots = cursor.try_collect().await?;
        Ok(hotspots)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: UpdateHotspot) -> TourResult<Hotspot> {
        let mut set = doc! {};
        if let Some(kind) = patch.kind {
            set.insert("type", kind.to_string());
        }
        if let Some(ref position) = patch.position {
            set.insert("position", to_bson_value(position)?);
        }
        if let Some(target_scene) = patch.target_scene {
            set.insert("target_scene", target_scene);
        }
        if let Some(label) = patch.label {
            set.insert("label", label);
        }
        if let Some(fov_trigger) = patch.fov_trigger {
            set.insert("fov_trigger", fov_trigger);
        }

        if !set.is_empty() {
            let result = self
                .collection
                .update_one(doc! { "_id": id }, doc! { "$set": set })
                .await?;
            if result.matched_count == 0 {
                return Err(TourError::not_found("Hotspot", id));
            }
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| TourError::not_found("Hotspot", id))
    }

    #[instrument(skip(self))]
    async fn update_position(&self, id: &str, position: Position) -> TourResult<Hotspot> {
        self.update(
            id,
            UpdateHotspot {
                position: Some(position),
                ..Default::default()
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> TourResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        if result.deleted_count == 0 {
            return Err(TourError::not_found("Hotspot", id));
        }

        tracing::info!(hotspot_id = %id, "Hotspot deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_scene(&self, scene_id: &str) -> TourResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "scene_id": scene_id })
            .await?;
        Ok(result.deleted_count)
    }
}
