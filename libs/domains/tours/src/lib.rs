//! Tours Domain
//!
//! Complete domain implementation for virtual tours stored in MongoDB:
//! tours own scenes, scenes own hotspots, scene panoramas live on an
//! external image host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (incl. multipart upload and import)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Business logic, cascades, interchange translation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repositories│  ← Data access (traits + MongoDB implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, pagination envelopes
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_tours::{
//!     handlers,
//!     mongodb::{MongoHotspotRepository, MongoSceneRepository, MongoTourRepository},
//!     service::{HotspotService, SceneService, TourService},
//! };
//! use media::{ImageHost, MockImageHost};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("tours");
//!
//! let tours = Arc::new(MongoTourRepository::new(db.clone()));
//! let scenes = Arc::new(MongoSceneRepository::new(db.clone()));
//! let hotspots = Arc::new(MongoHotspotRepository::new(db));
//! let images: Arc<dyn ImageHost> = Arc::new(MockImageHost::new());
//!
//! let scene_service = SceneService::new(Arc::clone(&scenes), Arc::clone(&hotspots), images);
//! let hotspot_service = HotspotService::new(hotspots, scenes);
//! let tour_service = TourService::new(tours, scene_service.clone(), hotspot_service.clone());
//!
//! let router = handlers::tours::router(tour_service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod interchange;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{TourError, TourResult};
pub use handlers::ApiDoc;
pub use interchange::{ImportResponse, TourDocument};
pub use models::{
    CreateHotspot, CreateScene, CreateTour, Hotspot, HotspotKind, InitialView, Page, Position,
    Scene, Tour, TourWithScenes, UpdateHotspot, UpdateScene, UpdateTour,
};
pub use mongodb::{MongoHotspotRepository, MongoSceneRepository, MongoTourRepository};
pub use repository::{HotspotRepository, SceneRepository, TourRepository};
pub use service::{HotspotService, SceneService, TourService, UploadedImage};
