//! Image host implementations

pub mod cloudinary;
pub mod mock;

pub use cloudinary::{CloudinaryConfig, CloudinaryProvider};
pub use mock::MockImageHost;

use crate::error::MediaError;
use async_trait::async_trait;

/// A successfully hosted image
#[derive(Debug, Clone)]
pub struct HostedImage {
    /// Publicly reachable URL to serve the image from
    pub url: String,
    /// Provider-side identifier used for later deletion
    pub public_id: String,
}

/// Trait for image hosting providers
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload raw image bytes and return the hosted location. `folder` is a
    /// provider-side subfolder (scoping uploads per owning resource).
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<HostedImage, MediaError>;

    /// Delete a previously uploaded image. Returns `Ok(false)` when the
    /// provider no longer knows the public id.
    async fn delete(&self, public_id: &str) -> Result<bool, MediaError>;

    /// Get provider name
    fn name(&self) -> &'static str;
}
