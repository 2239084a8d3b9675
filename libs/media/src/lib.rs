//! Image hosting for uploaded media
//!
//! Exposes the [`ImageHost`] trait plus a Cloudinary-backed provider and an
//! in-memory mock for tests.

pub mod error;
pub mod provider;

pub use error::MediaError;
pub use provider::{HostedImage, ImageHost};
pub use provider::cloudinary::{CloudinaryConfig, CloudinaryProvider};
pub use provider::mock::MockImageHost;
