//! Cloudinary image host
//!
//! Uploads images via the Cloudinary HTTP upload API using signed requests.

use crate::error::MediaError;
use crate::provider::{HostedImage, ImageHost};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error};

/// Cloudinary API base endpoint
const CLOUDINARY_API_URL: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary account configuration
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder prefix applied to every upload
    pub folder: String,
}

impl CloudinaryConfig {
    /// Create from environment variables
    ///
    /// Expects:
    /// - `CLOUDINARY_CLOUD_NAME`
    /// - `CLOUDINARY_API_KEY`
    /// - `CLOUDINARY_API_SECRET`
    /// - `CLOUDINARY_FOLDER` (optional, defaults to `tours`)
    pub fn from_env() -> Result<Self, MediaError> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| MediaError::Config("CLOUDINARY_CLOUD_NAME not set".to_string()))?;
        let api_key = std::env::var("CLOUDINARY_API_KEY")
            .map_err(|_| MediaError::Config("CLOUDINARY_API_KEY not set".to_string()))?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET")
            .map_err(|_| MediaError::Config("CLOUDINARY_API_SECRET not set".to_string()))?;
        let folder =
            std::env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "tours".to_string());

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
            folder,
        })
    }
}

/// Cloudinary image host
pub struct CloudinaryProvider {
    config: CloudinaryConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryProvider {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, MediaError> {
        Ok(Self::new(CloudinaryConfig::from_env()?))
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            CLOUDINARY_API_URL, self.config.cloud_name, action
        )
    }

    /// Sign request parameters the Cloudinary way: parameters sorted by key,
    /// serialized as `k=v` pairs joined with `&`, the API secret appended,
    /// and the whole string hashed.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn timestamp() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string()
    }

    fn scoped_folder(&self, folder: &str) -> String {
        if folder.is_empty() {
            self.config.folder.clone()
        } else {
            format!("{}/{}", self.config.folder, folder)
        }
    }

    async fn parse_api_error(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        error!(status, body = %body, "Cloudinary API error");
        MediaError::Api { status, body }
    }
}

#[async_trait]
impl ImageHost for CloudinaryProvider {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<HostedImage, MediaError> {
        let timestamp = Self::timestamp();
        let folder = self.scoped_folder(folder);
        let signature = self.sign(&[("folder", &folder), ("timestamp", &timestamp)]);

        let form = Form::new()
            .part(
                "file",
                Part::bytes(bytes).file_name(filename.to_string()),
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        debug!(filename = %filename, "Uploading image to Cloudinary");

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_api_error(response).await);
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        debug!(public_id = %uploaded.public_id, "Image uploaded");

        Ok(HostedImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<bool, MediaError> {
        let timestamp = Self::timestamp();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let form = Form::new()
            .text("public_id", public_id.to_string())
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        debug!(public_id = %public_id, "Deleting image from Cloudinary");

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::parse_api_error(response).await);
        }

        let destroyed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        Ok(destroyed.result == "ok")
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CloudinaryProvider {
        CloudinaryProvider::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: "tours".to_string(),
        })
    }

    #[test]
    fn test_signature_is_order_independent() {
        let p = provider();
        let a = p.sign(&[("timestamp", "123"), ("folder", "tours")]);
        let b = p.sign(&[("folder", "tours"), ("timestamp", "123")]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let p = provider();
        let mut other_config = p.config.clone();
        other_config.api_secret = "other".to_string();
        let other = CloudinaryProvider::new(other_config);

        let params = [("timestamp", "123")];
        assert_ne!(p.sign(&params), other.sign(&params));
    }

    #[test]
    fn test_scoped_folder() {
        let p = provider();
        assert_eq!(p.scoped_folder(""), "tours");
        assert_eq!(
            p.scoped_folder("64b64c680000000000000000"),
            "tours/64b64c680000000000000000"
        );
    }

    #[test]
    fn test_from_env_requires_cloud_name() {
        temp_env::with_vars_unset(
            ["CLOUDINARY_CLOUD_NAME", "CLOUDINARY_API_KEY", "CLOUDINARY_API_SECRET"],
            || {
                assert!(CloudinaryConfig::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_from_env_reads_folder_default() {
        temp_env::with_vars(
            [
                ("CLOUDINARY_CLOUD_NAME", Some("demo")),
                ("CLOUDINARY_API_KEY", Some("key")),
                ("CLOUDINARY_API_SECRET", Some("secret")),
                ("CLOUDINARY_FOLDER", None),
            ],
            || {
                let config = CloudinaryConfig::from_env().unwrap();
                assert_eq!(config.folder, "tours");
            },
        );
    }
}
