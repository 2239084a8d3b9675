//! In-memory image host for tests and local development

use crate::error::MediaError;
use crate::provider::{HostedImage, ImageHost};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Mock image host that keeps uploads in memory
#[derive(Default)]
pub struct MockImageHost {
    counter: AtomicU64,
    uploads: Mutex<HashMap<String, usize>>,
    /// When set, every upload fails with an API error
    pub fail_uploads: bool,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Number of images currently held
    pub fn stored_count(&self) -> usize {
        self.uploads.lock().map(|u| u.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<HostedImage, MediaError> {
        if self.fail_uploads {
            return Err(MediaError::Api {
                status: 500,
                body: "mock upload failure".to_string(),
            });
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let public_id = if folder.is_empty() {
            format!("mock/{n}-{filename}")
        } else {
            format!("mock/{folder}/{n}-{filename}")
        };

        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.insert(public_id.clone(), bytes.len());
        }

        Ok(HostedImage {
            url: format!("https://images.example.com/{public_id}"),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<bool, MediaError> {
        let removed = self
            .uploads
            .lock()
            .map(|mut u| u.remove(public_id).is_some())
            .unwrap_or(false);
        Ok(removed)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_delete() {
        let host = MockImageHost::new();

        let hosted = host.upload(vec![1, 2, 3], "pano.jpg", "tour-1").await.unwrap();
        assert!(hosted.url.contains(&hosted.public_id));
        assert_eq!(host.stored_count(), 1);

        assert!(host.delete(&hosted.public_id).await.unwrap());
        assert_eq!(host.stored_count(), 0);

        // unknown id is signalled, not an error
        assert!(!host.delete(&hosted.public_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_failing_host() {
        let host = MockImageHost::failing();
        let err = host.upload(vec![0], "pano.jpg", "").await.unwrap_err();
        assert!(matches!(err, MediaError::Api { status: 500, .. }));
    }
}
