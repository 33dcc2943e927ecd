//! Seams between the upload pipeline and the outside world.
//!
//! The HTTP client implements these for the real asset service; tests plug in
//! in-memory fakes.

use async_trait::async_trait;
use std::path::Path;

use crate::models::{Digest, FolderId, RemoteAsset, RemoteFolder, UploadOutcome, UploadSession};
use crate::Result;

/// Remote asset-management API, scoped by site.
#[async_trait]
pub trait AssetService: Send + Sync {
    /// All asset folders in the site.
    async fn list_folders(&self, site_id: &str) -> Result<Vec<RemoteFolder>>;

    /// Create a folder and return it with its newly assigned id.
    async fn create_folder(&self, site_id: &str, display_name: &str) -> Result<RemoteFolder>;

    /// Register an asset and receive the pre-signed target for its bytes.
    async fn create_asset_upload(
        &self,
        site_id: &str,
        folder_id: &FolderId,
        file_name: &str,
        digest: &Digest,
    ) -> Result<UploadSession>;

    /// Every asset currently listed for the site.
    async fn list_assets(&self, site_id: &str) -> Result<Vec<RemoteAsset>>;
}

/// Receiver of the actual file bytes for a pre-signed session.
#[async_trait]
pub trait UploadTarget: Send + Sync {
    async fn upload(&self, session: UploadSession, file_path: &Path) -> Result<UploadOutcome>;
}
