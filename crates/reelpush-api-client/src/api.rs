//! Asset API methods for the Webflow client.
//!
//! Folder and asset listings are paginated by the service; the list methods
//! here walk every page so callers always see the full listing.

use async_trait::async_trait;
use reelpush_core::{
    AssetService, Digest, FolderId, RemoteAsset, RemoteFolder, Result, UploadSession,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::WebflowClient;

/// Largest page size the listing endpoints accept.
const PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    pub total: u64,
}

trait Page: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<Pagination>);
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderListResponse {
    #[serde(default)]
    asset_folders: Vec<RemoteFolder>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

impl Page for FolderListResponse {
    type Item = RemoteFolder;

    fn into_parts(self) -> (Vec<RemoteFolder>, Option<Pagination>) {
        (self.asset_folders, self.pagination)
    }
}

#[derive(Debug, Deserialize)]
struct AssetListResponse {
    #[serde(default)]
    assets: Vec<RemoteAsset>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

impl Page for AssetListResponse {
    type Item = RemoteAsset;

    fn into_parts(self) -> (Vec<RemoteAsset>, Option<Pagination>) {
        (self.assets, self.pagination)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolderRequest<'a> {
    display_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssetRequest<'a> {
    file_name: &'a str,
    file_hash: &'a str,
    parent_folder: &'a str,
}

/// Response of the create-asset call: the new asset id and its pre-signed target.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUploadResponse {
    pub id: String,
    pub upload_url: String,
    #[serde(default)]
    pub upload_details: Map<String, Value>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl AssetUploadResponse {
    /// Copy the upload details into form fields without interpreting them.
    pub fn into_session(self) -> UploadSession {
        let fields = self
            .upload_details
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Null => None,
                Value::String(text) => Some((name, text)),
                other => Some((name, other.to_string())),
            })
            .collect();

        UploadSession {
            asset_id: self.id,
            upload_url: self.upload_url,
            fields,
            fallback_content_type: self.content_type,
        }
    }
}

impl WebflowClient {
    async fn get_all_pages<P: Page>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        loop {
            let query = [
                ("offset", items.len().to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ];
            let page: P = self.get(operation, path, &query).await?;
            let (batch, pagination) = page.into_parts();
            let fetched = batch.len();
            items.extend(batch);

            match pagination {
                Some(p) if fetched > 0 && (items.len() as u64) < p.total => continue,
                _ => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl AssetService for WebflowClient {
    async fn list_folders(&self, site_id: &str) -> Result<Vec<RemoteFolder>> {
        self.get_all_pages::<FolderListResponse>(
            "list folders",
            &format!("/sites/{}/asset_folders", site_id),
        )
        .await
    }

    async fn create_folder(&self, site_id: &str, display_name: &str) -> Result<RemoteFolder> {
        self.post_json(
            "create folder",
            &format!("/sites/{}/asset_folders", site_id),
            &CreateFolderRequest { display_name },
        )
        .await
    }

    async fn create_asset_upload(
        &self,
        site_id: &str,
        folder_id: &FolderId,
        file_name: &str,
        digest: &Digest,
    ) -> Result<UploadSession> {
        let response: AssetUploadResponse = self
            .post_json(
                "create asset upload",
                &format!("/sites/{}/assets", site_id),
                &CreateAssetRequest {
                    file_name,
                    file_hash: digest.as_str(),
                    parent_folder: folder_id,
                },
            )
            .await?;
        Ok(response.into_session())
    }

    async fn list_assets(&self, site_id: &str) -> Result<Vec<RemoteAsset>> {
        self.get_all_pages::<AssetListResponse>(
            "list assets",
            &format!("/sites/{}/assets", site_id),
        )
        .await
    }
}
