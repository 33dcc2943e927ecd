//! In-memory stand-ins for the asset service and upload target.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reelpush_core::{
    AssetService, Digest, Error, FolderId, RemoteAsset, RemoteFolder, Result, UploadOutcome,
    UploadSession, UploadTarget,
};

use crate::{PollAttempt, UploadProgress};

pub fn asset(
    id: &str,
    original_url: Option<&str>,
    hosted_url: Option<&str>,
    url: Option<&str>,
) -> RemoteAsset {
    RemoteAsset {
        id: id.to_string(),
        original_url: original_url.map(str::to_string),
        hosted_url: hosted_url.map(str::to_string),
        url: url.map(str::to_string),
    }
}

/// Scripted response for one asset listing call.
#[derive(Debug, Clone)]
pub enum Listing {
    Assets(Vec<RemoteAsset>),
    Fail(String),
}

#[derive(Default)]
struct State {
    folders: Vec<RemoteFolder>,
    created_folders: Vec<String>,
    folder_list_calls: usize,
    fail_folder_listing: bool,
    fail_asset_creation: Option<u16>,
    initiated: Vec<(String, String, String)>,
    listings: VecDeque<Listing>,
    last_listing: Option<Listing>,
    asset_list_calls: usize,
}

/// Asset service backed by memory. Listing responses are replayed in order and
/// the last one repeats once the script runs out.
#[derive(Clone, Default)]
pub struct FakeAssetService {
    state: Arc<Mutex<State>>,
}

impl FakeAssetService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().folders.push(RemoteFolder {
            id: id.to_string(),
            display_name: Some(name.to_string()),
        });
        self
    }

    pub fn with_listings(self, listings: Vec<Listing>) -> Self {
        self.state.lock().unwrap().listings = listings.into();
        self
    }

    pub fn failing_folder_listing(self) -> Self {
        self.state.lock().unwrap().fail_folder_listing = true;
        self
    }

    pub fn failing_asset_creation(self, status: u16) -> Self {
        self.state.lock().unwrap().fail_asset_creation = Some(status);
        self
    }

    pub fn session_fields() -> Vec<(String, String)> {
        [
            ("acl", "public-read"),
            ("bucket", "bucket"),
            ("X-Amz-Algorithm", "AWS4-HMAC-SHA256"),
            ("X-Amz-Credential", "cred"),
            ("X-Amz-Date", "20260101T000000Z"),
            ("key", "site/asset"),
            ("Policy", "cG9saWN5"),
            ("X-Amz-Signature", "sig"),
            ("success_action_status", "201"),
            ("Content-Type", "video/webm"),
            ("Cache-Control", "max-age=31536000"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub fn created_folders(&self) -> Vec<String> {
        self.state.lock().unwrap().created_folders.clone()
    }

    pub fn folder_list_calls(&self) -> usize {
        self.state.lock().unwrap().folder_list_calls
    }

    pub fn initiated(&self) -> Vec<(String, String, String)> {
        self.state.lock().unwrap().initiated.clone()
    }

    pub fn asset_list_calls(&self) -> usize {
        self.state.lock().unwrap().asset_list_calls
    }
}

#[async_trait]
impl AssetService for FakeAssetService {
    async fn list_folders(&self, _site_id: &str) -> Result<Vec<RemoteFolder>> {
        let mut state = self.state.lock().unwrap();
        state.folder_list_calls += 1;
        if state.fail_folder_listing {
            return Err(Error::remote_status("list folders", 500, "boom"));
        }
        Ok(state.folders.clone())
    }

    async fn create_folder(&self, _site_id: &str, display_name: &str) -> Result<RemoteFolder> {
        let mut state = self.state.lock().unwrap();
        state.created_folders.push(display_name.to_string());
        let folder = RemoteFolder {
            id: format!("new-folder-{}", state.created_folders.len()),
            display_name: Some(display_name.to_string()),
        };
        state.folders.push(folder.clone());
        Ok(folder)
    }

    async fn create_asset_upload(
        &self,
        _site_id: &str,
        folder_id: &FolderId,
        file_name: &str,
        digest: &Digest,
    ) -> Result<UploadSession> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.fail_asset_creation {
            return Err(Error::remote_status("create asset upload", status, "rejected"));
        }
        state.initiated.push((
            folder_id.clone(),
            file_name.to_string(),
            digest.to_string(),
        ));
        Ok(UploadSession {
            asset_id: format!("asset-{}", state.initiated.len()),
            upload_url: "https://bucket.example/".to_string(),
            fields: Self::session_fields(),
            fallback_content_type: None,
        })
    }

    async fn list_assets(&self, _site_id: &str) -> Result<Vec<RemoteAsset>> {
        let mut state = self.state.lock().unwrap();
        state.asset_list_calls += 1;
        let listing = match state.listings.pop_front() {
            Some(next) => {
                state.last_listing = Some(next.clone());
                next
            }
            None => state
                .last_listing
                .clone()
                .unwrap_or(Listing::Assets(Vec::new())),
        };
        match listing {
            Listing::Assets(assets) => Ok(assets),
            Listing::Fail(message) => Err(Error::remote("list assets", message)),
        }
    }
}

/// Upload target that answers every upload with a fixed status.
#[derive(Clone)]
pub struct FakeUploadTarget {
    status: Option<u16>,
    uploads: Arc<Mutex<Vec<(UploadSession, PathBuf)>>>,
}

impl FakeUploadTarget {
    /// Answers with whatever status the session declares.
    pub fn accepting() -> Self {
        Self {
            status: None,
            uploads: Arc::default(),
        }
    }

    pub fn answering(status: u16) -> Self {
        Self {
            status: Some(status),
            uploads: Arc::default(),
        }
    }

    pub fn uploads(&self) -> Vec<(UploadSession, PathBuf)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadTarget for FakeUploadTarget {
    async fn upload(&self, session: UploadSession, file_path: &Path) -> Result<UploadOutcome> {
        let expected = session.expected_status();
        let status = self.status.unwrap_or(expected);
        self.uploads
            .lock()
            .unwrap()
            .push((session, file_path.to_path_buf()));
        Ok(UploadOutcome::evaluate(status, expected))
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    folders: Mutex<Vec<String>>,
    attempts: Mutex<Vec<(u32, PollAttempt)>>,
}

impl RecordingProgress {
    pub fn folders_created(&self) -> Vec<String> {
        self.folders.lock().unwrap().clone()
    }

    pub fn poll_attempts(&self) -> Vec<(u32, PollAttempt)> {
        self.attempts.lock().unwrap().clone()
    }
}

impl UploadProgress for RecordingProgress {
    fn on_folder_created(&self, name: &str) {
        self.folders.lock().unwrap().push(name.to_string());
    }

    fn on_poll_attempt(&self, attempt: u32, state: &PollAttempt) {
        self.attempts.lock().unwrap().push((attempt, state.clone()));
    }
}
