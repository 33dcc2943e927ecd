use reelpush_core::{AssetService, FolderId, Result};

use super::progress::UploadProgress;

/// Find the folder named `name` in the site, creating it when none exists.
///
/// List-then-create is not atomic: two runs racing against the same site can
/// both miss the scan and both create a folder with this name.
#[tracing::instrument(skip(service, progress))]
pub async fn resolve_or_create_folder<S>(
    service: &S,
    site_id: &str,
    name: &str,
    progress: &dyn UploadProgress,
) -> Result<FolderId>
where
    S: AssetService + ?Sized,
{
    let folders = service.list_folders(site_id).await?;

    if let Some(existing) = folders.into_iter().find(|folder| folder.is_named(name)) {
        tracing::debug!(folder_id = %existing.id, "Using existing folder");
        return Ok(existing.id);
    }

    tracing::info!("Creating folder");
    progress.on_folder_created(name);
    let created = service.create_folder(site_id, name).await?;
    Ok(created.id)
}
