use reelpush_core::{AssetService, Digest, Error, FolderId, Result, UploadSession};

/// Register the asset with the service and obtain its pre-signed upload target.
///
/// The returned form fields are passed through untouched.
#[tracing::instrument(skip(service, digest), fields(digest = %digest))]
pub async fn initiate_upload<S>(
    service: &S,
    site_id: &str,
    folder_id: &FolderId,
    file_name: &str,
    digest: &Digest,
) -> Result<UploadSession>
where
    S: AssetService + ?Sized,
{
    if file_name.trim().is_empty() {
        return Err(Error::Validation("File name cannot be empty".to_string()));
    }

    let session = service
        .create_asset_upload(site_id, folder_id, file_name, digest)
        .await?;

    tracing::info!(
        asset_id = %session.asset_id,
        field_count = session.fields.len(),
        expected_status = session.expected_status(),
        "Upload session created"
    );
    Ok(session)
}
