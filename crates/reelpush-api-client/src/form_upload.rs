//! Uploads file bytes to a pre-signed storage target with a multipart form POST.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reelpush_core::{Error, Result, UploadOutcome, UploadSession, UploadTarget};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio_util::io::ReaderStream;

/// Form part name the storage endpoint reads the object bytes from.
const FILE_FIELD: &str = "file";

/// Posts files to pre-signed targets. Carries no credentials of its own: the
/// signed form fields are the authorization.
#[derive(Clone, Debug)]
pub struct FormUploader {
    client: Client,
}

impl FormUploader {
    /// No overall request timeout is set since video uploads can take a while.
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| Error::Validation(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn build_form(session: &UploadSession, file_path: &Path) -> Result<Form> {
        let file = tokio::fs::File::open(file_path).await?;
        let len = file.metadata().await?.len();
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let file_part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), len)
            .file_name(file_name)
            .mime_str(session.content_type())
            .map_err(|e| {
                Error::Validation(format!(
                    "Invalid content type '{}': {}",
                    session.content_type(),
                    e
                ))
            })?;

        // The file part must come after every signed field.
        let form = session
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .part(FILE_FIELD, file_part);

        Ok(form)
    }
}

#[async_trait]
impl UploadTarget for FormUploader {
    #[tracing::instrument(skip(self, session, file_path), fields(asset_id = %session.asset_id))]
    async fn upload(&self, session: UploadSession, file_path: &Path) -> Result<UploadOutcome> {
        let expected = session.expected_status();
        let form = Self::build_form(&session, file_path).await?;

        let response = self
            .client
            .post(&session.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Upload request failed: {}", e)))?;

        let status = response.status().as_u16();
        let outcome = UploadOutcome::evaluate(status, expected);
        match outcome {
            UploadOutcome::Accepted { .. } => tracing::info!(status, "Upload accepted"),
            UploadOutcome::Rejected { .. } => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status, expected, body = %body, "Upload rejected");
            }
        }
        Ok(outcome)
    }
}
