use std::path::Path;
use std::time::Duration;

use reelpush_core::{
    AssetService, Config, Digest, Error, FolderId, PollOutcome, Result, UploadOutcome,
    UploadTarget,
};
use reelpush_processing::LocalFile;

use super::folder::resolve_or_create_folder;
use super::initiator::initiate_upload;
use super::poller::poll_for_url_with_progress;
use super::progress::UploadProgress;

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub site_id: String,
    pub folder_name: String,
    pub poll_max_attempts: u32,
    pub poll_interval: Duration,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            site_id: config.site_id.clone(),
            folder_name: config.upload_folder_name.clone(),
            poll_max_attempts: config.poll_max_attempts,
            poll_interval: config.poll_interval,
        }
    }
}

/// How an upload run ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReport {
    /// Bytes were accepted; `outcome` says whether the URL showed up in time.
    Completed {
        asset_id: String,
        folder_id: FolderId,
        digest: Digest,
        outcome: PollOutcome,
    },
    /// The storage endpoint answered with something other than the declared status.
    Rejected {
        asset_id: String,
        status: u16,
        expected: u16,
    },
}

impl UploadReport {
    pub fn url(&self) -> Option<&str> {
        match self {
            UploadReport::Completed { outcome, .. } => outcome.url(),
            UploadReport::Rejected { .. } => None,
        }
    }

    /// The resolved URL, or the non-fatal error explaining why there is none.
    pub fn into_result(self) -> Result<String> {
        match self {
            UploadReport::Completed {
                outcome: PollOutcome::Resolved(url),
                ..
            } => Ok(url),
            UploadReport::Completed {
                outcome: PollOutcome::TimedOut { attempts },
                ..
            } => Err(Error::PollTimeout { attempts }),
            UploadReport::Rejected {
                status, expected, ..
            } => Err(Error::UploadRejected { status, expected }),
        }
    }
}

/// Runs hash → resolve folder → initiate → upload → poll, strictly in sequence.
pub struct UploadPipeline<S, T> {
    service: S,
    target: T,
    settings: PipelineSettings,
}

impl<S, T> UploadPipeline<S, T>
where
    S: AssetService,
    T: UploadTarget,
{
    pub fn new(service: S, target: T, settings: PipelineSettings) -> Self {
        Self {
            service,
            target,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Upload `file_path` and wait for its public URL.
    ///
    /// Folder resolution and upload initiation failures are returned as errors.
    /// A rejected upload or an exhausted poll budget is a normal report.
    #[tracing::instrument(skip(self, file_path, progress), fields(file = %file_path.display()))]
    pub async fn run(
        &self,
        file_path: &Path,
        progress: &dyn UploadProgress,
    ) -> Result<UploadReport> {
        let file = LocalFile::open(file_path).await?;
        let file_name = file.file_name();
        progress.on_upload_prepared(&file_name);

        let digest = file.digest().await?.clone();
        tracing::info!(digest = %digest, bytes = file.len(), "Computed content digest");

        let site_id = self.settings.site_id.as_str();
        let folder_id =
            resolve_or_create_folder(&self.service, site_id, &self.settings.folder_name, progress)
                .await?;

        let session =
            initiate_upload(&self.service, site_id, &folder_id, &file_name, &digest).await?;
        let asset_id = session.asset_id.clone();

        let outcome = self.target.upload(session, file.path()).await?;
        progress.on_upload_finished(&outcome);

        if let UploadOutcome::Rejected { status, expected } = outcome {
            return Ok(UploadReport::Rejected {
                asset_id,
                status,
                expected,
            });
        }

        let outcome = poll_for_url_with_progress(
            &self.service,
            site_id,
            &asset_id,
            self.settings.poll_max_attempts,
            self.settings.poll_interval,
            progress,
        )
        .await;

        Ok(UploadReport::Completed {
            asset_id,
            folder_id,
            digest,
            outcome,
        })
    }
}
