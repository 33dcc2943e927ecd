//! Availability poller.
//!
//! The asset service lists a new asset before its public URL is usable, so the
//! listing is polled until one of the URL fields is populated or the attempt
//! budget runs out. Errors during a single attempt are treated as transient.

use std::time::Duration;

use reelpush_core::{AssetService, PollOutcome};

use super::progress::{NoProgress, UploadProgress};

/// What a single poll attempt observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollAttempt {
    /// The asset is listed with a resolvable URL.
    Ready,
    /// The asset is listed but no URL field is populated yet.
    UrlPending,
    /// The asset id is not in the listing yet.
    NotListed,
    /// The listing call failed; counted as an attempt and retried.
    Failed(String),
}

/// Poll until the asset exposes a URL, up to `max_attempts` listings spaced by `interval`.
pub async fn poll_for_url<S>(
    service: &S,
    site_id: &str,
    asset_id: &str,
    max_attempts: u32,
    interval: Duration,
) -> PollOutcome
where
    S: AssetService + ?Sized,
{
    poll_for_url_with_progress(service, site_id, asset_id, max_attempts, interval, &NoProgress)
        .await
}

/// Same as [`poll_for_url`], reporting each attempt to `progress`.
#[tracing::instrument(skip(service, interval, progress))]
pub async fn poll_for_url_with_progress<S>(
    service: &S,
    site_id: &str,
    asset_id: &str,
    max_attempts: u32,
    interval: Duration,
    progress: &dyn UploadProgress,
) -> PollOutcome
where
    S: AssetService + ?Sized,
{
    progress.on_poll_started(max_attempts, interval);

    for attempt in 1..=max_attempts {
        let state = match service.list_assets(site_id).await {
            Ok(assets) => match assets.iter().find(|asset| asset.id == asset_id) {
                Some(asset) => match asset.resolved_url() {
                    Some(url) => {
                        tracing::info!(attempt, url, "Asset URL available");
                        progress.on_poll_attempt(attempt, &PollAttempt::Ready);
                        return PollOutcome::Resolved(url.to_string());
                    }
                    None => PollAttempt::UrlPending,
                },
                None => PollAttempt::NotListed,
            },
            Err(err) => {
                tracing::warn!(attempt, error = %err, "Poll attempt failed");
                PollAttempt::Failed(err.to_string())
            }
        };

        tracing::debug!(attempt, state = ?state, "Asset not ready");
        progress.on_poll_attempt(attempt, &state);

        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    tracing::warn!(max_attempts, "Timed out waiting for asset URL");
    PollOutcome::TimedOut {
        attempts: max_attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{asset, FakeAssetService, Listing, RecordingProgress};
    use tokio::time::Instant;

    const INTERVAL: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn test_resolves_on_first_attempt_without_sleeping() {
        let service = FakeAssetService::new().with_listings(vec![Listing::Assets(vec![
            asset("other", None, None, Some("https://cdn/other")),
            asset("target", Some("https://cdn/original"), None, None),
        ])]);

        let started = Instant::now();
        let outcome = poll_for_url(&service, "site", "target", 20, INTERVAL).await;

        assert_eq!(
            outcome,
            PollOutcome::Resolved("https://cdn/original".to_string())
        );
        assert_eq!(service.asset_list_calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_exact_attempts_without_trailing_sleep() {
        let service = FakeAssetService::new().with_listings(vec![Listing::Assets(vec![asset(
            "target", None, None, None,
        )])]);

        let started = Instant::now();
        let outcome = poll_for_url(&service, "site", "target", 4, INTERVAL).await;

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 4 });
        assert_eq!(service.asset_list_calls(), 4);
        // Three gaps between four attempts, nothing after the last one.
        assert_eq!(started.elapsed(), INTERVAL * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_never_calls_service() {
        let service = FakeAssetService::new();
        let outcome = poll_for_url(&service, "site", "target", 0, INTERVAL).await;
        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 0 });
        assert_eq!(service.asset_list_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tolerates_errors_until_last_attempt() {
        let max_attempts = 5;
        let mut listings: Vec<Listing> = (0..max_attempts - 1)
            .map(|i| Listing::Fail(format!("connection reset {}", i)))
            .collect();
        listings.push(Listing::Assets(vec![asset(
            "target",
            None,
            Some("https://cdn/hosted"),
            None,
        )]));
        let service = FakeAssetService::new().with_listings(listings);
        let progress = RecordingProgress::default();

        let outcome = poll_for_url_with_progress(
            &service,
            "site",
            "target",
            max_attempts,
            INTERVAL,
            &progress,
        )
        .await;

        assert_eq!(outcome, PollOutcome::Resolved("https://cdn/hosted".to_string()));
        assert_eq!(service.asset_list_calls(), max_attempts as usize);
        let attempts = progress.poll_attempts();
        assert_eq!(attempts.len(), max_attempts as usize);
        assert!(matches!(attempts[0], (1, PollAttempt::Failed(_))));
        assert_eq!(attempts[4], (5, PollAttempt::Ready));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_not_listed_then_pending_then_ready() {
        let service = FakeAssetService::new().with_listings(vec![
            Listing::Assets(vec![]),
            Listing::Assets(vec![asset("target", Some(""), None, None)]),
            Listing::Assets(vec![asset("target", Some(""), None, Some("https://cdn/u"))]),
        ]);
        let progress = RecordingProgress::default();

        let started = Instant::now();
        let outcome =
            poll_for_url_with_progress(&service, "site", "target", 20, INTERVAL, &progress).await;

        assert_eq!(outcome, PollOutcome::Resolved("https://cdn/u".to_string()));
        assert_eq!(
            progress.poll_attempts(),
            vec![
                (1, PollAttempt::NotListed),
                (2, PollAttempt::UrlPending),
                (3, PollAttempt::Ready),
            ]
        );
        assert_eq!(started.elapsed(), INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_attempts_failing_times_out() {
        let service =
            FakeAssetService::new().with_listings(vec![Listing::Fail("unauthorized".into())]);

        let outcome = poll_for_url(&service, "site", "target", 3, INTERVAL).await;

        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 3 });
        assert_eq!(service.asset_list_calls(), 3);
    }
}
