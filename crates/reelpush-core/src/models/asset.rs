use serde::{Deserialize, Serialize};

/// Asset as reported by the site's asset listing.
///
/// The URL fields fill in asynchronously after the bytes land in storage, so an
/// asset can be listed long before any of them is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAsset {
    pub id: String,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub hosted_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RemoteAsset {
    /// First non-empty URL in priority order: original, hosted, generic.
    /// Whitespace-only values count as empty.
    pub fn resolved_url(&self) -> Option<&str> {
        [&self.original_url, &self.hosted_url, &self.url]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|url| !url.trim().is_empty())
    }
}

/// Terminal state of the availability poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Resolved(String),
    TimedOut { attempts: u32 },
}

impl PollOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            PollOutcome::Resolved(url) => Some(url),
            PollOutcome::TimedOut { .. } => None,
        }
    }
}
