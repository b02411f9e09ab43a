use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::schedule::{ScheduleDoc, ScheduleError, parse_document};

/// Remote location of the schedule document.
pub const DEFAULT_SCHEDULE_URL: &str =
    "https://api.stagehand.dev/gamedata/StageActivity.json";
const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(1_000);

/// Fetches the schedule document and mirrors it to a local cache so the
/// table can always be built without the network. Every failure path
/// degrades to `None`; nothing propagates past this boundary.
#[derive(Debug, Clone)]
pub struct ScheduleProvider {
    client: Client,
    url: String,
    cache_path: PathBuf,
    max_retries: usize,
    retry_backoff: Duration,
}

impl ScheduleProvider {
    pub fn new(
        url: impl Into<String>,
        cache_path: impl Into<PathBuf>,
    ) -> Result<Self, ScheduleError> {
        let client = Client::builder()
            .user_agent(concat!("stagehand/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ScheduleProvider {
            client,
            url: url.into(),
            cache_path: cache_path.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        })
    }

    /// Fetch a fresh document, refreshing the cache on success. Any failure
    /// falls back to the cached copy.
    pub async fn fetch(&self) -> Option<ScheduleDoc> {
        match self.fetch_remote().await {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(%err, url = %self.url, "schedule fetch failed, falling back to cache");
                self.load_cached()
            }
        }
    }

    /// Parse the cached copy of the document, if one exists and is usable.
    pub fn load_cached(&self) -> Option<ScheduleDoc> {
        if !self.cache_path.exists() {
            debug!(path = %self.cache_path.display(), "no schedule cache yet");
            return None;
        }
        let parsed = fs::read_to_string(&self.cache_path)
            .map_err(ScheduleError::from)
            .and_then(|raw| parse_document(&raw));
        match parsed {
            Ok(doc) => Some(doc),
            Err(err) => {
                warn!(%err, path = %self.cache_path.display(), "schedule cache unusable");
                None
            }
        }
    }

    async fn fetch_remote(&self) -> Result<ScheduleDoc, ScheduleError> {
        let response = self.request_with_retries().await?;
        let raw = response.text().await.map_err(ScheduleError::from)?;
        let doc = parse_document(&raw)?;
        if let Err(err) = self.write_cache(&raw) {
            warn!(%err, path = %self.cache_path.display(), "failed to refresh schedule cache");
        }
        Ok(doc)
    }

    async fn request_with_retries(&self) -> Result<reqwest::Response, ScheduleError> {
        let max = self.max_retries.max(1);
        let mut attempt = 0usize;

        loop {
            let result = self
                .client
                .get(&self.url)
                .send()
                .await
                .and_then(|response| response.error_for_status());
            match result {
                Ok(response) => return Ok(response),
                Err(err) => {
                    attempt += 1;
                    let should_retry = match err.status() {
                        Some(status) => {
                            status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
                        }
                        None => err.is_timeout() || err.is_connect() || err.is_request(),
                    };

                    if attempt >= max || !should_retry {
                        return Err(err.into());
                    }

                    sleep(self.retry_backoff).await;
                }
            }
        }
    }

    /// Write-then-rename so a crash mid-write never corrupts the cache.
    fn write_cache(&self, raw: &str) -> Result<(), ScheduleError> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = build_temp_path(&self.cache_path);
        fs::write(&temp_path, raw)?;
        fs::rename(&temp_path, &self.cache_path)?;
        Ok(())
    }
}

fn build_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => {
            temp_path.set_extension(format!("{ext}.tmp"));
        }
        _ => {
            temp_path.set_extension("tmp");
        }
    }
    temp_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cache_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let provider =
            ScheduleProvider::new(DEFAULT_SCHEDULE_URL, dir.path().join("StageActivity.json"))
                .expect("provider");
        assert!(provider.load_cached().is_none());
    }

    #[test]
    fn cached_document_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = dir.path().join("StageActivity.json");
        fs::write(&cache, r#"{"Official": {"sideStoryStage": []}}"#).expect("write cache");

        let provider = ScheduleProvider::new(DEFAULT_SCHEDULE_URL, &cache).expect("provider");
        let doc = provider.load_cached().expect("cached document");
        assert!(doc.regions.contains_key("Official"));
    }

    #[test]
    fn unusable_cache_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = dir.path().join("StageActivity.json");
        fs::write(&cache, "{ not json").expect("write cache");

        let provider = ScheduleProvider::new(DEFAULT_SCHEDULE_URL, &cache).expect("provider");
        assert!(provider.load_cached().is_none());
    }

    #[test]
    fn temp_path_keeps_the_original_extension() {
        let temp = build_temp_path(Path::new("/tmp/StageActivity.json"));
        assert_eq!(temp, PathBuf::from("/tmp/StageActivity.json.tmp"));
    }
}
