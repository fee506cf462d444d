//! # Sample Feed
//!
//! Paged list of samples received by the laboratory, newest first. Page 1 is
//! reloaded after every registration; later pages are appended as the user
//! scrolls. An empty page marks the end of the list.
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};

use crate::{api::HttpApi, error::ApiError, models::SampleSummary};

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<SampleSummary>, ApiError>;
}

#[async_trait]
impl SampleSource for HttpApi {
    async fn fetch_page(&self, page: u32) -> Result<Vec<SampleSummary>, ApiError> {
        self.list_samples(page).await
    }
}

impl SampleSummary {
    pub fn received_at(&self) -> Option<NaiveDateTime> {
        let raw = self.ftc_laboratory.trim();

        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|time| time.naive_local())
            })
    }

    /// `October 18, 2026, 09:30 AM`, or the raw text when unparsable.
    pub fn received_display(&self) -> String {
        self.received_at()
            .map(|time| time.format("%B %-d, %Y, %I:%M %p").to_string())
            .unwrap_or_else(|| self.ftc_laboratory.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SampleFeed {
    page: u32,
    has_more: bool,
    items: Vec<SampleSummary>,
}

impl Default for SampleFeed {
    fn default() -> Self {
        Self {
            page: 0,
            has_more: true,
            items: Vec::new(),
        }
    }
}

impl SampleFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[SampleSummary] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Reloads page 1, replacing what was shown.
    pub async fn refresh(&mut self, source: &impl SampleSource) -> Result<usize, ApiError> {
        let items = source.fetch_page(1).await?;

        self.page = 1;
        self.has_more = !items.is_empty();
        self.items = items;

        Ok(self.items.len())
    }

    /// Appends the next page. Returns how many samples were added.
    pub async fn load_more(&mut self, source: &impl SampleSource) -> Result<usize, ApiError> {
        if !self.has_more {
            return Ok(0);
        }

        let next = self.page + 1;
        let items = source.fetch_page(next).await?;

        if items.is_empty() {
            self.has_more = false;
            return Ok(0);
        }

        let added = items.len();
        self.items.extend(items);
        self.page = next;

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::{SampleFeed, SampleSource};
    use crate::{error::ApiError, models::SampleSummary};

    fn sample(no: &str) -> SampleSummary {
        SampleSummary {
            no_sample: no.to_string(),
            nama_lengkap: "Dewi Lestari".to_string(),
            ftc_laboratory: "2026-10-18 09:30:00".to_string(),
        }
    }

    struct Pages {
        pages: Vec<Vec<SampleSummary>>,
        requested: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl SampleSource for Pages {
        async fn fetch_page(&self, page: u32) -> Result<Vec<SampleSummary>, ApiError> {
            self.requested.lock().push(page);

            Ok(self
                .pages
                .get(page as usize - 1)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_paging_until_empty() {
        let source = Pages {
            pages: vec![vec![sample("S1"), sample("S2")], vec![sample("S3")]],
            requested: Mutex::new(Vec::new()),
        };
        let mut feed = SampleFeed::new();

        assert_eq!(feed.refresh(&source).await.unwrap(), 2);
        assert_eq!(feed.load_more(&source).await.unwrap(), 1);
        assert_eq!(feed.load_more(&source).await.unwrap(), 0);
        assert!(!feed.has_more());
        assert_eq!(feed.load_more(&source).await.unwrap(), 0);

        assert_eq!(feed.items().len(), 3);
        assert_eq!(feed.page(), 2);
        assert_eq!(*source.requested.lock(), vec![1, 2, 3]);

        assert_eq!(feed.refresh(&source).await.unwrap(), 2);
        assert!(feed.has_more());
        assert_eq!(feed.items().len(), 2);
    }

    #[test]
    fn test_received_display() {
        assert_eq!(sample("S1").received_display(), "October 18, 2026, 09:30 AM");

        let mut iso = sample("S2");
        iso.ftc_laboratory = "2026-01-05T14:05:00+07:00".to_string();
        assert_eq!(iso.received_display(), "January 5, 2026, 02:05 PM");

        let mut junk = sample("S3");
        junk.ftc_laboratory = "kemarin".to_string();
        assert_eq!(junk.received_display(), "kemarin");
    }
}
