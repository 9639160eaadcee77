use serde::de::DeserializeOwned;

use crate::error::{Error, Result, Stage};
use crate::github::client::GitHubClient;
use crate::github::transport::ApiRequest;
use crate::models::AccessToken;

pub const PER_PAGE: u32 = 100;

/// 100k items at `PER_PAGE`, far past any real account.
pub const MAX_PAGES: u32 = 1000;

/// Walks `?page=N` from 1 until GitHub answers with an empty page.
pub struct Paginator<'a> {
    client: &'a GitHubClient,
    stage: Stage,
    max_pages: u32,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a GitHubClient, stage: Stage) -> Self {
        Self {
            client,
            stage,
            max_pages: MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Any failed page aborts the walk; pages already read are dropped.
    /// Running past `max_pages` non-empty pages is a failure too.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        per_page: u32,
        token: Option<&AccessToken>,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            if page > self.max_pages {
                tracing::warn!("{} still returning items after {} pages", path, self.max_pages);
                return Err(Error::fetch(self.stage, None, "pagination did not terminate"));
            }

            let request = ApiRequest::new(path, token)
                .query("per_page", per_page)
                .query("page", page);

            let items: Vec<T> = self.client.get_json(self.stage, &request, None).await?;
            if items.is_empty() {
                break;
            }

            tracing::debug!("Page {} of {}: {} items", page, path, items.len());
            all_items.extend(items);
            page += 1;
        }

        Ok(all_items)
    }
}
