//! Mautic REST client (basic auth service account).
//!
//! - `fetch_segments`: full segment catalog, page by page
//! - `resolve_contact_id`: email -> contact id, exactly one match expected
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::MauticConfig;
use crate::services::http_client::{body_excerpt, build_client};
use crate::services::mautic::error::MauticError;
use crate::services::mautic::types::{ContactSearch, Segment, SegmentPage, decode_stream};

const SEGMENTS_ENDPOINT: &str = "api/segments";
const CONTACTS_ENDPOINT: &str = "api/contacts";

#[derive(Clone)]
pub struct MauticClient {
    http: reqwest::Client,
    segments_url: Url,
    contacts_url: Url,
    username: String,
    password: String,
    page_size: u32,
}

impl std::fmt::Debug for MauticClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the password
        f.debug_struct("MauticClient")
            .field("segments_url", &self.segments_url.as_str())
            .field("username", &self.username)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl MauticClient {
    pub fn new(config: &MauticConfig, timeout: Duration) -> Result<Self, MauticError> {
        let http = build_client(timeout).map_err(|e| MauticError::Setup(e.to_string()))?;

        let join = |endpoint: &str| {
            config
                .base_url
                .join(endpoint)
                .map_err(|e| MauticError::Setup(format!("{endpoint}: {e}")))
        };

        Ok(Self {
            http,
            segments_url: join(SEGMENTS_ENDPOINT)?,
            contacts_url: join(CONTACTS_ENDPOINT)?,
            username: config.username.clone(),
            password: config.password.clone(),
            page_size: config.page_size,
        })
    }

    /// Fetch every segment, ordered by id.
    ///
    /// Pages are requested until `total` segments were collected or a page adds nothing
    /// new. Mautic may serve fewer rows than `limit`, so a short page only ends the loop
    /// when no `total` was reported. Duplicate ids keep their first occurrence.
    pub async fn fetch_segments(&self) -> Result<Vec<Segment>, MauticError> {
        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        let mut start: u64 = 0;

        loop {
            let query = [
                ("start", start.to_string()),
                ("limit", self.page_size.to_string()),
            ];
            let pages: Vec<SegmentPage> = self
                .get(SEGMENTS_ENDPOINT, self.segments_url.clone(), &query)
                .await?;

            let total = pages.iter().map(|p| p.total).max().unwrap_or(0);
            let mut received: u64 = 0;
            let mut added = 0usize;

            for segment in pages.into_iter().flat_map(|p| p.lists) {
                received += 1;
                if seen.insert(segment.id) {
                    segments.push(segment);
                    added += 1;
                }
            }

            tracing::debug!(start, received, added, total, "mautic segment page");

            let complete = if total > 0 {
                segments.len() as u64 >= total
            } else {
                received < u64::from(self.page_size)
            };
            if added == 0 || complete {
                break;
            }
            start += received;
        }

        segments.sort_by_key(|s| s.id);
        Ok(segments)
    }

    /// Resolve the contact id registered for `email`.
    ///
    /// - no match -> `Ok(None)`
    /// - one match -> `Ok(Some(id))`
    /// - several -> `MauticError::AmbiguousContact`
    pub async fn resolve_contact_id(&self, email: &str) -> Result<Option<String>, MauticError> {
        let query = [("search", format!("email:{email}"))];
        let results: Vec<ContactSearch> = self
            .get(CONTACTS_ENDPOINT, self.contacts_url.clone(), &query)
            .await?;

        let total = results.iter().map(|r| r.total).max().unwrap_or(0);
        let ids: BTreeSet<String> = results.into_iter().flat_map(|r| r.contacts).collect();
        tracing::debug!(total, matches = ids.len(), "mautic contact search");

        match ids.len() {
            0 | 1 => Ok(ids.into_iter().next()),
            count => Err(MauticError::AmbiguousContact { count }),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, MauticError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .query(query)
            .send()
            .await
            .map_err(|source| MauticError::Transport { endpoint, source })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MauticError::Rejected {
                endpoint,
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MauticError::Status {
                endpoint,
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| MauticError::Transport { endpoint, source })?;

        decode_stream(&body).map_err(|source| MauticError::Decode { endpoint, source })
    }
}
