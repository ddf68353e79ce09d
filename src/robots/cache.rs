//! Per-origin robots.txt cache
//!
//! Policies are fetched once per origin on first reference and kept for the
//! lifetime of the cache. A failed fetch is cached too, as an absent policy,
//! so an origin without a usable robots.txt is never retried.

use super::{RobotsPolicy, RobotsVerdict};
use crate::url::robots_origin;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// Lock-guarded map from origin to its robots policy
///
/// `None` entries record an origin whose robots.txt could not be retrieved;
/// every URL on such an origin is allowed with no delay.
#[derive(Debug)]
pub struct RobotsCache {
    client: Client,
    user_agent: String,
    policies: RwLock<HashMap<String, Option<Arc<RobotsPolicy>>>>,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// `user_agent` is the token looked up in robots.txt groups (e.g. the
    /// crawler name), not the full HTTP header. The client's own timeout
    /// bounds every robots.txt request.
    pub fn new(client: Client, user_agent: &str) -> Self {
        let user_agent = if user_agent.trim().is_empty() {
            "*".to_string()
        } else {
            user_agent.trim().to_lowercase()
        };

        Self {
            client,
            user_agent,
            policies: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a dedicated client for robots.txt retrieval
    pub fn build_client(header_value: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
        Client::builder()
            .user_agent(header_value)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
    }

    /// Decides whether `url` may be fetched and how long to wait first
    ///
    /// Unparsable URLs, host-less URLs and origins without a robots.txt all
    /// fail open.
    pub async fn is_allowed(&self, url: &str) -> RobotsVerdict {
        let Ok(parsed) = Url::parse(url) else {
            tracing::debug!(url = %url, "Unparsable URL, allowing");
            return RobotsVerdict::allow_all();
        };

        let Some(origin) = robots_origin(&parsed) else {
            return RobotsVerdict::allow_all();
        };

        let Some(policy) = self.policy_for(&origin).await else {
            return RobotsVerdict::allow_all();
        };

        // Rules are written against the decoded path
        let path = urlencoding::decode(parsed.path())
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| parsed.path().to_string());
        policy.evaluate(&path, &self.user_agent)
    }

    /// Returns the cached policy for an origin, fetching it on first use
    ///
    /// The lock is not held across the fetch; two tasks missing on the same
    /// origin may both fetch it, and the later insert wins.
    pub async fn policy_for(&self, origin: &str) -> Option<Arc<RobotsPolicy>> {
        let cached = {
            let policies = self.policies.read().unwrap_or_else(|e| e.into_inner());
            policies.get(origin).cloned()
        };
        if let Some(cached) = cached {
            return cached;
        }

        let fetched = self.fetch_policy(origin).await.map(Arc::new);

        self.policies
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(origin.to_string(), fetched.clone());

        fetched
    }

    /// Number of origins with a cache entry, present or absent
    pub fn len(&self) -> usize {
        self.policies
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn fetch_policy(&self, origin: &str) -> Option<RobotsPolicy> {
        let robots_url = format!("{}/robots.txt", origin);

        let response = match self.client.get(&robots_url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(origin = %origin, error = %e, "Failed to fetch robots.txt");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::info!(
                origin = %origin,
                status = response.status().as_u16(),
                "robots.txt not available"
            );
            return None;
        }

        match response.text().await {
            Ok(body) => {
                let policy = RobotsPolicy::parse(&body);
                tracing::debug!(
                    origin = %origin,
                    sitemaps = policy.sitemaps().len(),
                    "Parsed robots.txt"
                );
                Some(policy)
            }
            Err(e) => {
                tracing::info!(origin = %origin, error = %e, "Failed to read robots.txt body");
                None
            }
        }
    }
}
