//! Rate-limited GitHub REST/search client.
//!
//! Single point of contact with the API: owns the two independent
//! rate-limit budgets (core vs search), the search throttle, pagination
//! and the commit-count shortcut via pagination metadata. All calls are
//! strictly sequential by design; the throttle assumes a single logical
//! thread of control.

use std::collections::HashMap;

use async_trait::async_trait;
use dev_profile::api::{ApiBudget, Error, GithubApi, Result};
use dev_profile::types::{Commit, Event, RateLimitInfo, Repo, SearchResults, User};
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

mod builder;
mod limiter;

pub use builder::GithubClientBuilder;

use limiter::{last_page, BudgetTracker, SearchThrottle};

const PAGE_SIZE: usize = 100;
const REPOS_PAGE_CEILING: u32 = 10;
/// The events API retains at most 300 events.
const EVENTS_PAGE_CEILING: u32 = 3;

pub struct GithubClient {
    client: Client,
    github_url: String,
    authenticated: bool,
    core: Mutex<BudgetTracker>,
    search: Mutex<BudgetTracker>,
    throttle: Mutex<SearchThrottle>,
}

impl GithubClient {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Last observed core window, absent before the first core call.
    pub async fn rate_limit_info(&self) -> Option<RateLimitInfo> {
        self.core.lock().await.info()
    }

    /// Last observed search window, absent before the first search call.
    pub async fn search_rate_limit_info(&self) -> Option<RateLimitInfo> {
        self.search.lock().await.info()
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.github_url, endpoint)
        }
    }

    /// Issues one GET, charging it to `budget`: throttles search calls,
    /// refreshes the budget from response headers whatever the status, and
    /// turns a 403 into the exhaustion error for that budget.
    async fn send_tracked(&self, endpoint: &str, budget: ApiBudget) -> Result<Response> {
        if budget == ApiBudget::Search {
            self.throttle.lock().await.wait().await;
        }

        let response = self.client.get(self.url(endpoint)).send().await?;

        let tracker = match budget {
            ApiBudget::Core => &self.core,
            ApiBudget::Search => &self.search,
        };
        let tracker = &mut *tracker.lock().await;
        tracker.update(response.headers());

        if response.status() == StatusCode::FORBIDDEN {
            return Err(tracker.exhausted(response.headers()));
        }
        Ok(response)
    }

    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, budget: ApiBudget) -> Result<T> {
        let response = self.send_tracked(endpoint, budget).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status if !status.is_success() => Err(Error::Api {
                status: status.as_u16(),
            }),
            _ => Ok(response.json().await?),
        }
    }

    /// Concatenates pages of up to 100 items, stopping at the first short
    /// page or at `max_pages`. The ceiling is a cost bound, not a
    /// correctness bound: callers accept truncation past it.
    pub async fn fetch_with_pagination<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        max_pages: u32,
    ) -> Result<Vec<T>> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let mut results = Vec::new();

        for page in 1..=max_pages {
            let url = format!("{}{}page={}&per_page={}", endpoint, separator, page, PAGE_SIZE);
            let items: Vec<T> = self.fetch(&url, ApiBudget::Core).await?;
            let short_page = items.len() < PAGE_SIZE;
            results.extend(items);
            if short_page {
                break;
            }
        }

        Ok(results)
    }

    /// Commit count without downloading commits: requests a single item
    /// and reads the `rel="last"` page number from the `Link` header. 404
    /// and 409 (missing or empty repository) count as zero.
    pub async fn commit_count(&self, owner: &str, repo: &str, author: &str) -> Result<u64> {
        let endpoint = format!(
            "/repos/{}/{}/commits?author={}&per_page=1",
            owner, repo, author
        );
        let response = self.send_tracked(&endpoint, ApiBudget::Core).await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => return Ok(0),
            status if !status.is_success() => return Ok(0),
            _ => {}
        }

        let pages = response
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .and_then(last_page);
        if let Some(pages) = pages {
            return Ok(pages);
        }

        let page: Vec<serde_json::Value> = response.json().await?;
        Ok(page.len() as u64)
    }

    async fn search_count(&self, query: &str) -> u64 {
        let endpoint = format!("/search/issues?q={}", query);
        match self.fetch::<SearchResults>(&endpoint, ApiBudget::Search).await {
            Ok(results) => results.total_count,
            Err(err) => {
                debug!("Search '{}' degraded to 0: {}", query, err);
                0
            }
        }
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn user(&self, username: &str) -> Result<User> {
        match self
            .fetch(&format!("/users/{}", username), ApiBudget::Core)
            .await
        {
            Err(Error::NotFound) => Err(Error::UserNotFound(username.to_string())),
            other => other,
        }
    }

    async fn repos(&self, username: &str) -> Result<Vec<Repo>> {
        self.fetch_with_pagination(
            &format!("/users/{}/repos?type=all&sort=updated", username),
            REPOS_PAGE_CEILING,
        )
        .await
    }

    async fn events(&self, username: &str) -> Result<Vec<Event>> {
        self.fetch_with_pagination(
            &format!("/users/{}/events/public", username),
            EVENTS_PAGE_CEILING,
        )
        .await
    }

    async fn languages(&self, owner: &str, repo: &str) -> HashMap<String, u64> {
        match self
            .fetch(&format!("/repos/{}/{}/languages", owner, repo), ApiBudget::Core)
            .await
        {
            Ok(languages) => languages,
            Err(err) => {
                debug!("Language fetch for {}/{} degraded: {}", owner, repo, err);
                HashMap::new()
            }
        }
    }

    async fn commit_count(&self, owner: &str, repo: &str, author: &str) -> Result<u64> {
        GithubClient::commit_count(self, owner, repo, author).await
    }

    async fn commits_with_files(
        &self,
        owner: &str,
        repo: &str,
        author: &str,
        max_commits: usize,
    ) -> Vec<Commit> {
        let pages = ((max_commits + PAGE_SIZE - 1) / PAGE_SIZE) as u32;
        let endpoint = format!("/repos/{}/{}/commits?author={}", owner, repo, author);
        match self.fetch_with_pagination::<Commit>(&endpoint, pages).await {
            Ok(mut commits) => {
                commits.truncate(max_commits);
                commits
            }
            Err(err) => {
                debug!("Commit sample for {}/{} degraded: {}", owner, repo, err);
                Vec::new()
            }
        }
    }

    async fn search_authored_prs(&self, username: &str) -> Result<SearchResults> {
        self.fetch(
            &format!("/search/issues?q=type:pr+author:{}&per_page=100", username),
            ApiBudget::Search,
        )
        .await
    }

    async fn search_authored_issues(&self, username: &str) -> Result<SearchResults> {
        self.fetch(
            &format!("/search/issues?q=type:issue+author:{}&per_page=100", username),
            ApiBudget::Search,
        )
        .await
    }

    async fn repo_pr_count(&self, username: &str, owner: &str, repo: &str) -> u64 {
        self.search_count(&format!("type:pr+author:{}+repo:{}/{}", username, owner, repo))
            .await
    }

    async fn repo_issue_count(&self, username: &str, owner: &str, repo: &str) -> u64 {
        self.search_count(&format!(
            "type:issue+author:{}+repo:{}/{}",
            username, owner, repo
        ))
        .await
    }

    async fn repo_review_count(&self, username: &str, owner: &str, repo: &str) -> u64 {
        self.search_count(&format!(
            "type:pr+reviewed-by:{}+repo:{}/{}",
            username, owner, repo
        ))
        .await
    }

    async fn repo_discussion_count(&self, username: &str, owner: &str, repo: &str) -> u64 {
        self.search_count(&format!(
            "type:issue+commenter:{}+repo:{}/{}+-author:{}",
            username, owner, repo, username
        ))
        .await
    }
}
