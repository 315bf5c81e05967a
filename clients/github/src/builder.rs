use dev_profile::api::{ApiBudget, Result};
use reqwest::header;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

use crate::limiter::{BudgetTracker, SearchThrottle};
use crate::GithubClient;

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
    authenticated: bool,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("dev-profile-cli"));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        Self {
            client_builder: ClientBuilder::default(),
            github_url: "https://api.github.com".to_string(),
            headers,
            authenticated: false,
        }
    }
}

impl GithubClientBuilder {
    /// Installs a bearer token. Authenticated clients get the larger
    /// quotas (5000/hr core, 30/min search vs 60/hr and 10/min).
    pub fn try_with_token(mut self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        self.authenticated = true;
        let value = format!("Bearer {}", token.expose_secret());
        self.try_with_header(header::AUTHORIZATION, value)
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        self.try_with_header(header::USER_AGENT, user_agent)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    fn try_with_header(
        mut self,
        key: HeaderName,
        val: impl AsRef<str>,
    ) -> Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref()).map_err(anyhow::Error::from)?;
        self.headers.insert(key, val);
        Ok(self)
    }

    pub fn build(self) -> Result<GithubClient> {
        let client = self.client_builder.default_headers(self.headers).build()?;
        Ok(GithubClient {
            client,
            github_url: self.github_url,
            authenticated: self.authenticated,
            core: Mutex::new(BudgetTracker::new(ApiBudget::Core)),
            search: Mutex::new(BudgetTracker::new(ApiBudget::Search)),
            throttle: Mutex::new(SearchThrottle::new(self.authenticated)),
        })
    }
}
