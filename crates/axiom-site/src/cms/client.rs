//! CMS query API client.

use axiom_common::{AxiomError, BlogPost};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::queries;
use crate::config::CmsConfig;

/// Query API envelope
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Read-only client for the CMS HTTP query API
pub struct CmsClient {
    client: reqwest::Client,
    query_url: String,
    token: Option<String>,
}

impl CmsClient {
    pub fn new(client: reqwest::Client, config: &CmsConfig) -> Self {
        let query_url = format!(
            "{}/v{}/data/query/{}",
            config.base_url(),
            config.api_version.trim_start_matches('v'),
            config.dataset
        );
        Self {
            client,
            query_url,
            token: config.token.clone(),
        }
    }

    /// Run a GROQ query. Parameters are JSON-encoded as `$name` query args.
    pub async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<T, AxiomError> {
        let mut args: Vec<(String, String)> = Vec::with_capacity(params.len() + 1);
        args.push(("query".to_string(), groq.to_string()));
        for (name, value) in params {
            args.push((format!("${name}"), value.to_string()));
        }

        let mut request = self.client.get(&self.query_url).query(&args);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AxiomError::Upstream(format!("CMS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), detail = %detail, "CMS query failed");
            return Err(AxiomError::Upstream(format!("CMS returned {status}")));
        }

        let body: QueryResponse<T> = response
            .json()
            .await
            .map_err(|e| AxiomError::Upstream(format!("invalid CMS response: {e}")))?;

        Ok(body.result)
    }

    /// Most recent published posts, for the feed
    pub async fn recent_posts(&self, limit: usize) -> Result<Vec<BlogPost>, AxiomError> {
        self.query(&queries::recent_posts(limit), &[]).await
    }

    pub async fn published_posts(&self) -> Result<Vec<BlogPost>, AxiomError> {
        self.query(queries::PUBLISHED_POSTS, &[]).await
    }

    pub async fn featured_post(&self) -> Result<Option<BlogPost>, AxiomError> {
        self.query(queries::FEATURED_POST, &[]).await
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, AxiomError> {
        self.query(queries::POST_BY_SLUG, &[("slug", Value::from(slug))])
            .await
    }

    /// Posts sharing at least one tag with `post`, excluding it
    pub async fn related_posts(
        &self,
        post: &BlogPost,
        limit: usize,
    ) -> Result<Vec<BlogPost>, AxiomError> {
        if post.tags.is_empty() {
            return Ok(Vec::new());
        }
        self.query(
            &queries::related_posts(limit),
            &[
                ("currentPostId", Value::from(post.id.as_str())),
                ("tags", Value::from(post.tags.clone())),
            ],
        )
        .await
    }
}
