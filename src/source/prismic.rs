//! Prismic-style REST content API

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ContentSource, SourceError};
use crate::config::SourceConfig;
use crate::content::{ContentBlock, Cursor, PostDetail, PostKey, PostPage, PostSummary};
use crate::helpers::parse_timestamp;

/// API root document, used to find the master ref
#[derive(Debug, Deserialize)]
struct ApiRoot {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<ApiDocument>,
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiDocument {
    uid: Option<String>,
    first_publication_date: Option<String>,
    data: PostFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostFields {
    title: String,
    subtitle: String,
    author: String,
    banner: Option<Banner>,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct Banner {
    url: Option<String>,
}

impl ApiDocument {
    fn into_summary(self) -> Option<PostSummary> {
        let key = match self.uid.as_deref().map(PostKey::parse) {
            Some(Ok(key)) => key,
            _ => {
                tracing::warn!("Skipping document with missing or invalid uid {:?}", self.uid);
                return None;
            }
        };
        Some(PostSummary {
            key,
            published: self.first_publication_date.as_deref().and_then(parse_timestamp),
            title: self.data.title,
            subtitle: self.data.subtitle,
            author: self.data.author,
        })
    }

    fn into_detail(self) -> PostDetail {
        PostDetail {
            published: self.first_publication_date.as_deref().and_then(parse_timestamp),
            title: self.data.title,
            banner_url: self.data.banner.and_then(|b| b.url).unwrap_or_default(),
            author: self.data.author,
            content: self.data.content,
        }
    }
}

impl SearchResponse {
    fn into_page(self) -> PostPage {
        PostPage {
            items: self
                .results
                .into_iter()
                .filter_map(ApiDocument::into_summary)
                .collect(),
            next_cursor: self.next_page.filter(|u| !u.is_empty()).map(Cursor::new),
        }
    }
}

/// HTTP client for a Prismic-compatible repository
#[derive(Debug, Clone)]
pub struct PrismicSource {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    document_type: String,
}

impl PrismicSource {
    /// Build a client for the configured repository
    pub fn new(config: &SourceConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            anyhow::bail!(
                "No content source endpoint configured (set source.endpoint in _config.yml or {})",
                crate::config::ENDPOINT_ENV
            );
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("headless-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            document_type: config.document_type.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SourceError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = ?e, "content source request failed");
            SourceError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, url = %response.url(), "content source returned error status");
            return Err(SourceError::Unavailable(format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn with_token(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.query(&[("access_token", token.as_str())]),
            None => request,
        }
    }

    async fn master_ref(&self) -> Result<String, SourceError> {
        let root: ApiRoot = self
            .get_json(self.with_token(self.client.get(&self.endpoint)))
            .await?;
        root.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| SourceError::Decode("API root has no master ref".to_string()))
    }

    async fn search(&self, predicate: &str, page_size: usize) -> Result<SearchResponse, SourceError> {
        let master_ref = self.master_ref().await?;
        let url = format!("{}/documents/search", self.endpoint);
        let query = format!("[{}]", predicate);
        let page_size_param = page_size.to_string();
        let request = self.client.get(url).query(&[
            ("ref", master_ref.as_str()),
            ("q", query.as_str()),
            ("pageSize", page_size_param.as_str()),
        ]);
        tracing::debug!(predicate, page_size, "querying content source");
        self.get_json(self.with_token(request)).await
    }
}

#[async_trait::async_trait]
impl ContentSource for PrismicSource {
    async fn query_first_page(&self, page_size: usize) -> Result<PostPage, SourceError> {
        let predicate = format!("[at(document.type,\"{}\")]", self.document_type);
        let response = self.search(&predicate, page_size.max(1)).await?;
        Ok(response.into_page())
    }

    async fn query_page(&self, cursor: &Cursor) -> Result<PostPage, SourceError> {
        tracing::debug!(cursor = cursor.as_str(), "fetching next page");
        let response: SearchResponse = self.get_json(self.client.get(cursor.as_str())).await?;
        Ok(response.into_page())
    }

    async fn query_by_key(&self, key: &PostKey) -> Result<PostDetail, SourceError> {
        let predicate = format!("[at(my.{}.uid,\"{}\")]", self.document_type, key.as_str());
        let response = self.search(&predicate, 1).await?;
        response
            .results
            .into_iter()
            .next()
            .map(ApiDocument::into_detail)
            .ok_or_else(|| SourceError::NotFound(key.to_string()))
    }

    fn name(&self) -> &'static str {
        "prismic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_JSON: &str = r#"{
        "page": 1,
        "results_per_page": 1,
        "next_page": "https://repo.cdn.prismic.io/api/v2/documents/search?page=2",
        "results": [{
            "id": "YF0lMRIAACIAYhmH",
            "uid": "como-utilizar-hooks",
            "type": "posts",
            "first_publication_date": "2021-03-25T19:25:28+0000",
            "data": {
                "title": "Como utilizar Hooks",
                "subtitle": "Pensando em sincronizacao",
                "author": "Joseph Oliveira",
                "banner": { "url": "https://images.prismic.io/banner.png" },
                "content": [{
                    "heading": "Proin et varius",
                    "body": [{ "type": "paragraph", "text": "Nullam dolor sapien", "spans": [] }]
                }]
            }
        }]
    }"#;

    #[test]
    fn test_search_response_to_page() {
        let response: SearchResponse = serde_json::from_str(SEARCH_JSON).unwrap();
        let page = response.into_page();
        assert_eq!(page.items.len(), 1);
        let post = &page.items[0];
        assert_eq!(post.key.as_str(), "como-utilizar-hooks");
        assert_eq!(post.author, "Joseph Oliveira");
        assert!(post.published.is_some());
        assert_eq!(
            page.next_cursor.unwrap().as_str(),
            "https://repo.cdn.prismic.io/api/v2/documents/search?page=2"
        );
    }

    #[test]
    fn test_document_to_detail() {
        let mut response: SearchResponse = serde_json::from_str(SEARCH_JSON).unwrap();
        let detail = response.results.remove(0).into_detail();
        assert_eq!(detail.banner_url, "https://images.prismic.io/banner.png");
        assert_eq!(detail.content.len(), 1);
        assert_eq!(detail.content[0].heading, "Proin et varius");
    }

    #[test]
    fn test_documents_without_uid_are_skipped() {
        let json = r#"{"next_page": null, "results": [
            {"uid": null, "first_publication_date": null, "data": {"title": "x"}},
            {"uid": "kept", "first_publication_date": null, "data": {"title": "y"}}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let page = response.into_page();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].key.as_str(), "kept");
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_requires_endpoint() {
        assert!(PrismicSource::new(&SourceConfig::default()).is_err());
    }
}
