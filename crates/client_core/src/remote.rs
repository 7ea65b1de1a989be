use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{NewPost, Post, PostId},
    error::ApiError,
};
use tracing::debug;
use url::Url;

use crate::{error::RemoteError, interceptor::ErrorInterceptor};

pub const DEFAULT_COLLECTION_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// The remote collection resource, keyed by post id.
#[async_trait]
pub trait PostsRemote: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, RemoteError>;
    async fn create(&self, new_post: &NewPost) -> Result<Post, RemoteError>;
    /// Full replace; every field of `post` is sent.
    async fn replace(&self, post: &Post) -> Result<(), RemoteError>;
    async fn delete(&self, id: PostId) -> Result<(), RemoteError>;
}

/// HTTP client for a collection endpoint with the error interceptor installed.
pub struct HttpPostsRemote {
    http: Client,
    collection_url: String,
    interceptor: ErrorInterceptor,
}

impl HttpPostsRemote {
    pub fn new(endpoint: &str, interceptor: ErrorInterceptor) -> Result<Self, RemoteError> {
        Self::with_client(Client::new(), endpoint, interceptor)
    }

    pub fn with_client(
        http: Client,
        endpoint: &str,
        interceptor: ErrorInterceptor,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            http,
            collection_url: normalize_endpoint(endpoint)?,
            interceptor,
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: PostId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    async fn execute(
        &self,
        method: Method,
        url: String,
        request: RequestBuilder,
    ) -> Result<Response, RemoteError> {
        debug!(%method, %url, "sending request");
        let outcome = match request.send().await {
            Err(source) => Err(RemoteError::Transport {
                method,
                url,
                source,
            }),
            Ok(response) if !response.status().is_success() => {
                let status = response.status();
                let message = read_error_message(response).await;
                Err(RemoteError::Status {
                    method,
                    url,
                    status,
                    message,
                })
            }
            Ok(response) => Ok(response),
        };
        outcome.map_err(|err| self.interceptor.observe(err))
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        response: Response,
    ) -> Result<T, RemoteError> {
        response.json().await.map_err(|source| {
            self.interceptor.observe(RemoteError::Decode {
                method,
                url,
                source,
            })
        })
    }
}

#[async_trait]
impl PostsRemote for HttpPostsRemote {
    async fn list(&self) -> Result<Vec<Post>, RemoteError> {
        let url = self.collection_url.clone();
        let response = self
            .execute(Method::GET, url.clone(), self.http.get(&url))
            .await?;
        self.decode(Method::GET, url, response).await
    }

    async fn create(&self, new_post: &NewPost) -> Result<Post, RemoteError> {
        let url = self.collection_url.clone();
        let response = self
            .execute(Method::POST, url.clone(), self.http.post(&url).json(new_post))
            .await?;
        self.decode(Method::POST, url, response).await
    }

    async fn replace(&self, post: &Post) -> Result<(), RemoteError> {
        let url = self.item_url(post.id);
        self.execute(Method::PUT, url.clone(), self.http.put(&url).json(post))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), RemoteError> {
        let url = self.item_url(id);
        self.execute(Method::DELETE, url.clone(), self.http.delete(&url))
            .await?;
        Ok(())
    }
}

fn normalize_endpoint(endpoint: &str) -> Result<String, RemoteError> {
    let invalid = |reason: String| RemoteError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let parsed = Url::parse(endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

async fn read_error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&text) {
        Ok(api_error) => api_error.message,
        Err(_) => text,
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
