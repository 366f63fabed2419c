use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::model::{NutritionPrompt, NutritionResult};

/// HTTP verbs used by the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thin JSON facade over the recipe REST API.
///
/// Every call is resolved against one base URL fixed at construction.
/// Failures are never retried or recovered here; they always propagate.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with no request timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            client: Client::new(),
            base_url: normalize_base(base_url.into()),
        }
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Self::new(config.base_url.clone());
        match config.timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => Ok(client),
        }
    }

    /// Rebuild the underlying HTTP client with a per-request timeout
    pub fn with_timeout(self, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(ApiClient { client, ..self })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {path}`
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<T, ()>(Method::Get, path, None).await
    }

    /// `POST {path}` with a JSON body
    pub async fn create_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::Post, path, Some(body)).await
    }

    /// `PUT {path}` with a JSON body (full replace)
    pub async fn replace_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::Put, path, Some(body)).await
    }

    /// `DELETE {path}`
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<T, ()>(Method::Delete, path, None).await
    }

    /// Ask the backend for an AI nutrition estimate of `description`.
    ///
    /// This can take a long time upstream; nothing here bounds it unless a
    /// timeout was configured.
    pub async fn request_nutritional_insight(&self, description: &str) -> Result<NutritionResult> {
        self.create_json(
            "/nutritional",
            &NutritionPrompt {
                prompt: description,
            },
        )
        .await
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.to_reqwest(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ClientError::Transport(e)
        })?;

        let response = check_status(method, path, response)?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|source| {
            warn!("{} {} returned an unreadable body: {}", method, path, source);
            ClientError::Decode {
                method,
                path: path.to_string(),
                source,
            }
        })
    }
}

fn check_status(method: Method, path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_text = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());
    warn!("{} {} answered {}", method, path, status);

    Err(ClientError::HttpStatus {
        method,
        path: path.to_string(),
        status: status_text,
    })
}

fn normalize_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
