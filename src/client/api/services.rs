use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::api::models::{QueryParams, RequestOptions, ResponseEnvelope, error_message};
use crate::client::ip::PublicIp;
use crate::client::token::{Anonymous, TokenSource};
use crate::config::Config;
use crate::error::ApiError;

/// Authenticated JSON client for the HR backend.
///
/// Reads (`get*`) return `Err(ApiError::Http)` on a non-2xx status. Writes,
/// deletes and uploads never do: they hand back a [`ResponseEnvelope`] and the
/// caller checks `ok`. Transport failures are errors everywhere.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    public_ip: Arc<PublicIp>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("public_ip", &self.public_ip)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>, public_ip: PublicIp) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            public_ip: Arc::new(public_ip),
        })
    }

    pub fn from_config(config: &Config, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let public_ip = PublicIp::new(&config.ip_lookup_url).with_timeout(config.ip_lookup_timeout);
        Self::new(&config.api_base_url, tokens, public_ip)
    }

    /// Client with no token and writes tagged `unknown`.
    pub fn anonymous(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(base_url, Arc::new(Anonymous), PublicIp::new(""))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// The address writes are tagged with. Resolved on first use.
    pub async fn public_ip(&self) -> String {
        self.public_ip.get(&self.http).await.to_string()
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.get_with(path, &RequestOptions::default()).await
    }

    pub async fn get_with(&self, path: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        let method = options.method.clone().unwrap_or(Method::GET);
        let request = self.request(method.clone(), path)?.headers(options.headers.clone());
        let (status, body) = read_body(request.send().await?).await;

        if !status.is_success() {
            let message = error_message(status, &body);
            log::warn!("{} {} failed with {}: {}", method, path, status.as_u16(), message);
            return Err(ApiError::Http { status, message, body });
        }
        Ok(body)
    }

    /// GET with query parameters. Empty and missing values are dropped.
    pub async fn get_with_params(&self, path: &str, params: &QueryParams) -> Result<Value, ApiError> {
        self.get(&params.apply_to(path)).await
    }

    /// GET decoded into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.get(path).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Payload(format!("unexpected response from {}: {}", path, e)))
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<ResponseEnvelope, ApiError> {
        self.write(Method::POST, path, payload).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<ResponseEnvelope, ApiError> {
        self.write(Method::PUT, path, payload).await
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<ResponseEnvelope, ApiError> {
        self.write(Method::PATCH, path, payload).await
    }

    /// JSON write. The payload is sent with an extra `ip` field carrying the
    /// session's public address.
    pub async fn write<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> Result<ResponseEnvelope, ApiError> {
        let mut body = match serde_json::to_value(payload).map_err(|e| ApiError::Payload(e.to_string()))? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ApiError::Payload(format!(
                    "write payload must be a JSON object, got {}",
                    other
                )));
            }
        };
        let ip = self.public_ip.get(&self.http).await;
        body.insert("ip".to_string(), Value::String(ip.to_string()));

        let bytes = serde_json::to_vec(&body).map_err(|e| ApiError::Payload(e.to_string()))?;
        let request = self
            .request(method, path)?
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(bytes);

        self.envelope(request).await
    }

    pub async fn delete(&self, path: &str) -> Result<ResponseEnvelope, ApiError> {
        let request = self.request(Method::DELETE, path)?;
        self.envelope(request).await
    }

    /// Multipart upload via POST.
    pub async fn upload(&self, path: &str, form: Form) -> Result<ResponseEnvelope, ApiError> {
        self.upload_with(Method::POST, path, form).await
    }

    /// Multipart upload. The content type and boundary are left to reqwest.
    pub async fn upload_with(&self, method: Method, path: &str, form: Form) -> Result<ResponseEnvelope, ApiError> {
        let request = self.request(method, path)?.multipart(form);
        self.envelope(request).await
    }

    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.tokens.token() {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
        }
        Ok(headers)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path);
        log::info!("{} {}", method, url);
        Ok(self.http.request(method, url).headers(self.auth_headers()?))
    }

    async fn envelope(&self, request: RequestBuilder) -> Result<ResponseEnvelope, ApiError> {
        let (status, body) = read_body(request.send().await?).await;
        let envelope = ResponseEnvelope::new(status, body);
        if !envelope.ok {
            log::warn!(
                "Request answered {}: {}",
                status.as_u16(),
                envelope.message().unwrap_or("no message")
            );
        }
        Ok(envelope)
    }
}

/// JSON content types parse as JSON (`{}` when malformed); everything else is
/// read as text (`""` when unreadable).
pub async fn read_body(res: Response) -> (StatusCode, Value) {
    let status = res.status();
    let is_json = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .is_some_and(|v| v.contains("application/json") || v.contains("+json"));

    let body = if is_json {
        res.json::<Value>().await.unwrap_or_else(|_| Value::Object(Map::new()))
    } else {
        Value::String(res.text().await.unwrap_or_default())
    };
    (status, body)
}
