use std::{fmt::Debug, future::Future, time::Duration};

use reqwest::{
    header::{HeaderValue, RETRY_AFTER},
    Proxy, StatusCode,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;

#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("Invalid proxy {1}: {0}")]
    ProxyError(reqwest::Error, String),
    #[error("Failed to build HTTP client: {0}")]
    BuildError(#[from] reqwest::Error),
    #[error("Api key is not a valid header value")]
    InvalidKey,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to retrieve result from web API: {0}")]
    TransportError(#[from] reqwest::Error),
    #[error("Unexpected response {status}: {body}")]
    HttpError { status: StatusCode, body: String },
    #[error("Failed to decode web API response: {0}")]
    DecodeError(serde_json::Error, String),
    #[error("Still rate limited after {0} retries")]
    RetryLimitExceeded(u32),
}

/// Access token sent with every request.
#[derive(Clone)]
pub struct ApiKey(HeaderValue);

impl ApiKey {
    pub const HEADER: &'static str = "X-Riot-Token";

    pub fn new(key: &str) -> Result<Self, ConstructionError> {
        let mut value = HeaderValue::from_str(key).map_err(|_| ConstructionError::InvalidKey)?;
        value.set_sensitive(true);
        Ok(Self(value))
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Path plus query parameters of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    params: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: vec![],
        }
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

pub struct Request<'a> {
    pub url: String,
    pub params: &'a [(String, String)],
    pub key: Option<&'a ApiKey>,
}

pub struct RawResponse {
    pub status: StatusCode,
    pub retry_after: Option<String>,
    pub body: String,
}

impl RawResponse {
    /// `None` when the header is missing or not a whole number of seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.retry_after.as_deref()?;
        match value.trim().parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                log::warn!("ignoring malformed Retry-After header: {:?}", value);
                None
            }
        }
    }
}

pub trait Transport {
    fn send(
        &self,
        request: &Request<'_>,
    ) -> impl Future<Output = Result<RawResponse, reqwest::Error>> + Send;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConstructionError> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);
        let builder = match config.proxy.as_deref() {
            Some(proxy) => {
                let proxy = Proxy::all(proxy)
                    .map_err(|err| ConstructionError::ProxyError(err, proxy.to_string()))?;
                builder.proxy(proxy)
            }
            None => builder,
        };
        let client = builder.build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &Request<'_>) -> Result<RawResponse, reqwest::Error> {
        let req = self.client.get(&request.url).query(request.params);
        let req = match request.key {
            Some(key) => req.header(ApiKey::HEADER, key.header_value().clone()),
            None => req,
        };
        let resp = req.send().await?;
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await?;
        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

pub struct Client<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    key: Option<ApiKey>,
    fallback_wait: Duration,
    max_retries: Option<u32>,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self, ConstructionError> {
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T, config: &ClientConfig) -> Result<Self, ConstructionError> {
        let key = config.api_key.as_deref().map(ApiKey::new).transpose()?;
        Ok(Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key,
            fallback_wait: config.fallback_wait,
            max_retries: config.max_retries,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `endpoint` and decode the body.
    ///
    /// A 429 is never returned to the caller: the request is re-issued after the
    /// server supplied `Retry-After` (or the fallback wait), as many times as the
    /// server keeps answering 429 unless a retry cap is configured. Every other
    /// failure is returned as is.
    pub async fn get<R: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<R, RequestError> {
        let request = Request {
            url: format!("{}{}", self.base_url, endpoint.path()),
            params: endpoint.params(),
            key: self.key.as_ref(),
        };
        let mut retries = 0u32;
        loop {
            let resp = self.transport.send(&request).await?;
            match resp.status {
                StatusCode::TOO_MANY_REQUESTS => {
                    if self.max_retries.is_some_and(|max| retries >= max) {
                        return Err(RequestError::RetryLimitExceeded(retries));
                    }
                    retries += 1;
                    let wait = resp.retry_after().unwrap_or(self.fallback_wait);
                    log::warn!(
                        "rate limited on {}, waiting {}s before retry #{}",
                        endpoint.path(),
                        wait.as_secs(),
                        retries
                    );
                    tokio::time::sleep(wait).await;
                }
                status if status.is_success() => {
                    return serde_json::from_str(&resp.body)
                        .map_err(|err| RequestError::DecodeError(err, resp.body));
                }
                status => {
                    return Err(RequestError::HttpError {
                        status,
                        body: resp.body,
                    })
                }
            }
        }
    }
}
