use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use crate::{ClientSettings, TransportError};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// A single JSON request against an absolute URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
    /// String fields the body must carry before anything is sent.
    pub required_fields: &'static [&'static str],
}

impl TransportRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
            timeout: None,
            required_fields: &[],
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: Some(body),
            timeout: None,
            required_fields: &[],
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn requiring(mut self, fields: &'static [&'static str]) -> Self {
        self.required_fields = fields;
        self
    }

    /// Checks everything that can be checked without touching the network.
    fn validate(&self) -> Result<reqwest::Url, TransportError> {
        let url = reqwest::Url::parse(&self.url)
            .map_err(|err| TransportError::setup(format!("invalid url {:?}: {err}", self.url)))?;

        if self.required_fields.is_empty() {
            return Ok(url);
        }
        let object = match &self.body {
            Some(Value::Object(object)) => object,
            Some(_) => return Err(TransportError::setup("request body must be a JSON object")),
            None => return Err(TransportError::setup("request body is missing")),
        };
        for field in self.required_fields {
            match object.get(*field) {
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(TransportError::setup(format!(
                        "field `{field}` must be a string"
                    )))
                }
                None => {
                    return Err(TransportError::setup(format!(
                        "missing required field `{field}`"
                    )))
                }
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the parsed JSON body of a success response.
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(connect_timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::setup(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        let url = request.validate()?;
        let method = request.method;

        let mut builder = self
            .client
            .request(method.as_reqwest(), url)
            .header(ACCEPT, JSON_CONTENT_TYPE);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|err| TransportError::setup(format!("cannot encode body: {err}")))?;
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        engine_debug!("{:?} {} sending", method, request.url);
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        engine_debug!(
            "{:?} {} -> {} ({} bytes)",
            method,
            request.url,
            status,
            bytes.len()
        );

        if !status.is_success() {
            let message = server_error_message(&bytes);
            engine_warn!(
                "{:?} {} failed with {}: {:?}",
                method,
                request.url,
                status,
                message
            );
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parse_body(&bytes))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        return TransportError::setup(err.to_string());
    }
    engine_warn!("no response: {}", err);
    TransportError::NoResponse(err.to_string())
}

/// Backend failures are shaped `{"error": "..."}`; anything else has no usable text.
fn server_error_message(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

/// Empty bodies become `null`; bodies that are not JSON are kept as text.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
