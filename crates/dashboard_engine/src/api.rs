use std::sync::Arc;

use dashboard_core::{RequestFailure, SearchInput};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ClientSettings, Endpoints, Transport, TransportRequest};

const SEARCH_FIELDS: &[&str] = &["query", "location"];

/// Request body of `/search` and `/process`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchBody<'a> {
    pub query: &'a str,
    pub location: &'a str,
}

impl<'a> From<&'a SearchInput> for SearchBody<'a> {
    fn from(input: &'a SearchInput) -> Self {
        Self {
            query: &input.query,
            location: &input.location,
        }
    }
}

/// Success body of `/search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchReply {
    pub message: String,
}

/// Typed calls against the three backend endpoints.
#[derive(Clone)]
pub struct BackendApi {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    settings: ClientSettings,
}

impl BackendApi {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints, settings: ClientSettings) -> Self {
        Self {
            transport,
            endpoints,
            settings,
        }
    }

    pub async fn search(&self, input: &SearchInput) -> Result<SearchReply, RequestFailure> {
        let body = self.post_body(&self.endpoints.search, input).await?;
        serde_json::from_value(body).map_err(|_| RequestFailure::invalid_response())
    }

    /// The `/process` reply body is ignored.
    pub async fn process(&self, input: &SearchInput) -> Result<(), RequestFailure> {
        self.post_body(&self.endpoints.process, input).await?;
        Ok(())
    }

    pub async fn results(&self) -> Result<Value, RequestFailure> {
        let request = TransportRequest::get(self.endpoints.results.clone())
            .with_timeout(Some(self.settings.snapshot_timeout));
        Ok(self.transport.send(request).await?)
    }

    async fn post_body(&self, url: &str, input: &SearchInput) -> Result<Value, RequestFailure> {
        let body = serde_json::to_value(SearchBody::from(input)).map_err(|err| {
            RequestFailure::RequestSetup {
                message: err.to_string(),
            }
        })?;
        let request = TransportRequest::post(url, body)
            .with_timeout(self.settings.write_timeout)
            .requiring(SEARCH_FIELDS);
        Ok(self.transport.send(request).await?)
    }
}
