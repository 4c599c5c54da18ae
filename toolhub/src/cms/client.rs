// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::CmsConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

const DUPLICATE_MARKERS: [&str; 3] = ["duplicate", "unique", "already exists"];

/// Which credentials a request needs. Draft-stage reads and all mutations are authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authorized,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum GraphError {
    /// The endpoint answered with an `errors` list.
    Graph(Vec<GraphQlError>),
    Transport(String),
    Decode(String),
    MissingToken,
}

impl GraphError {
    /// True when the endpoint reported a uniqueness violation.
    pub fn is_duplicate(&self) -> bool {
        match self {
            GraphError::Graph(errors) => errors.iter().any(|error| {
                let message = error.message.to_lowercase();
                DUPLICATE_MARKERS
                    .iter()
                    .any(|marker| message.contains(marker))
            }),
            _ => false,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, GraphError::Transport(_))
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Graph(errors) => {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                write!(f, "CMS returned errors: {}", messages.join("; "))
            }
            GraphError::Transport(msg) => write!(f, "CMS request failed: {}", msg),
            GraphError::Decode(msg) => write!(f, "CMS response invalid: {}", msg),
            GraphError::MissingToken => write!(f, "CMS mutation token is not configured"),
        }
    }
}

impl std::error::Error for GraphError {}

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Deserialize)]
struct GraphResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

impl GraphResponse {
    fn into_result(self) -> GraphResult<Value> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(GraphError::Graph(errors));
        }
        self.data
            .ok_or_else(|| GraphError::Decode("response carried neither data nor errors".into()))
    }
}

/// Sends one `{query, variables}` document and returns the `data` object.
#[async_trait]
pub trait GraphClient: Send + Sync {
    async fn execute(&self, query: &'static str, variables: Value, access: Access)
    -> GraphResult<Value>;
}

pub struct HttpGraphClient {
    client: Client,
    endpoint: String,
    mutation_token: Option<String>,
}

impl HttpGraphClient {
    pub fn new(config: &CmsConfig) -> GraphResult<Self> {
        let client = Client::builder()
            .user_agent("toolhub-cms")
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|err| GraphError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            mutation_token: config.mutation_token.clone(),
        })
    }
}

#[derive(Serialize)]
struct GraphRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[async_trait]
impl GraphClient for HttpGraphClient {
    async fn execute(
        &self,
        query: &'static str,
        variables: Value,
        access: Access,
    ) -> GraphResult<Value> {
        let mut request = self.client.post(&self.endpoint).json(&GraphRequest {
            query,
            variables: &variables,
        });
        if access == Access::Authorized {
            let token = self.mutation_token.as_deref().ok_or(GraphError::MissingToken)?;
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| GraphError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GraphError::Transport(err.to_string()))?;

        match serde_json::from_str::<GraphResponse>(&body) {
            Ok(parsed) => parsed.into_result(),
            Err(_) if !status.is_success() => {
                Err(GraphError::Transport(format!("HTTP {}", status.as_u16())))
            }
            Err(err) => Err(GraphError::Decode(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph_error(message: &str) -> GraphError {
        GraphError::Graph(vec![GraphQlError {
            message: message.to_string(),
            extensions: None,
        }])
    }

    #[test]
    fn duplicate_signal_is_detected_case_insensitively() {
        assert!(graph_error("value is not unique for the field \"slug\"").is_duplicate());
        assert!(graph_error("Tag already exists").is_duplicate());
        assert!(graph_error("DUPLICATE key").is_duplicate());
        assert!(!graph_error("permission denied").is_duplicate());
        assert!(!GraphError::Transport("timeout".into()).is_duplicate());
    }

    #[test]
    fn errors_take_precedence_over_data() {
        let response: GraphResponse = serde_json::from_value(json!({
            "data": { "createTag": null },
            "errors": [{ "message": "boom" }]
        }))
        .unwrap();
        assert!(matches!(response.into_result(), Err(GraphError::Graph(_))));
    }

    #[test]
    fn empty_errors_list_is_ignored() {
        let response: GraphResponse = serde_json::from_value(json!({
            "data": { "posts": [] },
            "errors": []
        }))
        .unwrap();
        assert_eq!(response.into_result().unwrap(), json!({ "posts": [] }));
    }

    #[test]
    fn response_without_data_is_a_decode_error() {
        let response: GraphResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(response.into_result(), Err(GraphError::Decode(_))));
    }

    #[tokio::test]
    async fn authorized_request_without_token_fails_fast() {
        let client = HttpGraphClient::new(&CmsConfig {
            endpoint: "http://127.0.0.1:1/graphql".to_string(),
            mutation_token: None,
            tag_settle_delay_ms: 0,
            timeout_seconds: 1,
        })
        .expect("client builds");
        let result = client
            .execute("query { tags { id } }", json!({}), Access::Authorized)
            .await;
        assert!(matches!(result, Err(GraphError::MissingToken)));
    }
}
